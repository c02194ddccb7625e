//! End-to-end tests running scenes through the engine frame loop
