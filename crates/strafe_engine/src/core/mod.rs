//! # Core Engine Module
//!
//! Shared configuration that the other subsystems read at construction time.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for the engine loop, physics and characters
//! - **Foundation**: Low-level utilities (math, time, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    CharacterConfig,
    EngineConfig,
    PhysicsConfig,
    Config,
    ConfigError,
};
