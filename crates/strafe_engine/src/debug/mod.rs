//! Debug visualization
//!
//! Wireframe shapes queued by gameplay code and physics for a renderer to
//! draw. The core only records shapes; it never touches pixels.

pub mod draw;

pub use draw::{DebugColor, DebugDrawSystem, DebugPrimitive, DebugShape};
