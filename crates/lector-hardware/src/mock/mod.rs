//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware.

pub mod camera;
pub mod keyboard;

// Re-export commonly used types
pub use camera::{MockCamera, MockCameraHandle};
pub use keyboard::{MockKeyboard, MockKeyboardHandle};
