//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits (RPITIT - Rust Edition 2024) are not
//! object-safe, so `Box<dyn OpticalDecoder>` is not available. The enums in
//! this module provide concrete type dispatch instead, which keeps the
//! futures' auto traits visible to the compiler (a keyboard listener task
//! spawned on an [`AnyKeyboardDevice`] is `Send` without extra bounds).
//!
//! # Examples
//!
//! ```
//! use lector_hardware::devices::AnyOpticalDecoder;
//! use lector_hardware::mock::MockCamera;
//!
//! let (camera, _handle) = MockCamera::new();
//! let decoder = AnyOpticalDecoder::Mock(camera);
//! ```

use crate::mock::{MockCamera, MockKeyboard};
use crate::traits::{KeyPress, KeyboardDevice, OpticalDecoder};
use crate::types::{DecodeSink, ScanConstraints};
use crate::Result;

/// Enum wrapper for optical decoder dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyOpticalDecoder {
    /// Mock camera for development and testing.
    Mock(MockCamera),
}

impl OpticalDecoder for AnyOpticalDecoder {
    async fn start(&mut self, constraints: &ScanConstraints, sink: DecodeSink) -> Result<()> {
        match self {
            Self::Mock(device) => device.start(constraints, sink).await,
        }
    }

    async fn stop(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.stop().await,
        }
    }

    fn clear(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.clear(),
        }
    }

    fn is_scanning(&self) -> bool {
        match self {
            Self::Mock(device) => device.is_scanning(),
        }
    }
}

/// Enum wrapper for keystroke stream dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyKeyboardDevice {
    /// Mock keyboard for development and testing.
    Mock(MockKeyboard),
}

impl KeyboardDevice for AnyKeyboardDevice {
    async fn read_key(&mut self) -> Result<KeyPress> {
        match self {
            Self::Mock(device) => device.read_key().await,
        }
    }
}
