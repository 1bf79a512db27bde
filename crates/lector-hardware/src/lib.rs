//! Hardware device abstraction layer for the access kiosk.
//!
//! This crate provides trait-based abstractions for the two input devices of
//! the kiosk: the optical decoder (camera + QR decoding) and the platform
//! keystroke stream a keyboard-wedge barcode scanner types into. These traits
//! enable easy substitution between mock implementations (for development and
//! testing) and real drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: lifecycle and input operations are asynchronous using
//!   native `async fn` in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Thread-safe**: all traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: all fallible operations return `Result<T>` with
//!   [`HardwareError`] details.
//! - **Callback-free**: the decoder reports through a [`DecodeSink`] channel
//!   instead of closures, so each scan session owns its own receiver.
//!
//! # Optical Decoder
//!
//! ```no_run
//! use lector_hardware::traits::OpticalDecoder;
//! use lector_hardware::types::{DecodeSink, ScanConstraints};
//! use lector_hardware::error::Result;
//!
//! async fn open<D: OpticalDecoder>(decoder: &mut D) -> Result<()> {
//!     let (sink, _rx) = DecodeSink::channel();
//!     decoder.start(&ScanConstraints::default(), sink).await
//! }
//! ```
//!
//! # Mock Implementations
//!
//! [`mock::MockCamera`] and [`mock::MockKeyboard`] come with control handles
//! that inject decodes, key presses and lifecycle failures.

pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use devices::{AnyKeyboardDevice, AnyOpticalDecoder};
pub use error::{HardwareError, Result};
pub use traits::{Key, KeyPress, KeyboardDevice, OpticalDecoder};
pub use types::{DecodeSignal, DecodeSink, FacingMode, QrBox, ScanConstraints};
