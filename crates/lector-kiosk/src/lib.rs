//! Scan arbitration for the access kiosk.
//!
//! This crate holds the session logic of the kiosk's scan screen: which of
//! the camera or the keyboard-wedge scanner wins, when the camera is
//! acquired and released, and where an accepted code navigates to.

pub mod arbitrator;
pub mod config;
pub mod key_buffer;
pub mod listener;
pub mod router;
pub mod scanner;
pub mod state_machine;

pub use arbitrator::{Notice, OperatorCommand, ScanArbitrator};
pub use config::{KioskConfig, LoggingConfig};
pub use key_buffer::KeyBuffer;
pub use listener::KeyListener;
pub use router::{ChannelRouter, RecordingRouter, Router};
pub use scanner::{ResourceState, ScannerResource};
pub use state_machine::{SessionMachine, SessionState, SessionTransition};
