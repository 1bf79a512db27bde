//! Error types for hardware operations.
//!
//! This module defines error types specific to the kiosk's input devices:
//! the optical decoder (camera) and the platform keystroke stream.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Access to the device was refused by the platform.
    #[error("Permission denied: {device}")]
    PermissionDenied { device: String },

    /// No camera matching the requested constraints exists.
    #[error("No camera available: {message}")]
    NoCamera { message: String },

    /// Decoding was started while already running.
    #[error("Decoder already scanning")]
    AlreadyScanning,

    /// A scanning-only operation was invoked while not scanning.
    #[error("Decoder is not scanning")]
    NotScanning,

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Invalid data received from or passed to a device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new permission denied error.
    pub fn permission_denied(device: impl Into<String>) -> Self {
        Self::PermissionDenied {
            device: device.into(),
        }
    }

    /// Create a new missing camera error.
    pub fn no_camera(message: impl Into<String>) -> Self {
        Self::NoCamera {
            message: message.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
