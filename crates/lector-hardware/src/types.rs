//! Common types shared across hardware device implementations.
//!
//! This module defines the scan constraints handed to the optical decoder
//! and the callback channel the decoder reports through.

use lector_core::constants::{DEFAULT_QRBOX_SIDE, DEFAULT_SCAN_FPS};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

/// Which camera to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    /// Front camera, facing the operator.
    User,
    /// Rear camera, facing away from the operator.
    #[default]
    Environment,
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// Region of the frame the decoder searches, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrBox {
    pub width: u32,
    pub height: u32,
}

impl Default for QrBox {
    fn default() -> Self {
        Self {
            width: DEFAULT_QRBOX_SIDE,
            height: DEFAULT_QRBOX_SIDE,
        }
    }
}

/// Constraints passed to the optical decoder when scanning starts.
///
/// # Examples
///
/// ```
/// use lector_hardware::types::{FacingMode, ScanConstraints};
///
/// let constraints = ScanConstraints::default();
/// assert_eq!(constraints.facing_mode, FacingMode::Environment);
/// assert_eq!(constraints.fps, 10);
/// assert_eq!(constraints.qrbox.width, 250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConstraints {
    pub facing_mode: FacingMode,
    pub fps: u32,
    pub qrbox: QrBox,
}

impl Default for ScanConstraints {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::default(),
            fps: DEFAULT_SCAN_FPS,
            qrbox: QrBox::default(),
        }
    }
}

/// Report delivered by a running optical decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeSignal {
    /// A symbol was decoded into text.
    Decoded(String),

    /// A frame could not be decoded. Transient and non-fatal.
    Noise(String),
}

/// Callback side of a decoding session.
///
/// The decoder receives a sink when scanning starts and reports through it
/// for as long as it runs. Each session gets its own sink/receiver pair, so
/// reports from a torn-down session never reach a later one.
///
/// # Examples
///
/// ```
/// use lector_hardware::types::{DecodeSignal, DecodeSink};
///
/// let (sink, mut rx) = DecodeSink::channel();
/// assert!(sink.decoded("abc"));
/// assert_eq!(rx.try_recv().unwrap(), DecodeSignal::Decoded("abc".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct DecodeSink {
    tx: mpsc::UnboundedSender<DecodeSignal>,
}

impl DecodeSink {
    /// Create a sink together with the receiver that consumes its reports.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DecodeSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Report a successful decode.
    ///
    /// Returns `false` if the session that owned the receiver is gone.
    pub fn decoded(&self, text: impl Into<String>) -> bool {
        self.tx.send(DecodeSignal::Decoded(text.into())).is_ok()
    }

    /// Report a transient decode miss.
    ///
    /// Returns `false` if the session that owned the receiver is gone.
    pub fn noise(&self, info: impl Into<String>) -> bool {
        self.tx.send(DecodeSignal::Noise(info.into())).is_ok()
    }

    /// Check whether the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_constraints_default() {
        let constraints = ScanConstraints::default();
        assert_eq!(constraints.facing_mode, FacingMode::Environment);
        assert_eq!(constraints.fps, DEFAULT_SCAN_FPS);
        assert_eq!(constraints.qrbox, QrBox { width: 250, height: 250 });
    }

    #[test]
    fn test_scan_constraints_partial_deserialization() {
        let constraints: ScanConstraints =
            serde_json::from_str(r#"{"facing_mode":"user","fps":5}"#).unwrap();
        assert_eq!(constraints.facing_mode, FacingMode::User);
        assert_eq!(constraints.fps, 5);
        assert_eq!(constraints.qrbox, QrBox::default());
    }

    #[test]
    fn test_decode_sink_reports() {
        let (sink, mut rx) = DecodeSink::channel();

        assert!(sink.noise("no symbol"));
        assert!(sink.decoded("externo-1"));

        assert_eq!(rx.try_recv().unwrap(), DecodeSignal::Noise("no symbol".to_string()));
        assert_eq!(
            rx.try_recv().unwrap(),
            DecodeSignal::Decoded("externo-1".to_string())
        );
    }

    #[test]
    fn test_decode_sink_closed_session() {
        let (sink, rx) = DecodeSink::channel();
        drop(rx);

        assert!(sink.is_closed());
        assert!(!sink.decoded("late"));
    }
}
