use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input channel a scan arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanSource {
    /// Optical decode from the camera.
    Camera,
    /// Keyboard-wedge burst from a handheld barcode scanner.
    Keyboard,
}

impl fmt::Display for ScanSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanSource::Camera => write!(f, "camera"),
            ScanSource::Keyboard => write!(f, "keyboard"),
        }
    }
}

/// A raw scan as produced by one of the input sources.
///
/// Scan events are ephemeral: they are created by a source and consumed
/// immediately by the arbitrator. `raw_text` is kept exactly as decoded or
/// typed; normalization happens at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub raw_text: String,
    pub source: ScanSource,
    pub observed_at: DateTime<Utc>,
}

impl ScanEvent {
    /// Create a scan event stamped with the current wall-clock time.
    pub fn new(raw_text: impl Into<String>, source: ScanSource) -> Self {
        Self {
            raw_text: raw_text.into(),
            source,
            observed_at: Utc::now(),
        }
    }

    /// Create a camera scan event.
    pub fn camera(raw_text: impl Into<String>) -> Self {
        Self::new(raw_text, ScanSource::Camera)
    }

    /// Create a keyboard scan event.
    pub fn keyboard(raw_text: impl Into<String>) -> Self {
        Self::new(raw_text, ScanSource::Keyboard)
    }

    /// Replace the observation timestamp.
    #[must_use]
    pub fn with_observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = observed_at;
        self
    }
}
