//! Keyboard-wedge decoder.
//!
//! A hardware barcode scanner plugged in as a keyboard types the decoded
//! text as a burst of key presses followed by Enter. [`KeyBuffer`] turns that
//! keystroke stream back into completed codes, using the gap between presses
//! to tell scanner bursts from stray human typing.

use std::time::{Duration, Instant};

use lector_core::constants::KEY_GAP_THRESHOLD_MS;
use lector_hardware::Key;

const KEY_GAP: Duration = Duration::from_millis(KEY_GAP_THRESHOLD_MS);

/// Accumulates printable key presses until a terminator arrives.
///
/// The buffer has no notion of scan sessions; whether a completed code is
/// acted on is decided by the arbitrator.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use lector_hardware::Key;
/// use lector_kiosk::KeyBuffer;
///
/// let mut buffer = KeyBuffer::new();
/// let t0 = Instant::now();
///
/// assert_eq!(buffer.on_key(&Key::Char('4'), t0), None);
/// assert_eq!(buffer.on_key(&Key::Char('2'), t0 + Duration::from_millis(5)), None);
/// assert_eq!(
///     buffer.on_key(&Key::Enter, t0 + Duration::from_millis(10)),
///     Some("42".to_string())
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyBuffer {
    chars: String,
    last_key_at: Option<Instant>,
}

impl KeyBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key press observed at `now`.
    ///
    /// Returns the completed code when `key` is the terminator and the
    /// trimmed buffer is non-empty.
    pub fn on_key(&mut self, key: &Key, now: Instant) -> Option<String> {
        if let Some(last) = self.last_key_at {
            // Instants from a misbehaving source can run backwards; treat that as no gap.
            if now.saturating_duration_since(last) > KEY_GAP {
                self.chars.clear();
            }
        }
        self.last_key_at = Some(now);

        if key.is_terminator() {
            let code = self.chars.trim().to_string();
            self.chars.clear();
            return (!code.is_empty()).then_some(code);
        }

        if let Some(c) = key.printable() {
            self.chars.push(c);
        }

        None
    }

    /// Characters buffered so far.
    pub fn pending(&self) -> &str {
        &self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}
