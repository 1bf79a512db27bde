//! Mock keystroke stream for testing and development.
//!
//! This module provides a simulated keyboard that can be typed into
//! programmatically, including keyboard-wedge scanner bursts.

use crate::{
    Result,
    traits::{Key, KeyPress, KeyboardDevice},
};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Mock keyboard device for testing and development.
///
/// This device receives key presses through an internal channel. Tests and
/// applications type into it using a `MockKeyboardHandle`.
///
/// # Examples
///
/// ```
/// use lector_hardware::mock::MockKeyboard;
/// use lector_hardware::traits::{Key, KeyboardDevice};
///
/// #[tokio::main]
/// async fn main() -> lector_hardware::Result<()> {
///     let (mut keyboard, handle) = MockKeyboard::new();
///
///     handle.scan_burst("42").await?;
///
///     assert_eq!(keyboard.read_key().await?.key, Key::Char('4'));
///     assert_eq!(keyboard.read_key().await?.key, Key::Char('2'));
///     assert_eq!(keyboard.read_key().await?.key, Key::Enter);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeyboard {
    /// Channel receiver for simulated key presses
    input_rx: mpsc::Receiver<KeyPress>,
}

impl MockKeyboard {
    /// Create a new mock keyboard.
    ///
    /// Returns a tuple of (MockKeyboard, MockKeyboardHandle) where the handle
    /// can be used to simulate key presses.
    pub fn new() -> (Self, MockKeyboardHandle) {
        let (input_tx, input_rx) = mpsc::channel(256);

        let keyboard = Self { input_rx };
        let handle = MockKeyboardHandle { input_tx };

        (keyboard, handle)
    }
}

impl Default for MockKeyboard {
    fn default() -> Self {
        Self::new().0
    }
}

impl KeyboardDevice for MockKeyboard {
    async fn read_key(&mut self) -> Result<KeyPress> {
        self.input_rx
            .recv()
            .await
            .ok_or_else(|| crate::HardwareError::disconnected("Keyboard input channel closed"))
    }
}

/// Handle for controlling a mock keyboard.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeyboardHandle {
    /// Channel sender for simulated key presses
    input_tx: mpsc::Sender<KeyPress>,
}

impl MockKeyboardHandle {
    /// Send a key press stamped with its own instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the keyboard has been dropped and the channel is closed.
    pub async fn send(&self, press: KeyPress) -> Result<()> {
        self.input_tx
            .send(press)
            .await
            .map_err(|_| crate::HardwareError::disconnected("Keyboard input channel closed"))
    }

    /// Send a key press observed now.
    pub async fn press(&self, key: Key) -> Result<()> {
        self.send(KeyPress::now(key)).await
    }

    /// Send a key press by its platform identifier, observed now.
    pub async fn press_identifier(&self, identifier: &str) -> Result<()> {
        self.press(Key::from_identifier(identifier)).await
    }

    /// Type `text` followed by Enter, all stamped with the same instant.
    ///
    /// This is what a keyboard-wedge scanner looks like from the kiosk: a
    /// burst far faster than any human typist.
    pub async fn scan_burst(&self, text: &str) -> Result<()> {
        let at = Instant::now();
        for c in text.chars() {
            self.send(KeyPress::at(Key::Char(c), at)).await?;
        }
        self.send(KeyPress::at(Key::Enter, at)).await
    }

    /// Type `text` followed by Enter with a fixed delay between presses.
    ///
    /// Timestamps are synthesized from `start`; nothing actually sleeps.
    pub async fn type_spaced(&self, text: &str, start: Instant, spacing: Duration) -> Result<()> {
        let mut at = start;
        for c in text.chars() {
            self.send(KeyPress::at(Key::Char(c), at)).await?;
            at += spacing;
        }
        self.send(KeyPress::at(Key::Enter, at)).await
    }
}
