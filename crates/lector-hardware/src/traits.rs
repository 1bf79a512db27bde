//! Hardware device trait definitions.
//!
//! This module defines the contract between the kiosk core and its two input
//! devices: the optical decoder that turns camera frames into text, and the
//! platform keystroke stream a keyboard-wedge barcode scanner types into.
//! Real drivers and the mocks in [`crate::mock`] implement the same traits.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use std::time::Instant;

use lector_core::constants::TERMINATOR_KEY;

use crate::error::Result;
use crate::types::{DecodeSink, ScanConstraints};

/// A key identifier as reported by the platform.
///
/// Platforms name keys with strings: a printable key is named by the single
/// character it produces, everything else (modifiers, arrows, function keys)
/// by a multi-character name such as `"Shift"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A key producing a single character.
    Char(char),

    /// The terminator key (Enter/Return).
    Enter,

    /// Any other key, by its platform name.
    Named(String),
}

impl Key {
    /// Parse a platform key identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use lector_hardware::traits::Key;
    ///
    /// assert_eq!(Key::from_identifier("a"), Key::Char('a'));
    /// assert_eq!(Key::from_identifier("Enter"), Key::Enter);
    /// assert_eq!(Key::from_identifier("Shift"), Key::Named("Shift".to_string()));
    /// ```
    pub fn from_identifier(identifier: &str) -> Self {
        if identifier == TERMINATOR_KEY || identifier == "Return" {
            return Self::Enter;
        }

        let mut chars = identifier.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::Char(c),
            _ => Self::Named(identifier.to_string()),
        }
    }

    /// The printable character this key appends, if any.
    pub fn printable(&self) -> Option<char> {
        match self {
            Self::Char(c) if !c.is_control() => Some(*c),
            _ => None,
        }
    }

    /// Check if this is the terminator key.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::Enter)
    }
}

/// A key press together with the moment it was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub at: Instant,
}

impl KeyPress {
    /// Create a key press observed now.
    pub fn now(key: Key) -> Self {
        Self {
            key,
            at: Instant::now(),
        }
    }

    /// Create a key press observed at a given instant.
    pub fn at(key: Key, at: Instant) -> Self {
        Self { key, at }
    }
}

/// Platform keystroke stream.
///
/// A keyboard-wedge barcode scanner is indistinguishable from a keyboard at
/// this layer; timing is the only difference, which is why every press
/// carries its observation instant.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters, or the enum wrapper
/// [`AnyKeyboardDevice`](crate::devices::AnyKeyboardDevice) for dispatch.
///
/// # Examples
///
/// ```no_run
/// use lector_hardware::traits::{Key, KeyboardDevice};
/// use lector_hardware::error::Result;
///
/// async fn read_until_enter<K: KeyboardDevice>(keyboard: &mut K) -> Result<String> {
///     let mut text = String::new();
///
///     loop {
///         let press = keyboard.read_key().await?;
///
///         match press.key {
///             Key::Enter => break,
///             key => text.extend(key.printable()),
///         }
///     }
///
///     Ok(text)
/// }
/// ```
pub trait KeyboardDevice: Send + Sync {
    /// Read the next key press.
    ///
    /// # Errors
    ///
    /// Returns an error if the keystroke stream is closed or the device is
    /// disconnected.
    async fn read_key(&mut self) -> Result<KeyPress>;
}

/// Optical decode capability.
///
/// Wraps a camera plus the pixel-to-text decoder running on its frames.
/// While scanning, the decoder reports successful decodes and transient
/// misses through the [`DecodeSink`] it was started with.
///
/// # Object Safety and Dynamic Dispatch
///
/// Like [`KeyboardDevice`], this trait is not object-safe; use
/// [`AnyOpticalDecoder`](crate::devices::AnyOpticalDecoder) for dispatch.
///
/// # Examples
///
/// ```no_run
/// use lector_hardware::traits::OpticalDecoder;
/// use lector_hardware::types::{DecodeSink, DecodeSignal, ScanConstraints};
/// use lector_hardware::error::Result;
///
/// async fn scan_once<D: OpticalDecoder>(decoder: &mut D) -> Result<Option<String>> {
///     let (sink, mut rx) = DecodeSink::channel();
///     decoder.start(&ScanConstraints::default(), sink).await?;
///
///     let mut decoded = None;
///     while let Some(signal) = rx.recv().await {
///         if let DecodeSignal::Decoded(text) = signal {
///             decoded = Some(text);
///             break;
///         }
///     }
///
///     decoder.stop().await?;
///     decoder.clear()?;
///     Ok(decoded)
/// }
/// ```
pub trait OpticalDecoder: Send + Sync {
    /// Open the camera and begin decoding.
    ///
    /// Resolves once the camera stream is running. Reports are delivered
    /// through `sink` until [`stop`](Self::stop) is called.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Camera access is denied
    /// - No camera satisfies the constraints
    /// - The decoder is already scanning
    async fn start(&mut self, constraints: &ScanConstraints, sink: DecodeSink) -> Result<()>;

    /// Stop decoding and close the camera stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder is not scanning or the camera fails
    /// to close.
    async fn stop(&mut self) -> Result<()>;

    /// Clear the rendering surface the camera preview was drawn on.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be cleared, for example while
    /// the decoder is still scanning.
    fn clear(&mut self) -> Result<()>;

    /// Whether decoding is currently running.
    fn is_scanning(&self) -> bool;
}
