//! Core constants for the access kiosk input stage.
//!
//! This module centralizes the fixed values shared by the keyboard-wedge
//! decoder, the classifier and the optical scanner defaults. Values here are
//! part of the kiosk's operating contract with the scanning hardware and the
//! confirmation screens; they are intentionally not exposed through the
//! configuration file.
//!
//! # Usage
//!
//! ```
//! use lector_core::constants::*;
//! use std::time::Duration;
//!
//! let gap = Duration::from_millis(KEY_GAP_THRESHOLD_MS);
//! assert_eq!(gap.as_millis(), 50);
//! assert!("externo-42".starts_with(EXTERNO_PREFIX));
//! ```

// ============================================================================
// Keyboard Wedge
// ============================================================================

/// Maximum gap between two keystrokes of the same scanner burst (milliseconds).
///
/// Hardware barcode scanners inject characters much faster than a person can
/// type. A keystroke arriving more than this long after the previous one
/// starts a fresh burst and discards whatever was buffered.
///
/// # Value: 50ms
pub const KEY_GAP_THRESHOLD_MS: u64 = 50;

/// Key identifier that terminates a scanner burst.
pub const TERMINATOR_KEY: &str = "Enter";

// ============================================================================
// Classification
// ============================================================================

/// Prefix carried by codes issued to external observers.
///
/// Codes starting with this literal route to the observer access screen;
/// every other code routes to the computo-room access screen.
///
/// # Examples
///
/// ```
/// use lector_core::constants::EXTERNO_PREFIX;
///
/// assert!("externo-0042".starts_with(EXTERNO_PREFIX));
/// assert!(!"EXTERNO-0042".starts_with(EXTERNO_PREFIX));
/// ```
pub const EXTERNO_PREFIX: &str = "externo-";

/// Default route base for the external observer confirmation screen.
pub const DEFAULT_EXTERNO_ROUTE: &str = "/accesoObservador";

/// Default route base for the computo-room confirmation screen.
pub const DEFAULT_COMPUTO_ROUTE: &str = "/accesoComputo";

// ============================================================================
// Optical Scanner Defaults
// ============================================================================

/// Default decode attempts per second requested from the optical decoder.
pub const DEFAULT_SCAN_FPS: u32 = 10;

/// Default side length of the square scan box, in pixels.
pub const DEFAULT_QRBOX_SIDE: u32 = 250;

// ============================================================================
// Session Bookkeeping
// ============================================================================

/// Maximum number of session transitions kept for diagnostics.
///
/// A full camera scan walks four transitions (Idle → Starting → Active →
/// Stopping → Idle), so 100 entries cover roughly 25 recent sessions.
pub const MAX_SESSION_HISTORY: usize = 100;

/// Text shown by the "show info" operator command.
pub const ABOUT_TEXT: &str = "Access kiosk for computo rooms. Scan a QR code with the camera \
or read a barcode with the handheld scanner to register access. Make sure the code is in \
focus or that the scanner is configured to send Enter after each read.";
