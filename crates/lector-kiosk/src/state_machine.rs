//! Scan session state machine.
//!
//! This module holds the transition table of a scan session and records the
//! transitions actually taken. It knows nothing about cameras or keys; the
//! [`ScanArbitrator`](crate::ScanArbitrator) decides *when* to move and this
//! module checks that the move is legal.
//!
//! # States
//!
//! - `Idle`: no camera session; keyed scans are accepted
//! - `Starting`: release-then-acquire of the camera is in flight
//! - `Active`: the camera is decoding
//! - `Stopping`: release of the camera is in flight
//!
//! # Valid Transitions
//!
//! - Idle → Starting → Active → Stopping → Idle
//! - Starting → Idle (acquisition failed)
//! - Starting → Stopping (stop requested while acquiring)
//! - Idle → Stopping (manual stop or keyed scan; defensive release)
//!
//! # Examples
//!
//! ```
//! use lector_kiosk::{SessionMachine, SessionState};
//!
//! let mut machine = SessionMachine::new();
//! assert_eq!(machine.current_state(), SessionState::Idle);
//!
//! machine.transition_to(SessionState::Starting).unwrap();
//! assert!(machine.transition_to(SessionState::Starting).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use lector_core::constants::MAX_SESSION_HISTORY;
use lector_core::{Error, Result};

/// State of the kiosk's single scan session.
///
/// The camera is hardware-acquired exactly when the session is in one of
/// `Starting`, `Active` or `Stopping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No camera session.
    Idle,

    /// Camera acquisition in flight.
    Starting,

    /// Camera decoding.
    Active,

    /// Camera release in flight.
    Stopping,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            SessionState::Idle => "Idle",
            SessionState::Starting => "Starting",
            SessionState::Active => "Active",
            SessionState::Stopping => "Stopping",
        };
        write!(f, "{}", state_str)
    }
}

impl SessionState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use lector_kiosk::SessionState;
    ///
    /// assert!(SessionState::Idle.can_transition_to(&SessionState::Starting));
    /// assert!(!SessionState::Idle.can_transition_to(&SessionState::Active));
    /// ```
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            // From Idle
            (SessionState::Idle, SessionState::Starting | SessionState::Stopping)
            // From Starting
            | (SessionState::Starting, SessionState::Active | SessionState::Idle | SessionState::Stopping)
            // From Active
            | (SessionState::Active, SessionState::Stopping)
            // From Stopping
            | (SessionState::Stopping, SessionState::Idle)
        )
    }
}

/// A single recorded session transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTransition {
    pub from: SessionState,
    pub to: SessionState,

    /// When the transition occurred.
    ///
    /// Not serialized; set to the deserialization time when read back.
    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl SessionTransition {
    /// Create a new transition record stamped now.
    pub fn new(from: SessionState, to: SessionState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }
}

/// Validated session state with bounded transition history.
///
/// # Thread Safety
///
/// Not synchronized. The arbitrator owns the only instance and mutates it
/// from its single event loop.
#[derive(Debug)]
pub struct SessionMachine {
    current_state: SessionState,
    history: VecDeque<SessionTransition>,
}

impl SessionMachine {
    /// Create a new machine in the `Idle` state.
    pub fn new() -> Self {
        Self {
            current_state: SessionState::Idle,
            history: VecDeque::with_capacity(MAX_SESSION_HISTORY),
        }
    }

    /// Current state.
    pub fn current_state(&self) -> SessionState {
        self.current_state
    }

    /// Recorded transitions, oldest first.
    pub fn history(&self) -> &VecDeque<SessionTransition> {
        &self.history
    }

    /// The last `count` transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<SessionTransition> {
        let skip = self.history.len().saturating_sub(count);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Move to `new_state` if the transition table allows it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] and leaves the state
    /// untouched if the move is not allowed.
    pub fn transition_to(&mut self, new_state: SessionState) -> Result<SessionTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = SessionTransition::new(self.current_state, new_state);
        self.current_state = new_state;

        self.history.push_back(transition.clone());
        if self.history.len() > MAX_SESSION_HISTORY {
            self.history.pop_front();
        }

        Ok(transition)
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}
