//! Navigation targets for accepted scans.
//!
//! The arbitrator calls [`Router::navigate`] exactly once per accepted scan.
//! What navigating means (switching screens, printing a path, recording it
//! for a test) is up to the implementation.

use tokio::sync::mpsc;
use tracing::debug;

use lector_core::Navigation;

/// Receiver of navigation requests.
pub trait Router {
    fn navigate(&mut self, navigation: &Navigation);
}

/// Router that records every navigation in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingRouter {
    navigations: Vec<Navigation>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigations received so far, oldest first.
    pub fn navigations(&self) -> &[Navigation] {
        &self.navigations
    }

    /// Paths received so far, oldest first.
    pub fn paths(&self) -> Vec<&str> {
        self.navigations.iter().map(|n| n.path.as_str()).collect()
    }
}

impl Router for RecordingRouter {
    fn navigate(&mut self, navigation: &Navigation) {
        self.navigations.push(navigation.clone());
    }
}

/// Router that forwards navigations to a channel.
///
/// Used when the screen that performs the navigation lives on another task.
#[derive(Debug, Clone)]
pub struct ChannelRouter {
    tx: mpsc::UnboundedSender<Navigation>,
}

impl ChannelRouter {
    /// Create a router together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Navigation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Router for ChannelRouter {
    fn navigate(&mut self, navigation: &Navigation) {
        if self.tx.send(navigation.clone()).is_err() {
            debug!(path = %navigation.path, "Navigation receiver dropped");
        }
    }
}
