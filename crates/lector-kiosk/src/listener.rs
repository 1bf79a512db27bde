//! Scoped keystroke listener.
//!
//! [`KeyListener`] registers a single reader on the platform keystroke
//! stream and forwards presses to the arbitrator. The registration lasts as
//! long as the listener value: dropping it or calling
//! [`shutdown`](KeyListener::shutdown) stops the reader task.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use lector_hardware::{AnyKeyboardDevice, KeyPress, KeyboardDevice};

/// Buffered presses between the reader task and the arbitrator.
const KEY_CHANNEL_CAPACITY: usize = 256;

/// Forwarding task plus the receiving end of its key channel.
#[derive(Debug)]
pub struct KeyListener {
    rx: mpsc::Receiver<KeyPress>,
    task: Option<JoinHandle<()>>,
}

impl KeyListener {
    /// Start reading key presses from `device`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(device: AnyKeyboardDevice) -> Self {
        let (tx, rx) = mpsc::channel(KEY_CHANNEL_CAPACITY);
        let task = tokio::spawn(Self::forward_keys(device, tx));

        Self {
            rx,
            task: Some(task),
        }
    }

    /// Next key press, or `None` once the device has gone away.
    pub async fn recv(&mut self) -> Option<KeyPress> {
        self.rx.recv().await
    }

    /// Deregister the listener and wait for the reader task to end.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            match task.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => warn!(error = %e, "Key listener task panicked"),
            }
        }
    }

    async fn forward_keys(mut device: AnyKeyboardDevice, tx: mpsc::Sender<KeyPress>) {
        loop {
            match device.read_key().await {
                Ok(press) => {
                    if tx.send(press).await.is_err() {
                        break; // Listener dropped
                    }
                }
                Err(e) => {
                    debug!(error = %e, "Keystroke stream ended");
                    break;
                }
            }
        }
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
