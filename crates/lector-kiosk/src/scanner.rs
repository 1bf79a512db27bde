//! Camera resource lifecycle.
//!
//! [`ScannerResource`] is the only owner of the optical decoder. It turns the
//! decoder's start/stop/clear calls into an acquire/release pair where
//! release is always safe: after a failed start, when nothing was acquired,
//! or when called twice.

use std::fmt;

use tracing::{debug, warn};

use lector_core::{Error, Result};
use lector_hardware::{DecodeSink, OpticalDecoder, ScanConstraints};

/// Lifecycle position of the camera handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    Released,
    Acquiring,
    Acquired,
    Releasing,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            ResourceState::Released => "Released",
            ResourceState::Acquiring => "Acquiring",
            ResourceState::Acquired => "Acquired",
            ResourceState::Releasing => "Releasing",
        };
        write!(f, "{}", state_str)
    }
}

/// Exclusive owner of one optical decoder.
///
/// # Examples
///
/// ```
/// use lector_hardware::mock::MockCamera;
/// use lector_hardware::{DecodeSink, ScanConstraints};
/// use lector_kiosk::scanner::{ResourceState, ScannerResource};
///
/// #[tokio::main]
/// async fn main() -> lector_core::Result<()> {
///     let (camera, _handle) = MockCamera::new();
///     let mut scanner = ScannerResource::new(camera);
///
///     let (sink, _rx) = DecodeSink::channel();
///     scanner.acquire(&ScanConstraints::default(), sink).await?;
///     assert_eq!(scanner.state(), ResourceState::Acquired);
///
///     scanner.release().await;
///     scanner.release().await;
///     assert_eq!(scanner.state(), ResourceState::Released);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ScannerResource<D> {
    decoder: D,
    state: ResourceState,

    /// Set once `start` has been attempted and cleared by `release`.
    has_handle: bool,
}

impl<D: OpticalDecoder> ScannerResource<D> {
    /// Take ownership of a decoder. The resource starts released.
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            state: ResourceState::Released,
            has_handle: false,
        }
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Whether a start was attempted that has not been released yet.
    pub fn has_handle(&self) -> bool {
        self.has_handle
    }

    /// Open the camera and start decoding into `sink`.
    ///
    /// The caller must have released any previous handle first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StartFailure`] if the decoder cannot start. The
    /// resource is then left `Acquiring` with a handle to release.
    pub async fn acquire(&mut self, constraints: &ScanConstraints, sink: DecodeSink) -> Result<()> {
        self.has_handle = true;
        self.state = ResourceState::Acquiring;

        self.decoder
            .start(constraints, sink)
            .await
            .map_err(|e| Error::start_failure(e.to_string()))?;

        self.state = ResourceState::Acquired;
        debug!(
            facing_mode = %constraints.facing_mode,
            fps = constraints.fps,
            "Camera acquired"
        );
        Ok(())
    }

    /// Stop decoding and clear the preview surface, best effort.
    ///
    /// A no-op when nothing is held and the decoder is idle. A decoder left
    /// scanning by an earlier failed stop is stopped even without a handle.
    /// Each step's failure is logged as a teardown warning and the next step
    /// still runs; the resource always ends `Released`.
    pub async fn release(&mut self) {
        let scanning = self.decoder.is_scanning();
        if !self.has_handle && !scanning {
            self.state = ResourceState::Released;
            return;
        }

        self.state = ResourceState::Releasing;

        if scanning {
            if let Err(e) = self.decoder.stop().await {
                let warning = Error::teardown_warning(e.to_string());
                warn!(step = "stop", error = %warning, "Camera teardown step failed");
            }
        }

        if let Err(e) = self.decoder.clear() {
            let warning = Error::teardown_warning(e.to_string());
            warn!(step = "clear", error = %warning, "Camera teardown step failed");
        }

        self.has_handle = false;
        self.state = ResourceState::Released;
        debug!("Camera released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lector_hardware::mock::MockCamera;
    use lector_hardware::{DecodeSignal, HardwareError};

    fn scanner() -> (
        ScannerResource<MockCamera>,
        lector_hardware::mock::MockCameraHandle,
    ) {
        let (camera, handle) = MockCamera::new();
        (ScannerResource::new(camera), handle)
    }

    #[tokio::test]
    async fn test_acquire_and_release() {
        let (mut scanner, handle) = scanner();
        let (sink, mut rx) = DecodeSink::channel();

        scanner
            .acquire(&ScanConstraints::default(), sink)
            .await
            .unwrap();
        assert_eq!(scanner.state(), ResourceState::Acquired);
        assert!(handle.is_scanning());

        assert!(handle.emit_decode("abc"));
        assert_eq!(rx.recv().await, Some(DecodeSignal::Decoded("abc".to_string())));

        scanner.release().await;
        assert_eq!(scanner.state(), ResourceState::Released);
        assert!(!handle.is_scanning());
        assert!(!handle.surface_drawn());
        assert_eq!(handle.stop_calls(), 1);
        assert_eq!(handle.clear_calls(), 1);
    }

    #[tokio::test]
    async fn test_release_without_acquire_is_noop() {
        let (mut scanner, handle) = scanner();

        scanner.release().await;

        assert_eq!(scanner.state(), ResourceState::Released);
        assert_eq!(handle.stop_calls(), 0);
        assert_eq!(handle.clear_calls(), 0);
    }

    #[tokio::test]
    async fn test_double_release() {
        let (mut scanner, handle) = scanner();
        let (sink, _rx) = DecodeSink::channel();

        scanner
            .acquire(&ScanConstraints::default(), sink)
            .await
            .unwrap();
        scanner.release().await;
        scanner.release().await;

        assert_eq!(scanner.state(), ResourceState::Released);
        assert_eq!(handle.stop_calls(), 1);
        assert_eq!(handle.clear_calls(), 1);
    }

    #[tokio::test]
    async fn test_start_failure_maps_and_release_recovers() {
        let (mut scanner, handle) = scanner();
        handle.fail_next_start(HardwareError::permission_denied("rear camera"));
        let (sink, _rx) = DecodeSink::channel();

        let error = scanner
            .acquire(&ScanConstraints::default(), sink)
            .await
            .unwrap_err();

        assert!(matches!(error, Error::StartFailure { .. }));
        assert!(error.to_string().contains("rear camera"));
        assert!(scanner.has_handle());

        scanner.release().await;
        assert_eq!(scanner.state(), ResourceState::Released);
        assert!(!scanner.has_handle());
        // Nothing was scanning, so only the surface is cleared.
        assert_eq!(handle.stop_calls(), 0);
        assert_eq!(handle.clear_calls(), 1);
    }

    #[tokio::test]
    async fn test_teardown_failures_still_release() {
        let (mut scanner, handle) = scanner();
        let (sink, _rx) = DecodeSink::channel();

        scanner
            .acquire(&ScanConstraints::default(), sink)
            .await
            .unwrap();
        handle.fail_next_stop(HardwareError::communication("stream stuck"));

        scanner.release().await;

        // Clear ran after the failed stop (and failed too, the camera is still scanning).
        assert_eq!(handle.stop_calls(), 1);
        assert_eq!(handle.clear_calls(), 1);
        assert_eq!(scanner.state(), ResourceState::Released);
        assert!(!scanner.has_handle());
    }

    #[tokio::test]
    async fn test_release_stops_decoder_left_scanning() {
        let (mut scanner, handle) = scanner();
        let (sink, _rx) = DecodeSink::channel();

        scanner
            .acquire(&ScanConstraints::default(), sink)
            .await
            .unwrap();
        handle.fail_next_stop(HardwareError::communication("stream stuck"));
        scanner.release().await;
        assert!(handle.is_scanning());
        assert!(!scanner.has_handle());

        scanner.release().await;

        assert!(!handle.is_scanning());
        assert!(!handle.surface_drawn());
        assert_eq!(handle.stop_calls(), 2);
        assert_eq!(handle.clear_calls(), 2);
        assert_eq!(scanner.state(), ResourceState::Released);
    }

    #[tokio::test]
    async fn test_acquire_passes_constraints() {
        let (mut scanner, handle) = scanner();
        let (sink, _rx) = DecodeSink::channel();
        let constraints = ScanConstraints::default();

        scanner.acquire(&constraints, sink).await.unwrap();

        assert_eq!(handle.last_constraints(), Some(constraints));
    }
}
