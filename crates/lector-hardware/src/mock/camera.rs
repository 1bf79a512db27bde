//! Mock optical decoder for testing and development.
//!
//! This module provides a simulated camera + decoder that can be driven
//! programmatically: tests decide what gets decoded, when start resolves,
//! and which lifecycle calls fail.

use crate::{
    HardwareError, Result,
    traits::OpticalDecoder,
    types::{DecodeSink, ScanConstraints},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// Shared state between the mock camera and its handle.
#[derive(Debug, Default)]
struct CameraState {
    scanning: bool,
    surface_drawn: bool,
    sink: Option<DecodeSink>,
    last_constraints: Option<ScanConstraints>,
    next_start_failure: Option<HardwareError>,
    next_stop_failure: Option<HardwareError>,
    next_clear_failure: Option<HardwareError>,
    hold_start: bool,
    start_calls: usize,
    stop_calls: usize,
    clear_calls: usize,
}

fn lock(state: &Mutex<CameraState>) -> MutexGuard<'_, CameraState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock optical decoder for testing and development.
///
/// Behaves like a browser-style QR scanner: `start` opens the camera and
/// draws a preview, `stop` closes the stream, and `clear` (which refuses to
/// run while scanning) wipes the preview surface. Decodes only happen when
/// the [`MockCameraHandle`] says so.
///
/// # Examples
///
/// ```
/// use lector_hardware::mock::MockCamera;
/// use lector_hardware::traits::OpticalDecoder;
/// use lector_hardware::types::{DecodeSignal, DecodeSink, ScanConstraints};
///
/// #[tokio::main]
/// async fn main() -> lector_hardware::Result<()> {
///     let (mut camera, handle) = MockCamera::new();
///     let (sink, mut rx) = DecodeSink::channel();
///
///     camera.start(&ScanConstraints::default(), sink).await?;
///     handle.emit_decode("externo-42");
///
///     assert_eq!(rx.recv().await, Some(DecodeSignal::Decoded("externo-42".to_string())));
///
///     camera.stop().await?;
///     camera.clear()?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockCamera {
    /// State shared with the handle
    state: Arc<Mutex<CameraState>>,

    /// Gate released by the handle when start is held
    start_gate: Arc<Notify>,
}

impl MockCamera {
    /// Create a new mock camera.
    ///
    /// Returns a tuple of (MockCamera, MockCameraHandle) where the handle
    /// drives decodes and injects failures.
    pub fn new() -> (Self, MockCameraHandle) {
        let state = Arc::new(Mutex::new(CameraState::default()));
        let start_gate = Arc::new(Notify::new());

        let camera = Self {
            state: Arc::clone(&state),
            start_gate: Arc::clone(&start_gate),
        };

        let handle = MockCameraHandle {
            state,
            start_gate,
        };

        (camera, handle)
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new().0
    }
}

impl OpticalDecoder for MockCamera {
    async fn start(&mut self, constraints: &ScanConstraints, sink: DecodeSink) -> Result<()> {
        let held = {
            let mut state = lock(&self.state);
            state.start_calls += 1;
            state.hold_start
        };

        if held {
            self.start_gate.notified().await;
        }

        let mut state = lock(&self.state);
        if let Some(error) = state.next_start_failure.take() {
            return Err(error);
        }
        if state.scanning {
            return Err(HardwareError::AlreadyScanning);
        }

        state.scanning = true;
        state.surface_drawn = true;
        state.sink = Some(sink);
        state.last_constraints = Some(constraints.clone());
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.stop_calls += 1;

        if let Some(error) = state.next_stop_failure.take() {
            return Err(error);
        }
        if !state.scanning {
            return Err(HardwareError::NotScanning);
        }

        state.scanning = false;
        state.sink = None;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.clear_calls += 1;

        if let Some(error) = state.next_clear_failure.take() {
            return Err(error);
        }
        if state.scanning {
            return Err(HardwareError::other("Cannot clear while scanning"));
        }

        state.surface_drawn = false;
        Ok(())
    }

    fn is_scanning(&self) -> bool {
        lock(&self.state).scanning
    }
}

/// Handle for controlling a mock camera.
///
/// The handle can be cloned and shared across tasks. Failure injections are
/// one-shot: each applies to the next matching call only.
#[derive(Debug, Clone)]
pub struct MockCameraHandle {
    /// State shared with the camera
    state: Arc<Mutex<CameraState>>,

    /// Gate released when a held start may resolve
    start_gate: Arc<Notify>,
}

impl MockCameraHandle {
    /// Simulate a successful decode.
    ///
    /// Returns `false` if the camera is not scanning or the session that
    /// started it is gone.
    pub fn emit_decode(&self, text: impl Into<String>) -> bool {
        let state = lock(&self.state);
        match (&state.sink, state.scanning) {
            (Some(sink), true) => sink.decoded(text),
            _ => false,
        }
    }

    /// Simulate a transient decode miss.
    ///
    /// Returns `false` if the camera is not scanning.
    pub fn emit_noise(&self, info: impl Into<String>) -> bool {
        let state = lock(&self.state);
        match (&state.sink, state.scanning) {
            (Some(sink), true) => sink.noise(info),
            _ => false,
        }
    }

    /// Make the next `start` call fail with `error`.
    pub fn fail_next_start(&self, error: HardwareError) {
        lock(&self.state).next_start_failure = Some(error);
    }

    /// Make the next `stop` call fail with `error`.
    pub fn fail_next_stop(&self, error: HardwareError) {
        lock(&self.state).next_stop_failure = Some(error);
    }

    /// Make the next `clear` call fail with `error`.
    pub fn fail_next_clear(&self, error: HardwareError) {
        lock(&self.state).next_clear_failure = Some(error);
    }

    /// Keep subsequent `start` calls pending until [`open_start`](Self::open_start).
    pub fn hold_start(&self) {
        lock(&self.state).hold_start = true;
    }

    /// Let a held `start` resolve and stop holding future ones.
    pub fn open_start(&self) {
        lock(&self.state).hold_start = false;
        self.start_gate.notify_one();
    }

    /// Whether the camera is scanning.
    pub fn is_scanning(&self) -> bool {
        lock(&self.state).scanning
    }

    /// Whether a camera preview is still drawn on the surface.
    pub fn surface_drawn(&self) -> bool {
        lock(&self.state).surface_drawn
    }

    /// Constraints of the most recent successful start.
    pub fn last_constraints(&self) -> Option<ScanConstraints> {
        lock(&self.state).last_constraints.clone()
    }

    /// Number of `start` calls so far.
    pub fn start_calls(&self) -> usize {
        lock(&self.state).start_calls
    }

    /// Number of `stop` calls so far.
    pub fn stop_calls(&self) -> usize {
        lock(&self.state).stop_calls
    }

    /// Number of `clear` calls so far.
    pub fn clear_calls(&self) -> usize {
        lock(&self.state).clear_calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DecodeSignal, FacingMode};

    #[tokio::test]
    async fn test_mock_camera_start_stop_clear() {
        let (mut camera, handle) = MockCamera::new();
        let (sink, _rx) = DecodeSink::channel();

        camera.start(&ScanConstraints::default(), sink).await.unwrap();
        assert!(camera.is_scanning());
        assert!(handle.surface_drawn());

        camera.stop().await.unwrap();
        assert!(!camera.is_scanning());

        camera.clear().unwrap();
        assert!(!handle.surface_drawn());

        assert_eq!(handle.start_calls(), 1);
        assert_eq!(handle.stop_calls(), 1);
        assert_eq!(handle.clear_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_camera_records_constraints() {
        let (mut camera, handle) = MockCamera::new();
        let (sink, _rx) = DecodeSink::channel();
        let constraints = ScanConstraints {
            facing_mode: FacingMode::User,
            ..ScanConstraints::default()
        };

        camera.start(&constraints, sink).await.unwrap();
        assert_eq!(handle.last_constraints(), Some(constraints));
    }

    #[tokio::test]
    async fn test_mock_camera_emits_signals() {
        let (mut camera, handle) = MockCamera::new();
        let (sink, mut rx) = DecodeSink::channel();

        assert!(!handle.emit_decode("too early"));

        camera.start(&ScanConstraints::default(), sink).await.unwrap();
        assert!(handle.emit_noise("no symbol"));
        assert!(handle.emit_decode("abc"));

        assert_eq!(rx.recv().await, Some(DecodeSignal::Noise("no symbol".to_string())));
        assert_eq!(rx.recv().await, Some(DecodeSignal::Decoded("abc".to_string())));

        camera.stop().await.unwrap();
        assert!(!handle.emit_decode("too late"));
    }

    #[tokio::test]
    async fn test_mock_camera_start_failure_is_one_shot() {
        let (mut camera, handle) = MockCamera::new();
        handle.fail_next_start(HardwareError::permission_denied("camera"));

        let (sink, _rx) = DecodeSink::channel();
        let result = camera.start(&ScanConstraints::default(), sink).await;
        assert!(matches!(result, Err(HardwareError::PermissionDenied { .. })));
        assert!(!camera.is_scanning());

        let (sink, _rx) = DecodeSink::channel();
        camera.start(&ScanConstraints::default(), sink).await.unwrap();
        assert!(camera.is_scanning());
    }

    #[tokio::test]
    async fn test_mock_camera_double_start_fails() {
        let (mut camera, _handle) = MockCamera::new();

        let (sink, _rx) = DecodeSink::channel();
        camera.start(&ScanConstraints::default(), sink).await.unwrap();

        let (sink, _rx2) = DecodeSink::channel();
        let result = camera.start(&ScanConstraints::default(), sink).await;
        assert!(matches!(result, Err(HardwareError::AlreadyScanning)));
    }

    #[tokio::test]
    async fn test_mock_camera_stop_when_idle_fails() {
        let (mut camera, _handle) = MockCamera::new();
        assert!(matches!(camera.stop().await, Err(HardwareError::NotScanning)));
    }

    #[tokio::test]
    async fn test_mock_camera_clear_while_scanning_fails() {
        let (mut camera, _handle) = MockCamera::new();
        let (sink, _rx) = DecodeSink::channel();
        camera.start(&ScanConstraints::default(), sink).await.unwrap();

        assert!(camera.clear().is_err());
    }

    #[tokio::test]
    async fn test_mock_camera_injected_stop_failure_keeps_scanning() {
        let (mut camera, handle) = MockCamera::new();
        let (sink, _rx) = DecodeSink::channel();
        camera.start(&ScanConstraints::default(), sink).await.unwrap();

        handle.fail_next_stop(HardwareError::communication("stream stuck"));
        assert!(camera.stop().await.is_err());
        assert!(camera.is_scanning());

        camera.stop().await.unwrap();
        assert!(!camera.is_scanning());
    }

    #[tokio::test]
    async fn test_mock_camera_held_start() {
        let (mut camera, handle) = MockCamera::new();
        handle.hold_start();

        let opener = handle.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            opener.open_start();
        });

        let (sink, _rx) = DecodeSink::channel();
        camera.start(&ScanConstraints::default(), sink).await.unwrap();
        assert!(handle.is_scanning());
    }
}
