//! Common test utilities for kiosk integration tests.
//!
//! Helpers here build an arbitrator over a mock camera with a recording
//! router, and feed it keyboard-wedge bursts without a real keystroke stream.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use lector_hardware::mock::{MockCamera, MockCameraHandle};
use lector_hardware::{Key, KeyPress};
use lector_kiosk::{
    Notice, OperatorCommand, RecordingRouter, ResourceState, ScanArbitrator, SessionState,
};
use tokio::sync::mpsc;

pub type TestArbitrator = ScanArbitrator<MockCamera, RecordingRouter>;

/// Arbitrator over a fresh mock camera, with its control handle.
pub fn kiosk() -> (TestArbitrator, MockCameraHandle) {
    let (camera, handle) = MockCamera::new();
    (ScanArbitrator::new(camera, RecordingRouter::new()), handle)
}

/// Same as [`kiosk`], also returning the notice receiver.
pub fn kiosk_with_notices() -> (
    TestArbitrator,
    MockCameraHandle,
    mpsc::UnboundedReceiver<Notice>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (camera, handle) = MockCamera::new();
    let arbitrator = ScanArbitrator::new(camera, RecordingRouter::new()).with_notices(tx);
    (arbitrator, handle, rx)
}

/// Start a camera session and wait until it is active.
pub async fn start_active(arbitrator: &mut TestArbitrator) {
    arbitrator.handle_command(OperatorCommand::Start);
    arbitrator.settle().await;
    assert_eq!(arbitrator.state(), SessionState::Active);
}

/// Feed `text` followed by Enter as a scanner burst (1 ms apart).
pub fn type_burst(arbitrator: &mut TestArbitrator, text: &str, start: Instant) {
    let mut at = start;
    for c in text.chars() {
        arbitrator.handle_key(KeyPress::at(Key::Char(c), at));
        at += Duration::from_millis(1);
    }
    arbitrator.handle_key(KeyPress::at(Key::Enter, at));
}

/// Assert the session is idle and the camera fully released.
pub fn assert_idle_released(arbitrator: &TestArbitrator, camera: &MockCameraHandle) {
    assert_eq!(arbitrator.state(), SessionState::Idle);
    assert!(!arbitrator.is_busy());
    assert!(!camera.is_scanning(), "camera still scanning");

    let scanner = arbitrator.scanner().expect("scanner owned by arbitrator when idle");
    assert_eq!(scanner.state(), ResourceState::Released);
    assert!(!scanner.has_handle());
}

/// Collect every notice published so far.
pub fn drain_notices(rx: &mut mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}
