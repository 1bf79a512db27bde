//! Scan arbitration.
//!
//! [`ScanArbitrator`] reconciles the two scan sources of the kiosk (camera
//! decodes and keyboard-wedge bursts) with operator commands, and drives the
//! camera through its acquire/release lifecycle.
//!
//! # Concurrency Model
//!
//! Everything runs on one task. Camera acquire and release may take
//! arbitrarily long, so they run as a single in-flight operation owned by
//! the arbitrator; the event loop keeps handling keys, decodes and commands
//! while it is suspended. The operation owns the [`ScannerResource`] for its
//! duration and hands it back on completion, so two operations can never
//! overlap.
//!
//! # Guarantees
//!
//! - At most one navigation per accepted scan.
//! - A decode only counts while the session is `Active`; the first one tears
//!   the camera down before the code is dispatched.
//! - Keyed codes are accepted only while `Idle`.
//! - Every failure path ends in `Idle`.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use lector_core::constants::ABOUT_TEXT;
use lector_core::{Navigation, Result, RouteTable, ScanEvent};
use lector_hardware::{DecodeSignal, DecodeSink, KeyPress, OpticalDecoder, ScanConstraints};

use crate::config::KioskConfig;
use crate::key_buffer::KeyBuffer;
use crate::listener::KeyListener;
use crate::router::Router;
use crate::scanner::ScannerResource;
use crate::state_machine::{SessionMachine, SessionState};

/// Operator actions available on the kiosk screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCommand {
    /// Start a camera scan session.
    Start,
    /// Stop the camera session.
    Stop,
    /// Dismiss the error line and stop.
    Clear,
    /// Show what this kiosk does.
    ShowInfo,
}

/// Updates published for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    StateChanged {
        from: SessionState,
        to: SessionState,
    },
    /// Camera could not start; carries the operator-facing message.
    StartFailed(String),
    Dispatched(Navigation),
    InfoRequested(String),
}

type DecodeReceiver = mpsc::UnboundedReceiver<DecodeSignal>;

/// Result of the in-flight camera operation.
enum Completion<D> {
    Started {
        scanner: ScannerResource<D>,
        outcome: Result<DecodeReceiver>,
    },
    Released {
        scanner: ScannerResource<D>,
    },
}

type PendingOp<D> = LocalBoxFuture<'static, Completion<D>>;

enum LoopEvent<D> {
    Completed(Completion<D>),
    Signal(DecodeSignal),
    DecoderClosed,
    Command(OperatorCommand),
    CommandsClosed,
    Key(KeyPress),
    KeysClosed,
}

/// Session owner for the kiosk's scan screen.
///
/// # Examples
///
/// ```
/// use lector_hardware::mock::MockCamera;
/// use lector_kiosk::{OperatorCommand, RecordingRouter, ScanArbitrator, SessionState};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let (camera, handle) = MockCamera::new();
///     let mut arbitrator = ScanArbitrator::new(camera, RecordingRouter::new());
///
///     arbitrator.handle_command(OperatorCommand::Start);
///     arbitrator.settle().await;
///     assert_eq!(arbitrator.state(), SessionState::Active);
///
///     handle.emit_decode("externo-7");
///     arbitrator.drain_decoder();
///     arbitrator.settle().await;
///
///     assert_eq!(arbitrator.state(), SessionState::Idle);
///     assert_eq!(arbitrator.router().paths(), vec!["/accesoObservador/externo-7"]);
/// }
/// ```
pub struct ScanArbitrator<D, R> {
    machine: SessionMachine,

    /// `None` exactly while an operation is in flight.
    scanner: Option<ScannerResource<D>>,
    pending: Option<PendingOp<D>>,

    /// Decode reports of the current session; `Some` only while `Active`.
    session_rx: Option<DecodeReceiver>,

    /// Scan waiting for the camera release before dispatch.
    captured: Option<ScanEvent>,
    stop_after_start: bool,

    key_buffer: KeyBuffer,
    constraints: ScanConstraints,
    routes: RouteTable,
    router: R,
    last_error: Option<String>,
    notices: Option<mpsc::UnboundedSender<Notice>>,
}

impl<D, R> ScanArbitrator<D, R>
where
    D: OpticalDecoder + 'static,
    R: Router,
{
    /// Create an idle arbitrator with default constraints and routes.
    pub fn new(decoder: D, router: R) -> Self {
        Self {
            machine: SessionMachine::new(),
            scanner: Some(ScannerResource::new(decoder)),
            pending: None,
            session_rx: None,
            captured: None,
            stop_after_start: false,
            key_buffer: KeyBuffer::new(),
            constraints: ScanConstraints::default(),
            routes: RouteTable::default(),
            router,
            last_error: None,
            notices: None,
        }
    }

    /// Create an arbitrator using the scanner and route settings of `config`.
    pub fn from_config(decoder: D, router: R, config: &KioskConfig) -> Self {
        Self::new(decoder, router)
            .with_constraints(config.scanner.clone())
            .with_routes(config.routes.clone())
    }

    pub fn with_constraints(mut self, constraints: ScanConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Publish [`Notice`]s on `tx`.
    pub fn with_notices(mut self, tx: mpsc::UnboundedSender<Notice>) -> Self {
        self.notices = Some(tx);
        self
    }

    pub fn state(&self) -> SessionState {
        self.machine.current_state()
    }

    pub fn machine(&self) -> &SessionMachine {
        &self.machine
    }

    /// Message of the last start failure, until cleared.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    /// The camera resource, unless an operation currently owns it.
    pub fn scanner(&self) -> Option<&ScannerResource<D>> {
        self.scanner.as_ref()
    }

    /// Whether an acquire or release is in flight.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply an operator command.
    pub fn handle_command(&mut self, command: OperatorCommand) {
        debug!(?command, state = %self.state(), "Operator command");

        match command {
            OperatorCommand::Start => self.request_start(),
            OperatorCommand::Stop => self.request_stop(),
            OperatorCommand::Clear => {
                self.last_error = None;
                self.request_stop();
            }
            OperatorCommand::ShowInfo => self.notify(Notice::InfoRequested(ABOUT_TEXT.to_string())),
        }
    }

    /// Feed one key press from the keystroke stream.
    pub fn handle_key(&mut self, press: KeyPress) {
        let Some(code) = self.key_buffer.on_key(&press.key, press.at) else {
            return;
        };

        if self.state() != SessionState::Idle {
            debug!(state = %self.state(), "Keyed scan dropped, camera session in progress");
            return;
        }

        info!(source = "keyboard", "Scan accepted");
        self.captured = Some(ScanEvent::keyboard(code));
        // Defensive release before dispatch, in case a session was left dangling.
        self.enter(SessionState::Stopping);
        self.launch_release();
    }

    /// Handle one report from the running decoder.
    pub fn handle_signal(&mut self, signal: DecodeSignal) {
        match signal {
            DecodeSignal::Noise(info) => trace!(%info, "Decode miss"),
            DecodeSignal::Decoded(text) => {
                if self.state() != SessionState::Active {
                    debug!(state = %self.state(), "Decode ignored outside active session");
                    return;
                }

                info!(source = "camera", "Scan accepted");
                self.captured = Some(ScanEvent::camera(text));
                self.begin_teardown();
            }
        }
    }

    /// Handle every decoder report already queued, without waiting.
    ///
    /// Returns the number of reports handled.
    pub fn drain_decoder(&mut self) -> usize {
        let mut handled = 0;
        while let Some(rx) = self.session_rx.as_mut() {
            match rx.try_recv() {
                Ok(signal) => {
                    self.handle_signal(signal);
                    handled += 1;
                }
                Err(_) => break,
            }
        }
        handled
    }

    /// Wait for in-flight camera operations until none is left.
    ///
    /// A completion can launch a follow-up operation (a stop requested while
    /// starting), which is awaited too. Decoder reports are not consumed.
    pub async fn settle(&mut self) {
        while let Some(op) = self.pending.take() {
            let completion = op.await;
            self.complete(completion);
        }
    }

    /// Drive the session from operator commands and key presses.
    ///
    /// Returns after the command channel closes, once the key listener is
    /// deregistered and the camera released.
    pub async fn run(
        &mut self,
        mut commands: mpsc::Receiver<OperatorCommand>,
        mut keys: KeyListener,
    ) {
        let mut keys_open = true;

        loop {
            let event = tokio::select! {
                completion = next_completion(&mut self.pending) => LoopEvent::Completed(completion),
                signal = next_signal(&mut self.session_rx) => match signal {
                    Some(signal) => LoopEvent::Signal(signal),
                    None => LoopEvent::DecoderClosed,
                },
                command = commands.recv() => match command {
                    Some(command) => LoopEvent::Command(command),
                    None => LoopEvent::CommandsClosed,
                },
                press = keys.recv(), if keys_open => match press {
                    Some(press) => LoopEvent::Key(press),
                    None => LoopEvent::KeysClosed,
                },
            };

            match event {
                LoopEvent::Completed(completion) => self.complete(completion),
                LoopEvent::Signal(signal) => self.handle_signal(signal),
                LoopEvent::DecoderClosed => {
                    debug!("Decoder report channel closed");
                    self.session_rx = None;
                }
                LoopEvent::Command(command) => self.handle_command(command),
                LoopEvent::CommandsClosed => break,
                LoopEvent::Key(press) => self.handle_key(press),
                LoopEvent::KeysClosed => {
                    debug!("Keystroke stream closed");
                    keys_open = false;
                }
            }
        }

        keys.shutdown().await;
        self.shutdown().await;
    }

    /// Finish in-flight work and leave the camera released in `Idle`.
    ///
    /// A scan captured before shutdown is still dispatched.
    pub async fn shutdown(&mut self) {
        self.settle().await;

        if self.state() == SessionState::Active {
            self.begin_teardown();
            self.settle().await;
        }

        if let Some(scanner) = self.scanner.as_mut() {
            scanner.release().await;
        }
        debug!("Arbitrator shut down");
    }

    fn request_start(&mut self) {
        if self.state() != SessionState::Idle {
            debug!(state = %self.state(), "Start ignored, session not idle");
            return;
        }

        self.last_error = None;
        self.stop_after_start = false;
        self.enter(SessionState::Starting);
        self.launch_start();
    }

    fn request_stop(&mut self) {
        match self.state() {
            SessionState::Idle => {
                self.enter(SessionState::Stopping);
                self.launch_release();
            }
            SessionState::Starting => {
                debug!("Stop deferred until camera start resolves");
                self.stop_after_start = true;
            }
            SessionState::Active => self.begin_teardown(),
            SessionState::Stopping => debug!("Stop ignored, already stopping"),
        }
    }

    /// Stop listening to the current session and release the camera.
    fn begin_teardown(&mut self) {
        self.session_rx = None;
        self.enter(SessionState::Stopping);
        self.launch_release();
    }

    fn launch_start(&mut self) {
        let Some(mut scanner) = self.scanner.take() else {
            error!("Camera start requested while an operation is in flight");
            return;
        };
        let constraints = self.constraints.clone();

        let op = async move {
            scanner.release().await;

            let (sink, rx) = DecodeSink::channel();
            let outcome = scanner.acquire(&constraints, sink).await;
            if outcome.is_err() {
                scanner.release().await;
            }

            Completion::Started {
                scanner,
                outcome: outcome.map(|()| rx),
            }
        };
        self.pending = Some(op.boxed_local());
    }

    fn launch_release(&mut self) {
        let Some(mut scanner) = self.scanner.take() else {
            error!("Camera release requested while an operation is in flight");
            return;
        };

        let op = async move {
            scanner.release().await;
            Completion::Released { scanner }
        };
        self.pending = Some(op.boxed_local());
    }

    fn complete(&mut self, completion: Completion<D>) {
        match completion {
            Completion::Started { scanner, outcome } => {
                self.scanner = Some(scanner);
                let stop_requested = std::mem::take(&mut self.stop_after_start);

                match outcome {
                    Ok(rx) if stop_requested => {
                        drop(rx);
                        debug!("Camera started after stop request, releasing");
                        self.enter(SessionState::Stopping);
                        self.launch_release();
                    }
                    Ok(rx) => {
                        self.session_rx = Some(rx);
                        self.enter(SessionState::Active);
                    }
                    Err(e) => {
                        let message = e.to_string();
                        warn!(error = %message, "Camera start failed");
                        self.last_error = Some(message.clone());
                        self.enter(SessionState::Idle);
                        self.notify(Notice::StartFailed(message));
                    }
                }
            }
            Completion::Released { scanner } => {
                self.scanner = Some(scanner);
                self.enter(SessionState::Idle);

                if let Some(event) = self.captured.take() {
                    self.dispatch(event);
                }
            }
        }
    }

    fn dispatch(&mut self, event: ScanEvent) {
        let navigation = match self.routes.resolve(&event.raw_text) {
            Ok(navigation) => navigation,
            Err(e) => {
                debug!(source = %event.source, error = %e, "Nothing dispatched");
                return;
            }
        };
        info!(
            source = %event.source,
            destination = %navigation.destination,
            path = %navigation.path,
            "Dispatching scan"
        );

        self.router.navigate(&navigation);
        self.notify(Notice::Dispatched(navigation));
    }

    fn enter(&mut self, to: SessionState) {
        match self.machine.transition_to(to) {
            Ok(transition) => self.notify(Notice::StateChanged {
                from: transition.from,
                to: transition.to,
            }),
            Err(e) => error!(error = %e, "Session transition rejected"),
        }
    }

    fn notify(&self, notice: Notice) {
        if let Some(tx) = &self.notices {
            if tx.send(notice).is_err() {
                trace!("Notice receiver dropped");
            }
        }
    }
}

async fn next_completion<D>(pending: &mut Option<PendingOp<D>>) -> Completion<D> {
    match pending.as_mut() {
        Some(op) => {
            let completion = op.await;
            *pending = None;
            completion
        }
        None => std::future::pending().await,
    }
}

async fn next_signal(rx: &mut Option<DecodeReceiver>) -> Option<DecodeSignal> {
    match rx.as_mut() {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RecordingRouter;
    use lector_hardware::mock::{MockCamera, MockCameraHandle};

    fn arbitrator() -> (ScanArbitrator<MockCamera, RecordingRouter>, MockCameraHandle) {
        let (camera, handle) = MockCamera::new();
        (ScanArbitrator::new(camera, RecordingRouter::new()), handle)
    }

    #[tokio::test]
    async fn test_start_is_single_flight() {
        let (mut arbitrator, handle) = arbitrator();

        arbitrator.handle_command(OperatorCommand::Start);
        arbitrator.handle_command(OperatorCommand::Start);
        assert_eq!(arbitrator.state(), SessionState::Starting);
        assert!(arbitrator.is_busy());
        assert!(arbitrator.scanner().is_none());

        arbitrator.settle().await;
        arbitrator.handle_command(OperatorCommand::Start);

        assert_eq!(arbitrator.state(), SessionState::Active);
        assert!(!arbitrator.is_busy());
        assert_eq!(handle.start_calls(), 1);
    }

    #[tokio::test]
    async fn test_stop_from_idle_returns_to_idle() {
        let (mut arbitrator, handle) = arbitrator();

        arbitrator.handle_command(OperatorCommand::Stop);
        assert_eq!(arbitrator.state(), SessionState::Stopping);

        arbitrator.settle().await;
        assert_eq!(arbitrator.state(), SessionState::Idle);
        assert_eq!(handle.stop_calls(), 0);
        assert!(arbitrator.router().navigations().is_empty());
    }

    #[tokio::test]
    async fn test_noise_does_not_transition() {
        let (mut arbitrator, handle) = arbitrator();
        arbitrator.handle_command(OperatorCommand::Start);
        arbitrator.settle().await;

        assert!(handle.emit_noise("no symbol"));
        assert_eq!(arbitrator.drain_decoder(), 1);
        assert_eq!(arbitrator.state(), SessionState::Active);
    }

    #[tokio::test]
    async fn test_show_info_publishes_notice() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (camera, _handle) = MockCamera::new();
        let mut arbitrator =
            ScanArbitrator::new(camera, RecordingRouter::new()).with_notices(tx);

        arbitrator.handle_command(OperatorCommand::ShowInfo);

        assert_eq!(rx.try_recv().unwrap(), Notice::InfoRequested(ABOUT_TEXT.to_string()));
        assert_eq!(arbitrator.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_from_config_applies_routes_and_constraints() {
        let config = KioskConfig::from_toml_str(
            r#"
            [scanner]
            fps = 5

            [routes]
            computo = "/computo"
            "#,
        )
        .unwrap();
        let (camera, handle) = MockCamera::new();
        let mut arbitrator = ScanArbitrator::from_config(camera, RecordingRouter::new(), &config);

        arbitrator.handle_command(OperatorCommand::Start);
        arbitrator.settle().await;
        assert_eq!(handle.last_constraints().map(|c| c.fps), Some(5));

        handle.emit_decode("9");
        arbitrator.drain_decoder();
        arbitrator.settle().await;
        assert_eq!(arbitrator.router().paths(), vec!["/computo/9"]);
    }

    #[tokio::test]
    async fn test_shutdown_releases_active_camera() {
        let (mut arbitrator, handle) = arbitrator();
        arbitrator.handle_command(OperatorCommand::Start);
        arbitrator.settle().await;

        arbitrator.shutdown().await;

        assert_eq!(arbitrator.state(), SessionState::Idle);
        assert!(!handle.is_scanning());
        assert!(!handle.surface_drawn());
        assert!(arbitrator.router().navigations().is_empty());
    }
}
