//! Lector - access kiosk scan console
//!
//! Runs the kiosk's scan arbitration against mock devices, with stdin
//! standing in for the screen's buttons, the camera and the handheld
//! scanner. Navigations are printed instead of switching screens.
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. LECTOR_CONFIG environment variable
//! 3. Built-in defaults

mod console;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lector_core::Navigation;
use lector_hardware::HardwareError;
use lector_hardware::mock::{MockCamera, MockCameraHandle, MockKeyboard, MockKeyboardHandle};
use lector_hardware::{AnyKeyboardDevice, AnyOpticalDecoder};
use lector_kiosk::{ChannelRouter, KeyListener, KioskConfig, Notice, OperatorCommand, ScanArbitrator};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use console::{ConsoleAction, HELP, parse_line};

/// Lector - access kiosk scan console
#[derive(Parser, Debug)]
#[command(name = "lector", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (overrides the config file)
    #[arg(long)]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = KioskConfig::load(args.config).context("Failed to load configuration")?;

    let default_filter = args.log.as_deref().unwrap_or(&config.logging.filter);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(
        facing_mode = %config.scanner.facing_mode,
        fps = config.scanner.fps,
        externo = %config.routes.externo,
        computo = %config.routes.computo,
        "lector starting"
    );

    let (camera, camera_handle) = MockCamera::new();
    let (keyboard, keyboard_handle) = MockKeyboard::new();
    let (router, navigations) = ChannelRouter::channel();
    let (notice_tx, notices) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::channel(16);

    let mut arbitrator =
        ScanArbitrator::from_config(AnyOpticalDecoder::Mock(camera), router, &config)
            .with_notices(notice_tx);
    let listener = KeyListener::spawn(AnyKeyboardDevice::Mock(keyboard));

    println!("{}", HELP);

    let devices = Devices {
        camera: camera_handle,
        keyboard: keyboard_handle,
    };
    let ((), result) = tokio::join!(
        arbitrator.run(command_rx, listener),
        operator_console(command_tx, devices, notices, navigations),
    );
    result?;

    info!("lector stopped");
    Ok(())
}

struct Devices {
    camera: MockCameraHandle,
    keyboard: MockKeyboardHandle,
}

/// Read stdin until `quit` or EOF, printing notices and navigations as they arrive.
///
/// Returning drops the command sender, which ends the arbitrator's loop.
async fn operator_console(
    commands: mpsc::Sender<OperatorCommand>,
    devices: Devices,
    mut notices: mpsc::UnboundedReceiver<Notice>,
    mut navigations: mpsc::UnboundedReceiver<Navigation>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match parse_line(&line) {
                    Ok(Some(ConsoleAction::Quit)) => break,
                    Ok(Some(action)) => apply(action, &commands, &devices).await?,
                    Ok(None) if line.trim() == "help" || line.trim() == "?" => println!("{}", HELP),
                    Ok(None) => {}
                    Err(e) => println!("! {}", e),
                }
            }
            Some(notice) = notices.recv() => print_notice(&notice),
            Some(navigation) = navigations.recv() => {
                println!("-> navigate {} ({})", navigation.path, navigation.destination);
            }
        }
    }

    debug!("Console closed");
    Ok(())
}

async fn apply(
    action: ConsoleAction,
    commands: &mpsc::Sender<OperatorCommand>,
    devices: &Devices,
) -> anyhow::Result<()> {
    match action {
        ConsoleAction::Command(command) => commands
            .send(command)
            .await
            .context("Arbitrator stopped")?,
        ConsoleAction::Decode(text) => {
            if !devices.camera.emit_decode(text) {
                println!("! camera is not scanning");
            }
        }
        ConsoleAction::Noise(info) => {
            if !devices.camera.emit_noise(info) {
                println!("! camera is not scanning");
            }
        }
        ConsoleAction::FailStart(reason) => {
            devices.camera.fail_next_start(HardwareError::other(reason));
        }
        ConsoleAction::Type(text) => devices
            .keyboard
            .scan_burst(&text)
            .await
            .context("Keyboard listener stopped")?,
        ConsoleAction::Quit => {}
    }
    Ok(())
}

fn print_notice(notice: &Notice) {
    match notice {
        Notice::StateChanged { from, to } => println!("   {} -> {}", from, to),
        Notice::StartFailed(message) => println!("! {}", message),
        Notice::InfoRequested(text) => println!("{}", text),
        // Printed from the router channel.
        Notice::Dispatched(_) => {}
    }
}
