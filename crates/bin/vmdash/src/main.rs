//! # vmdash — virtual machine dashboard
//!
//! Composition root that wires the adapters together and runs the dashboard.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber (stderr, so stdout carries the panel)
//! - Construct the control API adapter (`http` or `virtual`)
//! - Construct the terminal view and confirmation prompt
//! - Start the dashboard controller and dispatch typed commands
//! - Tear the controller down on `quit`, end of input or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no dashboard logic belongs here.

mod command;
mod config;

use std::io::Write;
use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vmdash_adapter_terminal::{PromptConfirmation, SharedLines, TerminalView, stdin_lines};
use vmdash_adapter_virtual::VirtualVm;
use vmdash_app::ports::VmControlApi;
use vmdash_app::services::dashboard_controller::DashboardController;

use command::{Command, HELP};
use config::{Backend, Config};

type Controller<A, W> = DashboardController<A, TerminalView<W>, PromptConfirmation<W>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .with_writer(std::io::stderr)
        .init();

    info!(backend = ?config.backend, "vmdash starting");
    let lines = stdin_lines();

    match config.backend {
        Backend::Http => {
            let api = config.http_config().build()?;
            info!(base_url = api.base_url(), "using HTTP control API");
            run(api, &config, lines).await
        }
        Backend::Virtual => {
            info!(vm = %config.virtual_vm.vm_name, "using virtual control API");
            run(VirtualVm::new(config.virtual_config()), &config, lines).await
        }
    }
}

async fn run<A>(
    api: A,
    config: &Config,
    lines: SharedLines,
) -> Result<(), Box<dyn std::error::Error>>
where
    A: VmControlApi + 'static,
{
    let view = TerminalView::new(std::io::stdout());
    let confirmation = PromptConfirmation::new(Arc::clone(&lines), std::io::stdout())
        .assume_yes(config.dashboard.assume_yes);
    let controller = Arc::new(DashboardController::new(
        api,
        view,
        confirmation,
        config.dashboard_settings(),
    ));

    println!("{HELP}");
    controller.init()?;
    command_loop(&controller, &lines, interrupted()).await;
    controller.teardown();

    info!("vmdash stopped");
    Ok(())
}

async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("interrupted");
}

/// Read and dispatch commands until `quit`, end of input or `interrupt`.
///
/// `interrupt` is raced against the whole dispatch, so it also cuts through
/// a pending confirmation prompt or a hung request.
async fn command_loop<A, W>(
    controller: &Arc<Controller<A, W>>,
    lines: &SharedLines,
    interrupt: impl Future<Output = ()>,
) where
    A: VmControlApi + 'static,
    W: Write + Send + 'static,
{
    tokio::pin!(interrupt);
    loop {
        tokio::select! {
            () = &mut interrupt => return,
            flow = next_command(controller, lines) => {
                if flow.is_break() {
                    return;
                }
            }
        }
    }
}

async fn next_command<A, W>(
    controller: &Arc<Controller<A, W>>,
    lines: &SharedLines,
) -> ControlFlow<()>
where
    A: VmControlApi + 'static,
    W: Write + Send + 'static,
{
    let Some(line) = lines.lock().await.recv().await else {
        info!("end of input");
        return ControlFlow::Break(());
    };
    if line.trim().is_empty() {
        return ControlFlow::Continue(());
    }

    match line.parse::<Command>() {
        Ok(Command::Start) => {
            controller.start_vm().await;
        }
        Ok(Command::Stop) => {
            controller.stop_vm().await;
        }
        Ok(Command::Refresh) => controller.refresh().await,
        Ok(Command::Show) => controller.view().redraw(),
        Ok(Command::Help) => println!("{HELP}"),
        Ok(Command::Quit) => return ControlFlow::Break(()),
        Err(err) => println!("{err}"),
    }
    ControlFlow::Continue(())
}
