//! Dashboard controller — polls the control API, renders the answers into the
//! view and dispatches power commands on user request.
//!
//! ## Lifecycle
//!
//! 1. [`init`](DashboardController::init) fetches status and usage once and
//!    starts the periodic poll timer
//! 2. polls, commands and manual refreshes run concurrently; whichever
//!    completes last wins the display
//! 3. [`teardown`](DashboardController::teardown) stops the timer, cancels
//!    polls still in flight and delayed re-polls that have not fired yet, and
//!    refuses further commands
//!
//! Failures never end the session: every error is shown as a message and the
//! controls are returned to a usable state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use vmdash_domain::command::{Button, VmCommand};
use vmdash_domain::error::{ControlError, LifecycleError};
use vmdash_domain::message::Message;
use vmdash_domain::usage::UsageRecord;
use vmdash_domain::vm_status::VmStatus;

use crate::ports::{Confirmation, DashboardView, VmControlApi};

/// How often status and usage are polled.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Delay between a successful command and the status re-poll that reconciles
/// the optimistic button state with the server.
pub const DEFAULT_RECONCILE_DELAY: Duration = Duration::from_secs(3);

/// Tunables of the dashboard controller.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    /// Period of the status + usage poll. Must be non-zero.
    pub poll_interval: Duration,
    /// Wait between an accepted command and the status re-poll.
    pub reconcile_delay: Duration,
    /// Prefix used when formatting amounts.
    pub currency_symbol: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            reconcile_delay: DEFAULT_RECONCILE_DELAY,
            currency_symbol: "€".to_string(),
        }
    }
}

/// Result of a start / stop request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The user declined; nothing was sent.
    Declined,
    /// The API accepted the command; a status re-poll is scheduled.
    Initiated,
    /// The API rejected the command or could not be reached.
    Failed(ControlError),
    /// The controller was torn down; nothing was asked or sent.
    Closed,
}

enum Lifecycle {
    Idle,
    Running(JoinHandle<()>),
    TornDown,
}

/// Use-case driving a single-VM dashboard.
pub struct DashboardController<A, V, C> {
    api: A,
    view: V,
    confirmation: C,
    settings: DashboardSettings,
    lifecycle: Mutex<Lifecycle>,
    shutdown: watch::Sender<bool>,
}

impl<A, V, C> DashboardController<A, V, C> {
    /// Create an idle controller. Nothing is fetched until [`init`](Self::init).
    pub fn new(api: A, view: V, confirmation: C, settings: DashboardSettings) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            api,
            view,
            confirmation,
            settings,
            lifecycle: Mutex::new(Lifecycle::Idle),
            shutdown,
        }
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Whether the poll timer is currently active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(*self.lock_lifecycle(), Lifecycle::Running(_))
    }

    /// Stop the poll timer and cancel in-flight polls and pending re-polls.
    /// Safe to call twice.
    pub fn teardown(&self) {
        let previous = std::mem::replace(&mut *self.lock_lifecycle(), Lifecycle::TornDown);
        self.shutdown.send_replace(true);
        if let Lifecycle::Running(handle) = previous {
            handle.abort();
            info!("dashboard polling stopped");
        }
    }

    fn is_torn_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A, V, C> DashboardController<A, V, C>
where
    A: VmControlApi + 'static,
    V: DashboardView + 'static,
    C: Confirmation + 'static,
{
    /// Fetch status and usage now, then every `poll_interval`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::AlreadyStarted`] when the timer already runs
    /// and [`LifecycleError::TornDown`] after [`teardown`](Self::teardown).
    pub fn init(self: &Arc<Self>) -> Result<(), LifecycleError> {
        let mut lifecycle = self.lock_lifecycle();
        match *lifecycle {
            Lifecycle::Running(_) => return Err(LifecycleError::AlreadyStarted),
            Lifecycle::TornDown => return Err(LifecycleError::TornDown),
            Lifecycle::Idle => {}
        }

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.poll_forever().await });
        *lifecycle = Lifecycle::Running(handle);
        info!(interval = ?self.settings.poll_interval, "dashboard polling started");
        Ok(())
    }

    // Each tick detaches its polls so a hung request never delays the next one.
    async fn poll_forever(self: &Arc<Self>) {
        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            debug!("polling control API");
            self.spawn_polls();
        }
    }

    fn spawn_polls(self: &Arc<Self>) {
        let this = Arc::clone(self);
        let shutdown = self.shutdown.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                _ = this.refresh_status() => {}
                () = torn_down(shutdown) => debug!("status poll cancelled by teardown"),
            }
        });

        let this = Arc::clone(self);
        let shutdown = self.shutdown.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                _ = this.refresh_usage() => {}
                () = torn_down(shutdown) => debug!("usage poll cancelled by teardown"),
            }
        });
    }

    /// Poll status and usage concurrently, once.
    pub async fn refresh(&self) {
        let _ = tokio::join!(self.refresh_status(), self.refresh_usage());
    }

    /// Fetch the VM status and render it.
    ///
    /// On failure an error message is shown and the status targets keep their
    /// last values.
    ///
    /// # Errors
    ///
    /// Returns the [`ControlError`] reported by the API port.
    pub async fn refresh_status(&self) -> Result<VmStatus, ControlError> {
        match self.api.status().await {
            Ok(status) => {
                self.render_status(&status);
                Ok(status)
            }
            Err(err) => {
                self.report_poll_failure(
                    &err,
                    "Error fetching VM status",
                    "Failed to connect to server",
                );
                Err(err)
            }
        }
    }

    /// Fetch the monthly usage and render it.
    ///
    /// # Errors
    ///
    /// Returns the [`ControlError`] reported by the API port.
    pub async fn refresh_usage(&self) -> Result<UsageRecord, ControlError> {
        match self.api.usage().await {
            Ok(usage) => {
                self.render_usage(&usage);
                Ok(usage)
            }
            Err(err) => {
                self.report_poll_failure(
                    &err,
                    "Error fetching usage data",
                    "Failed to fetch usage data",
                );
                Err(err)
            }
        }
    }

    /// Ask for confirmation, then request the VM to start.
    pub async fn start_vm(self: &Arc<Self>) -> CommandOutcome {
        self.run_command(VmCommand::Start).await
    }

    /// Ask for confirmation, then request the VM to stop.
    pub async fn stop_vm(self: &Arc<Self>) -> CommandOutcome {
        self.run_command(VmCommand::Stop).await
    }

    async fn run_command(self: &Arc<Self>, command: VmCommand) -> CommandOutcome {
        if self.is_torn_down() {
            debug!(%command, "command ignored after teardown");
            return CommandOutcome::Closed;
        }
        if !self.confirmation.confirm(command.confirmation_prompt()).await {
            debug!(%command, "command declined by user");
            return CommandOutcome::Declined;
        }

        let button = command.button();
        self.view.show_message(&Message::info(command.progress_text()));
        self.view.set_button_enabled(button, false);
        self.view.present();

        info!(%command, "sending command");
        let result = match command {
            VmCommand::Start => self.api.start().await,
            VmCommand::Stop => self.api.stop().await,
        };

        match result {
            Ok(()) => {
                info!(%command, "command initiated");
                self.view.show_message(&Message::success(command.success_text()));
                self.view.present();
                self.schedule_reconcile();
                CommandOutcome::Initiated
            }
            Err(err) => {
                let text = match &err {
                    ControlError::Rejected(_) => {
                        warn!(%command, error = ?err, "command rejected");
                        command.rejected_text(err.server_message())
                    }
                    ControlError::Transport(_) => {
                        error!(%command, error = ?err, "command failed");
                        command.transport_failure_text().to_string()
                    }
                };
                self.view.show_message(&Message::error(text));
                self.view.set_button_enabled(button, true);
                self.view.present();
                CommandOutcome::Failed(err)
            }
        }
    }

    fn schedule_reconcile(self: &Arc<Self>) {
        let this = Arc::clone(self);
        let shutdown = self.shutdown.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(this.settings.reconcile_delay) => {
                    this.view.clear_message();
                    this.view.present();
                    let _ = this.refresh_status().await;
                }
                () = torn_down(shutdown) => debug!("re-poll cancelled by teardown"),
            }
        });
    }

    fn render_status(&self, status: &VmStatus) {
        let state = status.state();
        self.view.set_vm_name(&status.vm_name);
        self.view.set_power_state(&status.power_state, state.css_class());
        if let Some(buttons) = state.buttons() {
            self.view.set_button_enabled(Button::Start, buttons.start_enabled);
            self.view.set_button_enabled(Button::Stop, buttons.stop_enabled);
        } else {
            debug!(power_state = %status.power_state, "unrecognised power state");
        }
        self.view.present();
    }

    fn render_usage(&self, usage: &UsageRecord) {
        let display = usage.display(&self.settings.currency_symbol);
        self.view.set_usage_month(&display.month);
        self.view.set_running_hours(&display.running_hours);
        self.view.set_estimated_cost(&display.estimated_cost);
        self.view.set_hourly_cost(&display.hourly_cost);
        self.view.present();
    }

    fn report_poll_failure(&self, err: &ControlError, rejected_text: &str, transport_text: &str) {
        let text = match err {
            ControlError::Rejected(_) => {
                warn!(error = ?err, "{rejected_text}");
                rejected_text
            }
            ControlError::Transport(_) => {
                error!(error = ?err, "{transport_text}");
                transport_text
            }
        };
        self.view.show_message(&Message::error(text));
        self.view.present();
    }
}

/// Resolve once the controller has been torn down (or dropped).
async fn torn_down(mut shutdown: watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
