//! # vmdash-adapter-virtual
//!
//! Virtual/demo control API that simulates a single VM in memory, for testing
//! and demonstration without a real cloud behind the dashboard.
//!
//! ## Behaviour
//!
//! | call | effect |
//! |------|--------|
//! | `status` | current power state, completing due transitions |
//! | `usage` | running hours this month × hourly cost; zero hours is reported as the "unknown" sentinel |
//! | `start` | `deallocated`/`stopped` → `starting` → `running` |
//! | `stop` | `running` → `stopping` → `deallocated` |
//!
//! Commands that do not apply to the current state are rejected with a server
//! message. [`VirtualVm::set_reachable`] and [`VirtualVm::reject_next`] inject
//! the two failure kinds.
//!
//! ## Dependency rule
//!
//! Depends on `vmdash-app` (port traits) and `vmdash-domain` only.

mod machine;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use vmdash_app::ports::VmControlApi;
use vmdash_domain::error::{ControlError, RejectedError, TransportError};
use vmdash_domain::power_state::PowerState;
use vmdash_domain::usage::UsageRecord;
use vmdash_domain::vm_status::VmStatus;

use machine::{Machine, round_cents};

/// Settings of the simulated VM.
#[derive(Debug, Clone)]
pub struct Config {
    pub vm_name: String,
    pub hourly_cost: f64,
    /// Time spent in `starting` / `stopping`.
    pub transition: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vm_name: "virtual-vm".to_string(),
            hourly_cost: 0.53,
            transition: Duration::from_secs(20),
        }
    }
}

/// In-memory control API for a single simulated VM.
pub struct VirtualVm {
    config: Config,
    machine: Mutex<Machine>,
    faults: Mutex<Faults>,
}

#[derive(Debug)]
struct Faults {
    reachable: bool,
    reject_next: Option<Option<String>>,
}

impl Default for Faults {
    fn default() -> Self {
        Self {
            reachable: true,
            reject_next: None,
        }
    }
}

impl Default for VirtualVm {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl VirtualVm {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let machine = Machine::new(config.transition);
        Self {
            config,
            machine: Mutex::new(machine),
            faults: Mutex::new(Faults::default()),
        }
    }

    /// Current power state, for assertions and diagnostics.
    #[must_use]
    pub fn power_state(&self) -> PowerState {
        self.lock_machine().state(Instant::now())
    }

    /// When unreachable every call fails with a transport error.
    pub fn set_reachable(&self, reachable: bool) {
        self.lock_faults().reachable = reachable;
    }

    /// Make the next call answer with a non-success status and `message`.
    pub fn reject_next(&self, message: Option<&str>) {
        self.lock_faults().reject_next = Some(message.map(str::to_string));
    }

    fn check_faults(&self) -> Result<(), ControlError> {
        let mut faults = self.lock_faults();
        if !faults.reachable {
            return Err(TransportError::new("virtual VM is unreachable").into());
        }
        if let Some(message) = faults.reject_next.take() {
            return Err(RejectedError { message }.into());
        }
        Ok(())
    }

    fn month_label() -> String {
        chrono::Utc::now().format("%B %Y").to_string()
    }

    fn lock_machine(&self) -> MutexGuard<'_, Machine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VmControlApi for VirtualVm {
    async fn status(&self) -> Result<VmStatus, ControlError> {
        self.check_faults()?;
        let state = self.lock_machine().state(Instant::now());
        Ok(VmStatus::new(&self.config.vm_name, state.to_string()))
    }

    async fn usage(&self) -> Result<UsageRecord, ControlError> {
        self.check_faults()?;
        let running_hours = self.lock_machine().running_hours(Instant::now());
        Ok(UsageRecord {
            month: Self::month_label(),
            running_hours,
            estimated_cost: round_cents(running_hours * self.config.hourly_cost),
            hourly_cost: self.config.hourly_cost,
        })
    }

    async fn start(&self) -> Result<(), ControlError> {
        self.check_faults()?;
        let result = self.lock_machine().start(Instant::now());
        result.map_err(|message| RejectedError {
            message: Some(message),
        })?;
        info!(vm = %self.config.vm_name, "virtual VM starting");
        Ok(())
    }

    async fn stop(&self) -> Result<(), ControlError> {
        self.check_faults()?;
        let result = self.lock_machine().stop(Instant::now());
        result.map_err(|message| RejectedError {
            message: Some(message),
        })?;
        info!(vm = %self.config.vm_name, "virtual VM deallocating");
        Ok(())
    }
}
