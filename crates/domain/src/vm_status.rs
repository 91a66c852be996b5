//! VM status — the name and power state of the managed virtual machine.

use serde::Deserialize;

use crate::power_state::PowerState;

/// Status snapshot as reported by the control API.
///
/// `power_state` keeps the text exactly as reported so the dashboard can show
/// it verbatim; [`state`](Self::state) classifies it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmStatus {
    pub vm_name: String,
    pub power_state: String,
}

impl VmStatus {
    pub fn new(vm_name: impl Into<String>, power_state: impl Into<String>) -> Self {
        Self {
            vm_name: vm_name.into(),
            power_state: power_state.into(),
        }
    }

    /// Case-insensitive classification of the reported power state.
    #[must_use]
    pub fn state(&self) -> PowerState {
        PowerState::parse(&self.power_state)
    }
}
