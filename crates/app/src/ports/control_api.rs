//! Control API port — the remote service that owns the virtual machine.

use std::future::Future;
use std::sync::Arc;

use vmdash_domain::error::ControlError;
use vmdash_domain::usage::UsageRecord;
use vmdash_domain::vm_status::VmStatus;

/// Read and command access to a single VM.
///
/// Implementations map an answer whose `status` is not `"success"` to
/// [`ControlError::Rejected`] and any failure to obtain or decode an answer to
/// [`ControlError::Transport`].
pub trait VmControlApi: Send + Sync {
    /// Current name and power state of the VM.
    fn status(&self) -> impl Future<Output = Result<VmStatus, ControlError>> + Send;

    /// Usage and cost for the current month.
    fn usage(&self) -> impl Future<Output = Result<UsageRecord, ControlError>> + Send;

    /// Ask the API to power the VM on.
    fn start(&self) -> impl Future<Output = Result<(), ControlError>> + Send;

    /// Ask the API to power the VM off (deallocate).
    fn stop(&self) -> impl Future<Output = Result<(), ControlError>> + Send;
}

impl<T: VmControlApi> VmControlApi for Arc<T> {
    fn status(&self) -> impl Future<Output = Result<VmStatus, ControlError>> + Send {
        (**self).status()
    }

    fn usage(&self) -> impl Future<Output = Result<UsageRecord, ControlError>> + Send {
        (**self).usage()
    }

    fn start(&self) -> impl Future<Output = Result<(), ControlError>> + Send {
        (**self).start()
    }

    fn stop(&self) -> impl Future<Output = Result<(), ControlError>> + Send {
        (**self).stop()
    }
}
