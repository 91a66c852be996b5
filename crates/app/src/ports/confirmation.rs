//! Confirmation port — a yes/no question put to the user.

use std::future::Future;
use std::sync::Arc;

/// Asks the user to confirm an action.
///
/// The controller waits for the answer before doing anything, so an
/// implementation may block on user input or resolve immediately.
pub trait Confirmation: Send + Sync {
    /// Resolve to `true` when the user accepts `prompt`.
    fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send;
}

impl<T: Confirmation> Confirmation for Arc<T> {
    fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send {
        (**self).confirm(prompt)
    }
}
