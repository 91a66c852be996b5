//! # vmdash-adapter-terminal
//!
//! Terminal front-end for the dashboard.
//!
//! - [`TerminalView`] implements the `DashboardView` port: it keeps the nine
//!   named targets in a [`Panel`] and redraws the panel on each presented
//!   frame that changed something.
//! - [`PromptConfirmation`] implements the `Confirmation` port by printing the
//!   question and reading one answer line.
//! - [`stdin_lines`] turns standard input into a shared line channel, read
//!   both by the command loop and by the confirmation prompt.
//!
//! ## Dependency rule
//!
//! Depends on `vmdash-app` (port traits) and `vmdash-domain` only.

mod confirmation;
mod input;
mod view;

pub use confirmation::PromptConfirmation;
pub use input::{SharedLines, shared_lines, stdin_lines};
pub use view::{Panel, TerminalView};
