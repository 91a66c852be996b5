//! # vmdash-app
//!
//! Application layer — the dashboard use-case and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `VmControlApi` — read status / usage, issue start / stop
//!   - `DashboardView` — the named display targets the dashboard writes to
//!   - `Confirmation` — ask the user before a command is sent
//! - Provide the **`DashboardController`** use-case: periodic polling,
//!   rendering, command dispatch with optimistic disabling, and the poll-timer
//!   lifecycle
//!
//! ## Dependency rule
//! Depends on `vmdash-domain` only (plus `tokio` for timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
