//! # vmdash-domain
//!
//! Pure domain model for the vmdash virtual machine dashboard.
//!
//! ## Responsibilities
//! - **Power states** reported by the control API and how each one maps onto
//!   the dashboard's visual class and button enablement
//! - **VM status** and **usage records** as decoded from the control API
//! - **UI messages** (text + severity) shown to the user
//! - **Commands** (start / stop) and the texts that accompany them
//! - Error conventions shared by the outer layers
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod command;
pub mod error;
pub mod message;
pub mod power_state;
pub mod usage;
pub mod vm_status;
