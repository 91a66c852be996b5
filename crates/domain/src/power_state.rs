//! Power state — the VM lifecycle phase as reported by the control API.
//!
//! The dashboard recognises five states and groups them into three control
//! layouts:
//!
//! | state | visual class | start | stop |
//! |-------|--------------|-------|------|
//! | `running` | `running` | disabled | enabled |
//! | `stopped` / `deallocated` | same as state | enabled | disabled |
//! | `starting` / `stopping` | same as state | disabled | disabled |
//!
//! Anything else is kept as [`PowerState::Other`]: it gets no class and does
//! not touch the buttons.

/// Discrete power state of the VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerState {
    Running,
    Stopped,
    Deallocated,
    Starting,
    Stopping,
    /// A server-defined value the dashboard has no layout for.
    Other(String),
}

/// Enablement of the start / stop buttons for a known power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStates {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl PowerState {
    /// Classify a reported power state, ignoring ASCII case.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "stopped" => Self::Stopped,
            "deallocated" => Self::Deallocated,
            "starting" => Self::Starting,
            "stopping" => Self::Stopping,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Visual class applied to the power-state element, if any.
    #[must_use]
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            Self::Running => Some("running"),
            Self::Stopped => Some("stopped"),
            Self::Deallocated => Some("deallocated"),
            Self::Starting => Some("starting"),
            Self::Stopping => Some("stopping"),
            Self::Other(_) => None,
        }
    }

    /// Button enablement for this state; `None` leaves the buttons as they are.
    #[must_use]
    pub fn buttons(&self) -> Option<ButtonStates> {
        let (start_enabled, stop_enabled) = match self {
            Self::Running => (false, true),
            Self::Stopped | Self::Deallocated => (true, false),
            Self::Starting | Self::Stopping => (false, false),
            Self::Other(_) => return None,
        };
        Some(ButtonStates {
            start_enabled,
            stop_enabled,
        })
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Other(raw) => f.write_str(raw),
            known => f.write_str(known.css_class().unwrap_or_default()),
        }
    }
}
