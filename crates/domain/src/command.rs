//! Commands — the two write operations the dashboard can issue.

/// A power command sent to the control API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmCommand {
    Start,
    Stop,
}

/// One of the two command buttons on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Start,
    Stop,
}

impl VmCommand {
    /// The button that issues this command.
    #[must_use]
    pub fn button(self) -> Button {
        match self {
            Self::Start => Button::Start,
            Self::Stop => Button::Stop,
        }
    }

    /// Question asked before the command is sent.
    #[must_use]
    pub fn confirmation_prompt(self) -> &'static str {
        match self {
            Self::Start => "Are you sure you want to start the VM?",
            Self::Stop => {
                "Are you sure you want to stop the VM? This will deallocate it to avoid charges."
            }
        }
    }

    #[must_use]
    pub fn progress_text(self) -> &'static str {
        match self {
            Self::Start => "Starting VM...",
            Self::Stop => "Stopping VM...",
        }
    }

    #[must_use]
    pub fn success_text(self) -> &'static str {
        match self {
            Self::Start => "VM start initiated successfully",
            Self::Stop => "VM stop initiated successfully",
        }
    }

    /// Error text for a rejected command, quoting the server when it explained.
    #[must_use]
    pub fn rejected_text(self, server_message: Option<&str>) -> String {
        let prefix = match self {
            Self::Start => "Error starting VM",
            Self::Stop => "Error stopping VM",
        };
        match server_message {
            Some(msg) => format!("{prefix}: {msg}"),
            None => prefix.to_string(),
        }
    }

    #[must_use]
    pub fn transport_failure_text(self) -> &'static str {
        match self {
            Self::Start => "Failed to start VM",
            Self::Stop => "Failed to stop VM",
        }
    }
}

impl std::fmt::Display for VmCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
        }
    }
}

impl std::fmt::Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start-btn"),
            Self::Stop => f.write_str("stop-btn"),
        }
    }
}
