//! Text-panel rendering of the dashboard.

use std::fmt;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;
use vmdash_app::ports::DashboardView;
use vmdash_domain::command::Button;
use vmdash_domain::message::Message;

const PLACEHOLDER: &str = "-";

/// Current content of every named target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub vm_name: String,
    pub power_state: String,
    pub power_class: Option<&'static str>,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub usage_month: String,
    pub running_hours: String,
    pub estimated_cost: String,
    pub hourly_cost: String,
    pub message: Option<Message>,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            vm_name: "Loading...".to_string(),
            power_state: "Loading...".to_string(),
            power_class: None,
            start_enabled: true,
            stop_enabled: true,
            usage_month: PLACEHOLDER.to_string(),
            running_hours: PLACEHOLDER.to_string(),
            estimated_cost: PLACEHOLDER.to_string(),
            hourly_cost: PLACEHOLDER.to_string(),
            message: None,
        }
    }
}

fn toggle(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.vm_name)?;
        match self.power_class {
            Some(class) => writeln!(f, "{:<16}{} [{class}]", "power state", self.power_state)?,
            None => writeln!(f, "{:<16}{}", "power state", self.power_state)?,
        }
        writeln!(
            f,
            "{:<16}start {} / stop {}",
            "controls",
            toggle(self.start_enabled),
            toggle(self.stop_enabled)
        )?;
        writeln!(f, "{:<16}{}", "usage month", self.usage_month)?;
        writeln!(f, "{:<16}{}", "running hours", self.running_hours)?;
        writeln!(f, "{:<16}{}", "estimated cost", self.estimated_cost)?;
        writeln!(f, "{:<16}{}", "hourly cost", self.hourly_cost)?;
        if let Some(message) = &self.message {
            writeln!(f, "[{}] {}", message.severity, message.text)?;
        }
        Ok(())
    }
}

struct Inner<W> {
    panel: Panel,
    dirty: bool,
    out: W,
}

/// [`DashboardView`] that redraws a [`Panel`] to `out` on every presented
/// frame that changed it.
pub struct TerminalView<W> {
    inner: Mutex<Inner<W>>,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            inner: Mutex::new(Inner {
                panel: Panel::default(),
                dirty: false,
                out,
            }),
        }
    }

    /// Copy of the current target contents.
    #[must_use]
    pub fn snapshot(&self) -> Panel {
        self.lock().panel.clone()
    }

    /// Draw the panel now, changed or not.
    pub fn redraw(&self) {
        let mut inner = self.lock();
        inner.dirty = false;
        let Inner { panel, out, .. } = &mut *inner;
        if let Err(err) = write!(out, "{panel}").and_then(|()| out.flush()) {
            warn!(error = %err, "failed to draw dashboard");
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Panel)) {
        let mut inner = self.lock();
        let before = inner.panel.clone();
        apply(&mut inner.panel);
        if inner.panel != before {
            inner.dirty = true;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<W>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .out
    }
}

impl<W: Write + Send> DashboardView for TerminalView<W> {
    fn set_vm_name(&self, name: &str) {
        self.update(|p| p.vm_name = name.to_string());
    }

    fn set_power_state(&self, label: &str, class: Option<&'static str>) {
        self.update(|p| {
            p.power_state = label.to_string();
            p.power_class = class;
        });
    }

    fn set_button_enabled(&self, button: Button, enabled: bool) {
        self.update(|p| match button {
            Button::Start => p.start_enabled = enabled,
            Button::Stop => p.stop_enabled = enabled,
        });
    }

    fn set_usage_month(&self, month: &str) {
        self.update(|p| p.usage_month = month.to_string());
    }

    fn set_running_hours(&self, text: &str) {
        self.update(|p| p.running_hours = text.to_string());
    }

    fn set_estimated_cost(&self, text: &str) {
        self.update(|p| p.estimated_cost = text.to_string());
    }

    fn set_hourly_cost(&self, text: &str) {
        self.update(|p| p.hourly_cost = text.to_string());
    }

    fn show_message(&self, message: &Message) {
        self.update(|p| p.message = Some(message.clone()));
    }

    fn clear_message(&self) {
        self.update(|p| p.message = None);
    }

    fn present(&self) {
        if self.lock().dirty {
            self.redraw();
        }
    }
}
