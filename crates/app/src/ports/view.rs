//! View port — the display targets the dashboard renders into.
//!
//! Each method corresponds to one named target (`vm-name`, `power-state`,
//! `start-btn`, `stop-btn`, `usage-month`, `running-hours`, `estimated-cost`,
//! `hourly-cost`, `message`). Mutations are synchronous and infallible: a
//! target either exists and accepts the change or the adapter ignores it.

use std::sync::Arc;

use vmdash_domain::command::Button;
use vmdash_domain::message::Message;

/// Abstract dashboard surface.
pub trait DashboardView: Send + Sync {
    /// `vm-name`
    fn set_vm_name(&self, name: &str);

    /// `power-state`: the reported text and the visual class to apply.
    ///
    /// `class == None` removes any previously applied state class.
    fn set_power_state(&self, label: &str, class: Option<&'static str>);

    /// `start-btn` / `stop-btn`
    fn set_button_enabled(&self, button: Button, enabled: bool);

    /// `usage-month`
    fn set_usage_month(&self, month: &str);

    /// `running-hours`
    fn set_running_hours(&self, text: &str);

    /// `estimated-cost`
    fn set_estimated_cost(&self, text: &str);

    /// `hourly-cost`
    fn set_hourly_cost(&self, text: &str);

    /// `message`: replace text and severity.
    fn show_message(&self, message: &Message);

    /// `message`: back to neutral, no severity and empty text.
    fn clear_message(&self);

    /// Called once after each batch of mutations.
    ///
    /// Surfaces that redraw as a whole use this as their frame boundary.
    fn present(&self) {}
}

impl<T: DashboardView> DashboardView for Arc<T> {
    fn set_vm_name(&self, name: &str) {
        (**self).set_vm_name(name);
    }

    fn set_power_state(&self, label: &str, class: Option<&'static str>) {
        (**self).set_power_state(label, class);
    }

    fn set_button_enabled(&self, button: Button, enabled: bool) {
        (**self).set_button_enabled(button, enabled);
    }

    fn set_usage_month(&self, month: &str) {
        (**self).set_usage_month(month);
    }

    fn set_running_hours(&self, text: &str) {
        (**self).set_running_hours(text);
    }

    fn set_estimated_cost(&self, text: &str) {
        (**self).set_estimated_cost(text);
    }

    fn set_hourly_cost(&self, text: &str) {
        (**self).set_hourly_cost(text);
    }

    fn show_message(&self, message: &Message) {
        (**self).show_message(message);
    }

    fn clear_message(&self) {
        (**self).clear_message();
    }

    fn present(&self) {
        (**self).present();
    }
}
