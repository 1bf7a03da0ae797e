//! Escalation notification to downstream action targets.
//!
//! Delivery is fire-and-forget: a failing listener is logged and skipped.

use tracing::warn;

use tars_core::error::ListenerError;
use tars_core::events::EscalationNotice;

/// A downstream target that reacts to posture changes (alarms, shields, timers).
pub trait EscalationListener {
    fn name(&self) -> String;
    fn notify(&mut self, notice: &EscalationNotice) -> Result<(), ListenerError>;
}

/// Listener backed by a closure.
pub struct HookListener<F> {
    name: String,
    hook: F,
}

impl<F> HookListener<F>
where
    F: FnMut(&EscalationNotice) -> Result<(), ListenerError>,
{
    pub fn new(name: impl Into<String>, hook: F) -> Self {
        Self {
            name: name.into(),
            hook,
        }
    }
}

impl<F> EscalationListener for HookListener<F>
where
    F: FnMut(&EscalationNotice) -> Result<(), ListenerError>,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn notify(&mut self, notice: &EscalationNotice) -> Result<(), ListenerError> {
        (self.hook)(notice)
    }
}

/// Notify every listener once. Returns how many accepted the notice.
pub fn dispatch(listeners: &mut [Box<dyn EscalationListener>], notice: &EscalationNotice) -> usize {
    let mut delivered = 0;
    for listener in listeners.iter_mut() {
        match listener.notify(notice) {
            Ok(()) => delivered += 1,
            Err(e) => warn!(listener = %listener.name(), error = %e, "escalation notice not delivered"),
        }
    }
    delivered
}
