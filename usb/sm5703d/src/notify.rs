use std::sync::Arc;

use log::info;

use crate::device::{CableKind, ComboRole};

/// Receiver of attach/detach transitions, implemented by the power and USB
/// subsystems.
///
/// Calls are made while the controller lock is held, so implementations must
/// hand the event off instead of doing real work.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: CableKind, attached: bool);

    /// Lanhub-class events carry which half of the combination changed.
    fn notify_combo(&self, kind: CableKind, attached: bool, role: ComboRole);

    fn overvoltage(&self, enabled: bool);

    fn vbus_power(&self, _on: bool) {}

    /// The USB stack is in a test override mode and VBUS changes must not
    /// retrigger classification.
    fn test_mode(&self) -> bool {
        false
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, kind: CableKind, attached: bool) {
        (**self).notify(kind, attached)
    }

    fn notify_combo(&self, kind: CableKind, attached: bool, role: ComboRole) {
        (**self).notify_combo(kind, attached, role)
    }

    fn overvoltage(&self, enabled: bool) {
        (**self).overvoltage(enabled)
    }

    fn vbus_power(&self, on: bool) {
        (**self).vbus_power(on)
    }

    fn test_mode(&self) -> bool {
        (**self).test_mode()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    Cable {
        kind: CableKind,
        attached: bool,
    },
    Combo {
        kind: CableKind,
        attached: bool,
        role: ComboRole,
    },
    Overvoltage(bool),
    VbusPower(bool),
}

impl Notification {
    pub fn deliver<S: NotificationSink + ?Sized>(&self, sink: &S) {
        match *self {
            Notification::Cable { kind, attached } => sink.notify(kind, attached),
            Notification::Combo {
                kind,
                attached,
                role,
            } => sink.notify_combo(kind, attached, role),
            Notification::Overvoltage(enabled) => sink.overvoltage(enabled),
            Notification::VbusPower(on) => sink.vbus_power(on),
        }
    }
}

/// Sink for hosts without a power subsystem to talk to.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, kind: CableKind, attached: bool) {
        info!(
            "sm5703: {:?} {}",
            kind,
            if attached { "attached" } else { "detached" }
        );
    }

    fn notify_combo(&self, kind: CableKind, attached: bool, role: ComboRole) {
        info!(
            "sm5703: {:?} ({:?}) {}",
            kind,
            role,
            if attached { "attached" } else { "detached" }
        );
    }

    fn overvoltage(&self, enabled: bool) {
        info!("sm5703: overvoltage protection {}", if enabled { "on" } else { "off" });
    }

    fn vbus_power(&self, on: bool) {
        info!("sm5703: VBUS power {}", if on { "on" } else { "off" });
    }
}
