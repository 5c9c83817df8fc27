//! Register writes and notifications requested by the pure decision code.
//!
//! Nothing in here touches the bus. The controller executes a list of effects
//! in order and only commits the new state once every register access went
//! through.

use std::time::Duration;

use crate::device::{CableKind, ComboRole};
use crate::notify::Notification;
use crate::regs::{Control, ManualSw2, Register, SwitchPath, INT_MASK2_BASELINE};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Write { reg: Register, value: u8 },
    /// Read-modify-write: `(value | set) & !clear`.
    Update { reg: Register, set: u8, clear: u8 },
    Delay(Duration),
    Notify(Notification),
}

impl Effect {
    #[inline]
    pub fn write(reg: Register, value: u8) -> Self {
        Effect::Write { reg, value }
    }

    #[inline]
    pub fn set(reg: Register, bits: u8) -> Self {
        Effect::Update {
            reg,
            set: bits,
            clear: 0,
        }
    }

    #[inline]
    pub fn clear(reg: Register, bits: u8) -> Self {
        Effect::Update {
            reg,
            set: 0,
            clear: bits,
        }
    }

    #[inline]
    pub fn notify(kind: CableKind, attached: bool) -> Self {
        Effect::Notify(Notification::Cable { kind, attached })
    }

    #[inline]
    pub fn notify_combo(kind: CableKind, attached: bool, role: ComboRole) -> Self {
        Effect::Notify(Notification::Combo {
            kind,
            attached,
            role,
        })
    }

    pub fn is_notification(&self) -> bool {
        matches!(self, Effect::Notify(_))
    }
}

pub fn switch_path(effects: &mut Vec<Effect>, path: SwitchPath) {
    effects.push(Effect::write(Register::ManualSw1, path.bits()));
}

/// Hand D+/D- routing over to MANUAL_SW1.
pub fn manual_switching(effects: &mut Vec<Effect>) {
    effects.push(Effect::clear(Register::Control, Control::MANUAL_SW.bits()));
}

pub fn automatic_switching(effects: &mut Vec<Effect>) {
    effects.push(Effect::set(Register::Control, Control::MANUAL_SW.bits()));
}

/// Data lines routed to the USB host controller, used by OTG and lanhub.
pub fn host_path(effects: &mut Vec<Effect>, attached: bool) {
    if attached {
        switch_path(effects, SwitchPath::DHOST);
        effects.push(Effect::write(
            Register::ManualSw2,
            ManualSw2::ID_SWITCH_OPEN.bits(),
        ));
        manual_switching(effects);
    } else {
        effects.push(Effect::write(Register::ManualSw2, 0));
        switch_path(effects, SwitchPath::ALL_OPEN);
        automatic_switching(effects);
    }
}

pub fn raw_data(effects: &mut Vec<Effect>, enable: bool) {
    if enable {
        effects.push(Effect::clear(Register::Control, Control::RAW_DATA.bits()));
        effects.push(Effect::set(
            Register::ManualSw2,
            ManualSw2::ID_SWITCH_OPEN.bits(),
        ));
    } else {
        effects.push(Effect::set(Register::Control, Control::RAW_DATA.bits()));
        effects.push(Effect::clear(
            Register::ManualSw2,
            ManualSw2::ID_SWITCH_OPEN.bits(),
        ));
    }
}

/// Masking VBUS_OFF keeps the raw-data mode switch from looking like a
/// detach.
pub fn mask_vbus_change(effects: &mut Vec<Effect>, mask: bool) {
    if mask {
        effects.push(Effect::set(Register::IntMask2, 0x01));
    } else {
        effects.push(Effect::write(Register::IntMask2, INT_MASK2_BASELINE));
    }
}

/// Every detach leaves the switch in automatic mode with MANUAL_SW2 cleared.
pub fn finalize_detach(effects: &mut Vec<Effect>) {
    effects.push(Effect::write(Register::Control, Control::BASELINE.bits()));
    effects.push(Effect::write(Register::ManualSw2, 0));
}

/// Last value the effects write to MANUAL_SW1, if any.
pub fn last_switch_path(effects: &[Effect]) -> Option<SwitchPath> {
    effects.iter().rev().find_map(|effect| match *effect {
        Effect::Write {
            reg: Register::ManualSw1,
            value,
        } => Some(SwitchPath::from_register(value)),
        _ => None,
    })
}
