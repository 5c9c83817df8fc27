//! UART gate. While enabled, UART-class accessories get the data lines held
//! open with VBUS passed through instead of the UART path.

use crate::device::AttachedDevice;
use crate::effect::{self, Effect};
use crate::regs::{ManualSw2, Register, SwitchPath};

/// Device reported for a UART jig with the gate in the given position.
pub fn route_uart(gated: bool, vbus_valid: bool) -> AttachedDevice {
    if gated {
        AttachedDevice::UartBlocked { vbus: vbus_valid }
    } else if vbus_valid {
        AttachedDevice::UartOffWithVbus
    } else {
        AttachedDevice::UartOff
    }
}

pub fn engage(effects: &mut Vec<Effect>) {
    effect::switch_path(effects, SwitchPath::ALL_OPEN_WITH_VBUS);
    effects.push(Effect::write(
        Register::ManualSw2,
        ManualSw2::VBUS_PASSTHROUGH.bits(),
    ));
    effect::manual_switching(effects);
}

pub fn release(effects: &mut Vec<Effect>) {
    effect::automatic_switching(effects);
    effects.push(Effect::write(Register::ManualSw2, 0));
    effect::switch_path(effects, SwitchPath::ALL_OPEN);
}
