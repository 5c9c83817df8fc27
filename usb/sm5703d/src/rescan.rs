//! BCD rescan for the 619K "L cable".
//!
//! The chip cannot tell what sits behind this resistance on the first
//! detection. The first pass pulses BCD_RESCAN and waits for the charger-RID
//! interrupt, the second reads CHG_TYPE.

use std::time::Duration;

use log::debug;

use crate::device::AttachedDevice;
use crate::effect::Effect;
use crate::regs::{Adc, CarkitStatus, ChargerType, Register};
use crate::snapshot::RegisterSnapshot;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RescanStep {
    /// Phase 1, no terminal device yet.
    Trigger(Vec<Effect>),
    /// Phase 2 resolved to a device.
    Resolved(AttachedDevice),
    /// Phase 2 with a charger type that maps to nothing.
    Unresolved,
}

pub fn is_candidate(snapshot: &RegisterSnapshot) -> bool {
    snapshot.adc == Adc::LCABLE && snapshot.carkit_status.contains(CarkitStatus::CHARGER1)
}

pub fn step(snapshot: &RegisterSnapshot, pending: bool, pulse: Duration) -> RescanStep {
    if !pending {
        debug!("sm5703: L cable, starting BCD rescan");
        return RescanStep::Trigger(vec![
            Effect::write(Register::BcdRescan, 0x01),
            Effect::Delay(pulse),
            Effect::write(Register::BcdRescan, 0x00),
        ]);
    }

    match resolve(snapshot.chg_type) {
        Some(device) => RescanStep::Resolved(device),
        None => {
            debug!("sm5703: BCD rescan gave {:?}", snapshot.chg_type);
            RescanStep::Unresolved
        }
    }
}

pub fn resolve(chg_type: ChargerType) -> Option<AttachedDevice> {
    match chg_type {
        ChargerType::Dcp | ChargerType::U200 => Some(AttachedDevice::Ac),
        ChargerType::Cdp => Some(AttachedDevice::Cdp),
        ChargerType::Sdp => Some(AttachedDevice::Usb),
        ChargerType::SdpTimeout => Some(AttachedDevice::LongTimeoutUsb),
        ChargerType::None => None,
    }
}
