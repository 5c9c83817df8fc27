use crate::config::Capabilities;
use crate::device::AttachedDevice;
use crate::regs::{Adc, DeviceType2, Int1, Int2};
use crate::snapshot::RegisterSnapshot;
use crate::state::ControllerState;

/// Which pass an interrupt asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Attach,
    Detach,
    /// Raw ADC change during a dock session.
    Arbitrate,
    Ignore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch {
    pub event: Event,
    /// VBUS power change to report before the pass runs.
    pub vbus_power: Option<bool>,
}

impl Dispatch {
    fn new(event: Event) -> Self {
        Self {
            event,
            vbus_power: None,
        }
    }
}

fn something_present(s: &RegisterSnapshot) -> bool {
    s.adc != Adc::OPEN || !s.device_types_clear()
}

pub fn decide(
    s: &RegisterSnapshot,
    state: &ControllerState,
    caps: &Capabilities,
    test_mode: bool,
) -> Dispatch {
    let (int1, int2) = (s.int1, s.int2);

    if caps.lanhub
        && int2.contains(Int2::ADC_CHANGE)
        && (int1.is_empty() || int1.contains(Int1::DETACH))
    {
        return Dispatch::new(Event::Arbitrate);
    }

    if int1 == Int1::ATTACH | Int1::DETACH {
        // A detach pulse trailing a stale attach bit.
        if s.adc == Adc::OPEN
            && s.dev_type1.is_empty()
            && (s.dev_type3.is_empty() || s.vbus.is_empty())
        {
            return Dispatch::new(Event::Detach);
        }
        return Dispatch::new(Event::Attach);
    }

    if int1.contains(Int1::ATTACH) || int2.intersects(Int2::RESERVED_ATTACH | Int2::MHL) {
        return Dispatch::new(Event::Attach);
    }

    if int2.contains(Int2::RID_CHARGER) && state.rescan_pending {
        return Dispatch::new(Event::Attach);
    }

    if int1.contains(Int1::DETACH) {
        return Dispatch::new(Event::Detach);
    }

    if int2 == Int2::VBUSDET_ON {
        let otg = caps.host_notify && s.adc == Adc::OTG;
        let event = if something_present(s)
            && !otg
            && !test_mode
            && s.dev_type2 != DeviceType2::PPD
        {
            Event::Attach
        } else {
            Event::Ignore
        };
        return Dispatch {
            event,
            vbus_power: caps.host_notify.then(|| true),
        };
    }

    if int2 == Int2::VBUS_OFF {
        let event = if test_mode {
            Event::Ignore
        } else if state.attached == AttachedDevice::Unknown {
            Event::Detach
        } else if s.adc != Adc::OPEN {
            Event::Attach
        } else if int1 != Int1::OVP_ENABLE {
            Event::Detach
        } else {
            Event::Ignore
        };
        return Dispatch {
            event,
            vbus_power: caps.host_notify.then(|| false),
        };
    }

    Dispatch::new(Event::Ignore)
}
