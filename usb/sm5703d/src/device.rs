use std::fmt;

use crate::regs::DeviceType2;

/// Cable identity reported to the power/USB subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CableKind {
    Usb,
    Cdp,
    Otg,
    Ac,
    UartOff,
    JigUartOffVb,
    UartBlocked,
    UartBlockedVb,
    UartOn,
    Jig,
    DeskDock,
    DeskDockNoVb,
    SmartDock,
    SmartDockNoVb,
    AudioDock,
    Lanhub,
    // 219K cable that timed out SDP detection
    LongTimeoutUsb,
    ChargingCable,
    Incompatible,
    Undefined,
}

/// Which half of a lanhub combination a combo notification refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComboRole {
    Lanhub,
    LanhubCharger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JigKind {
    UartOff,
    UartOffVbus,
    UartOn,
    UsbOff,
    UsbOn,
}

impl JigKind {
    pub fn from_device_type(dev2: DeviceType2, vbus_valid: bool) -> Option<Self> {
        if dev2.contains(DeviceType2::JIG_UART_OFF) {
            if vbus_valid {
                Some(JigKind::UartOffVbus)
            } else {
                Some(JigKind::UartOff)
            }
        } else if dev2.contains(DeviceType2::JIG_UART_ON) {
            Some(JigKind::UartOn)
        } else if dev2.contains(DeviceType2::JIG_USB_OFF) {
            Some(JigKind::UsbOff)
        } else if dev2.contains(DeviceType2::JIG_USB_ON) {
            Some(JigKind::UsbOn)
        } else {
            None
        }
    }
}

/// What the controller believes is plugged in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachedDevice {
    None,
    Usb,
    Cdp,
    // Dedicated charger
    Ac,
    LongTimeoutUsb,
    UartOff,
    UartOffWithVbus,
    /// A UART jig while the rustproof gate holds the UART lines open.
    UartBlocked {
        vbus: bool,
    },
    Otg,
    Lanhub,
    Jig(JigKind),
    DeskDock {
        vbus: bool,
    },
    SmartDock {
        vbus: bool,
    },
    AudioDock,
    CarDock {
        gated: bool,
    },
    ChargingCable,
    Incompatible,
    Unknown,
}

impl AttachedDevice {
    #[inline]
    pub fn is_none(self) -> bool {
        self == AttachedDevice::None
    }

    /// OTG and lanhub sessions belong to the dock arbiter.
    pub fn is_arbitrated(self) -> bool {
        matches!(self, AttachedDevice::Otg | AttachedDevice::Lanhub)
    }

    pub fn is_dock(self) -> bool {
        matches!(
            self,
            AttachedDevice::DeskDock { .. }
                | AttachedDevice::SmartDock { .. }
                | AttachedDevice::Otg
                | AttachedDevice::Lanhub
        )
    }

    /// The kind carried by this device's attach and detach notifications.
    pub fn cable_kind(self) -> Option<CableKind> {
        let kind = match self {
            AttachedDevice::None => return None,
            AttachedDevice::Usb => CableKind::Usb,
            AttachedDevice::Cdp => CableKind::Cdp,
            AttachedDevice::Ac => CableKind::Ac,
            AttachedDevice::LongTimeoutUsb => CableKind::LongTimeoutUsb,
            AttachedDevice::UartOff => CableKind::UartOff,
            AttachedDevice::UartOffWithVbus => CableKind::JigUartOffVb,
            AttachedDevice::UartBlocked { vbus: false } => CableKind::UartBlocked,
            AttachedDevice::UartBlocked { vbus: true } => CableKind::UartBlockedVb,
            AttachedDevice::Otg => CableKind::Otg,
            AttachedDevice::Lanhub => CableKind::Lanhub,
            AttachedDevice::Jig(_) => CableKind::Jig,
            AttachedDevice::DeskDock { vbus: true } => CableKind::DeskDock,
            AttachedDevice::DeskDock { vbus: false } => CableKind::DeskDockNoVb,
            AttachedDevice::SmartDock { vbus: true } => CableKind::SmartDock,
            AttachedDevice::SmartDock { vbus: false } => CableKind::SmartDockNoVb,
            AttachedDevice::AudioDock => CableKind::AudioDock,
            AttachedDevice::CarDock { .. } => CableKind::UartOn,
            AttachedDevice::ChargingCable => CableKind::ChargingCable,
            AttachedDevice::Incompatible => CableKind::Incompatible,
            AttachedDevice::Unknown => CableKind::Undefined,
        };
        Some(kind)
    }
}

impl fmt::Display for AttachedDevice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            AttachedDevice::None => "No VPS",
            AttachedDevice::Usb => "USB",
            AttachedDevice::Cdp => "CDP",
            AttachedDevice::Otg => "OTG",
            AttachedDevice::Ac => "TA",
            AttachedDevice::UartOff
            | AttachedDevice::UartBlocked { vbus: false }
            | AttachedDevice::Jig(JigKind::UartOff) => "JIG UART OFF",
            AttachedDevice::UartOffWithVbus
            | AttachedDevice::UartBlocked { vbus: true }
            | AttachedDevice::Jig(JigKind::UartOffVbus) => "JIG UART OFF/VB",
            AttachedDevice::Jig(JigKind::UartOn) | AttachedDevice::CarDock { .. } => "JIG UART ON",
            AttachedDevice::Jig(JigKind::UsbOff) => "JIG USB OFF",
            AttachedDevice::Jig(JigKind::UsbOn) => "JIG USB ON",
            AttachedDevice::DeskDock { .. } => "DESKDOCK",
            AttachedDevice::SmartDock { .. } => "SMARTDOCK",
            AttachedDevice::AudioDock => "AUDIODOCK",
            _ => "UNKNOWN",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jig_kind_priority() {
        let dev2 = DeviceType2::JIG_UART_OFF | DeviceType2::JIG_USB_ON;
        assert_eq!(JigKind::from_device_type(dev2, false), Some(JigKind::UartOff));
        assert_eq!(JigKind::from_device_type(dev2, true), Some(JigKind::UartOffVbus));
        assert_eq!(
            JigKind::from_device_type(DeviceType2::JIG_USB_OFF, true),
            Some(JigKind::UsbOff)
        );
        assert_eq!(JigKind::from_device_type(DeviceType2::AV, true), None);
    }

    #[test]
    fn uart_kinds_are_vbus_qualified() {
        assert_eq!(AttachedDevice::UartOff.cable_kind(), Some(CableKind::UartOff));
        assert_eq!(
            AttachedDevice::UartOffWithVbus.cable_kind(),
            Some(CableKind::JigUartOffVb)
        );
        assert_eq!(
            AttachedDevice::UartBlocked { vbus: true }.cable_kind(),
            Some(CableKind::UartBlockedVb)
        );
        assert_eq!(AttachedDevice::None.cable_kind(), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(AttachedDevice::None.to_string(), "No VPS");
        assert_eq!(AttachedDevice::Ac.to_string(), "TA");
        assert_eq!(AttachedDevice::UartBlocked { vbus: true }.to_string(), "JIG UART OFF/VB");
        assert_eq!(AttachedDevice::Lanhub.to_string(), "UNKNOWN");
    }
}
