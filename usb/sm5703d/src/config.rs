use std::time::Duration;

use serde::Deserialize;

use crate::regs::Adc;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub timing: Timing,
    pub capabilities: Capabilities,
}

impl Config {
    pub fn parse(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(data)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Register file, one byte per register offset.
    pub bus: Option<String>,
    /// IRQ handle. Reading blocks until the line fires, writing the value
    /// back acknowledges it.
    pub irq: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub settle_delay_ms: u64,
    pub init_delay_ms: u64,
    pub reset_delay_ms: u64,
    pub rescan_pulse_ms: u64,
}

impl Timing {
    /// All delays zero.
    pub fn immediate() -> Self {
        Self {
            settle_delay_ms: 0,
            init_delay_ms: 0,
            reset_delay_ms: 0,
            rescan_pulse_ms: 0,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn init_delay(&self) -> Duration {
        Duration::from_millis(self.init_delay_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn rescan_pulse(&self) -> Duration {
        Duration::from_millis(self.rescan_pulse_ms)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle_delay_ms: 100,
            init_delay_ms: 2700,
            reset_delay_ms: 1000,
            rescan_pulse_ms: 1,
        }
    }
}

/// Optional accessory classes this board supports.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// OTG, audio dock and HMT.
    pub host_notify: bool,
    pub lanhub: bool,
    pub rustproof: bool,
    pub desk_dock: bool,
    pub smart_dock: bool,
    pub charging_cable: bool,
    pub incompatible_charger: bool,
    /// Accept every ADC code the chip reports.
    pub standard_usbid: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            host_notify: true,
            lanhub: true,
            rustproof: true,
            desk_dock: true,
            smart_dock: true,
            charging_cable: true,
            incompatible_charger: true,
            standard_usbid: false,
        }
    }

    pub fn none() -> Self {
        Self {
            host_notify: false,
            lanhub: false,
            rustproof: false,
            desk_dock: false,
            smart_dock: false,
            charging_cable: false,
            incompatible_charger: false,
            standard_usbid: false,
        }
    }

    /// Whether an accessory with this ADC code may be classified at all.
    pub fn supports(&self, adc: Adc) -> bool {
        if self.standard_usbid {
            return true;
        }
        match adc {
            Adc::OTG | Adc::AUDIO_DOCK => self.host_notify,
            Adc::SMART_DOCK => self.smart_dock,
            Adc::LANHUB => self.lanhub,
            Adc::CHARGING_CABLE => self.charging_cable,
            Adc::DESKDOCK => self.desk_dock,
            Adc::VZW_DOCK | Adc::VZW_INCOMPATIBLE => self.incompatible_charger,
            Adc::HMT | Adc::MPOS => false,
            _ => true,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}
