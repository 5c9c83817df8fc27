//! Register map of the SM5703 MUIC block.

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    DeviceId = 0x01,
    Control = 0x02,
    Int1 = 0x03,
    Int2 = 0x04,
    IntMask1 = 0x05,
    IntMask2 = 0x06,
    Adc = 0x07,
    TimingSet1 = 0x08,
    TimingSet2 = 0x09,
    DeviceType1 = 0x0A,
    DeviceType2 = 0x0B,
    Button1 = 0x0C,
    Button2 = 0x0D,
    CarkitStatus = 0x0E,
    ManualSw1 = 0x13,
    ManualSw2 = 0x14,
    DeviceType3 = 0x15,
    Reset = 0x1B,
    VbusValid = 0x1D,
    TimerSet = 0x20,
    BcdRescan = 0x21,
    ChgType = 0x24,
    ChgPumpSet = 0x3A,
}

impl Register {
    #[inline]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

// Baseline interrupt masks written by reg_init
pub const INT_MASK1_BASELINE: u8 = 0x5C;
pub const INT_MASK2_BASELINE: u8 = 0x00;
// 300ms
pub const TIMING_SET1_BASELINE: u8 = 0x04;
// Value CONTROL reads back after the chip resets itself during a surge
pub const CONTROL_STUCK: u8 = 0x1F;

bitflags! {
    /// A set `MANUAL_SW` bit selects automatic switching, a set `RAW_DATA`
    /// bit turns raw ADC interrupts off.
    pub struct Control: u8 {
        const INT_MASK = 1;
        const WAIT = 1 << 1;
        const MANUAL_SW = 1 << 2;
        const RAW_DATA = 1 << 3;
        const SWITCH_OPEN = 1 << 4;

        const BASELINE = Self::SWITCH_OPEN.bits
            | Self::RAW_DATA.bits
            | Self::MANUAL_SW.bits
            | Self::WAIT.bits;
        // What a manual switch request expects to find, MANUAL_SW aside
        const IDLE = Self::SWITCH_OPEN.bits | Self::RAW_DATA.bits | Self::WAIT.bits;
    }
}

bitflags! {
    pub struct DeviceType1: u8 {
        const AUDIO_1 = 1;
        const AUDIO_2 = 1 << 1;
        const USB = 1 << 2;
        const UART = 1 << 3;
        const CAR_KIT = 1 << 4;
        const USB_CHG = 1 << 5;
        const DEDICATED_CHG = 1 << 6;
        const USB_OTG = 1 << 7;

        const USB_MASK = Self::USB_OTG.bits | Self::USB_CHG.bits | Self::USB.bits;
        const CHARGER_MASK = Self::DEDICATED_CHG.bits | Self::CAR_KIT.bits;
    }
}

bitflags! {
    /// Bits 8 and 9 never come from the chip. They are set by normalization
    /// when the ADC code alone identifies an audio dock or a lanhub.
    pub struct DeviceType2: u16 {
        const JIG_USB_ON = 1;
        const JIG_USB_OFF = 1 << 1;
        const JIG_UART_ON = 1 << 2;
        const JIG_UART_OFF = 1 << 3;
        const PPD = 1 << 4;
        const TTY = 1 << 5;
        const AV = 1 << 6;
        const SMARTDOCK = 1 << 7;
        const AUDIO_DOCK = 1 << 8;
        const LANHUB = 1 << 9;

        const USB_MASK = Self::JIG_USB_OFF.bits | Self::JIG_USB_ON.bits;
        const UART_MASK = Self::JIG_UART_OFF.bits;
        const JIG_MASK = Self::JIG_USB_OFF.bits
            | Self::JIG_USB_ON.bits
            | Self::JIG_UART_OFF.bits;
        const JIG_ALL_MASK = Self::JIG_MASK.bits | Self::JIG_UART_ON.bits;
    }
}

impl DeviceType2 {
    /// Only the low byte is backed by hardware.
    pub fn from_register(value: u8) -> Self {
        Self::from_bits_truncate(u16::from(value))
    }

    pub fn register_bits(self) -> u8 {
        (self.bits() & 0xFF) as u8
    }
}

bitflags! {
    pub struct DeviceType3: u8 {
        const MHL = 1;
        const NON_STANDARD = 1 << 2;
        const AV_VBUS = 1 << 4;
        const U200_CHARGER = 1 << 6;

        const CHARGER_MASK = Self::U200_CHARGER.bits;
    }
}

bitflags! {
    pub struct CarkitStatus: u8 {
        const CHARGER1 = 1 << 1;
    }
}

bitflags! {
    pub struct VbusStatus: u8 {
        const VBUSOUT_VALID = 1;
        const VBUSIN_VALID = 1 << 1;
    }
}

bitflags! {
    pub struct Int1: u8 {
        const ATTACH = 1;
        const DETACH = 1 << 1;
        const KEY_PRESS = 1 << 2;
        const LONG_KEY_PRESS = 1 << 3;
        const LONG_KEY_RELEASE = 1 << 4;
        const OVP_ENABLE = 1 << 5;
        const OVP_DISABLE = 1 << 7;

        const OVP_MASK = Self::OVP_ENABLE.bits | Self::OVP_DISABLE.bits;
    }
}

bitflags! {
    pub struct Int2: u8 {
        const VBUS_OFF = 1;
        const RESERVED_ATTACH = 1 << 1;
        const ADC_CHANGE = 1 << 2;
        const STUCK_KEY = 1 << 3;
        const STUCK_KEY_RCV = 1 << 4;
        const MHL = 1 << 5;
        const RID_CHARGER = 1 << 6;
        const VBUSDET_ON = 1 << 7;
    }
}

bitflags! {
    pub struct ManualSw2: u8 {
        // Disconnects the MUIC_ID and ITBP pins
        const ID_SWITCH_OPEN = 1 << 1;
        const VBUS_PASSTHROUGH = 1 << 2;
    }
}

/// 5-bit resistance classification reported by the ADC register.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Adc(u8);

impl Adc {
    pub const MASK: u8 = 0x1F;

    pub const OTG: Adc = Adc(0x00);
    pub const VZW_DOCK: Adc = Adc(0x0E);
    pub const VZW_INCOMPATIBLE: Adc = Adc(0x0F);
    pub const SMART_DOCK: Adc = Adc(0x10);
    pub const HMT: Adc = Adc(0x11);
    pub const AUDIO_DOCK: Adc = Adc(0x12);
    pub const LANHUB: Adc = Adc(0x13);
    pub const CHARGING_CABLE: Adc = Adc(0x14);
    pub const MPOS: Adc = Adc(0x15);
    pub const UART: Adc = Adc(0x16);
    pub const LCABLE: Adc = Adc(0x17);
    pub const JIG_USB_OFF: Adc = Adc(0x18);
    pub const JIG_USB_ON: Adc = Adc(0x19);
    pub const DESKDOCK: Adc = Adc(0x1A);
    pub const CEA2: Adc = Adc(0x1B);
    pub const JIG_UART_OFF: Adc = Adc(0x1C);
    pub const JIG_UART_ON: Adc = Adc(0x1D);
    pub const CARDOCK: Adc = Adc(0x1D);
    pub const OPEN: Adc = Adc(0x1F);

    /// Bits above the 5-bit code are dropped.
    #[inline]
    pub const fn from_register(value: u8) -> Self {
        Adc(value & Self::MASK)
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }
}

impl fmt::Debug for Adc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Adc({:#04x})", self.0)
    }
}

impl fmt::Display for Adc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Result of battery charging detection, CHG_TYPE register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChargerType {
    None,
    Dcp,
    Cdp,
    Sdp,
    SdpTimeout,
    U200,
}

impl ChargerType {
    pub fn from_register(value: u8) -> Self {
        match value {
            0x01 => ChargerType::Dcp,
            0x02 => ChargerType::Cdp,
            0x04 => ChargerType::Sdp,
            0x08 => ChargerType::SdpTimeout,
            0x10 => ChargerType::U200,
            _ => ChargerType::None,
        }
    }
}

/// MANUAL_SW1 value. D- routing lives in bits 7:5, D+ in bits 4:2
/// (000 open, 001 USB, 010 audio, 011 UART, 100 V_AUDIO), bit 0 passes VBUS.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwitchPath(u8);

impl SwitchPath {
    pub const VAUDIO: SwitchPath = SwitchPath((4 << 5) | (4 << 2) | (1 << 1) | 1);
    pub const UART: SwitchPath = SwitchPath((3 << 5) | (3 << 2));
    pub const AUDIO: SwitchPath = SwitchPath((2 << 5) | (2 << 2) | 1);
    pub const DHOST: SwitchPath = SwitchPath((1 << 5) | (1 << 2) | 1);
    pub const AUTO: SwitchPath = SwitchPath(0);
    pub const ALL_OPEN: SwitchPath = SwitchPath(0);
    pub const ALL_OPEN_WITH_VBUS: SwitchPath = SwitchPath(1);
    pub const ALL_OPEN_WITHOUT_VBUS: SwitchPath = SwitchPath(0x01);
    // Left behind by the bootloader when the UART is locked
    pub const OPEN_RUSTPROOF: SwitchPath = SwitchPath((0x3 << 2) | 1);

    #[inline]
    pub const fn from_register(value: u8) -> Self {
        SwitchPath(value)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn name(self) -> Option<&'static str> {
        match self {
            SwitchPath::VAUDIO => Some("VAUDIO"),
            SwitchPath::UART => Some("UART"),
            SwitchPath::AUDIO => Some("AUDIO"),
            SwitchPath::DHOST => Some("DHOST"),
            SwitchPath::AUTO => Some("AUTO"),
            _ => None,
        }
    }
}

impl fmt::Debug for SwitchPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "SwitchPath({})", name),
            None => write!(f, "SwitchPath({:#04x})", self.0),
        }
    }
}

impl fmt::Display for SwitchPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:x}", self.0),
        }
    }
}

/// Switch positions an operator may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchMode {
    VAudio,
    Uart,
    Audio,
    DHost,
    Auto,
}

impl SwitchMode {
    pub fn path(self) -> SwitchPath {
        match self {
            SwitchMode::VAudio => SwitchPath::VAUDIO,
            SwitchMode::Uart => SwitchPath::UART,
            SwitchMode::Audio => SwitchPath::AUDIO,
            SwitchMode::DHost => SwitchPath::DHOST,
            SwitchMode::Auto => SwitchPath::AUTO,
        }
    }
}

impl FromStr for SwitchMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // VAUDIO has to be tried before AUDIO, the names share a suffix
        let s = s.trim();
        if s.starts_with("VAUDIO") {
            Ok(SwitchMode::VAudio)
        } else if s.starts_with("UART") {
            Ok(SwitchMode::Uart)
        } else if s.starts_with("AUDIO") {
            Ok(SwitchMode::Audio)
        } else if s.starts_with("DHOST") {
            Ok(SwitchMode::DHost)
        } else if s.starts_with("AUTO") {
            Ok(SwitchMode::Auto)
        } else {
            Err(())
        }
    }
}
