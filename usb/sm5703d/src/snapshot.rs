use crate::bus::{RegisterAccess, RegisterBus};
use crate::error::Result;
use crate::regs::{
    Adc, CarkitStatus, ChargerType, DeviceType1, DeviceType2, DeviceType3, Int1, Int2, Register,
    VbusStatus,
};

/// Everything one classification pass looks at, read in a single burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterSnapshot {
    pub int1: Int1,
    pub int2: Int2,
    pub adc: Adc,
    pub dev_type1: DeviceType1,
    pub dev_type2: DeviceType2,
    pub dev_type3: DeviceType3,
    pub carkit_status: CarkitStatus,
    pub vbus: VbusStatus,
    pub chg_type: ChargerType,
}

impl RegisterSnapshot {
    /// Nothing plugged in.
    pub fn rest() -> Self {
        Self {
            int1: Int1::empty(),
            int2: Int2::empty(),
            adc: Adc::OPEN,
            dev_type1: DeviceType1::empty(),
            dev_type2: DeviceType2::empty(),
            dev_type3: DeviceType3::empty(),
            carkit_status: CarkitStatus::empty(),
            vbus: VbusStatus::empty(),
            chg_type: ChargerType::None,
        }
    }

    #[inline]
    pub fn vbus_valid(&self) -> bool {
        self.vbus.contains(VbusStatus::VBUSIN_VALID)
    }

    pub fn device_types_clear(&self) -> bool {
        self.dev_type1.is_empty() && self.dev_type2.is_empty() && self.dev_type3.is_empty()
    }

    /// Device type and VBUS registers match, interrupt bits are ignored.
    pub fn same_device(&self, other: &RegisterSnapshot) -> bool {
        self.dev_type1 == other.dev_type1
            && self.dev_type2 == other.dev_type2
            && self.dev_type3 == other.dev_type3
            && self.vbus_valid() == other.vbus_valid()
    }
}

impl Default for RegisterSnapshot {
    fn default() -> Self {
        Self::rest()
    }
}

/// Reads interrupt, ADC, device type, carkit, VBUS and charger type registers
/// in that order. INT1 and INT2 clear on read.
pub fn read_snapshot<B: RegisterBus + ?Sized>(bus: &mut B) -> Result<RegisterSnapshot> {
    let int1 = bus.read_reg(Register::Int1)?;
    let int2 = bus.read_reg(Register::Int2)?;
    let adc = bus.read_reg(Register::Adc)?;
    let dev_type1 = bus.read_reg(Register::DeviceType1)?;
    let dev_type2 = bus.read_reg(Register::DeviceType2)?;
    let dev_type3 = bus.read_reg(Register::DeviceType3)?;
    let carkit_status = bus.read_reg(Register::CarkitStatus)?;
    let vbus = bus.read_reg(Register::VbusValid)?;
    let chg_type = bus.read_reg(Register::ChgType)?;

    Ok(RegisterSnapshot {
        int1: Int1::from_bits_truncate(int1),
        int2: Int2::from_bits_truncate(int2),
        adc: Adc::from_register(adc),
        dev_type1: DeviceType1::from_bits_truncate(dev_type1),
        dev_type2: DeviceType2::from_register(dev_type2),
        dev_type3: DeviceType3::from_bits_truncate(dev_type3),
        carkit_status: CarkitStatus::from_bits_truncate(carkit_status),
        vbus: VbusStatus::from_bits_truncate(vbus),
        chg_type: ChargerType::from_register(chg_type),
    })
}
