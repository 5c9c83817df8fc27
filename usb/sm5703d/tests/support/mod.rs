#![allow(dead_code)]

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use sm5703_muic::regs::{Adc, Int1, Int2, Register};
use sm5703_muic::{CableKind, ComboRole, Config, Muic, Notification, NotificationSink, Timing};

struct Registers {
    values: [u8; 256],
    writes: Vec<(Register, u8)>,
    fail_read: Option<u8>,
    fail_write: Option<u8>,
}

/// Register file in memory. INT1 and INT2 clear on read like on the chip.
#[derive(Clone)]
pub struct MockBus(Arc<Mutex<Registers>>);

impl MockBus {
    pub fn new() -> Self {
        let mut values = [0u8; 256];
        values[Register::DeviceId.addr() as usize] = 0x01;
        values[Register::Adc.addr() as usize] = Adc::OPEN.code();
        MockBus(Arc::new(Mutex::new(Registers {
            values,
            writes: Vec::new(),
            fail_read: None,
            fail_write: None,
        })))
    }

    pub fn get(&self, reg: Register) -> u8 {
        self.0.lock().values[reg.addr() as usize]
    }

    pub fn set(&self, reg: Register, value: u8) {
        self.0.lock().values[reg.addr() as usize] = value;
    }

    /// What the chip reports for the accessory in the port.
    pub fn present(&self, adc: Adc, dev1: u8, dev2: u8, dev3: u8, vbus: bool) {
        self.set(Register::Adc, adc.code());
        self.set(Register::DeviceType1, dev1);
        self.set(Register::DeviceType2, dev2);
        self.set(Register::DeviceType3, dev3);
        self.set(Register::VbusValid, if vbus { 0x02 } else { 0x00 });
    }

    pub fn unplug(&self) {
        self.present(Adc::OPEN, 0, 0, 0, false);
        self.set(Register::CarkitStatus, 0);
        self.set(Register::ChgType, 0);
    }

    pub fn interrupt(&self, int1: Int1, int2: Int2) {
        self.set(Register::Int1, int1.bits());
        self.set(Register::Int2, int2.bits());
    }

    pub fn take_writes(&self) -> Vec<(Register, u8)> {
        std::mem::take(&mut self.0.lock().writes)
    }

    pub fn fail_read(&self, reg: Option<Register>) {
        self.0.lock().fail_read = reg.map(Register::addr);
    }

    pub fn fail_write(&self, reg: Option<Register>) {
        self.0.lock().fail_write = reg.map(Register::addr);
    }
}

const REGISTERS: [Register; 23] = [
    Register::DeviceId,
    Register::Control,
    Register::Int1,
    Register::Int2,
    Register::IntMask1,
    Register::IntMask2,
    Register::Adc,
    Register::TimingSet1,
    Register::TimingSet2,
    Register::DeviceType1,
    Register::DeviceType2,
    Register::Button1,
    Register::Button2,
    Register::CarkitStatus,
    Register::ManualSw1,
    Register::ManualSw2,
    Register::DeviceType3,
    Register::Reset,
    Register::VbusValid,
    Register::TimerSet,
    Register::BcdRescan,
    Register::ChgType,
    Register::ChgPumpSet,
];

fn register(addr: u8) -> Option<Register> {
    REGISTERS.iter().copied().find(|reg| reg.addr() == addr)
}

impl sm5703_muic::RegisterBus for MockBus {
    fn read(&mut self, addr: u8) -> io::Result<u8> {
        let mut regs = self.0.lock();
        if regs.fail_read == Some(addr) {
            return Err(io::Error::new(io::ErrorKind::Other, "bus error"));
        }
        let value = regs.values[addr as usize];
        if addr == Register::Int1.addr() || addr == Register::Int2.addr() {
            regs.values[addr as usize] = 0;
        }
        Ok(value)
    }

    fn write(&mut self, addr: u8, value: u8) -> io::Result<()> {
        let mut regs = self.0.lock();
        if regs.fail_write == Some(addr) {
            return Err(io::Error::new(io::ErrorKind::Other, "bus error"));
        }
        regs.values[addr as usize] = value;
        if let Some(reg) = register(addr) {
            regs.writes.push((reg, value));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Notification>>,
    test_mode: Mutex<bool>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn set_test_mode(&self, on: bool) {
        *self.test_mode.lock() = on;
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, kind: CableKind, attached: bool) {
        self.events
            .lock()
            .push(Notification::Cable { kind, attached });
    }

    fn notify_combo(&self, kind: CableKind, attached: bool, role: ComboRole) {
        self.events.lock().push(Notification::Combo {
            kind,
            attached,
            role,
        });
    }

    fn overvoltage(&self, enabled: bool) {
        self.events.lock().push(Notification::Overvoltage(enabled));
    }

    fn vbus_power(&self, on: bool) {
        self.events.lock().push(Notification::VbusPower(on));
    }

    fn test_mode(&self) -> bool {
        *self.test_mode.lock()
    }
}

pub type TestMuic = Muic<MockBus, Arc<RecordingSink>>;

pub fn config() -> Config {
    Config {
        timing: Timing::immediate(),
        ..Config::default()
    }
}

pub fn setup_with(bus: &MockBus, config: Config) -> (Arc<RecordingSink>, TestMuic) {
    let sink = Arc::new(RecordingSink::default());
    let muic = Muic::new(bus.clone(), sink.clone(), config).unwrap();
    bus.take_writes();
    (sink, muic)
}

pub fn setup() -> (MockBus, Arc<RecordingSink>, TestMuic) {
    let bus = MockBus::new();
    let (sink, muic) = setup_with(&bus, config());
    (bus, sink, muic)
}

pub fn cable(kind: CableKind, attached: bool) -> Notification {
    Notification::Cable { kind, attached }
}

pub fn combo(kind: CableKind, attached: bool, role: ComboRole) -> Notification {
    Notification::Combo {
        kind,
        attached,
        role,
    }
}
