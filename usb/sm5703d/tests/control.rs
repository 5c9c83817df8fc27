mod support;

use sm5703_muic::regs::{Adc, Int1, Int2, Register, SwitchMode, SwitchPath};
use sm5703_muic::{AttachedDevice, CableKind, Capabilities, Error, PassOutcome};

use support::{cable, config, setup, setup_with, MockBus};

#[test]
fn bring_up_writes_baseline() {
    let bus = MockBus::new();
    let (_sink, muic) = setup_with(&bus, config());
    assert_eq!(bus.get(Register::IntMask1), 0x5C);
    assert_eq!(bus.get(Register::IntMask2), 0x00);
    assert_eq!(bus.get(Register::Control), 0x1E);
    assert_eq!(bus.get(Register::TimingSet1), 0x04);
    assert!(!muic.rustproof_enabled());
    assert!(muic.uart_enabled());
}

#[test]
fn start_picks_up_attached_accessory() {
    let bus = MockBus::new();
    bus.present(Adc::JIG_UART_OFF, 0, 0x08, 0, false);
    bus.interrupt(Int1::ATTACH, Int2::empty());
    let (sink, muic) = setup_with(&bus, config());

    assert_eq!(
        muic.start().unwrap(),
        PassOutcome::Attached(AttachedDevice::UartOff)
    );
    assert_eq!(sink.take(), vec![cable(CableKind::UartOff, true)]);
    assert_eq!(bus.get(Register::ManualSw1), 0x6C);
    assert!(muic.jig_present());
    assert_eq!(muic.state().mode_path, SwitchPath::UART);
}

#[test]
fn rustproof_left_on_by_bootloader() {
    let bus = MockBus::new();
    bus.set(Register::ManualSw1, 0x0D);
    let (sink, muic) = setup_with(&bus, config());
    assert!(muic.rustproof_enabled());
    assert!(!muic.uart_enabled());

    bus.present(Adc::JIG_UART_OFF, 0, 0x08, 0, true);
    muic.start().unwrap();
    assert_eq!(
        muic.attached_device(),
        AttachedDevice::UartBlocked { vbus: true }
    );
    assert_eq!(sink.take(), vec![cable(CableKind::UartBlockedVb, true)]);
    assert_eq!(bus.get(Register::ManualSw1), 0x01);
    assert_eq!(bus.get(Register::ManualSw2), 0x04);
}

#[test]
fn rustproof_toggle_reroutes_immediately() {
    let (bus, sink, muic) = setup();

    bus.present(Adc::JIG_UART_OFF, 0, 0x08, 0, true);
    bus.interrupt(Int1::ATTACH, Int2::empty());
    muic.handle_interrupt().unwrap();
    assert_eq!(sink.take(), vec![cable(CableKind::JigUartOffVb, true)]);

    assert_eq!(
        muic.set_rustproof(true).unwrap(),
        PassOutcome::Attached(AttachedDevice::UartBlocked { vbus: true })
    );
    assert_eq!(
        sink.take(),
        vec![
            cable(CableKind::JigUartOffVb, false),
            cable(CableKind::UartBlockedVb, true)
        ]
    );
    assert_eq!(bus.get(Register::ManualSw1), 0x01);
    assert_eq!(bus.get(Register::ManualSw2), 0x04);
    assert!(muic.rustproof_enabled());

    assert_eq!(
        muic.set_rustproof(false).unwrap(),
        PassOutcome::Attached(AttachedDevice::UartOffWithVbus)
    );
    assert_eq!(
        sink.take(),
        vec![
            cable(CableKind::UartBlockedVb, false),
            cable(CableKind::JigUartOffVb, true)
        ]
    );
    assert_eq!(bus.get(Register::ManualSw1), 0x6C);
    assert!(muic.uart_enabled());
}

#[test]
fn rustproof_toggle_with_nothing_attached() {
    let (_bus, sink, muic) = setup();
    assert_eq!(muic.set_rustproof(true).unwrap(), PassOutcome::Unrecognized);
    assert!(muic.rustproof_enabled());
    assert_eq!(sink.take(), vec![]);
}

#[test]
fn rustproof_needs_capability() {
    let bus = MockBus::new();
    let mut config = config();
    config.capabilities = Capabilities {
        rustproof: false,
        ..Capabilities::all()
    };
    let (_sink, muic) = setup_with(&bus, config);
    assert!(matches!(
        muic.set_rustproof(true),
        Err(Error::RustproofUnsupported)
    ));
}

#[test]
fn reset_returns_to_rest() {
    let (bus, sink, muic) = setup();

    bus.present(Adc::OPEN, 0x04, 0, 0, true);
    bus.interrupt(Int1::ATTACH, Int2::empty());
    muic.handle_interrupt().unwrap();
    sink.take();
    bus.take_writes();

    muic.reset().unwrap();
    let writes = bus.take_writes();
    assert_eq!(writes[0], (Register::Reset, 0x01));
    assert!(writes.contains(&(Register::Control, 0x1E)));
    assert_eq!(muic.attached_device(), AttachedDevice::None);
    assert_eq!(muic.state(), sm5703_muic::ControllerState::new());
    assert_eq!(sink.take(), vec![]);
}

#[test]
fn resume_detaches_what_left_while_asleep() {
    let (bus, sink, muic) = setup();

    bus.present(Adc::OPEN, 0x04, 0, 0, true);
    bus.interrupt(Int1::ATTACH, Int2::empty());
    muic.handle_interrupt().unwrap();
    sink.take();

    assert_eq!(muic.resume().unwrap(), PassOutcome::Ignored);
    assert_eq!(sink.take(), vec![]);

    bus.unplug();
    bus.interrupt(Int1::DETACH, Int2::empty());
    assert_eq!(
        muic.resume().unwrap(),
        PassOutcome::Detached(AttachedDevice::Usb)
    );
    assert_eq!(sink.take(), vec![cable(CableKind::Usb, false)]);
}

#[test]
fn resume_picks_up_swapped_accessory() {
    let (bus, sink, muic) = setup();

    bus.present(Adc::OPEN, 0x04, 0, 0, true);
    bus.interrupt(Int1::ATTACH, Int2::empty());
    muic.handle_interrupt().unwrap();
    sink.take();

    bus.present(Adc::OPEN, 0x40, 0, 0, true);
    assert_eq!(
        muic.resume().unwrap(),
        PassOutcome::Attached(AttachedDevice::Ac)
    );
    assert_eq!(
        sink.take(),
        vec![cable(CableKind::Usb, false), cable(CableKind::Ac, true)]
    );
}

#[test]
fn stuck_control_register_is_recovered() {
    let (bus, sink, muic) = setup();

    bus.set(Register::Control, 0x1F);
    bus.set(Register::IntMask1, 0x00);
    assert_eq!(muic.handle_interrupt().unwrap(), PassOutcome::Recovered);
    assert_eq!(bus.get(Register::Control), 0x1E);
    assert_eq!(bus.get(Register::IntMask1), 0x5C);
    assert_eq!(sink.take(), vec![]);
}

#[test]
fn manual_switch() {
    let (bus, _sink, muic) = setup();

    muic.set_manual_switch(SwitchMode::Uart).unwrap();
    assert_eq!(muic.manual_switch().unwrap(), SwitchPath::UART);
    assert_eq!(bus.get(Register::Control), 0x1A);
    assert_eq!(muic.state().mode_path, SwitchPath::UART);

    muic.set_manual_switch(SwitchMode::Auto).unwrap();
    assert_eq!(muic.manual_switch().unwrap(), SwitchPath::AUTO);
    assert_eq!(bus.get(Register::Control), 0x1E);

    bus.set(Register::Control, 0x00);
    assert!(matches!(
        muic.set_manual_switch(SwitchMode::Audio),
        Err(Error::SwitchRefused(_))
    ));
    assert_eq!(muic.manual_switch().unwrap(), SwitchPath::AUTO);
}

#[test]
fn diagnostics() {
    let (bus, _sink, muic) = setup();

    bus.present(Adc::DESKDOCK, 0x01, 0x40, 0x10, true);
    assert_eq!(muic.adc().unwrap(), Adc::DESKDOCK);
    let (dev1, dev2, dev3) = muic.device_types().unwrap();
    assert_eq!(dev1.bits(), 0x01);
    assert_eq!(dev2.register_bits(), 0x40);
    assert_eq!(dev3.bits(), 0x10);
    assert_eq!(muic.vbus_status().unwrap().bits(), 0x02);
    assert_eq!(muic.control().unwrap().bits(), 0x1E);
    assert!(!muic.usb_configured().unwrap());
}
