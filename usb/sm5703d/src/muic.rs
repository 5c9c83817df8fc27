use std::thread;

use log::{debug, error, info, warn};
use parking_lot::Mutex;

use crate::bus::{RegisterAccess, RegisterBus};
use crate::classify::{self, Classification, PassOutcome};
use crate::config::Config;
use crate::device::AttachedDevice;
use crate::effect::Effect;
use crate::error::{Error, Result};
use crate::event::{self, Event};
use crate::notify::{Notification, NotificationSink};
use crate::regs::{
    Adc, Control, DeviceType1, DeviceType2, DeviceType3, Int1, Register, SwitchMode, SwitchPath,
    VbusStatus, CONTROL_STUCK, INT_MASK1_BASELINE, INT_MASK2_BASELINE, TIMING_SET1_BASELINE,
};
use crate::snapshot::{read_snapshot, RegisterSnapshot};
use crate::state::{ControllerState, DockState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resolving,
}

struct Inner<B> {
    bus: B,
    state: ControllerState,
    phase: Phase,
}

/// One SM5703 MUIC. Every pass and every control request runs under the
/// same lock.
pub struct Muic<B, S> {
    inner: Mutex<Inner<B>>,
    sink: S,
    config: Config,
}

/// Write the baseline interrupt masks, control and timing values.
pub fn reg_init<B: RegisterBus + ?Sized>(bus: &mut B) -> Result<()> {
    let id = bus.read_reg(Register::DeviceId)?;
    info!("sm5703: device id {:#04x}", id);

    bus.write_reg(Register::IntMask1, INT_MASK1_BASELINE)?;
    bus.write_reg(Register::IntMask2, INT_MASK2_BASELINE)?;
    bus.write_reg(Register::Control, Control::BASELINE.bits())?;
    bus.write_reg(Register::TimingSet1, TIMING_SET1_BASELINE)?;
    bus.write_reg(Register::ChgPumpSet, 0x00)?;
    Ok(())
}

impl<B: RegisterBus, S: NotificationSink> Muic<B, S> {
    /// Bring-up. Picks up a rustproof path left behind by the bootloader and
    /// writes the register baseline.
    pub fn new(mut bus: B, sink: S, config: Config) -> Result<Self> {
        let mut state = ControllerState::new();

        let sw1 = SwitchPath::from_register(bus.read_reg(Register::ManualSw1)?);
        if config.capabilities.rustproof && sw1 == SwitchPath::OPEN_RUSTPROOF {
            info!("sm5703: rustproof mode left on by bootloader");
            state.rustproof_enabled = true;
        }

        reg_init(&mut bus)?;

        Ok(Self {
            inner: Mutex::new(Inner {
                bus,
                state,
                phase: Phase::Idle,
            }),
            sink,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// First attach pass, picks up anything plugged in before bring-up.
    pub fn start(&self) -> Result<PassOutcome> {
        self.run(|muic, inner| {
            // Drop interrupts latched before the masks were written.
            for _ in 0..2 {
                inner.bus.read_reg(Register::Int1)?;
                inner.bus.read_reg(Register::Int2)?;
            }
            let snapshot = read_snapshot(&mut inner.bus)?;
            let classification = classify::classify(&snapshot, &inner.state, &muic.config);
            muic.apply(inner, classification)
        })
    }

    /// One interrupt. Blocks for the settle delay before touching the chip.
    pub fn handle_interrupt(&self) -> Result<PassOutcome> {
        thread::sleep(self.config.timing.settle_delay());
        self.run(|muic, inner| muic.resolve(inner))
    }

    /// Catch up with changes that happened while suspended.
    pub fn resume(&self) -> Result<PassOutcome> {
        self.run(|muic, inner| {
            let snapshot = read_snapshot(&mut inner.bus)?;
            if snapshot.int1.contains(Int1::DETACH) {
                let classification = classify::detach(&inner.state);
                return muic.apply(inner, classification);
            }

            let current = classify::normalize(&snapshot, &muic.config.capabilities);
            if current.same_device(&inner.state.cached_snapshot) {
                debug!("sm5703: nothing changed while suspended");
                return Ok(PassOutcome::Ignored);
            }
            let classification = classify::classify(&snapshot, &inner.state, &muic.config);
            muic.apply(inner, classification)
        })
    }

    /// Reset the chip and start over from the rest state.
    pub fn reset(&self) -> Result<()> {
        thread::sleep(self.config.timing.reset_delay());
        let mut inner = self.inner.lock();
        info!("sm5703: resetting chip");
        inner.bus.write_reg(Register::Reset, 0x01)?;
        inner.state.reset();
        reg_init(&mut inner.bus)
    }

    /// Turn the UART gate on or off and re-route whatever is plugged in.
    pub fn set_rustproof(&self, enabled: bool) -> Result<PassOutcome> {
        if !self.config.capabilities.rustproof {
            return Err(Error::RustproofUnsupported);
        }
        self.run(|muic, inner| {
            info!(
                "sm5703: rustproof {}",
                if enabled { "enabled" } else { "disabled" }
            );
            let mut requested = inner.state.clone();
            requested.rustproof_enabled = enabled;

            let snapshot = read_snapshot(&mut inner.bus)?;
            let mut classification = classify::classify(&snapshot, &requested, &muic.config);
            classification.next.rustproof_enabled = enabled;
            muic.apply(inner, classification)
        })
    }

    fn run<F>(&self, f: F) -> Result<PassOutcome>
    where
        F: FnOnce(&Self, &mut Inner<B>) -> Result<PassOutcome>,
    {
        let mut inner = self.inner.lock();
        inner.phase = Phase::Resolving;
        let res = f(self, &mut *inner);
        inner.phase = Phase::Idle;

        match &res {
            Ok(outcome) => debug!("sm5703: pass done: {:?}", outcome),
            Err(err) => error!("sm5703: pass aborted: {}", err),
        }
        res
    }

    fn resolve(&self, inner: &mut Inner<B>) -> Result<PassOutcome> {
        let snapshot = read_snapshot(&mut inner.bus)?;
        debug!(
            "sm5703: int1 {:?} int2 {:?} adc {} dev1 {:?} dev2 {:?} dev3 {:?} vbus {:?}",
            snapshot.int1,
            snapshot.int2,
            snapshot.adc,
            snapshot.dev_type1,
            snapshot.dev_type2,
            snapshot.dev_type3,
            snapshot.vbus
        );

        // Delivered ahead of the pass's own notifications.
        let mut early = Vec::new();
        if snapshot.int1.contains(Int1::OVP_ENABLE) {
            warn!("sm5703: overvoltage detected");
            early.push(Notification::Overvoltage(true));
        }
        if snapshot.int1.contains(Int1::OVP_DISABLE) {
            info!("sm5703: overvoltage cleared");
            early.push(Notification::Overvoltage(false));
        }

        let mut recovered = false;
        if snapshot.int1.contains(Int1::OVP_ENABLE)
            || (snapshot.int1.is_empty() && snapshot.int2.is_empty())
        {
            let control = inner.bus.read_reg(Register::Control)?;
            if control == CONTROL_STUCK {
                warn!("sm5703: control register stuck, reinitializing");
                reg_init(&mut inner.bus)?;
                recovered = true;
            }
        }

        let dispatch = event::decide(
            &snapshot,
            &inner.state,
            &self.config.capabilities,
            self.sink.test_mode(),
        );
        if let Some(on) = dispatch.vbus_power {
            early.push(Notification::VbusPower(on));
        }

        let mut classification = match dispatch.event {
            Event::Attach => classify::classify(&snapshot, &inner.state, &self.config),
            Event::Detach => classify::detach(&inner.state),
            Event::Arbitrate => classify::arbitrate(&snapshot, &inner.state, &self.config),
            Event::Ignore => {
                for notification in early {
                    notification.deliver(&self.sink);
                }
                return Ok(if recovered {
                    PassOutcome::Recovered
                } else {
                    PassOutcome::Ignored
                });
            }
        };
        let mut effects: Vec<Effect> = early.into_iter().map(Effect::Notify).collect();
        effects.append(&mut classification.effects);
        classification.effects = effects;
        self.apply(inner, classification)
    }

    /// Run the effects in order. State and notifications are only committed
    /// once every register access succeeded.
    fn apply(&self, inner: &mut Inner<B>, classification: Classification) -> Result<PassOutcome> {
        let Classification {
            outcome,
            effects,
            next,
        } = classification;

        let mut notifications = Vec::new();
        for effect in effects {
            match effect {
                Effect::Write { reg, value } => inner.bus.write_reg(reg, value)?,
                Effect::Update { reg, set, clear } => {
                    inner.bus.update_reg(reg, set, clear)?;
                }
                Effect::Delay(duration) => thread::sleep(duration),
                Effect::Notify(notification) => notifications.push(notification),
            }
        }

        if next.attached != inner.state.attached {
            info!("sm5703: {} -> {}", inner.state.attached, next.attached);
        }
        inner.state = next;

        for notification in notifications {
            notification.deliver(&self.sink);
        }
        Ok(outcome)
    }

    pub fn attached_device(&self) -> AttachedDevice {
        self.inner.lock().state.attached
    }

    /// Copy of the controller state, for diagnostics.
    pub fn state(&self) -> ControllerState {
        self.inner.lock().state.clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    pub fn rustproof_enabled(&self) -> bool {
        self.inner.lock().state.rustproof_enabled
    }

    pub fn uart_enabled(&self) -> bool {
        !self.rustproof_enabled()
    }

    pub fn jig_present(&self) -> bool {
        self.inner.lock().state.jig_present
    }

    pub fn dock_attached(&self) -> bool {
        let inner = self.inner.lock();
        inner.state.attached.is_dock() || inner.state.dock_state != DockState::None
    }

    pub fn adc(&self) -> Result<Adc> {
        let mut inner = self.inner.lock();
        Ok(Adc::from_register(inner.bus.read_reg(Register::Adc)?))
    }

    pub fn device_types(&self) -> Result<(DeviceType1, DeviceType2, DeviceType3)> {
        let mut inner = self.inner.lock();
        let dev1 = inner.bus.read_reg(Register::DeviceType1)?;
        let dev2 = inner.bus.read_reg(Register::DeviceType2)?;
        let dev3 = inner.bus.read_reg(Register::DeviceType3)?;
        Ok((
            DeviceType1::from_bits_truncate(dev1),
            DeviceType2::from_register(dev2),
            DeviceType3::from_bits_truncate(dev3),
        ))
    }

    pub fn control(&self) -> Result<Control> {
        let mut inner = self.inner.lock();
        Ok(Control::from_bits_truncate(
            inner.bus.read_reg(Register::Control)?,
        ))
    }

    pub fn vbus_status(&self) -> Result<VbusStatus> {
        let mut inner = self.inner.lock();
        Ok(VbusStatus::from_bits_truncate(
            inner.bus.read_reg(Register::VbusValid)?,
        ))
    }

    /// Whether a USB host or a USB jig is connected.
    pub fn usb_configured(&self) -> Result<bool> {
        let (dev1, dev2, _) = self.device_types()?;
        Ok(dev1.intersects(DeviceType1::USB_MASK) || dev2.intersects(DeviceType2::USB_MASK))
    }

    pub fn manual_switch(&self) -> Result<SwitchPath> {
        let mut inner = self.inner.lock();
        Ok(SwitchPath::from_register(
            inner.bus.read_reg(Register::ManualSw1)?,
        ))
    }

    /// Force a switch path. Refused unless the control register sits at its
    /// idle baseline.
    pub fn set_manual_switch(&self, mode: SwitchMode) -> Result<()> {
        let mut inner = self.inner.lock();
        let mut control = Control::from_bits_truncate(inner.bus.read_reg(Register::Control)?);
        if control - Control::MANUAL_SW != Control::IDLE {
            warn!("sm5703: manual switch refused, control {:?}", control);
            return Err(Error::SwitchRefused(control));
        }

        let path = mode.path();
        control.set(Control::MANUAL_SW, mode == SwitchMode::Auto);
        inner.bus.write_reg(Register::ManualSw1, path.bits())?;
        inner.bus.write_reg(Register::Control, control.bits())?;
        inner.state.mode_path = path;
        info!("sm5703: manual switch {}", path);
        Ok(())
    }

    /// Last snapshot an attach pass worked from.
    pub fn cached_snapshot(&self) -> RegisterSnapshot {
        self.inner.lock().state.cached_snapshot
    }
}
