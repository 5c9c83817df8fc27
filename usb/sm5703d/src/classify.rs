//! Accessory classification.
//!
//! [`classify`] and [`detach`] never touch the bus. They return the register
//! writes and notifications a pass needs together with the state the
//! controller moves to once all of them went through.

use log::{debug, warn};

use crate::arbiter::{self, ArbiterStep};
use crate::config::{Capabilities, Config};
use crate::device::{AttachedDevice, JigKind};
use crate::effect::{self, Effect};
use crate::notify::Notification;
use crate::regs::{
    Adc, Control, DeviceType1, DeviceType2, DeviceType3, Register, SwitchPath,
};
use crate::rescan::{self, RescanStep};
use crate::rustproof;
use crate::snapshot::RegisterSnapshot;
use crate::state::{ControllerState, DockState};

/// What a pass ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    Attached(AttachedDevice),
    Detached(AttachedDevice),
    /// First half of the L cable rescan ran.
    RescanPending,
    /// The ADC code belongs to a class this board does not support.
    Unsupported(Adc),
    /// Nothing recognizable is plugged in yet.
    Unrecognized,
    /// The control register was stuck and the baseline got rewritten.
    Recovered,
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub outcome: PassOutcome,
    pub effects: Vec<Effect>,
    pub next: ControllerState,
}

impl Classification {
    pub fn unchanged(state: &ControllerState, outcome: PassOutcome) -> Self {
        Self {
            outcome,
            effects: Vec::new(),
            next: state.clone(),
        }
    }

    #[inline]
    pub fn device(&self) -> AttachedDevice {
        self.next.attached
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Notify(notification) => Some(notification),
            _ => None,
        })
    }
}

enum Verdict {
    Device(AttachedDevice),
    Dock(ArbiterStep),
    Rescan(Vec<Effect>),
    Nothing,
}

/// Fill in the device type bits the chip leaves empty for ADC-only
/// accessories.
pub fn normalize(snapshot: &RegisterSnapshot, caps: &Capabilities) -> RegisterSnapshot {
    let mut snapshot = *snapshot;
    if caps.lanhub && snapshot.adc == Adc::LANHUB {
        snapshot.dev_type2 = DeviceType2::LANHUB;
        snapshot.dev_type1 = DeviceType1::empty();
    }
    if caps.smart_dock && snapshot.adc == Adc::SMART_DOCK {
        snapshot.dev_type2 = DeviceType2::SMARTDOCK;
        snapshot.dev_type1 = DeviceType1::empty();
    }
    if caps.host_notify && (snapshot.adc == Adc::HMT || snapshot.adc == Adc::AUDIO_DOCK) {
        snapshot.dev_type2 = DeviceType2::AUDIO_DOCK;
        snapshot.dev_type1 = DeviceType1::empty();
    }
    snapshot
}

fn decide(s: &RegisterSnapshot, state: &ControllerState, config: &Config) -> Verdict {
    let caps = &config.capabilities;
    let vbus = s.vbus_valid();
    let (dev1, dev2, dev3) = (s.dev_type1, s.dev_type2, s.dev_type3);

    if dev1.contains(DeviceType1::USB)
        || dev2.intersects(DeviceType2::USB_MASK)
        || dev3.contains(DeviceType3::NON_STANDARD)
    {
        if !vbus {
            debug!("sm5703: USB connected without VBUS");
            return Verdict::Nothing;
        }
        return Verdict::Device(AttachedDevice::Usb);
    }

    if dev1.contains(DeviceType1::USB_CHG) {
        return Verdict::Device(AttachedDevice::Cdp);
    }

    if dev2.intersects(DeviceType2::UART_MASK) {
        let gated = caps.rustproof && state.rustproof_enabled;
        return Verdict::Device(rustproof::route_uart(gated, vbus));
    }

    if rescan::is_candidate(s) {
        return match rescan::step(s, state.rescan_pending, config.timing.rescan_pulse()) {
            RescanStep::Trigger(effects) => Verdict::Rescan(effects),
            RescanStep::Resolved(device) => Verdict::Device(device),
            RescanStep::Unresolved => Verdict::Nothing,
        };
    }

    if dev1.intersects(DeviceType1::CHARGER_MASK) || dev3.intersects(DeviceType3::CHARGER_MASK) {
        return Verdict::Device(AttachedDevice::Ac);
    }

    if caps.host_notify && dev1.contains(DeviceType1::USB_OTG) && s.adc == Adc::OTG {
        return Verdict::Dock(arbiter::attach_otg(state));
    }

    if let Some(kind) = JigKind::from_device_type(dev2 & DeviceType2::JIG_MASK, vbus) {
        return Verdict::Device(AttachedDevice::Jig(kind));
    }

    if caps.desk_dock && (dev2.contains(DeviceType2::AV) || dev3.contains(DeviceType3::AV_VBUS)) {
        return Verdict::Device(AttachedDevice::DeskDock { vbus });
    }

    if caps.smart_dock && dev2.contains(DeviceType2::SMARTDOCK) {
        return Verdict::Device(AttachedDevice::SmartDock { vbus });
    }
    if caps.host_notify && dev2.contains(DeviceType2::AUDIO_DOCK) {
        return Verdict::Device(AttachedDevice::AudioDock);
    }

    if caps.lanhub && dev2.contains(DeviceType2::LANHUB) {
        return Verdict::Dock(arbiter::reattach_lanhub(state));
    }

    if dev2.contains(DeviceType2::JIG_UART_ON) {
        let gated = caps.rustproof && state.rustproof_enabled;
        return Verdict::Device(AttachedDevice::CarDock { gated });
    }

    if caps.charging_cable && s.adc == Adc::CHARGING_CABLE {
        return Verdict::Device(AttachedDevice::ChargingCable);
    }
    if caps.incompatible_charger
        && vbus
        && (s.adc == Adc::VZW_INCOMPATIBLE || s.adc == Adc::VZW_DOCK)
    {
        return Verdict::Device(AttachedDevice::Incompatible);
    }

    if vbus {
        return Verdict::Device(AttachedDevice::Unknown);
    }

    Verdict::Nothing
}

fn attach_effects(device: AttachedDevice, effects: &mut Vec<Effect>) {
    match device {
        // Arbitrated devices come with their own effects.
        AttachedDevice::None | AttachedDevice::Otg | AttachedDevice::Lanhub => return,
        AttachedDevice::UartOff | AttachedDevice::UartOffWithVbus => {
            effect::switch_path(effects, SwitchPath::UART)
        }
        AttachedDevice::UartBlocked { .. } | AttachedDevice::CarDock { gated: true } => {
            rustproof::engage(effects)
        }
        AttachedDevice::Ac => {
            // Keep D+/D- off a fast charger's handshake.
            effect::switch_path(effects, SwitchPath::ALL_OPEN_WITHOUT_VBUS);
            effect::manual_switching(effects);
        }
        AttachedDevice::DeskDock { .. } | AttachedDevice::SmartDock { .. } => {
            effect::switch_path(effects, SwitchPath::AUDIO);
            effect::manual_switching(effects);
        }
        AttachedDevice::AudioDock => {
            effect::switch_path(effects, SwitchPath::DHOST);
            effect::manual_switching(effects);
        }
        _ => {}
    }
    if let Some(kind) = device.cable_kind() {
        effects.push(Effect::notify(kind, true));
    }
}

/// Undo whatever `state.attached` set up and leave the switch in its detached
/// baseline.
fn release(state: &ControllerState, next: &mut ControllerState, effects: &mut Vec<Effect>) {
    let device = state.attached;
    match device {
        AttachedDevice::None => {}
        AttachedDevice::Otg | AttachedDevice::Lanhub => {
            let step = arbiter::detach(state);
            step.apply(next);
            effects.extend(step.effects);
        }
        AttachedDevice::UartBlocked { .. } | AttachedDevice::CarDock { gated: true } => {
            rustproof::release(effects)
        }
        AttachedDevice::Ac => {
            effect::switch_path(effects, SwitchPath::ALL_OPEN);
            effect::automatic_switching(effects);
        }
        AttachedDevice::DeskDock { .. }
        | AttachedDevice::SmartDock { .. }
        | AttachedDevice::AudioDock => effects.push(Effect::set(
            Register::Control,
            (Control::MANUAL_SW | Control::RAW_DATA).bits(),
        )),
        _ => {}
    }
    if !device.is_arbitrated() {
        if let Some(kind) = device.cable_kind() {
            effects.push(Effect::notify(kind, false));
        }
    }
    effect::finalize_detach(effects);

    next.attached = AttachedDevice::None;
    next.undefined_attached = false;
}

/// Attach pass over a fresh snapshot.
pub fn classify(
    snapshot: &RegisterSnapshot,
    state: &ControllerState,
    config: &Config,
) -> Classification {
    let caps = &config.capabilities;
    if !caps.supports(snapshot.adc) {
        warn!("sm5703: unsupported accessory, ADC {}", snapshot.adc);
        return Classification::unchanged(state, PassOutcome::Unsupported(snapshot.adc));
    }

    let snapshot = normalize(snapshot, caps);
    let mut next = state.clone();
    let mut effects = Vec::new();

    let outcome = match decide(&snapshot, state, config) {
        Verdict::Rescan(rescan) => {
            next.rescan_pending = true;
            return Classification {
                outcome: PassOutcome::RescanPending,
                effects: rescan,
                next,
            };
        }
        Verdict::Nothing => PassOutcome::Unrecognized,
        Verdict::Device(device) => {
            if device == state.attached {
                // Same accessory, refresh its path without a second notification.
                attach_effects(device, &mut effects);
                effects.retain(|effect| !effect.is_notification());
            } else {
                if !state.attached.is_none() {
                    release(state, &mut next, &mut effects);
                }
                attach_effects(device, &mut effects);
                next.attached = device;
            }
            next.undefined_attached = device == AttachedDevice::Unknown;
            PassOutcome::Attached(device)
        }
        Verdict::Dock(step) => {
            if !state.attached.is_none() && !state.attached.is_arbitrated() {
                release(state, &mut next, &mut effects);
            }
            step.apply(&mut next);
            effects.extend(step.effects);
            next.undefined_attached = false;
            PassOutcome::Attached(next.attached)
        }
    };

    next.cached_snapshot = snapshot;
    next.rescan_pending = false;
    next.jig_present = snapshot.dev_type2.intersects(DeviceType2::JIG_ALL_MASK);
    if let Some(path) = effect::last_switch_path(&effects) {
        next.mode_path = path;
    }

    Classification {
        outcome,
        effects,
        next,
    }
}

/// Detach pass. Decided from the controller state alone, the chip may already
/// read back as empty.
pub fn detach(state: &ControllerState) -> Classification {
    let mut next = state.clone();
    let mut effects = Vec::new();
    release(state, &mut next, &mut effects);

    next.cached_snapshot = RegisterSnapshot::rest();
    next.rescan_pending = false;
    next.jig_present = false;
    if let Some(path) = effect::last_switch_path(&effects) {
        next.mode_path = path;
    }

    Classification {
        outcome: PassOutcome::Detached(state.attached),
        effects,
        next,
    }
}

/// Raw ADC change routed straight to the dock arbiter.
pub fn arbitrate(
    snapshot: &RegisterSnapshot,
    state: &ControllerState,
    config: &Config,
) -> Classification {
    let snapshot = normalize(snapshot, &config.capabilities);
    let step = match arbiter::on_adc(snapshot.adc, state) {
        Some(step) => step,
        None => {
            debug!("sm5703: ADC {} is not a dock code", snapshot.adc);
            return Classification::unchanged(state, PassOutcome::Ignored);
        }
    };

    let outcome = if snapshot.adc != Adc::OPEN {
        PassOutcome::Attached(step.attached)
    } else if state.dock_state == DockState::None {
        PassOutcome::Ignored
    } else {
        PassOutcome::Detached(state.attached)
    };

    let mut next = state.clone();
    step.apply(&mut next);
    next.cached_snapshot = snapshot;
    if next.attached.is_none() {
        next.undefined_attached = false;
    }
    if let Some(path) = effect::last_switch_path(&step.effects) {
        next.mode_path = path;
    }

    Classification {
        outcome,
        effects: step.effects,
        next,
    }
}
