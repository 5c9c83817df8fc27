//! OTG and lanhub arbitration.
//!
//! A lanhub with a charger plugged into it shows up as two separate ADC
//! changes, so the arbiter remembers which half is already active. Raw data
//! reporting stays on while any dock session is open, otherwise the chip stops
//! reporting the lanhub ADC codes.

use log::debug;

use crate::device::{AttachedDevice, CableKind, ComboRole};
use crate::effect::{self, Effect};
use crate::regs::Adc;
use crate::state::{ControllerState, DockState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArbiterStep {
    pub effects: Vec<Effect>,
    pub dock_state: DockState,
    pub combo: bool,
    pub attached: AttachedDevice,
}

impl ArbiterStep {
    pub fn apply(&self, next: &mut ControllerState) {
        next.dock_state = self.dock_state;
        next.lanhub_combo_active = self.combo;
        next.attached = self.attached;
    }
}

/// Raw ADC change while a dock session may be active. `None` for codes the
/// arbiter does not handle.
pub fn on_adc(adc: Adc, state: &ControllerState) -> Option<ArbiterStep> {
    match adc {
        Adc::OTG => Some(attach_otg(state)),
        Adc::LANHUB => Some(attach_lanhub(state)),
        Adc::OPEN => Some(release(state)),
        _ => None,
    }
}

pub fn attach_otg(state: &ControllerState) -> ArbiterStep {
    let mut effects = Vec::new();
    if state.dock_state == DockState::None {
        effect::raw_data(&mut effects, true);
    }
    effect::host_path(&mut effects, true);
    match state.dock_state {
        DockState::None => effects.push(Effect::notify(CableKind::Otg, true)),
        // The charger left the lanhub, the host session stays up.
        DockState::LanhubOnly | DockState::LanhubPlusCharger => effects.push(
            Effect::notify_combo(CableKind::Lanhub, false, ComboRole::LanhubCharger),
        ),
        DockState::OtgOnly => {}
    }
    effect::mask_vbus_change(&mut effects, false);

    ArbiterStep {
        effects,
        dock_state: DockState::OtgOnly,
        combo: false,
        attached: AttachedDevice::Otg,
    }
}

pub fn attach_lanhub(state: &ControllerState) -> ArbiterStep {
    let mut effects = Vec::new();
    match state.dock_state {
        DockState::None => {
            effect::raw_data(&mut effects, true);
            effect::host_path(&mut effects, true);
            effects.push(Effect::notify_combo(
                CableKind::Lanhub,
                true,
                ComboRole::Lanhub,
            ));
        }
        DockState::OtgOnly => effects.push(Effect::notify_combo(
            CableKind::Lanhub,
            true,
            ComboRole::LanhubCharger,
        )),
        DockState::LanhubOnly | DockState::LanhubPlusCharger => {}
    }
    effect::mask_vbus_change(&mut effects, true);

    let dock_state = match state.dock_state {
        DockState::LanhubPlusCharger => DockState::LanhubPlusCharger,
        _ => DockState::LanhubOnly,
    };
    ArbiterStep {
        effects,
        dock_state,
        combo: true,
        attached: AttachedDevice::Lanhub,
    }
}

/// Lanhub bit reported by a regular attach pass.
pub fn reattach_lanhub(state: &ControllerState) -> ArbiterStep {
    if state.dock_state.is_lanhub() && state.lanhub_combo_active {
        debug!("sm5703: lanhub already active, charger joined");
        return ArbiterStep {
            effects: Vec::new(),
            dock_state: DockState::LanhubPlusCharger,
            combo: true,
            attached: AttachedDevice::Lanhub,
        };
    }
    attach_lanhub(state)
}

/// ADC went open, tear down whatever dock session is active.
pub fn release(state: &ControllerState) -> ArbiterStep {
    let mut effects = Vec::new();
    if state.lanhub_combo_active {
        if state.dock_state.is_lanhub() {
            effects.push(Effect::notify_combo(
                CableKind::Lanhub,
                false,
                ComboRole::Lanhub,
            ));
        }
        effect::raw_data(&mut effects, false);
        effect::mask_vbus_change(&mut effects, false);
        effects.push(Effect::notify(CableKind::Otg, false));
        effect::host_path(&mut effects, false);
    } else if state.dock_state == DockState::OtgOnly {
        effect::raw_data(&mut effects, false);
        effects.push(Effect::notify(CableKind::Otg, false));
        effect::host_path(&mut effects, false);
    } else {
        effect::mask_vbus_change(&mut effects, false);
    }

    let attached = if state.attached.is_arbitrated() {
        AttachedDevice::None
    } else {
        state.attached
    };
    ArbiterStep {
        effects,
        dock_state: DockState::None,
        combo: false,
        attached,
    }
}

/// Detach interrupt during a dock session. Unlike an open ADC, this only
/// reports the half that is actually active.
pub fn detach(state: &ControllerState) -> ArbiterStep {
    let mut effects = Vec::new();
    effect::raw_data(&mut effects, false);
    effect::mask_vbus_change(&mut effects, false);
    if state.lanhub_combo_active {
        effects.push(Effect::notify_combo(
            CableKind::Lanhub,
            false,
            ComboRole::Lanhub,
        ));
    } else {
        effects.push(Effect::notify(CableKind::Otg, false));
    }
    effect::host_path(&mut effects, false);

    ArbiterStep {
        effects,
        dock_state: DockState::None,
        combo: false,
        attached: AttachedDevice::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notification;

    fn notifications(step: &ArbiterStep) -> Vec<Notification> {
        step.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Notify(notification) => Some(*notification),
                _ => None,
            })
            .collect()
    }

    fn run(adc: Adc, state: &mut ControllerState) -> Vec<Notification> {
        let step = on_adc(adc, state).unwrap();
        step.apply(state);
        notifications(&step)
    }

    #[test]
    fn otg_lanhub_open_sequence() {
        let mut state = ControllerState::new();

        assert_eq!(
            run(Adc::OTG, &mut state),
            vec![Notification::Cable {
                kind: CableKind::Otg,
                attached: true
            }]
        );
        assert_eq!(state.dock_state, DockState::OtgOnly);
        assert!(!state.lanhub_combo_active);

        assert_eq!(
            run(Adc::LANHUB, &mut state),
            vec![Notification::Combo {
                kind: CableKind::Lanhub,
                attached: true,
                role: ComboRole::LanhubCharger
            }]
        );
        assert_eq!(state.dock_state, DockState::LanhubOnly);
        assert!(state.lanhub_combo_active);

        assert_eq!(
            run(Adc::OPEN, &mut state),
            vec![
                Notification::Combo {
                    kind: CableKind::Lanhub,
                    attached: false,
                    role: ComboRole::Lanhub
                },
                Notification::Cable {
                    kind: CableKind::Otg,
                    attached: false
                },
            ]
        );
        assert_eq!(state.dock_state, DockState::None);
        assert!(!state.lanhub_combo_active);
        assert_eq!(state.attached, AttachedDevice::None);
    }

    #[test]
    fn otg_after_lanhub_keeps_host_session() {
        let mut state = ControllerState::new();
        run(Adc::LANHUB, &mut state);
        assert_eq!(
            run(Adc::OTG, &mut state),
            vec![Notification::Combo {
                kind: CableKind::Lanhub,
                attached: false,
                role: ComboRole::LanhubCharger
            }]
        );
        assert_eq!(state.dock_state, DockState::OtgOnly);
        assert!(!state.lanhub_combo_active);
        assert_eq!(state.attached, AttachedDevice::Otg);
    }

    #[test]
    fn raw_data_follows_dock_state() {
        let state = ControllerState::new();
        let step = attach_lanhub(&state);
        assert_eq!(
            step.effects[0],
            Effect::clear(crate::regs::Register::Control, 0x08)
        );

        let mut state = ControllerState::new();
        step.apply(&mut state);
        let step = release(&state);
        assert!(step
            .effects
            .contains(&Effect::set(crate::regs::Register::Control, 0x08)));
    }

    #[test]
    fn open_without_session_only_unmasks() {
        let state = ControllerState::new();
        let step = release(&state);
        assert!(notifications(&step).is_empty());
        assert_eq!(step.attached, AttachedDevice::None);
    }

    #[test]
    fn lanhub_reattach_with_combo_is_skipped() {
        let mut state = ControllerState::new();
        run(Adc::OTG, &mut state);
        run(Adc::LANHUB, &mut state);
        let step = reattach_lanhub(&state);
        assert!(step.effects.is_empty());
        assert_eq!(step.dock_state, DockState::LanhubPlusCharger);
    }

    #[test]
    fn detach_reports_only_the_active_half() {
        let mut state = ControllerState::new();
        run(Adc::OTG, &mut state);
        assert_eq!(
            notifications(&detach(&state)),
            vec![Notification::Cable {
                kind: CableKind::Otg,
                attached: false
            }]
        );

        run(Adc::LANHUB, &mut state);
        let step = detach(&state);
        assert_eq!(
            notifications(&step),
            vec![Notification::Combo {
                kind: CableKind::Lanhub,
                attached: false,
                role: ComboRole::Lanhub
            }]
        );
        assert!(step
            .effects
            .contains(&Effect::set(crate::regs::Register::Control, 0x08)));
        assert_eq!(step.dock_state, DockState::None);
        assert!(!step.combo);
    }

    #[test]
    fn other_codes_are_not_arbitrated() {
        assert_eq!(on_adc(Adc::UART, &ControllerState::new()), None);
    }
}
