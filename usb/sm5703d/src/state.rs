use crate::device::AttachedDevice;
use crate::regs::SwitchPath;
use crate::snapshot::RegisterSnapshot;

/// Position of the OTG/lanhub arbiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DockState {
    None,
    OtgOnly,
    LanhubOnly,
    /// The lanhub bit reappeared while a lanhub with a charger was already
    /// active. Behaves like `LanhubOnly`.
    LanhubPlusCharger,
}

impl DockState {
    #[inline]
    pub fn is_lanhub(self) -> bool {
        matches!(self, DockState::LanhubOnly | DockState::LanhubPlusCharger)
    }
}

/// Mutable controller state, only ever changed under the controller lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerState {
    pub attached: AttachedDevice,
    pub cached_snapshot: RegisterSnapshot,
    pub mode_path: SwitchPath,
    pub rustproof_enabled: bool,
    pub undefined_attached: bool,
    pub dock_state: DockState,
    pub lanhub_combo_active: bool,
    pub rescan_pending: bool,
    pub jig_present: bool,
}

impl ControllerState {
    pub fn new() -> Self {
        Self {
            attached: AttachedDevice::None,
            cached_snapshot: RegisterSnapshot::rest(),
            mode_path: SwitchPath::AUTO,
            rustproof_enabled: false,
            undefined_attached: false,
            dock_state: DockState::None,
            lanhub_combo_active: false,
            rescan_pending: false,
            jig_present: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}
