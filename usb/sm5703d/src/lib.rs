//! Accessory detection for the SM5703 micro-USB interface controller.
//!
//! The chip reports what is plugged into the micro-USB port through a handful
//! of status registers. [`Muic`] reads them on every interrupt, classifies the
//! accessory and tells a [`NotificationSink`] about attach and detach
//! transitions.

#[macro_use]
extern crate bitflags;

pub mod arbiter;
pub mod bus;
pub mod classify;
pub mod config;
pub mod device;
pub mod effect;
pub mod error;
pub mod event;
pub mod muic;
pub mod notify;
pub mod regs;
pub mod rescan;
pub mod rustproof;
pub mod snapshot;
pub mod state;

pub use crate::bus::{FileBus, RegisterAccess, RegisterBus};
pub use crate::classify::{classify, detach, PassOutcome};
pub use crate::config::{Capabilities, Config, Timing};
pub use crate::device::{AttachedDevice, CableKind, ComboRole, JigKind};
pub use crate::error::{Error, Result};
pub use crate::muic::{reg_init, Muic, Phase};
pub use crate::notify::{LogSink, Notification, NotificationSink};
pub use crate::snapshot::{read_snapshot, RegisterSnapshot};
pub use crate::state::{ControllerState, DockState};
