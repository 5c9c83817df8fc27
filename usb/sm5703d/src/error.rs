use std::io;

use thiserror::Error;

use crate::regs::{Control, Register};

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access register {reg:?}: {source}")]
    Io {
        reg: Register,
        #[source]
        source: io::Error,
    },
    #[error("rustproof gating is not supported on this board")]
    RustproofUnsupported,
    #[error("manual switch refused, control register reads {0:?}")]
    SwitchRefused(Control),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
