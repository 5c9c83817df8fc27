//! Helpers shared by the daemons in this tree.

mod logger;

pub use logger::{file_level, output_level, setup_logging};
