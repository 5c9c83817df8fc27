use log::LevelFilter;
use redox_log::{OutputBuilder, RedoxLogger};

/// Stderr level for a daemon started with `verbosity` `-v` flags.
pub fn output_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn file_level() -> LevelFilter {
    LevelFilter::Debug
}

/// Configures logging for a single daemon.
///
/// Always logs to stderr. On Redox the plain and ANSI log files are created
/// under `category/subcategory` of the logging scheme.
#[cfg_attr(not(target_os = "redox"), allow(unused_variables, unused_mut))]
pub fn setup_logging(
    category: &str,
    subcategory: &str,
    logfile_base: &str,
    output_level: LevelFilter,
    file_level: LevelFilter,
) {
    let mut logger = RedoxLogger::new().with_output(
        OutputBuilder::stderr()
            .with_filter(output_level)
            .with_ansi_escape_codes()
            .flush_on_newline(true)
            .build(),
    );

    #[cfg(target_os = "redox")]
    for (name, ansi) in [
        (format!("{logfile_base}.log"), false),
        (format!("{logfile_base}.ansi.log"), true),
    ] {
        match OutputBuilder::in_redox_logging_scheme(category, subcategory, name.clone()) {
            Ok(builder) => {
                let builder = builder.with_filter(file_level).flush_on_newline(true);
                let builder = if ansi {
                    builder.with_ansi_escape_codes()
                } else {
                    builder
                };
                logger = logger.with_output(builder.build());
            }
            Err(error) => eprintln!("{logfile_base}: failed to create {name}: {error}"),
        }
    }

    if logger.enable().is_err() {
        eprintln!("{logfile_base}: a logger is already installed");
    }
}
