use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::thread;

use anyhow::{Context, Result};
use log::{error, info};

use sm5703_muic::{Config, FileBus, LogSink, Muic};

fn load_config(path: &str) -> Result<Config> {
    let config_data = if fs::metadata(path)?.is_file() {
        fs::read_to_string(path)?
    } else {
        let mut config_data = String::new();
        for entry in fs::read_dir(path)? {
            let entry = entry.context("failed to read config directory")?;
            if let Ok(tmp) = fs::read_to_string(entry.path()) {
                config_data.push_str(&tmp);
                config_data.push('\n');
            }
        }
        config_data
    };
    Config::parse(&config_data).with_context(|| format!("failed to parse {}", path))
}

fn main() -> Result<()> {
    let mut args = pico_args::Arguments::from_env();
    let mut verbosity = 0u8;
    while args.contains(["-v", "--verbose"]) {
        verbosity = verbosity.saturating_add(1);
    }
    let config_path = args
        .free_from_str::<String>()
        .context("usage: sm5703d [-v] <config>")?;

    common::setup_logging(
        "usb",
        "muic",
        "sm5703d",
        common::output_level(verbosity),
        common::file_level(),
    );

    let config = load_config(&config_path)?;
    let bus_path = config
        .device
        .bus
        .clone()
        .context("no register file configured in [device] bus")?;
    let irq_path = config
        .device
        .irq
        .clone()
        .context("no IRQ configured in [device] irq")?;

    let bus = FileBus::open(&bus_path).with_context(|| format!("failed to open {}", bus_path))?;
    let mut irq_file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&irq_path)
        .with_context(|| format!("failed to open {}", irq_path))?;

    let init_delay = config.timing.init_delay();
    let muic = Muic::new(bus, LogSink, config).context("failed to bring up SM5703")?;
    info!("sm5703d: started on {}", bus_path);

    thread::sleep(init_delay);
    if let Err(err) = muic.start() {
        error!("sm5703d: initial detection failed: {}", err);
    }
    info!("sm5703d: {} attached", muic.attached_device());

    loop {
        let mut irq = [0; 8];
        let count = irq_file.read(&mut irq).context("failed to read IRQ")?;

        // Errors are already logged by the controller.
        let _ = muic.handle_interrupt();

        irq_file
            .write_all(&irq[..count])
            .context("failed to acknowledge IRQ")?;
    }
}
