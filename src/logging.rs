use env_logger::{Builder, Env};
use log::LevelFilter;

/// Sets up `env_logger` once for the process.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level
/// (0 = info, 1 = debug, 2+ = trace). Returns `false` if a logger was
/// already installed.
pub fn init(verbosity: u8) -> bool {
    let default_level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::from_env(Env::default().default_filter_or(default_level.to_string()))
        .format_timestamp_millis()
        .format_module_path(true)
        .try_init()
        .is_ok()
}
