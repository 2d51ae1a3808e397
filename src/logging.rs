//! Console logging for the CLI.

use log::LevelFilter;

/// Install the global logger.
///
/// `RUST_LOG` wins when set. Otherwise only labelscope's own records are
/// shown: warnings by default, `-v` for info and `-vv` for debug.
pub fn init(verbosity: u8) {
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_env("RUST_LOG");
    } else {
        let level = match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        };
        builder
            .filter_level(LevelFilter::Off)
            .filter_module("labelscope", level);
    }

    builder.format_timestamp(None).format_target(false);

    // A logger may already be installed when running under a test harness.
    let _ = builder.try_init();
}
