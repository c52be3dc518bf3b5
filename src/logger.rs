use log::LevelFilter;

/// Initializes the global logger.
///
/// `level` is the default filter; `RUST_LOG` can still refine it per module.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .init();
}
