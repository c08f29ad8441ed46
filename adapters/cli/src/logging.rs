use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the global logger.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects debug output and
/// the default shows info and above.
pub(crate) fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    // Only fails when a logger is already installed.
    let _ = builder.try_init();
}
