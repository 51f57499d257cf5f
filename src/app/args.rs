use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

/// Process flags only. The app is driven from the status bar; there is
/// deliberately no command surface.
#[derive(Parser)]
#[command(name = "Dayring", version)]
#[command(about = "Menu bar indicator of elapsed workday progress", long_about = None)]
pub struct AppArgs {
    #[arg(
        long,
        help = "Application directory. By default ~/Library/Application Support/dayring, or the XDG state directory elsewhere"
    )]
    pub dir: Option<PathBuf>,
    #[arg(
        long,
        help = "Render the indicator to the terminal instead of the status bar"
    )]
    pub console: bool,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
}
