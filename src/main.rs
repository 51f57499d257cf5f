use anyhow::Result;
use clap::Parser;
use dayring::{
    app::{args::AppArgs, start_app},
    utils::{
        dir::create_application_default_path, logging::enable_logging,
        runtime::single_thread_runtime,
    },
};
use tracing::error;

fn main() -> Result<()> {
    let args = AppArgs::parse();

    let app_dir = args.dir.map_or_else(create_application_default_path, Ok)?;
    enable_logging(&app_dir, args.log, args.log_console)?;

    single_thread_runtime()?.block_on(async move {
        start_app(app_dir, args.console).await.inspect_err(|e| {
            error!("Error running dayring {e:?}");
        })
    })
}
