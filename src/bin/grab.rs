use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use grab_dl::AppConfig;

/// Logs go to a file only; the terminal belongs to the UI.
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::options().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = AppConfig::load();
    if let Some(path) = &config.log_file
        && let Err(e) = init_logging(path)
    {
        eprintln!("Warning: cannot open log file {}: {e}", path.display());
    }

    match grab_dl::tui::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
