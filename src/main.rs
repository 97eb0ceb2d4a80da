use clap::Parser;
use lume::core::config::{self, CliOverrides};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "lume", about = "Terminal chat client for a single-endpoint text generator")]
struct Args {
    /// Generation endpoint URL (overrides config file and LUME_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("lume: {e}");
            return Err(std::io::Error::other(e));
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            endpoint: args.endpoint,
            log_level: args.log_level,
        },
    );

    // File logger; the terminal belongs to the TUI.
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!("Lume starting up with endpoint: {}", resolved.endpoint);

    lume::tui::run(resolved)
}
