use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use orca_cli::{run, Output, Session};
use orca_client::{ApiSettings, ReqwestApi};
use orca_core::PollSettings;
use orca_logging::{orca_info, LogDestination};
use tokio::io::BufReader;

#[derive(Parser)]
#[command(
    name = "orca",
    version,
    about = "Terminal client that mirrors ORCA search jobs and lets you create or delete them",
    long_about = None
)]
struct Cli {
    /// Base URL of the ORCA service
    #[arg(long, env = "ORCA_API_URL")]
    api_url: String,

    /// Poll interval after a change, in milliseconds
    #[arg(long, default_value_t = 2_000)]
    min_interval_ms: u64,

    /// Upper bound for the backed-off poll interval, in milliseconds
    #[arg(long, default_value_t = 64_000)]
    max_interval_ms: u64,

    /// Where log output goes
    #[arg(long, value_enum, default_value = "file")]
    log: LogArg,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogArg {
    File,
    Terminal,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::File => LogDestination::File,
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::Both => LogDestination::Both,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    orca_logging::initialize(cli.log.into(), level);

    let poll = PollSettings::new(
        Duration::from_millis(cli.min_interval_ms),
        Duration::from_millis(cli.max_interval_ms),
    )
    .context("invalid poll intervals")?;
    let api_settings = ApiSettings::new(&cli.api_url).context("invalid --api-url")?;
    orca_info!(
        "Starting against {} (poll {:?}..{:?})",
        api_settings.base_url,
        poll.min_interval(),
        poll.max_interval()
    );
    let api = ReqwestApi::new(api_settings).context("building HTTP client")?;

    let out: Output = Arc::new(Mutex::new(io::stdout()));
    let session = Session::new(Arc::new(api), poll, out);
    run(session, BufReader::new(tokio::io::stdin())).await
}
