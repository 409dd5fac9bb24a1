//! BlockBeats Watch - print new BlockBeats news as it is published.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use blockbeats_watch::api::{Article, BlockBeatsClient, Feed, FeedFetcher, FetchError, FlashNews};
use blockbeats_watch::config::{ConfigError, ConfigLoader, FeedSource, WatchConfig};
use blockbeats_watch::display::Printer;
use blockbeats_watch::watch::{WatchError, Watcher};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    Flash,
    Articles,
}

impl From<SourceArg> for FeedSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Flash => FeedSource::Flash,
            SourceArg::Articles => FeedSource::Articles,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "blockbeats-watch",
    about = "Watch the BlockBeats news API for new items",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file to use instead of the default search paths.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll a feed and print new items as they appear.
    Watch {
        #[command(flatten)]
        feed: FeedArgs,
        /// Seconds between polls.
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Fetch one page and print it as JSON.
    Fetch {
        #[command(flatten)]
        feed: FeedArgs,
    },
}

#[derive(Args)]
struct FeedArgs {
    /// Feed to read (flash, articles).
    #[arg(short, long, value_enum)]
    source: Option<SourceArg>,
    /// Records per page.
    #[arg(long)]
    size: Option<u32>,
    /// Page number.
    #[arg(long)]
    page: Option<u32>,
    /// Content language (en, zh, ...).
    #[arg(long)]
    lang: Option<String>,
}

impl FeedArgs {
    fn apply(self, config: &mut WatchConfig) {
        if let Some(source) = self.source {
            config.source = source.into();
        }
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(page) = self.page {
            config.page = page;
        }
        if let Some(lang) = self.lang {
            config.lang = lang;
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Watch(#[from] WatchError),
    #[error("Failed to encode records: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Exit status after a second interrupt (128 + SIGINT).
const INTERRUPTED: i32 = 130;

/// Cancel `token` on the first interrupt, then wait for a second one.
///
/// Returns `true` once a second interrupt arrives, `false` if the signal
/// source fails.
async fn wait_for_interrupts<S, Fut>(mut interrupt: S, token: &CancellationToken) -> bool
where
    S: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if let Err(e) = interrupt().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        return false;
    }
    tracing::info!("Received Ctrl-C, stopping after the current cycle (press again to quit)");
    token.cancel();

    interrupt().await.is_ok()
}

/// Cancel `token` on Ctrl-C; exit immediately on a second Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if wait_for_interrupts(tokio::signal::ctrl_c, &token).await {
            tracing::warn!("Received second Ctrl-C, exiting");
            std::process::exit(INTERRUPTED);
        }
    });
}

async fn watch_feed<R: Feed>(config: &WatchConfig) -> Result<(), AppError> {
    let client = BlockBeatsClient::from_config(config)?;
    let fetcher = FeedFetcher::<R>::new(client, config.query());
    let printer = Printer::stdout();
    let colored = config.color && printer.is_colored();
    let printer = printer
        .colored(colored)
        .lenient(config.lenient_timestamps);

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let mut watcher = Watcher::new(fetcher, printer)
        .with_interval(config.interval())
        .with_cancellation(cancel);
    if let Some(capacity) = config.seen_capacity() {
        watcher = watcher.with_seen_capacity(capacity);
    }

    watcher.run().await?;

    let stats = watcher.stats();
    tracing::info!(
        cycles = stats.cycles,
        fetch_failures = stats.fetch_failures,
        delivered = stats.delivered,
        "Watch finished"
    );
    Ok(())
}

async fn fetch_feed<R: Feed>(config: &WatchConfig) -> Result<(), AppError> {
    let client = BlockBeatsClient::from_config(config)?;
    let records: Vec<R> = client.fetch(&config.query()).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

async fn run(command: Commands, mut config: WatchConfig) -> Result<(), AppError> {
    match command {
        Commands::Watch { feed, interval } => {
            feed.apply(&mut config);
            if let Some(interval) = interval {
                config.interval_secs = interval;
            }
            tracing::info!(
                source = ?config.source,
                interval_secs = config.interval_secs,
                lang = %config.lang,
                "Starting BlockBeats watch"
            );
            match config.source {
                FeedSource::Flash => watch_feed::<FlashNews>(&config).await,
                FeedSource::Articles => watch_feed::<Article>(&config).await,
            }
        }
        Commands::Fetch { feed } => {
            feed.apply(&mut config);
            match config.source {
                FeedSource::Flash => fetch_feed::<FlashNews>(&config).await,
                FeedSource::Articles => fetch_feed::<Article>(&config).await,
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loader = cli.config.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let result = match loader.load() {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "blockbeats-watch failed");
            ExitCode::FAILURE
        }
    }
}
