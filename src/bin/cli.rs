//! stockwatch CLI
//!
//! Local entry point. Notifications go to stdout through `ConsoleNotifier`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use stockwatch::{
    bot::ChatBot,
    error::Result,
    models::{Config, Status, UserId},
    pipeline::{Scheduler, run_recheck},
    services::{AvailabilityChecker, Classifier, ConsoleNotifier, HttpFetcher, Monitor},
    storage::SubscriptionStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

/// stockwatch - product availability watcher
#[derive(Parser, Debug)]
#[command(
    name = "stockwatch",
    version,
    about = "Watches product pages and reports when they come back in stock"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a page once without saving it
    Check {
        url: String,
        /// Only look inside elements matching this CSS selector
        #[arg(long)]
        css: Option<String>,
    },

    /// Check a page and add it to a user's watch list
    Watch {
        #[arg(long)]
        user: UserId,
        url: String,
        #[arg(long)]
        css: Option<String>,
    },

    /// Show a user's watch list
    List {
        #[arg(long)]
        user: UserId,
    },

    /// Remove a URL from a user's watch list
    Unwatch {
        #[arg(long)]
        user: UserId,
        url: String,
    },

    /// Re-check every subscription once
    Recheck,

    /// Re-check on the configured interval until Ctrl-C
    Run,

    /// Read chat messages from stdin as the given user
    Chat {
        #[arg(long)]
        user: UserId,
    },

    /// Validate the configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Flip the shutdown flag on Ctrl-C.
fn spawn_ctrl_c(tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Ctrl-C received, shutting down...");
            let _ = tx.send(true);
        }
    });
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Available => "✅ AVAILABLE",
        Status::OutOfStock => "❌ OUT_OF_STOCK",
        Status::Unknown => "❔ UNKNOWN",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();

    if let Command::Validate = cli.command {
        log::info!("Validating configuration...");
        if let Err(e) = config.validate() {
            log::error!("Config validation failed: {}", e);
            return Err(e);
        }
        log::info!("✓ Config OK");
        return Ok(());
    }
    config.validate()?;

    let fetcher = HttpFetcher::new(&config.fetcher)?;
    let checker = Arc::new(AvailabilityChecker::new(
        fetcher,
        Classifier::new(&config.keywords),
    ));
    let store = Arc::new(SubscriptionStore::new(&config.storage.subscriptions_path));
    let monitor = Arc::new(Monitor::new(Arc::clone(&checker), Arc::clone(&store)));

    log::debug!(
        "Subscriptions stored at {}",
        config.storage.subscriptions_path.display()
    );

    match cli.command {
        Command::Check { url, css } => {
            let result = monitor.handle_check_request(&url, css.as_deref()).await;
            if let Some(title) = &result.title {
                println!("{title}");
            }
            println!("{}", status_label(result.status));
            println!("Reason: {}", result.reason);
            println!("URL: {}", result.url.as_deref().unwrap_or(&url));
        }

        Command::Watch { user, url, css } => {
            let outcome = monitor
                .handle_watch_request(user, &url, css.as_deref())
                .await?;
            println!("{}", status_label(outcome.result.status));
            println!("Reason: {}", outcome.result.reason);
            println!("Subscription: {:?}", outcome.disposition);
        }

        Command::List { user } => {
            let entries = monitor.handle_list_request(user).await?;
            println!("{}", stockwatch::bot::replies::watchlist(&entries));
        }

        Command::Unwatch { user, url } => {
            if monitor.handle_unwatch_request(user, &url).await? {
                println!("Removed {url}");
            } else {
                println!("{url} was not watched");
            }
        }

        Command::Recheck => {
            let summary = run_recheck(&checker, &store, &ConsoleNotifier, None).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Run => {
            let (tx, rx) = watch::channel(false);
            spawn_ctrl_c(tx);

            let scheduler = Scheduler::new(
                checker,
                store,
                Arc::new(ConsoleNotifier),
                config.scheduler.clone(),
            );
            scheduler.run(rx).await;
        }

        Command::Chat { user } => {
            let (tx, rx) = watch::channel(false);
            let scheduler = Arc::new(Scheduler::new(
                checker,
                store,
                Arc::new(ConsoleNotifier),
                config.scheduler.clone(),
            ));
            let background = tokio::spawn({
                let scheduler = Arc::clone(&scheduler);
                async move { scheduler.run(rx).await }
            });

            let bot = ChatBot::new(monitor);
            log::info!("Chatting as user {}. Send /help for commands, Ctrl-D to quit.", user);

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                if line.trim().is_empty() {
                    continue;
                }
                for reply in bot.handle(user, &line).await {
                    println!("{reply}\n");
                }
            }

            let _ = tx.send(true);
            if let Err(e) = background.await {
                log::error!("Scheduler task failed: {}", e);
            }
        }

        Command::Validate => {}
    }

    Ok(())
}
