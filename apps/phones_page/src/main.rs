use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use page_core::{HttpFetcher, PageEvent, PhonesPage, StaticLocation};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod console;
mod report;
mod settings;

use commands::{dispatch_command, parse_command, ConsoleCommand, HELP};
use console::{Console, Screen};
use settings::load_settings;

#[derive(Parser, Debug)]
#[command(about = "Browse the phone catalogue from a terminal")]
struct Args {
    /// Server hosting /data/phones.
    #[arg(long)]
    base_url: Option<String>,
    /// Initial location fragment, e.g. "#/phones/nexus-s".
    #[arg(long)]
    fragment: Option<String>,
    #[arg(long, default_value = "phones_page.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(fragment) = args.fragment {
        settings.fragment = Some(fragment);
    }
    info!(base_url = %settings.base_url, fragment = ?settings.fragment, "starting page");

    let screen = Screen::stdout();
    let console = Console::new(screen.clone());
    let fetcher = Arc::new(HttpFetcher::new(settings.base_url.clone()));
    let location = StaticLocation::new(settings.fragment.clone());
    let (page, events) = PhonesPage::mount(console.components(), fetcher, &location);
    let reporter = tokio::spawn(report_events(events, screen.clone()));

    screen.line(HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                screen.line(format!("{message}; {HELP}"));
                continue;
            }
        };
        match &command {
            ConsoleCommand::Help => screen.line(HELP),
            ConsoleCommand::Cart => {
                let items = console.cart.items();
                screen.line(format!("cart: {} item(s)", items.len()));
                for item in items {
                    screen.line(format!("  {}", item.0));
                }
            }
            _ => {}
        }
        match dispatch_command(&console, command) {
            Ok(true) => {}
            Ok(false) => break,
            Err(message) => screen.line(message),
        }
    }

    drop(page);
    reporter.abort();
    Ok(())
}

async fn report_events(mut events: broadcast::Receiver<PageEvent>, screen: Arc<Screen>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(line) = report::describe_event(&event) {
                    screen.line(line);
                }
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "page events dropped"),
            Err(RecvError::Closed) => break,
        }
    }
}
