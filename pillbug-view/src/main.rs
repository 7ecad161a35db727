use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use log::info;
use pillbug_client::{load_feed, load_thread, resolve_linked, MastodonClient, StatusSource};
use pillbug_feed::FeedPreset;
use pillbug_ref::StatusId;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    render::{feed_entries, render_feed, render_thread},
};

mod config;
mod render;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to configuration file.
    #[arg(long, default_value = ".pillbug.yml")]
    config: PathBuf,

    /// Access token, overrides the one in the configuration file.
    #[arg(long, env = "PILLBUG_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the conversation a status belongs to.
    Thread { id: StatusId },
    /// Show the home timeline filtered through the feed rules.
    Feed {
        /// Rule preset to use instead of the configured one.
        #[arg(long)]
        preset: Option<FeedPreset>,

        /// Also show posts the rules hide.
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Args {
        config,
        token,
        json,
        command,
    } = Args::parse();

    let mut cfg = match Config::load(&config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if token.is_some() {
        cfg.token = token;
    }

    info!("Using instance {}", cfg.instance);
    let client: Box<dyn StatusSource> = Box::new(MastodonClient::new(cfg.instance, cfg.token));

    let output = match command {
        Command::Thread { id } => {
            let tree = match load_thread(&client, &id).await {
                Ok(tree) => tree,
                Err(e) => {
                    eprintln!("Failed to load thread: {e}");
                    return ExitCode::FAILURE;
                }
            };

            if json {
                serde_json::to_string_pretty(&tree)
            } else {
                Ok(render_thread(&tree))
            }
        }
        Command::Feed { preset, all } => {
            let mut feed_config = cfg.feed;
            if preset.is_some() {
                feed_config.preset = preset;
            }

            let feed = match load_feed(&client, &feed_config).await {
                Ok(feed) => feed,
                Err(e) => {
                    eprintln!("Failed to load feed: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let annotated = match feed.annotate() {
                Ok(annotated) => annotated,
                Err(e) => {
                    eprintln!("Failed to apply feed rules: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let linked = resolve_linked(&client, &annotated).await;
            let entries = feed_entries(&annotated, &linked);

            if json {
                serde_json::to_string_pretty(&entries)
            } else {
                Ok(render_feed(&entries, all))
            }
        }
    };

    match output {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {e}");
            ExitCode::FAILURE
        }
    }
}
