pub mod render;

use std::{env, io, path::PathBuf};

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    client::{http::HttpTrackerApi, session::TrackerSession, window::TimeWindow},
    utils::{clock::DefaultClock, logging::enable_logging},
};

use render::humanize_duration;

/// The host the original service ships with.
const DEFAULT_URL: &str = "http://localhost:8080";

#[derive(Parser, Debug)]
#[command(name = "Trackctl", version, long_about = None)]
#[command(about = "Command line client for a personal time tracking service", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        help = "Address of the tracker service. Falls back to $TRACKCTL_URL, then localhost:8080"
    )]
    url: Option<String>,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Create a tracker and start it running")]
    Start { name: String },
    #[command(about = "Stop a running tracker. Stopping is final, there is no resume")]
    Stop { id: u64 },
    #[command(about = "Rename a tracker without touching its stop state")]
    Rename { id: u64, name: String },
    #[command(about = "Delete a tracker. No version check applies, delete always wins")]
    Delete { id: u64 },
    #[command(about = "List trackers started inside a time window")]
    List {
        #[arg(
            long,
            value_enum,
            default_value_t,
            help = "all, or only trackers started today, this week or this month"
        )]
        window: TimeWindow,
    },
    #[command(about = "Show a single tracker by id")]
    Show { id: u64 },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&create_application_default_path()?, logging_level, args.log)?;

    let url = args
        .url
        .or_else(|| env::var("TRACKCTL_URL").ok())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    let api = HttpTrackerApi::new(url);
    let mut session = TrackerSession::new(api, Box::new(DefaultClock));

    match args.commands {
        Commands::Start { name } => {
            let created = session.create(name).await?;
            println!("Started tracker {} ({})", created.id, created.name);
            Ok(())
        }
        Commands::Stop { id } => {
            // The stop request echoes the version observed here, a change
            // made in between is caught by the service as a conflict.
            session.refresh().await?;
            let stopped = session.stop(id).await?;
            println!(
                "Stopped tracker {id} after {}",
                humanize_duration(stopped.elapsed(Utc::now()))
            );
            Ok(())
        }
        Commands::Rename { id, name } => {
            session.refresh().await?;
            let renamed = session.rename(id, name).await?;
            println!("Renamed tracker {id} to {}", renamed.name);
            Ok(())
        }
        Commands::Delete { id } => {
            session.delete(id).await?;
            println!("Deleted tracker {id}");
            Ok(())
        }
        Commands::List { window } => {
            let trackers = session.select(window).await?;
            render::print_trackers(trackers, Utc::now());
            Ok(())
        }
        Commands::Show { id } => {
            let tracker = session.show(id).await?;
            render::print_tracker(&tracker, Utc::now());
            Ok(())
        }
    }
}

pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let mut path =
                PathBuf::from(env::var("APPDATA").expect("APPDATA should be present on Windows"));
            path.push("trackctl");
            path
        }
        #[cfg(not(windows))]
        {
            let mut path = env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| {
                        let mut path = PathBuf::from(home);
                        path.push(".local/state");
                        path
                    })
                })
                .expect("Couldn't find neither XDG_STATE_HOME nor HOME");
            path.push("trackctl");
            path
        }
    };

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
