/// Tide Sim - deterministic playback replay
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tide_simulator::{Command, Library, Runner};

#[derive(Parser)]
#[command(name = "tide-sim")]
#[command(about = "Replay a playback command trace against a media library", long_about = None)]
struct Cli {
    /// Library description (songs, podcasts, albums, playlists, users)
    #[arg(short, long)]
    library: PathBuf,

    /// Command trace to replay
    #[arg(short, long)]
    commands: PathBuf,

    /// Where to write the outcome records (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the outcome JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing; logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tide_simulator=info,tide_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let library: Library = read_json(&cli.library).context("loading library")?;
    let commands: Vec<Command> = read_json(&cli.commands).context("loading command trace")?;
    tracing::info!(commands = commands.len(), "starting replay");

    let mut runner = Runner::new(library)?;
    let outcomes = runner.run(commands);

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&outcomes)?
    } else {
        serde_json::to_string(&outcomes)?
    };

    match cli.output {
        Some(path) => fs::write(&path, rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
