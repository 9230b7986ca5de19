use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tvmaze_client::{ClientConfig, Episode, Show, TvMazeClient, TvMazeError, default_cache_path};

/// Look up TV shows and their episodes on TVMaze
#[derive(Parser)]
#[command(name = "tvmaze", version, about)]
struct Cli {
    /// Cache file to use (defaults to the system cache directory)
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,

    /// Always ask the service, but still refresh the cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Preferred two-letter country code, e.g. US
    #[arg(long, global = true)]
    region: Option<String>,

    /// API root to talk to
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Errors reported by the command-line tool
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    TvMaze(#[from] TvMazeError),

    #[error("Failed to render JSON output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a show name to a single show
    Show { name: String },

    /// Resolve a show name and list its episodes
    Episodes {
        name: String,

        /// Only list episodes of this season
        #[arg(long)]
        season: Option<u32>,
    },
}

fn build_config(cli: &Cli) -> Result<ClientConfig, TvMazeError> {
    let cache_file = match &cli.cache_file {
        Some(path) => path.clone(),
        None => default_cache_path()?,
    };

    let mut config = ClientConfig::default()
        .with_cache_file(cache_file)
        .with_use_cache(!cli.no_cache);

    if let Some(region) = &cli.region {
        config = config.with_region(region);
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }

    Ok(config)
}

fn print_show(show: &Show) {
    println!("{} (id {})", show.name, show.id);
    if let Some(network) = &show.network {
        match &network.country {
            Some(country) => println!("  Network: {} ({})", network.name, country.code),
            None => println!("  Network: {}", network.name),
        }
    }
    if let Some(premiered) = &show.premiered {
        println!("  Premiered: {}", premiered);
    }
    if let Some(status) = &show.status {
        println!("  Status: {}", status);
    }
    if let Some(summary) = show.summary_text() {
        println!("  Summary: {}", summary);
    }
}

fn print_episode(episode: &Episode) {
    let number = episode
        .number
        .map(|n| format!("E{:02}", n))
        .unwrap_or_else(|| "special".to_string());
    println!(
        "S{:02}{} - {} [{}]",
        episode.season,
        number,
        episode.name.as_deref().unwrap_or("Unknown"),
        episode.airdate.as_deref().unwrap_or("unaired")
    );
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn execute(cli: &Cli, client: &TvMazeClient) -> Result<(), CliError> {
    match &cli.command {
        Command::Show { name } => {
            let show = client.find_show(name)?;
            if cli.json {
                print_json(&show)?;
            } else {
                print_show(&show);
            }
        }
        Command::Episodes { name, season } => {
            let show = client.find_show(name)?;
            let episodes: Vec<Episode> = client
                .episodes(show.id)?
                .into_iter()
                .filter(|episode| season.is_none_or(|s| episode.season == s))
                .collect();

            if cli.json {
                print_json(&episodes)?;
            } else {
                println!("{} - {} episode(s)\n", show.name, episodes.len());
                for episode in &episodes {
                    print_episode(episode);
                }
            }
        }
    }

    Ok(())
}

/// Runs the command and writes the cache back, even if the command failed
///
/// Responses fetched before a failure stay cached for the next run. The
/// command's error takes precedence over a failure to save.
fn run_with(cli: &Cli, client: &TvMazeClient) -> Result<(), CliError> {
    let outcome = execute(cli, client);
    let saved = client.write_cache();

    outcome?;
    saved?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let client = TvMazeClient::new(build_config(&cli)?)?;
    run_with(&cli, &client)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
