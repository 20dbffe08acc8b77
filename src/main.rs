use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kicker_league::api::{build_router, cors_layer, state::AppState};
use kicker_league::calculate::{
    build_table, current_streaks, group_histories, longest_streaks, SortKey,
};
use kicker_league::config::AppConfig;
use kicker_league::models::{Outcome, Player, Standing, Streak};
use kicker_league::parse_team;
use kicker_league::storage::{
    AttendanceSource, LeagueStore, Scope, StorageConfig, ACTIVE_SEASON_ALIAS,
};

#[derive(Parser)]
#[command(name = "kicker")]
#[command(about = "Kicker league tracker with player tables and streak reports")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage players
    Player {
        #[command(subcommand)]
        action: PlayerAction,
    },

    /// Manage seasons
    Season {
        #[command(subcommand)]
        action: SeasonAction,
    },

    /// Record games
    Game {
        #[command(subcommand)]
        action: GameAction,
    },

    /// Print a league table
    Table {
        /// Season name, or "active" for the active season (all-time if omitted)
        #[arg(long)]
        season: Option<String>,

        /// Sort key: pointsRatio, wins, games or winRatio
        #[arg(long)]
        sort: Option<String>,
    },

    /// Print the table of everyone who played on the player's side
    Fellows {
        /// Player name
        player: String,

        #[arg(long)]
        sort: Option<String>,
    },

    /// Print the table of everyone who played against the player
    Opponents {
        /// Player name
        player: String,

        #[arg(long)]
        sort: Option<String>,
    },

    /// Print streak records and current streaks
    Streaks {
        /// Rank current losing streaks instead of winning ones
        #[arg(long)]
        losing: bool,
    },

    /// Start the API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum PlayerAction {
    /// Register a new player
    Create { name: String },

    /// List all players
    List,
}

#[derive(Subcommand)]
enum SeasonAction {
    /// Create a new (inactive) season
    Create { name: String },

    /// Make a season the active one
    Activate { name: String },

    /// List seasons with their game counts
    List,
}

#[derive(Subcommand)]
enum GameAction {
    /// Record a game in the active season
    Create {
        /// Comma-separated winner names
        #[arg(long)]
        winners: String,

        /// Comma-separated loser names
        #[arg(long)]
        losers: String,

        /// When the game was played (RFC 3339), defaults to now
        #[arg(long)]
        played_at: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            cli.json_logs
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!cli.json_logs)
                .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    tracing::debug!("Starting kicker v{}", env!("CARGO_PKG_VERSION"));

    let default_sort = config.default_sort()?;
    let store = LeagueStore::new(StorageConfig::new(config.data_dir.clone()));

    match cli.command {
        Commands::Player { action } => match action {
            PlayerAction::Create { name } => {
                let player = store.create_player(&name)?;
                println!("Created player {} ({})", player.name, player.uuid);
            }
            PlayerAction::List => {
                let mut players = store.players().context("Failed to read players")?;
                players.sort_by_key(|p| p.id);
                print_players(&players);
            }
        },
        Commands::Season { action } => match action {
            SeasonAction::Create { name } => {
                let season = store.create_season(&name)?;
                println!("Created season {} ({})", season.name, season.uuid);
            }
            SeasonAction::Activate { name } => {
                let season = store.activate_season(&name)?;
                println!("Active season: {}", season.name);
            }
            SeasonAction::List => {
                let summaries = store
                    .season_summaries()
                    .context("Failed to read seasons")?;
                if summaries.is_empty() {
                    println!("No seasons.");
                }
                for summary in summaries {
                    println!(
                        "{} {:<24} {:>5} games",
                        if summary.season.active { "*" } else { " " },
                        summary.season.name,
                        summary.games_count
                    );
                }
            }
        },
        Commands::Game { action } => match action {
            GameAction::Create {
                winners,
                losers,
                played_at,
            } => {
                let played_at = played_at.as_deref().map(parse_played_at).transpose()?;
                let recorded =
                    store.create_game(&parse_team(&winners), &parse_team(&losers), played_at)?;
                println!(
                    "Recorded game {} in {}: {} beat {}",
                    recorded.game.id,
                    recorded.season.name,
                    team_names(&recorded.winners),
                    team_names(&recorded.losers)
                );
            }
        },
        Commands::Table { season, sort } => {
            let key = sort_key(sort.as_deref(), default_sort)?;
            let (title, scope) = match season.as_deref() {
                None => ("All time".to_string(), Scope::AllTime),
                Some(name) if name.eq_ignore_ascii_case(ACTIVE_SEASON_ALIAS) => {
                    let season = store.active_season()?;
                    (season.name, Scope::Season(season.id))
                }
                Some(name) => {
                    let season = store.find_season_by_name(name)?;
                    (season.name, Scope::Season(season.id))
                }
            };

            let scoped = store.scoped_attendances(&scope)?;
            let standings = build_table(&scoped.attendances, scoped.total_games, key)?;
            println!("=== {} ({} games, by {}) ===\n", title, scoped.total_games, key);
            print_table(&standings);
        }
        Commands::Fellows { player, sort } => {
            let key = sort_key(sort.as_deref(), default_sort)?;
            let player = store.find_player_by_name(&player)?;
            let scoped = store.scoped_attendances(&Scope::Fellows(player.id))?;
            let standings = build_table(&scoped.attendances, scoped.total_games, key)?;
            println!(
                "=== Fellows of {} ({} games, by {}) ===\n",
                player.name, scoped.total_games, key
            );
            print_table(&standings);
        }
        Commands::Opponents { player, sort } => {
            let key = sort_key(sort.as_deref(), default_sort)?;
            let player = store.find_player_by_name(&player)?;
            let scoped = store.scoped_attendances(&Scope::Opponents(player.id))?;
            let standings = build_table(&scoped.attendances, scoped.total_games, key)?;
            println!(
                "=== Opponents of {} ({} games, by {}, wins are {}'s) ===\n",
                player.name, scoped.total_games, key, player.name
            );
            print_table(&standings);
        }
        Commands::Streaks { losing } => {
            let outcome = if losing { Outcome::Loss } else { Outcome::Win };
            let scoped = store.scoped_attendances(&Scope::AllTime)?;
            let histories = group_histories(scoped.attendances);
            let longest = longest_streaks(&histories);

            println!("=== Streak records ===");
            print_record("Longest winning", longest.winning.as_ref());
            print_record("Longest losing", longest.losing.as_ref());

            println!("\n=== Current {} streaks ===", outcome);
            for streak in current_streaks(&histories, outcome)
                .iter()
                .filter(|s| s.length > 0)
            {
                println!("{:<20} {:>4}", streak.player.name, streak.length);
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            if port == 0 {
                bail!("Server port must be greater than 0");
            }

            let state = AppState::new(store, default_sort);
            let app = build_router(state).layer(cors_layer(&config.server.cors_origin));
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("API: http://{}/api", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// Strict sort lookup for the CLI; a missing key means the configured default.
fn sort_key(arg: Option<&str>, default: SortKey) -> Result<SortKey> {
    match arg {
        Some(name) => Ok(name.parse::<SortKey>()?),
        None => Ok(default),
    }
}

fn parse_played_at(s: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid --played-at (expected RFC 3339): {}", s))?;
    Ok(parsed.with_timezone(&Utc))
}

fn team_names(team: &[Player]) -> String {
    team.iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(" & ")
}

fn print_players(players: &[Player]) {
    if players.is_empty() {
        println!("No players.");
        return;
    }
    for player in players {
        println!(
            "{:>4}  {:<20} {}  (since {})",
            player.id,
            player.name,
            player.uuid,
            player.created_at.format("%Y-%m-%d")
        );
    }
}

fn print_table(standings: &[Standing]) {
    if standings.is_empty() {
        println!("No games recorded.");
        return;
    }

    println!(
        "{:>4}  {:<20} {:>5} {:>5} {:>6} {:>7} {:>7} {:>7}",
        "#", "Player", "Games", "Wins", "Points", "Pts/G", "Win%", "Games%"
    );
    for standing in standings {
        let stats = &standing.stats;
        println!(
            "{:>4}  {:<20} {:>5} {:>5} {:>6} {:>7.2} {:>7.1} {:>7.1}",
            standing.position,
            stats.player.name,
            stats.games,
            stats.wins,
            stats.points,
            stats.points_ratio,
            stats.win_ratio * 100.0,
            stats.games_ratio * 100.0
        );
    }
}

fn print_record(label: &str, streak: Option<&Streak>) {
    match streak {
        Some(s) => println!("{:<16} {} ({} games)", label, s.player.name, s.length),
        None => println!("{:<16} -", label),
    }
}
