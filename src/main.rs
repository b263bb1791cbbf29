use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use table_tipper::config::{self, Config};
use table_tipper::error::{ConfigError, FetchError, RunError};
use table_tipper::history::{self, JsonHistoryStore};
use table_tipper::output;
use table_tipper::run::{RunContext, RunOutput};
use table_tipper::standings::FootballDataProvider;
use table_tipper::stderr_buffer::BufferedStderr;
use table_tipper::tui;

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Leaderboard sorted by total points (default if no subcommand)
    List {
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Per-rank detail grid: each participant's pick and its points
    Grid,
    /// Current league standings
    Table,
    /// Recorded totals over time
    History,
    /// Interactive dashboard with auto-refresh
    Dash,
}

#[derive(Parser, Debug)]
#[command(name = "table-tipper")]
#[command(about = "Score league-table predictions against the live standings", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/table-tipper/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Don't append this run's totals to history
    #[arg(long, global = true)]
    no_record: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    // RUST_LOG wins over --verbose when set
    let default = if verbose { "table_tipper=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(BufferedStderr)
        .with_target(false)
        .without_time()
        .init();
}

fn config_exit_code(error: &ConfigError) -> i32 {
    match error {
        ConfigError::MissingCredential { .. } => EXIT_AUTH,
        _ => EXIT_CONFIG,
    }
}

fn fetch_exit_code(error: &FetchError) -> i32 {
    if error.is_auth() {
        EXIT_AUTH
    } else {
        EXIT_NETWORK
    }
}

fn report_run_error(error: &RunError) -> i32 {
    match error {
        RunError::Predictions(e) => {
            eprintln!("Predictions error: {}", e);
            EXIT_CONFIG
        }
        RunError::Fetch(e) => {
            eprintln!("Fetch error: {}", e);
            fetch_exit_code(e)
        }
    }
}

/// Print one view of a completed run
fn render(command: &Commands, output: &RunOutput) {
    let use_colors = output::should_use_colors();

    let text = match command {
        Commands::List { tsv: true } => output::format_tsv(&output.scoreboard),
        Commands::List { tsv: false } => {
            let changes = history::trend::latest_change(output.history.snapshots());
            output::format_leaderboard(&output.scoreboard, &changes, use_colors)
        }
        Commands::Grid => output::format_grid(&output.scoreboard, use_colors),
        Commands::Table => output::format_standings(&output.standings, use_colors),
        Commands::History => output::format_history(&output.history),
        Commands::Dash => return,
    };

    println!("{}", text);
}

fn build_context(
    config: Config,
    credential: String,
) -> Result<RunContext<FootballDataProvider, JsonHistoryStore>, i32> {
    let timeout = config.request_timeout().map_err(|e| {
        eprintln!("Config error: {}", e);
        EXIT_CONFIG
    })?;

    let provider = FootballDataProvider::new(&config.api_base_url, timeout, config.total_teams)
        .map_err(|e| {
            eprintln!("Failed to create HTTP client: {}", e);
            EXIT_NETWORK
        })?;

    let history = if config.history.enabled {
        let path = config.history_path();
        debug!(path = %path.display(), "history enabled");
        Some(JsonHistoryStore::new(path))
    } else {
        None
    };

    Ok(RunContext {
        provider,
        history,
        config,
        credential,
    })
}

async fn run(cli: Cli) -> i32 {
    let command = cli.command.unwrap_or(Commands::List { tsv: false });
    let start_time = Instant::now();

    let config_path = cli.config.map(PathBuf::from);
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return config_exit_code(&e);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return EXIT_CONFIG;
    }

    info!(
        league = %config.league,
        predictions = %config.predictions_path().display(),
        "loaded config"
    );

    let credential = match table_tipper::credentials::resolve_token(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Credential error: {}", e);
            return config_exit_code(&e);
        }
    };

    let theme_setting = config.theme;
    let league = config.league.clone();
    let refresh_secs = config.auto_refresh_interval;

    let ctx = match build_context(config, credential) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let record = !cli.no_record;

    if let Commands::Dash = command {
        let app = tui::App::new_loading(league, refresh_secs, tui::resolve_theme(&theme_setting));
        return match tui::run_tui(app, ctx, record).await {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("TUI error: {:#}", e);
                EXIT_NETWORK
            }
        };
    }

    let output = match ctx.execute(record).await {
        Ok(output) => output,
        Err(e) => return report_run_error(&e),
    };

    render(&command, &output);

    debug!(
        participants = output.scoreboard.participants().len(),
        elapsed = ?start_time.elapsed(),
        "done"
    );

    EXIT_SUCCESS
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // rustls 0.23+ needs a process-wide crypto provider
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let code = run(cli).await;
    std::process::exit(code);
}
