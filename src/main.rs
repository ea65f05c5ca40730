use clap::{Parser, Subcommand};
use club_leaderboard::{
    backend::{HttpBackend, Session},
    config::Settings,
    leaderboard::{AdminCommand, CommandOutcome, LeaderboardService},
    models::{medal_marker, ordinal_label},
    CategorizationScheme,
};
use std::{path::PathBuf, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod tui_main;

#[derive(Parser)]
#[clap(name = "club-leaderboard")]
#[clap(about = "View and export CodeChef contest leaderboards for the coding club", long_about = None)]
struct Cli {
    /// Extra configuration file layered over config/default and config/local
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the categorized leaderboard of a contest
    Show {
        /// Contest name, e.g. start101
        contest: String,

        /// Grouping: year-star, star, contest, contest-star
        #[clap(short, long)]
        scheme: Option<String>,

        /// Only show the first N entries of each category
        #[clap(short, long)]
        top: Option<usize>,
    },

    /// Export the leaderboard of a contest to a spreadsheet
    Export {
        contest: String,

        #[clap(short, long)]
        scheme: Option<String>,

        /// Output file, defaults to the configured export file
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask the backend to generate a contest's results (admin)
    Generate {
        contest: String,
    },

    /// Reset the tracked CodeChef users (admin)
    ResetUsers,

    /// Browse a contest leaderboard interactively
    Tui {
        contest: String,

        #[clap(short, long)]
        scheme: Option<String>,
    },
}

fn resolve_scheme(flag: Option<String>, settings: &Settings) -> anyhow::Result<CategorizationScheme> {
    match flag {
        Some(value) => Ok(value.parse()?),
        None => Ok(settings.leaderboard.scheme),
    }
}

fn print_outcome(outcome: &CommandOutcome) {
    let marker = if outcome.is_success() { "✅" } else { "❌" };
    println!("\n{} {}: {}", marker, outcome.title, outcome.description);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::load(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Using default settings ({})", e);
        Settings::default()
    });

    // The TUI owns the terminal, so it gets no log output
    if !matches!(cli.command, Commands::Tui { .. }) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!(
        "{} v{} ({:?})",
        settings.app.name, settings.app.version, settings.app.environment
    );

    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    let session = Session::with_credential(settings.backend.api_key.clone());
    if !session.is_authenticated() {
        warn!("No API key configured, requests will be sent without credentials");
    }

    let backend = HttpBackend::new(settings.backend_config(), session)?;
    let service = LeaderboardService::new(Arc::new(backend));

    match cli.command {
        Commands::Show { contest, scheme, top } => {
            let scheme = resolve_scheme(scheme, &settings)?;
            let view = service.load(&contest).await;

            if view.is_empty() {
                println!("No results available for {}", view.contest_name);
                return Ok(());
            }

            let categorized = view.categorized(scheme, top);
            println!("\n=== CodeChef Leaderboard: {} ===", view.contest_name);
            println!("Grouped by: {}", scheme.description());
            println!("Fetched at: {}", view.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"));

            for group in categorized.groups() {
                println!("\n## {}", group.key);
                for bucket in &group.buckets {
                    println!("\n  {}", bucket.key);
                    println!(
                        "  {:<8} {:<24} {:<6} {:<8} {:<8} {:<18} {:<6} {:>8}",
                        "Rank", "Student Name", "Year", "Branch", "Section", "Codechef Id", "Stars", "CC Rank"
                    );
                    for (index, winner) in bucket.records.iter().enumerate() {
                        let position = index as u64 + 1;
                        println!(
                            "  {:<8} {:<24} {:<6} {:<8} {:<8} {:<18} {:<6} {:>8} {}",
                            ordinal_label(position),
                            winner.username,
                            winner.year_of_study.as_deref().unwrap_or("-"),
                            winner.branch.as_deref().unwrap_or("-"),
                            winner.section.as_deref().unwrap_or("-"),
                            winner.codechef_id.as_deref().unwrap_or("-"),
                            winner.star_rating.as_deref().unwrap_or("-"),
                            winner
                                .contest_global_rank
                                .map(|r| r.to_string())
                                .unwrap_or_else(|| "-".to_string()),
                            medal_marker(position),
                        );
                    }
                }
            }
        }

        Commands::Export { contest, scheme, output } => {
            let scheme = resolve_scheme(scheme, &settings)?;
            let path = output.unwrap_or_else(|| PathBuf::from(&settings.leaderboard.export_file));
            let view = service.load(&contest).await;

            if view.is_empty() {
                warn!("No results for {}, the workbook will have no leaderboard sheets", contest);
            }

            let summary = service.export(&view, scheme, &path)?;
            info!("Export finished");
            println!(
                "\n✅ Saved {} ({} sheets, {} rows)",
                summary.path.display(),
                summary.sheets,
                summary.rows
            );
        }

        Commands::Generate { contest } => {
            let outcome = service
                .run(&AdminCommand::GenerateResults { contest })
                .await;
            print_outcome(&outcome);
        }

        Commands::ResetUsers => {
            let outcome = service.run(&AdminCommand::ResetUsers).await;
            print_outcome(&outcome);
        }

        Commands::Tui { contest, scheme } => {
            let scheme = resolve_scheme(scheme, &settings)?;
            tui_main::run_tui(service, &settings, &contest, scheme).await?;
        }
    }

    Ok(())
}
