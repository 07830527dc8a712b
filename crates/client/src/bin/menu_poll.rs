use std::time::Duration;

use clap::{Parser, Subcommand};
use client::{MenuApiClient, format_progress, wait_until_ready};
use storage::{dto::consensus::CastVoteRequest, models::Course, services::consensus::FinalMenu};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "menu-poll")]
#[command(about = "Follow and take part in the shared menu vote", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "MENU_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show who is done voting
    Status,
    /// Poll until everyone is ready, then print the final menu
    Wait {
        /// Seconds between polls; defaults to the server's hint
        #[arg(long, env = "POLL_INTERVAL_SECS")]
        interval: Option<u64>,

        #[arg(long)]
        max_polls: Option<u32>,
    },
    /// List the duels of a course with your own choices
    Duels {
        #[arg(long, env = "MENU_USER")]
        user: String,

        course: Course,
    },
    /// Vote on one duel
    Vote {
        #[arg(long, env = "MENU_USER")]
        user: String,

        course: Course,
        dish_a: Uuid,
        dish_b: Uuid,
        winner: Uuid,
    },
    /// Print the results even when not everyone is done
    Results {
        #[arg(long)]
        force: bool,
    },
    /// Store the final menu
    Confirm {
        #[arg(long)]
        event_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("menu_poll={},client={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api = MenuApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Status => {
            let progress = api.progress().await?;
            println!("{}", format_progress(&progress.report));
        }
        Commands::Wait {
            interval,
            max_polls,
        } => {
            let report =
                wait_until_ready(&api, interval.map(Duration::from_secs), max_polls).await?;
            println!("{}\n", format_progress(&report));

            let resolution = api.results(false).await?;
            print_menu(&resolution.menu);
            for course in Course::ALL {
                let ties = resolution.ties.get(course);
                if !ties.is_empty() {
                    let names: Vec<&str> = ties.iter().map(|d| d.name.as_str()).collect();
                    println!("Gelijkspel {}: {}", course.title(), names.join(", "));
                }
            }

            let share = api.share().await?;
            println!("\n{}", share.text);
        }
        Commands::Duels { user, course } => {
            let duels = api.duels(course, &user).await?;
            if duels.is_empty() {
                println!("No duels for {}", course.title());
            }
            for duel in duels {
                let mark = match duel.winner_id {
                    Some(id) if id == duel.dish_a.id => "<",
                    Some(_) => ">",
                    None => " ",
                };
                println!(
                    "[{}] {} ({}) vs {} ({})",
                    mark, duel.dish_a.name, duel.dish_a.id, duel.dish_b.name, duel.dish_b.id
                );
            }
        }
        Commands::Vote {
            user,
            course,
            dish_a,
            dish_b,
            winner,
        } => {
            let vote = api
                .cast_vote(&CastVoteRequest {
                    user_name: user,
                    course,
                    dish_a_id: dish_a,
                    dish_b_id: dish_b,
                    winner_id: winner,
                })
                .await?;
            tracing::info!(duel_id = %vote.duel_id, "Vote stored");
        }
        Commands::Results { force } => {
            match api.results(force).await {
                Ok(resolution) => print_menu(&resolution.menu),
                Err(e) if e.is_not_ready() => {
                    println!("Not everyone is done yet, use --force to peek");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Confirm { event_key } => {
            let record = api.confirm(event_key).await?;
            println!("Final menu stored as {}", record.id);
        }
    }

    Ok(())
}

fn print_menu(menu: &FinalMenu) {
    for course in Course::ALL {
        let name = menu.get(course).map_or("Onbeslist", |d| d.name.as_str());
        println!("{:<14} {}", course.title(), name);
    }
}
