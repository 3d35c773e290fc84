//! `tabletop-club` command-line entrypoint: schedule maths and a few game commands against the
//! club API.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::{Receiver, error::TryRecvError};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use tabletop_club::{
    api::http::HttpClubApi,
    config::ClientConfig,
    dto::table::SortOrder,
    schedule::calculate_next_game_date,
    services::{game_service, session_service},
    state::{AppState, SharedState, Toast},
};

#[derive(Debug, Parser)]
#[command(name = "tabletop-club", version, about = "Tabletop club client")]
struct Cli {
    /// Path to the JSON client configuration.
    #[arg(long, env = "TABLETOP_CLUB_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the next session date for a recurring game.
    Next {
        /// Weekday name, e.g. `thursday`.
        #[arg(long)]
        day: String,
        /// `weekly`, `biweekly`, `monthly` or `custom`.
        #[arg(long, default_value = "weekly")]
        interval: String,
        /// Already-known next session, kept when it lies in the future.
        #[arg(long)]
        known: Option<String>,
    },
    /// List games ordered by their next session.
    Upcoming {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Take a seat in a game.
    Register { game_id: Uuid },
    /// Give up a seat in a game.
    Unregister { game_id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Command::Next {
        day,
        interval,
        known,
    } = &cli.command
    {
        let next = calculate_next_game_date(day, interval, known.as_deref())
            .context("computing next session")?;
        println!("{next}");
        return Ok(());
    }

    let config = ClientConfig::load(cli.config.as_deref());
    let api = HttpClubApi::new(&config).context("building API client")?;
    let state = AppState::new(Arc::new(api), &config);
    let mut toasts = state.notifications().subscribe();

    if config.access_token.is_some() {
        if let Err(err) = session_service::refresh_session(&state).await {
            warn!(error = %err, "could not refresh session; continuing anonymously");
        }
    }

    let outcome = run(&state, cli.command).await;
    drain_toasts(&mut toasts);
    outcome
}

async fn run(state: &SharedState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Next { .. } => Ok(()),
        Command::Upcoming { page, page_size } => {
            let mut query = state
                .table_query()
                .with_page(page)
                .sorted_by("next_session", SortOrder::Asc);
            if let Some(size) = page_size {
                query.page_size = size.max(1);
            }
            let games = game_service::list_games(state, &query)
                .await
                .context("listing games")?;
            for game in &games.items {
                let next = game
                    .schedule
                    .as_ref()
                    .and_then(|schedule| schedule.next_session.as_deref())
                    .unwrap_or("unscheduled");
                println!(
                    "{}  {:<32} {:>2} seats open  {}",
                    game.id,
                    game.title,
                    game.open_seats(),
                    next
                );
            }
            println!("page {} of {}", games.page, games.page_count().max(1));
            Ok(())
        }
        Command::Register { game_id } => game_service::register(state, game_id)
            .await
            .context("registering"),
        Command::Unregister { game_id } => game_service::unregister(state, game_id)
            .await
            .context("unregistering"),
    }
}

fn drain_toasts(toasts: &mut Receiver<Toast>) {
    loop {
        match toasts.try_recv() {
            Ok(toast) => eprintln!("[{:?}] {}", toast.level, toast.message),
            Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "missed toasts"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

/// Configure tracing subscribers; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
