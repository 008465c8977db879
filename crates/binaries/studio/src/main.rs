mod commands;
mod guard;

use app_state::load_app_settings;
use clap::{Parser, Subcommand};
use color_eyre::Result;
use commands::Studio;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(version, about = "Photography studio client", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Revoke the session and forget the stored tokens.
    Logout,
    /// Show whether a session is stored, and for which role.
    Status,
    Packages {
        /// Only packages customers can book.
        #[arg(long, default_value_t = false)]
        active: bool,
    },
    Reservations {
        /// Only the logged-in customer's own reservations.
        #[arg(long, default_value_t = false, conflicts_with = "pending")]
        mine: bool,
        /// Only reservations waiting for approval.
        #[arg(long, default_value_t = false)]
        pending: bool,
    },
    Approve {
        reservation_id: i64,
        #[arg(long)]
        note: Option<String>,
    },
    Reject {
        reservation_id: i64,
        #[arg(long)]
        note: Option<String>,
    },
    Events,
    Notifications {
        #[arg(long, default_value_t = false)]
        unread: bool,
    },
    Dashboard,
    /// Upload images into an event's album, creating the album when needed.
    Publish {
        #[arg(long)]
        event: i64,
        /// Name for the album, required when the event has none yet.
        #[arg(long)]
        album_name: Option<String>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Write the self-submitting payment checkout page for a reservation.
    Checkout {
        #[arg(long)]
        reservation: i64,
        #[arg(long, default_value = "checkout.html")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = load_app_settings()?;
    let level = &settings.logging.level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("studio={level},studio_client={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    color_eyre::install()?;
    let args = Args::parse();

    let studio = Studio::new(settings)?;
    match args.command {
        Command::Login { email, password } => studio.login(&email, &password).await,
        Command::Logout => studio.logout().await,
        Command::Status => studio.status(),
        Command::Packages { active } => studio.packages(active).await,
        Command::Reservations { mine, pending } => studio.reservations(mine, pending).await,
        Command::Approve {
            reservation_id,
            note,
        } => studio.decide(reservation_id, true, note).await,
        Command::Reject {
            reservation_id,
            note,
        } => studio.decide(reservation_id, false, note).await,
        Command::Events => studio.events().await,
        Command::Notifications { unread } => studio.notifications(unread).await,
        Command::Dashboard => studio.dashboard().await,
        Command::Publish {
            event,
            album_name,
            files,
        } => studio.publish(event, album_name, &files).await,
        Command::Checkout { reservation, out } => studio.checkout(reservation, &out).await,
    }
}
