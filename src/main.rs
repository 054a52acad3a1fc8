use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cleaning_roster::{
    api,
    config::Settings,
    db::{self, RosterStore},
    models::ADMIN_CLEANER_NAME,
    net,
    notify::ChangeNotifier,
    service::RosterService,
};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Household cleaning roster with live updates")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the roster server (default)
    Serve(ServeArgs),
    /// Create or upgrade the database and seed the Admin cleaner, then exit
    Init {
        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Port for the HTTP API
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to listen on [default: 0.0.0.0]
    #[arg(short, long)]
    bind: Option<IpAddr>,

    /// SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Directory of static files served for non-API paths
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "cleaning_roster=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<db::Database> {
    let path = match path {
        Some(path) => path,
        None => db::Database::default_path()?,
    };
    tracing::info!("Using database at {}", path.display());

    let db = db::Database::open(path)?;
    db.initialize().context("Failed to initialize database")?;
    Ok(db)
}

async fn serve(mut settings: Settings, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        settings.port = port;
    }
    if args.database.is_some() {
        settings.database_path = args.database;
    }
    if args.static_dir.is_some() {
        settings.static_dir = args.static_dir;
    }
    let bind = args.bind.unwrap_or(IpAddr::from([0, 0, 0, 0]));

    if settings.uses_legacy_admin_secret() {
        tracing::warn!("Using the default admin secret; set ROSTER_ADMIN_SECRET to change it");
    }

    let db = open_database(settings.database_path.clone())?;
    let roster = RosterService::new(db, ChangeNotifier::new(), settings.admin_secret.clone());
    let public_url = net::reachable_url(&settings, bind);
    let app = api::create_router(api::AppState::new(roster, public_url.as_str()), &settings);

    let listener = tokio::net::TcpListener::bind((bind, settings.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", bind, settings.port))?;
    tracing::info!("Roster server listening on {}", listener.local_addr()?);
    tracing::info!("Reachable at {}", public_url);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = Settings::from_env();

    match cli.command {
        Some(Commands::Serve(args)) => serve(settings, args).await?,
        Some(Commands::Init { database }) => {
            let db = open_database(database.or(settings.database_path))?;
            match db.find_cleaner_by_name(ADMIN_CLEANER_NAME)? {
                Some(admin) => println!("Database ready, {} cleaner id {}", admin.name, admin.id),
                None => println!("Database ready"),
            }
        }
        None => serve(settings, ServeArgs::default()).await?,
    }

    Ok(())
}
