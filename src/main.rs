//! Command-line front end for the point-of-sale core.
//!
//! # Usage
//!
//! ```bash
//! cafe-pos signup -u barista -p secret
//! cafe-pos products add --name Latte --price 120
//! cafe-pos order -u barista -p secret --item 1:2
//! cafe-pos kitchen
//! cafe-pos complete 1
//! cafe-pos history
//! ```
//!
//! Every command is one request/response cycle: it opens the database,
//! applies pending migrations, does its work and prints a fresh view.

use std::process::ExitCode;

use cafe_pos::{
    app_error::AppError,
    app_state::AppState,
    bootstrap,
    config::{self, Config},
    db,
    models::{OrderStatus, Role},
};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};

mod commands;

use commands::output::Output;

#[derive(Parser)]
#[command(name = "cafe-pos")]
#[command(author, version, about = "Point-of-sale tools for a single shop")]
struct Cli {
    /// SQLite database path; overrides DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a staff account
    Signup {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        /// `staff` or `admin`
        #[arg(short, long, default_value = "staff")]
        role: Role,
    },
    /// List registered staff
    Staff,
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Log in, ring up items and submit them as one order
    Order {
        #[arg(short, long, env = "POS_USERNAME")]
        username: String,

        #[arg(short, long, env = "POS_PASSWORD", hide_env_values = true)]
        password: String,

        /// Cart line as PRODUCT_ID:QTY; repeat for more lines
        #[arg(short, long = "item", value_name = "PRODUCT_ID:QTY", required = true)]
        items: Vec<String>,
    },
    /// List orders, newest first
    Orders {
        /// Only orders in this status (`pending` or `complete`)
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Orders waiting in the kitchen
    Kitchen,
    /// Mark an order as complete
    Complete { order_id: i32 },
    /// Permanently delete an order and its line items
    DeleteOrder {
        order_id: i32,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show the line items of an order
    Receipt { order_id: i32 },
    /// Completed orders with totals and item counts
    History,
    /// Revenue and order counts
    Stats,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List,
    /// Add a product
    Add {
        #[command(flatten)]
        fields: commands::products::ProductFields,
    },
    /// Replace every field of a product
    Update {
        id: i32,

        #[command(flatten)]
        fields: commands::products::ProductFields,
    },
    /// Delete a product that no order refers to
    Delete { id: i32 },
}

fn main() -> ExitCode {
    let env_file = bootstrap::init_env();
    let cli = Cli::parse();

    let mut config = match config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: invalid configuration: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = cli.database_url.clone() {
        config.database.url = url;
    }
    bootstrap::init_tracing(&config.log_level);
    if let Some(path) = env_file {
        debug!("Loaded environment from {}", path.display());
    }

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_recoverable() => {
            eprintln!("warning: {err}");
            ExitCode::from(2)
        }
        Err(err) => {
            error!("Command failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: Config) -> Result<(), AppError> {
    let out = Output::new(cli.json, &config.currency_symbol);
    let state = AppState::new(config)?;
    let conn = &mut state.connection()?;

    info!("Running migrations...");
    let migrations_count = db::run_migrations(conn)?;
    info!("Run {} new migrations successfully", migrations_count);

    match cli.command {
        Commands::Migrate => out.message(&format!("{migrations_count} migration(s) applied")),
        Commands::Signup {
            username,
            password,
            role,
        } => commands::accounts::signup(conn, &out, &username, &password, role)?,
        Commands::Staff => commands::accounts::staff(conn, &out)?,
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list(conn, &out)?,
            ProductAction::Add { fields } => commands::products::add(conn, &out, &fields)?,
            ProductAction::Update { id, fields } => {
                commands::products::update(conn, &out, id, &fields)?
            }
            ProductAction::Delete { id } => commands::products::delete(conn, &out, id)?,
        },
        Commands::Order {
            username,
            password,
            items,
        } => commands::orders::place(conn, &out, &username, &password, &items)?,
        Commands::Orders { status } => commands::orders::list(conn, &out, status)?,
        Commands::Kitchen => commands::orders::kitchen(conn, &out)?,
        Commands::Complete { order_id } => commands::orders::complete(conn, &out, order_id)?,
        Commands::DeleteOrder { order_id, yes } => {
            commands::orders::delete(conn, &out, order_id, yes)?
        }
        Commands::Receipt { order_id } => commands::orders::receipt(conn, &out, order_id)?,
        Commands::History => commands::reports::history(conn, &out)?,
        Commands::Stats => commands::reports::stats(conn, &out)?,
    }

    Ok(())
}
