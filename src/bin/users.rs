//! CLI administration tool for the user repository.
//!
//! Reads go through the cache-aside repository when `--cached` is given; mutations
//! always go through it so the cache entry is invalidated after the write commits.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin users -- db migrate
//! cargo run --bin users -- create --email alice@example.com --name "Alice Smith"
//! cargo run --bin users -- get 1 --cached
//! cargo run --bin users -- search smith
//! cargo run --bin users -- recent 7
//! cargo run --bin users -- invalidate 1
//! ```
//!
//! # Environment Variables
//!
//! See [`user_repository::config`]; a `.env` file in the working directory is loaded first.

use user_repository::application::CachedUserRepository;
use user_repository::config::{CacheSettings, Config};
use user_repository::domain::entities::{NewUser, UpdateUser, User};
use user_repository::domain::repositories::UserRepository;
use user_repository::infrastructure::cache::{CacheClient, NullCache, RedisCache};
use user_repository::infrastructure::persistence::{PgUserRepository, connect_pool, run_migrations};
use user_repository::telemetry::init_tracing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing users.
#[derive(Parser)]
#[command(name = "users")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a user by id
    Get {
        id: i64,

        /// Read through the cache
        #[arg(short, long)]
        cached: bool,
    },

    /// Show a user by email
    FindEmail { email: String },

    /// Create a user
    Create {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        name: String,
    },

    /// Replace a user's email and name
    Update {
        id: i64,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        name: String,
    },

    /// Delete a user
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,

    /// Find users whose name contains a substring (case-insensitive)
    Search { pattern: String },

    /// Count users
    Count,

    /// List users created in the last N days
    Recent { days: u32 },

    /// Drop a user's cache entry
    Invalidate { id: i64 },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Check the cache backend
    Cache,
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

type Repo = CachedUserRepository<PgUserRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    init_tracing(&config.log);
    config.log_summary();

    let pool = connect_pool(&config.database).await?;

    let cache = build_cache(&config.cache).await;
    let repo = CachedUserRepository::new(
        Arc::new(PgUserRepository::new(Arc::new(pool.clone()))),
        cache.clone(),
    )
    .with_ttl(config.cache.ttl);

    match cli.command {
        Commands::Get { id, cached } => {
            let user = if cached {
                repo.get_by_id_cached(id).await?
            } else {
                repo.storage().get_by_id(id).await?
            };
            print_user(&user);
        }
        Commands::FindEmail { email } => print_user(&repo.storage().get_by_email(&email).await?),
        Commands::Create { email, name } => {
            let user = repo.create_cached(NewUser::new(email, name)).await?;
            println!("{}", "✅ User created".green().bold());
            print_user(&user);
        }
        Commands::Update { id, email, name } => {
            repo.update_cached(id, UpdateUser::new(email, name)).await?;
            println!("{}", "✅ User updated".green().bold());
        }
        Commands::Delete { id, yes } => delete_user(&repo, id, yes).await?,
        Commands::List => print_users(&repo.storage().list().await?),
        Commands::Search { pattern } => {
            print_users(&repo.storage().find_by_name_pattern(&pattern).await?)
        }
        Commands::Count => {
            let count = repo.storage().count().await?;
            println!("  Users: {}", count.to_string().bright_green().bold());
        }
        Commands::Recent { days } => print_users(&repo.storage().get_recent(days).await?),
        Commands::Invalidate { id } => {
            repo.invalidate_cache(id).await?;
            println!("{}", "✅ Cache entry removed".green().bold());
        }
        Commands::Cache => {
            if cache.health_check().await {
                println!("{}", "✅ Cache backend OK".green().bold());
            } else {
                anyhow::bail!("Cache backend unreachable");
            }
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Connects to Redis when configured, falling back to [`NullCache`].
async fn build_cache(settings: &CacheSettings) -> Arc<dyn CacheClient> {
    let Some(redis_url) = &settings.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Deletes a user after showing it and asking for confirmation (default: No).
async fn delete_user(repo: &Repo, id: i64, skip_confirm: bool) -> Result<()> {
    let user = repo.storage().get_by_id(id).await?;
    print_user(&user);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this user?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.delete_cached(id).await?;
    println!("{}", "✅ User deleted".green().bold());

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            run_migrations(pool).await?;
            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

fn print_user(user: &User) {
    println!("  ID:      {}", user.id.to_string().bright_black());
    println!("  Email:   {}", user.email.cyan());
    println!("  Name:    {}", user.name.bright_white());
    println!(
        "  Created: {}",
        user.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
}

/// Prints users as a table.
///
/// ```text
///   ID    Email                          Name                      Created
///   ─────────────────────────────────────────────────────────────────────────────
///   1     alice@example.com              Alice Smith               2024-01-15 10:30
/// ```
fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return;
    }

    println!(
        "  {:<5} {:<30} {:<25} {}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(77).bright_black());

    for user in users {
        println!(
            "  {:<5} {:<30} {:<25} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.name,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
}
