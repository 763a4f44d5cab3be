use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use sqlx::Row;
use std::env;

use jobboard::value_objects::{CompanyHandle, Username};

/// Report rows that the API would refuse to produce; `--fix` repairs the
/// ones with a safe repair.
#[derive(Parser)]
struct Cli {
    #[arg(long)]
    database_url: Option<String>,

    #[arg(long)]
    fix: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let db_url = cli
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .context("DATABASE_URL must be set or passed with --database-url")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .context("failed to connect to database")?;

    let mut problems = 0usize;

    // Handles must satisfy the same rules as the API
    let companies = sqlx::query("SELECT handle FROM companies ORDER BY handle")
        .fetch_all(&pool)
        .await?;
    for r in companies.iter() {
        let handle: String = r.get("handle");
        if let Err(e) = CompanyHandle::new(handle.clone()) {
            problems += 1;
            println!("company {:?}: {}", handle, e);
        }
    }

    let users = sqlx::query("SELECT username, password FROM users ORDER BY username")
        .fetch_all(&pool)
        .await?;
    for r in users.iter() {
        let username: String = r.get("username");
        let password: String = r.get("password");
        if let Err(e) = Username::new(username.clone()) {
            problems += 1;
            println!("user {:?}: {}", username, e);
        }
        if !password.starts_with("$2") {
            problems += 1;
            println!("user {:?}: password is not a bcrypt hash", username);
        }
    }

    // The schema only bounds equity from above
    let negative_equity = sqlx::query("SELECT id, equity::TEXT AS equity FROM jobs WHERE equity < 0")
        .fetch_all(&pool)
        .await?;
    println!("Negative equity rows: {}", negative_equity.len());
    for r in negative_equity.iter() {
        let id: i32 = r.get("id");
        let equity: String = r.get("equity");
        problems += 1;
        println!("job {}: equity {}", id, equity);
        if cli.fix {
            sqlx::query("UPDATE jobs SET equity = NULL WHERE id = $1")
                .bind(id)
                .execute(&pool)
                .await?;
            println!("Fixed: job {} equity -> NULL", id);
        }
    }

    println!("Problems found: {}", problems);
    Ok(())
}
