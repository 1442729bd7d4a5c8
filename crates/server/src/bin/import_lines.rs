//! Import prepared lines into a repertoire.
//!
//! Usage: cargo run --bin import-lines -- <repertoire-name> <file>
//!
//! The file holds one space-separated line per row (`e2e4 e7e5 g1f3`).
//! Blank rows and rows starting with `#` are skipped. Requires DATABASE_URL.

use repertoire_core::{parse_line, rules};
use server::db::{pool, repertoires};
use std::fs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let (name, path) = match args.as_slice() {
        [_, name, path] => (name.trim().to_string(), path.clone()),
        _ => {
            eprintln!("Usage: import-lines <repertoire-name> <file>");
            std::process::exit(2);
        }
    };
    if name.is_empty() {
        return Err("Repertoire name must not be empty".into());
    }

    let database_url = std::env::var("DATABASE_URL")?;

    println!("Connecting to database...");
    let pool = pool::create_pool(&database_url, 1).await?;
    pool::run_migrations(&pool).await?;

    let text = fs::read_to_string(&path)?;
    let mut added = 0;
    let mut known = 0;
    let mut skipped = 0;

    for (row, raw) in text.lines().enumerate() {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }

        let line = match parse_line(raw).map_err(|e| e.to_string()).and_then(|line| {
            rules::replay(&line).map(|r| r.line).map_err(|e| e.to_string())
        }) {
            Ok(line) => line,
            Err(e) => {
                println!("  row {}: skipped ({e})", row + 1);
                skipped += 1;
                continue;
            }
        };

        let outcome = repertoires::insert_line(&pool, &name, &line).await?;
        if outcome.added {
            added += 1;
        } else {
            known += 1;
        }
    }

    println!(
        "Imported into '{}': {} new, {} already known, {} skipped",
        name, added, known, skipped
    );

    Ok(())
}
