//! # Innkeep Store Admin
//!
//! Inspects and maintains the document store from a terminal.
//!
//! ## Usage
//! ```bash
//! # Create the database, load collections, seed a fresh store
//! cargo run -p innkeep-store --bin innkeep -- init
//!
//! # Dashboard counters for today
//! cargo run -p innkeep-store --bin innkeep -- stats
//!
//! # Query a collection
//! cargo run -p innkeep-store --bin innkeep -- list rooms --where status=available --order number --limit 5
//!
//! # Wipe everything (the next init re-seeds)
//! cargo run -p innkeep-store --bin innkeep -- clear --yes
//!
//! # Use a specific database or config file
//! cargo run -p innkeep-store --bin innkeep -- --db ./data/innkeep.db stats
//! ```
//!
//! Output is JSON on stdout; logs go to stderr.

use std::env;
use std::path::PathBuf;

use innkeep_store::{init_tracing, DocumentStore, SelectOptions, StoreConfig};
use serde_json::Value;

const USAGE: &str = "\
Innkeep Store Admin

Usage: innkeep [OPTIONS] <COMMAND>

Commands:
  init                      Load all collections, seeding an empty store
  stats                     Print today's dashboard counters
  list <collection>         Print records of a collection
      --where <field=value>   Exact-match filter (repeatable, ANDed)
      --order <field>         Sort ascending on a field
      --desc                  Sort descending instead
      --limit <N>             Keep at most N records
  clear --yes               Delete every collection
  collections               Print collection names

Options:
  -d, --db <PATH>        Database file path (overrides config)
  -c, --config <PATH>    Config file path (default: platform config dir)
  -h, --help             Show this help message";

#[derive(Debug, Default)]
struct Args {
    db_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    command: Vec<String>,
}

fn parse_args(raw: &[String]) -> Result<Option<Args>, String> {
    let mut args = Args::default();

    let mut i = 0;
    while i < raw.len() {
        match raw[i].as_str() {
            "--db" | "-d" => {
                let value = raw.get(i + 1).ok_or("--db needs a path")?;
                args.db_path = Some(PathBuf::from(value));
                i += 1;
            }
            "--config" | "-c" => {
                let value = raw.get(i + 1).ok_or("--config needs a path")?;
                args.config_path = Some(PathBuf::from(value));
                i += 1;
            }
            "--help" | "-h" => return Ok(None),
            other => args.command.push(other.to_string()),
        }
        i += 1;
    }

    Ok(Some(args))
}

/// Parses `list` options following the collection name.
fn parse_list_options(rest: &[String]) -> Result<SelectOptions, String> {
    let mut options = SelectOptions::new();
    let mut descending = false;
    let mut order_field = None;

    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--where" => {
                let clause = rest.get(i + 1).ok_or("--where needs field=value")?;
                let (field, value) = clause
                    .split_once('=')
                    .ok_or_else(|| format!("bad filter '{}', expected field=value", clause))?;
                options = options.filter(field, parse_filter_value(value));
                i += 1;
            }
            "--order" => {
                order_field = Some(rest.get(i + 1).ok_or("--order needs a field")?.clone());
                i += 1;
            }
            "--desc" => descending = true,
            "--limit" => {
                let n = rest.get(i + 1).ok_or("--limit needs a number")?;
                options = options.limit(n.parse().map_err(|_| format!("bad limit '{}'", n))?);
                i += 1;
            }
            other => return Err(format!("unknown list option '{}'", other)),
        }
        i += 1;
    }

    if let Some(field) = order_field {
        options = if descending {
            options.order_by_desc(field)
        } else {
            options.order_by(field)
        };
    }

    Ok(options)
}

/// `101` filters on a number, `true` on a bool, `"101"` or anything else on
/// a string.
fn parse_filter_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw)? {
        Some(args) => args,
        None => {
            println!("{}", USAGE);
            return Ok(());
        }
    };

    let Some((command, rest)) = args.command.split_first() else {
        eprintln!("{}", USAGE);
        return Err("missing command".into());
    };

    let mut config = StoreConfig::load(args.config_path)?;
    if let Some(path) = args.db_path {
        config = config.with_database_path(path);
    }

    let store = DocumentStore::open(&config).await?;

    match command.as_str() {
        "init" => {
            store.initialize().await?;
            let mut counts = serde_json::Map::new();
            for name in store.collection_names() {
                counts.insert(name.clone(), store.count(&name).await?.into());
            }
            print_json(&serde_json::json!({
                "initialized": true,
                "collections": counts,
                "degraded": store.degraded_collections(),
            }))?;
        }
        "stats" => {
            store.initialize().await?;
            print_json(&store.dashboard_stats().await?)?;
        }
        "list" => {
            let (collection, rest) = rest.split_first().ok_or("list needs a collection name")?;
            let options = parse_list_options(rest)?;
            print_json(&store.select(collection, &options).await?)?;
        }
        "collections" => print_json(&store.collection_names())?,
        "clear" => {
            if !rest.iter().any(|a| a == "--yes") {
                return Err("refusing to clear without --yes".into());
            }
            store.clear_all_data().await?;
            print_json(&serde_json::json!({ "cleared": true }))?;
        }
        other => {
            eprintln!("{}", USAGE);
            return Err(format!("unknown command '{}'", other).into());
        }
    }

    Ok(())
}
