mod browser;
mod catalog;
mod config;
mod export;
mod games;
mod term;

use catalog::{CatalogEntry, Category, Difficulty, Filter};
use std::env;
use std::path::PathBuf;

const DEFAULT_FEATURED: usize = 3;

fn main()
{
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String>
{
    let entries = catalog::entries::builtin();
    catalog::validate(&entries)?;
    log::info!("loaded {} catalog entries", entries.len());

    let mut args = env::args().skip(1);
    let command = args.next();
    let rest: Vec<String> = args.collect();
    match command.as_deref() {
        None => browser::run(&entries),
        Some("list") => list(&entries, &rest),
        Some("featured") => featured(&entries, &rest),
        Some("show") => show(&entries, &rest),
        Some("export") => export(&entries, &rest),
        Some("games") => {
            list_games();
            Ok(())
        }
        Some("snake") => games::run("snake", &rest),
        Some("-h") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some(other) => Err(format!("Unknown command '{other}'. Run with --help.")),
    }
}

// Accepts both `--name value` and `--name=value`.
fn take_option(args: &[String], idx: &mut usize, name: &str) -> Result<Option<String>, String>
{
    let arg = &args[*idx];
    if arg == name {
        *idx += 1;
        return args
            .get(*idx)
            .cloned()
            .map(Some)
            .ok_or_else(|| format!("Expected value after {name}"));
    }
    Ok(arg
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('='))
        .map(str::to_string))
}

fn list(entries: &[CatalogEntry], args: &[String]) -> Result<(), String>
{
    let mut query = String::new();
    let mut category = Filter::<Category>::Any;
    let mut difficulty = Filter::<Difficulty>::Any;
    let mut json = false;

    let mut idx = 0;
    while idx < args.len() {
        if args[idx] == "--json" {
            json = true;
        } else if let Some(value) = take_option(args, &mut idx, "--query")? {
            query = value;
        } else if let Some(value) = take_option(args, &mut idx, "--category")? {
            category = Filter::<Category>::parse(&value);
        } else if let Some(value) = take_option(args, &mut idx, "--difficulty")? {
            difficulty = Filter::<Difficulty>::parse(&value);
        } else {
            return Err(format!("Unknown list option '{}'", args[idx]));
        }
        idx += 1;
    }

    let results = catalog::search(entries, &query, category, difficulty);
    print_entries(&results, json)
}

fn featured(entries: &[CatalogEntry], args: &[String]) -> Result<(), String>
{
    let mut limit = DEFAULT_FEATURED;
    let mut json = false;

    let mut idx = 0;
    while idx < args.len() {
        if args[idx] == "--json" {
            json = true;
        } else if let Some(value) = take_option(args, &mut idx, "--limit")? {
            limit = value
                .parse::<usize>()
                .map_err(|_| "--limit must be a non-negative integer".to_string())?;
        } else {
            return Err(format!("Unknown featured option '{}'", args[idx]));
        }
        idx += 1;
    }

    print_entries(&catalog::select_featured(entries, limit), json)
}

fn print_entries(results: &[&CatalogEntry], json: bool) -> Result<(), String>
{
    if json {
        let output = serde_json::to_string_pretty(results)
            .map_err(|err| format!("Failed to encode entries: {err}"))?;
        println!("{output}");
        return Ok(());
    }

    if results.is_empty() {
        println!("No scripts match.");
    }
    for entry in results {
        println!(
            "{:<22} {:<28} {:<17} {:<12}{}",
            entry.id,
            entry.title,
            entry.category.label(),
            entry.difficulty.label(),
            if entry.featured { " *" } else { "" }
        );
    }
    Ok(())
}

fn lookup<'a>(entries: &'a [CatalogEntry], id: Option<&String>) -> Result<&'a CatalogEntry, String>
{
    let id = id.ok_or_else(|| "Expected an entry id. Run `list` to see them.".to_string())?;
    catalog::find(entries, id).ok_or_else(|| format!("No catalog entry with id '{id}'"))
}

fn show(entries: &[CatalogEntry], args: &[String]) -> Result<(), String>
{
    let entry = lookup(entries, args.first())?;
    let mut code_only = false;
    for arg in &args[1..] {
        match arg.as_str() {
            "--code" => code_only = true,
            other => return Err(format!("Unknown show option '{other}'")),
        }
    }

    if code_only {
        print!("{}", entry.code);
        return Ok(());
    }

    println!("{}", entry.title);
    println!("{} / {}{}", entry.category, entry.difficulty, if entry.featured { "  (featured)" } else { "" });
    println!("Tags: {}", entry.tags.join(", "));
    println!();
    println!("{}", entry.description);
    println!();
    println!("How to run: {}", entry.instructions);
    if let Some(game) = games::for_entry(entry.id) {
        println!("Play it here: script-catalog {}", game.name);
    }
    println!();
    println!("--- {} ---", entry.file_name);
    print!("{}", entry.code);
    Ok(())
}

fn export(entries: &[CatalogEntry], args: &[String]) -> Result<(), String>
{
    let entry = lookup(entries, args.first())?;
    let mut dir = config::export_dir();

    let mut idx = 1;
    while idx < args.len() {
        if let Some(value) = take_option(args, &mut idx, "--out")? {
            dir = PathBuf::from(value);
        } else {
            return Err(format!("Unknown export option '{}'", args[idx]));
        }
        idx += 1;
    }

    let path = export::save_code(entry, &dir)?;
    println!("Saved {} to {}", entry.id, path.display());
    Ok(())
}

fn list_games()
{
    println!("Playable demos:");
    for game in games::registry() {
        println!("  {:<10} - {} (entry: {})", game.name, game.description, game.entry_id);
    }
}

fn print_help()
{
    println!("script-catalog");
    println!("\nUsage:");
    println!("  script-catalog                      browse interactively");
    println!("  script-catalog list [--query=TEXT] [--category=C] [--difficulty=D] [--json]");
    println!("  script-catalog featured [--limit=3] [--json]");
    println!("  script-catalog show <id> [--code]");
    println!("  script-catalog export <id> [--out=DIR]");
    println!("  script-catalog games");
    println!("  script-catalog snake [--width=20] [--height=15] [--tick-ms=120] [--seed=N]");
    println!("\nCategories: mini-game, utility, learning-snippet. Levels: beginner, intermediate, advanced.");
    println!("\nNotes:");
    println!("  CATALOG_EXPORT_DIR sets the default export directory (default: current directory).");
    println!("  SNAKE_TICK_MS sets the default snake tick.");
    println!("  RUST_LOG=debug enables logging to stderr; redirect it while the browser is open.");
}
