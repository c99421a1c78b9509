use std::env;
use std::path::PathBuf;

const EXPORT_DIR_VAR: &str = "CATALOG_EXPORT_DIR";
const TICK_VAR: &str = "SNAKE_TICK_MS";
const DEFAULT_EXPORT_DIR: &str = ".";

pub fn export_dir() -> PathBuf
{
    match env::var(EXPORT_DIR_VAR) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_EXPORT_DIR),
    }
}

pub fn tick_override() -> Result<Option<u64>, String>
{
    match env::var(TICK_VAR) {
        Ok(value) if !value.trim().is_empty() => parse_tick(&value).map(Some),
        _ => Ok(None),
    }
}

fn parse_tick(value: &str) -> Result<u64, String>
{
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("{TICK_VAR} must be a whole number of milliseconds"))
}
