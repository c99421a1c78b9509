pub mod snake;

pub struct GameDescriptor
{
    pub name: &'static str,
    pub description: &'static str,
    pub entry_id: &'static str,
}

pub fn registry() -> Vec<GameDescriptor>
{
    vec![GameDescriptor {
        name: "snake",
        description: "ASCII snake on a fixed-tick grid",
        entry_id: "ascii-snake",
    }]
}

pub fn for_entry(entry_id: &str) -> Option<GameDescriptor>
{
    registry()
        .into_iter()
        .find(|game| game.entry_id == entry_id)
}

pub fn run(name: &str, args: &[String]) -> Result<(), String>
{
    match name {
        "snake" => {
            let config = snake::SnakeConfig::from_args(args)?;
            snake::run_with_config(config)
        }
        _ => Err(format!("Unknown game '{name}'. Run with --help.")),
    }
}
