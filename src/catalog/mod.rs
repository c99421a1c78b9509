pub mod entries;

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category
{
    MiniGame,
    Utility,
    LearningSnippet,
}

impl Category
{
    pub const ALL: [Category; 3] = [Category::MiniGame, Category::Utility, Category::LearningSnippet];

    pub fn label(self) -> &'static str
    {
        match self {
            Category::MiniGame => "Mini game",
            Category::Utility => "Utility",
            Category::LearningSnippet => "Learning snippet",
        }
    }

    pub fn slug(self) -> &'static str
    {
        match self {
            Category::MiniGame => "mini-game",
            Category::Utility => "utility",
            Category::LearningSnippet => "learning-snippet",
        }
    }

    pub fn parse(value: &str) -> Option<Self>
    {
        let normalized = normalize(value);
        Self::ALL
            .into_iter()
            .find(|category| normalize(category.slug()) == normalized)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty
{
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty
{
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn label(self) -> &'static str
    {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self>
    {
        let normalized = normalize(value);
        Self::ALL
            .into_iter()
            .find(|difficulty| normalize(difficulty.label()) == normalized)
    }
}

// "Mini game", "mini-game" and "MINI_GAME" all spell the same tag.
fn normalize(value: &str) -> String
{
    value
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry
{
    pub id: &'static str,
    pub title: &'static str,
    pub category: Category,
    pub difficulty: Difficulty,
    pub tags: &'static [&'static str],
    pub featured: bool,
    pub description: &'static str,
    pub instructions: &'static str,
    pub file_name: &'static str,
    pub code: &'static str,
}

/// One dimension of a catalog query.
///
/// `Unknown` is what an unrecognised spelling parses to. It matches nothing,
/// so a typo in a filter narrows the result to empty instead of failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter<T>
{
    Any,
    Only(T),
    Unknown,
}

impl<T: Copy + PartialEq> Filter<T>
{
    pub fn matches(&self, value: T) -> bool
    {
        match self {
            Filter::Any => true,
            Filter::Only(wanted) => *wanted == value,
            Filter::Unknown => false,
        }
    }
}

impl Filter<Category>
{
    pub fn parse(value: &str) -> Self
    {
        parse_filter(value, Category::parse)
    }

    pub fn label(&self) -> &'static str
    {
        match self {
            Filter::Any => "All categories",
            Filter::Only(category) => category.label(),
            Filter::Unknown => "Unknown category",
        }
    }

    pub fn cycle(self) -> Self
    {
        cycle_filter(self, &Category::ALL)
    }
}

impl Filter<Difficulty>
{
    pub fn parse(value: &str) -> Self
    {
        parse_filter(value, Difficulty::parse)
    }

    pub fn label(&self) -> &'static str
    {
        match self {
            Filter::Any => "All levels",
            Filter::Only(difficulty) => difficulty.label(),
            Filter::Unknown => "Unknown level",
        }
    }

    pub fn cycle(self) -> Self
    {
        cycle_filter(self, &Difficulty::ALL)
    }
}

fn parse_filter<T>(value: &str, parse: impl Fn(&str) -> Option<T>) -> Filter<T>
{
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("any") {
        return Filter::Any;
    }
    match parse(trimmed) {
        Some(value) => Filter::Only(value),
        None => {
            log::warn!("unrecognised filter value '{trimmed}', nothing will match");
            Filter::Unknown
        }
    }
}

// Any -> first -> ... -> last -> Any
fn cycle_filter<T: Copy + PartialEq>(current: Filter<T>, all: &[T]) -> Filter<T>
{
    match current {
        Filter::Any | Filter::Unknown => all.first().map_or(Filter::Any, |first| Filter::Only(*first)),
        Filter::Only(value) => match all.iter().position(|candidate| *candidate == value) {
            Some(idx) if idx + 1 < all.len() => Filter::Only(all[idx + 1]),
            _ => Filter::Any,
        },
    }
}

impl fmt::Display for Category
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.label())
    }
}

impl fmt::Display for Difficulty
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.label())
    }
}

impl CatalogEntry
{
    /// Case-insensitive substring match against title, description and tags.
    /// An empty query matches every entry; whitespace is matched as given.
    pub fn matches_text(&self, query: &str) -> bool
    {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// Entries passing the text, category and difficulty predicates, in their
/// original order.
pub fn search<'a>(
    entries: &'a [CatalogEntry],
    query: &str,
    category: Filter<Category>,
    difficulty: Filter<Difficulty>,
) -> Vec<&'a CatalogEntry>
{
    entries
        .iter()
        .filter(|entry| {
            entry.matches_text(query)
                && category.matches(entry.category)
                && difficulty.matches(entry.difficulty)
        })
        .collect()
}

pub fn select_featured(entries: &[CatalogEntry], limit: usize) -> Vec<&CatalogEntry>
{
    entries
        .iter()
        .filter(|entry| entry.featured)
        .take(limit)
        .collect()
}

pub fn find<'a>(entries: &'a [CatalogEntry], id: &str) -> Option<&'a CatalogEntry>
{
    entries.iter().find(|entry| entry.id == id)
}

pub fn validate(entries: &[CatalogEntry]) -> Result<(), String>
{
    let mut seen = HashSet::new();
    for entry in entries {
        if entry.id.trim().is_empty() {
            return Err(format!("Catalog entry '{}' has an empty id", entry.title));
        }
        if !seen.insert(entry.id) {
            return Err(format!("Duplicate catalog id '{}'", entry.id));
        }
    }
    Ok(())
}
