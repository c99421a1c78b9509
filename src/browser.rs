use crate::catalog::{self, CatalogEntry, Category, Difficulty, Filter};
use crate::config;
use crate::export;
use crate::games;
use crate::term::{self, TerminalGuard};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;
use std::io::Stdout;
use std::time::Duration;

const FEATURED_LIMIT: usize = 3;
const POLL_MS: u64 = 50;
const HEADER_LINES: usize = 6;
const FOOTER_LINES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View
{
    List,
    Detail(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action
{
    None,
    Quit,
    Play(&'static str),
    Save(&'static str),
}

pub struct Browser
{
    query: String,
    category: Filter<Category>,
    difficulty: Filter<Difficulty>,
    selected: usize,
    scroll: usize,
    view: View,
    message: Option<String>,
}

impl Browser
{
    pub fn new() -> Self
    {
        Self {
            query: String::new(),
            category: Filter::Any,
            difficulty: Filter::Any,
            selected: 0,
            scroll: 0,
            view: View::List,
            message: None,
        }
    }

    pub fn results<'a>(&self, entries: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry>
    {
        catalog::search(entries, &self.query, self.category, self.difficulty)
    }

    pub fn selected_entry<'a>(&self, entries: &'a [CatalogEntry]) -> Option<&'a CatalogEntry>
    {
        self.results(entries).get(self.selected).copied()
    }

    pub fn view(&self) -> View
    {
        self.view
    }

    pub fn set_message(&mut self, message: impl Into<String>)
    {
        self.message = Some(message.into());
    }

    pub fn handle_key(&mut self, key: KeyEvent, entries: &[CatalogEntry]) -> Action
    {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        match self.view {
            View::List => self.handle_list_key(key, entries),
            View::Detail(id) => self.handle_detail_key(key, id, entries),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, entries: &[CatalogEntry]) -> Action
    {
        let count = self.results(entries).len();
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
            }
            KeyCode::Tab => {
                self.category = self.category.cycle();
                self.selected = 0;
                debug!("category filter: {}", self.category.label());
            }
            KeyCode::BackTab => {
                self.difficulty = self.difficulty.cycle();
                self.selected = 0;
                debug!("difficulty filter: {}", self.difficulty.label());
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.selected = 0;
            }
            KeyCode::Enter => {
                if let Some(entry) = self.selected_entry(entries) {
                    self.view = View::Detail(entry.id);
                    self.scroll = 0;
                    self.message = None;
                }
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.query.push(ch);
                self.selected = 0;
            }
            _ => {}
        }
        Action::None
    }

    fn handle_detail_key(&mut self, key: KeyEvent, id: &'static str, entries: &[CatalogEntry]) -> Action
    {
        let last_line = catalog::find(entries, id)
            .map_or(0, |entry| entry.code.lines().count().saturating_sub(1));
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => {
                self.view = View::List;
                self.message = None;
            }
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = (self.scroll + 1).min(last_line),
            KeyCode::Char('s') | KeyCode::Char('S') => return Action::Save(id),
            KeyCode::Char('p') | KeyCode::Char('P') => match games::for_entry(id) {
                Some(game) => return Action::Play(game.name),
                None => self.message = Some("This entry has no playable demo.".to_string()),
            },
            _ => {}
        }
        Action::None
    }
}

impl Default for Browser
{
    fn default() -> Self
    {
        Self::new()
    }
}

pub fn run(entries: &[CatalogEntry]) -> Result<(), String>
{
    let mut browser = Browser::new();
    loop {
        match browse(&mut browser, entries)? {
            Action::Play(name) => {
                games::run(name, &[])?;
            }
            _ => return Ok(()),
        }
    }
}

// Owns the terminal until the user quits or asks to play; games take over
// the terminal themselves, so the guard is released before returning.
fn browse(browser: &mut Browser, entries: &[CatalogEntry]) -> Result<Action, String>
{
    let mut term = TerminalGuard::enter().map_err(|err| err.to_string())?;
    let mut dirty = true;

    loop {
        if dirty {
            draw(term.stdout(), browser, entries)?;
            dirty = false;
        }

        if !event::poll(Duration::from_millis(POLL_MS)).map_err(|err| err.to_string())? {
            continue;
        }
        match event::read().map_err(|err| err.to_string())? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                dirty = true;
                match browser.handle_key(key, entries) {
                    Action::None => {}
                    Action::Save(id) => save(browser, entries, id),
                    other => return Ok(other),
                }
            }
            Event::Resize(_, _) => dirty = true,
            _ => {}
        }
    }
}

fn save(browser: &mut Browser, entries: &[CatalogEntry], id: &str)
{
    let Some(entry) = catalog::find(entries, id) else {
        return;
    };
    match export::save_code(entry, &config::export_dir()) {
        Ok(path) => browser.set_message(format!("Saved to {}", path.display())),
        Err(err) => browser.set_message(err),
    }
}

fn draw(stdout: &mut Stdout, browser: &Browser, entries: &[CatalogEntry]) -> Result<(), String>
{
    let (width, height) = term::size();
    let lines = match browser.view {
        View::List => list_lines(browser, entries, width, height),
        View::Detail(id) => match catalog::find(entries, id) {
            Some(entry) => detail_lines(browser, entry, width, height),
            None => vec![format!("Entry '{id}' is missing")],
        },
    };
    term::draw_lines(stdout, &lines)
}

fn list_lines(browser: &Browser, entries: &[CatalogEntry], width: usize, height: usize) -> Vec<String>
{
    let results = browser.results(entries);
    let featured: Vec<&str> = catalog::select_featured(entries, FEATURED_LIMIT)
        .iter()
        .map(|entry| entry.title)
        .collect();

    let mut lines = Vec::new();
    lines.push("Script Catalog".to_string());
    lines.push(truncate(&format!("Featured: {}", featured.join("  |  ")), width));
    lines.push(String::new());
    lines.push(format!("Search: {}_", browser.query));
    lines.push(format!(
        "Category: {:<18} Level: {:<14} {} of {} scripts",
        browser.category.label(),
        browser.difficulty.label(),
        results.len(),
        entries.len()
    ));
    lines.push("-".repeat(width.clamp(10, 100)));

    let visible = (height.saturating_sub(HEADER_LINES + FOOTER_LINES) / 2).max(1);
    let start = if browser.selected >= visible {
        browser.selected + 1 - visible
    } else {
        0
    };

    if results.is_empty() {
        lines.push("No scripts match this search.".to_string());
    }
    for (idx, entry) in results.iter().enumerate().skip(start).take(visible) {
        let marker = if idx == browser.selected { ">" } else { " " };
        let star = if entry.featured { " *" } else { "" };
        let playable = if games::for_entry(entry.id).is_some() { " [playable]" } else { "" };
        lines.push(truncate(
            &format!(
                "{marker} {}{star}  ({} / {}){playable}",
                entry.title, entry.category, entry.difficulty
            ),
            width,
        ));
        lines.push(truncate(&format!("    {}", entry.description), width));
    }

    lines.push(String::new());
    lines.push(browser.message.clone().unwrap_or_default());
    lines.push("Type to search, Tab category, Shift-Tab level, Up/Down select, Enter open, Esc quit".to_string());
    lines
}

fn detail_lines(browser: &Browser, entry: &CatalogEntry, width: usize, height: usize) -> Vec<String>
{
    let mut lines = Vec::new();
    lines.push(entry.title.to_string());
    lines.push(format!(
        "{} / {}{}",
        entry.category,
        entry.difficulty,
        if entry.featured { "  (featured)" } else { "" }
    ));
    lines.push(format!("Tags: {}", entry.tags.join(", ")));
    lines.push(String::new());
    lines.push(truncate(entry.description, width));
    lines.push(truncate(&format!("How to run: {}", entry.instructions), width));
    lines.push(format!("--- {} ---", entry.file_name));

    let used = lines.len() + FOOTER_LINES + 1;
    let room = height.saturating_sub(used).max(1);
    let code: Vec<&str> = entry.code.lines().collect();
    let scroll = browser.scroll.min(code.len().saturating_sub(room));
    for line in code.iter().skip(scroll).take(room) {
        lines.push(truncate(line, width));
    }
    lines.push("---".to_string());

    lines.push(browser.message.clone().unwrap_or_default());
    let play_hint = if games::for_entry(entry.id).is_some() { ", p play" } else { "" };
    lines.push(format!("Up/Down scroll, s save code{play_hint}, Esc back"));
    lines
}

fn truncate(text: &str, width: usize) -> String
{
    text.chars().take(width.max(1)).collect()
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::catalog::entries;

    fn key(code: KeyCode) -> KeyEvent
    {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(browser: &mut Browser, entries: &[CatalogEntry], text: &str)
    {
        for ch in text.chars() {
            browser.handle_key(key(KeyCode::Char(ch)), entries);
        }
    }

    #[test]
    fn typing_narrows_results_and_resets_selection()
    {
        let catalog = entries::builtin();
        let mut browser = Browser::new();
        browser.handle_key(key(KeyCode::Down), &catalog);
        assert_eq!(browser.selected, 1);

        type_text(&mut browser, &catalog, "SNAKE");
        assert_eq!(browser.selected, 0);
        let ids: Vec<&str> = browser.results(&catalog).iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec!["ascii-snake"]);

        for _ in 0..5 {
            browser.handle_key(key(KeyCode::Backspace), &catalog);
        }
        assert_eq!(browser.results(&catalog).len(), catalog.len());
    }

    #[test]
    fn tab_and_backtab_cycle_filters()
    {
        let catalog = entries::builtin();
        let mut browser = Browser::new();
        browser.handle_key(key(KeyCode::Tab), &catalog);
        assert_eq!(browser.category, Filter::Only(Category::MiniGame));
        assert!(browser
            .results(&catalog)
            .iter()
            .all(|entry| entry.category == Category::MiniGame));

        browser.handle_key(key(KeyCode::BackTab), &catalog);
        assert_eq!(browser.difficulty, Filter::Only(Difficulty::Beginner));
        assert!(browser.results(&catalog).iter().all(|entry| {
            entry.category == Category::MiniGame && entry.difficulty == Difficulty::Beginner
        }));
    }

    #[test]
    fn selection_stays_within_results()
    {
        let catalog = entries::builtin();
        let mut browser = Browser::new();
        browser.handle_key(key(KeyCode::Up), &catalog);
        assert_eq!(browser.selected, 0);
        for _ in 0..catalog.len() + 5 {
            browser.handle_key(key(KeyCode::Down), &catalog);
        }
        assert_eq!(browser.selected, catalog.len() - 1);
    }

    #[test]
    fn detail_view_offers_save_and_play()
    {
        let catalog = entries::builtin();
        let mut browser = Browser::new();
        type_text(&mut browser, &catalog, "snake");
        assert_eq!(browser.handle_key(key(KeyCode::Enter), &catalog), Action::None);
        assert_eq!(browser.view(), View::Detail("ascii-snake"));

        assert_eq!(browser.handle_key(key(KeyCode::Char('s')), &catalog), Action::Save("ascii-snake"));
        assert_eq!(browser.handle_key(key(KeyCode::Char('p')), &catalog), Action::Play("snake"));

        browser.handle_key(key(KeyCode::Esc), &catalog);
        assert_eq!(browser.view(), View::List);
        assert_eq!(browser.query, "snake");
    }

    #[test]
    fn detail_scroll_stops_at_the_last_code_line()
    {
        let catalog = entries::builtin();
        let mut browser = Browser::new();
        type_text(&mut browser, &catalog, "json pretty");
        browser.handle_key(key(KeyCode::Enter), &catalog);
        assert_eq!(browser.view(), View::Detail("json-pretty"));

        let last_line = catalog::find(&catalog, "json-pretty").unwrap().code.lines().count() - 1;
        for _ in 0..last_line + 10 {
            browser.handle_key(key(KeyCode::Down), &catalog);
        }
        assert_eq!(browser.scroll, last_line);

        browser.handle_key(key(KeyCode::Up), &catalog);
        assert_eq!(browser.scroll, last_line - 1);
    }

    #[test]
    fn play_without_demo_sets_message()
    {
        let catalog = entries::builtin();
        let mut browser = Browser::new();
        type_text(&mut browser, &catalog, "closures");
        browser.handle_key(key(KeyCode::Enter), &catalog);
        assert_eq!(browser.handle_key(key(KeyCode::Char('p')), &catalog), Action::None);
        assert!(browser.message.is_some());
    }

    #[test]
    fn enter_on_empty_results_stays_in_list()
    {
        let catalog = entries::builtin();
        let mut browser = Browser::new();
        type_text(&mut browser, &catalog, "no such script");
        browser.handle_key(key(KeyCode::Enter), &catalog);
        assert_eq!(browser.view(), View::List);
    }

    #[test]
    fn escape_and_ctrl_c_quit_from_list()
    {
        let catalog = entries::builtin();
        let mut browser = Browser::new();
        assert_eq!(browser.handle_key(key(KeyCode::Esc), &catalog), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(browser.handle_key(ctrl_c, &catalog), Action::Quit);
        assert!(browser.query.is_empty());
    }

    #[test]
    fn list_lines_mark_the_selection()
    {
        let catalog = entries::builtin();
        let mut browser = Browser::new();
        browser.handle_key(key(KeyCode::Down), &catalog);
        let lines = list_lines(&browser, &catalog, 120, 40);
        let selected = lines.iter().find(|line| line.starts_with('>')).unwrap();
        assert!(selected.contains(catalog[1].title));
        assert!(lines[1].starts_with("Featured: ASCII Snake"));
    }
}
