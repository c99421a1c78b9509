use crate::config;
use crate::term::{self, TerminalGuard};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Stdout;
use std::time::{Duration, Instant};

pub const DEFAULT_WIDTH: u16 = 20;
pub const DEFAULT_HEIGHT: u16 = 15;
pub const DEFAULT_TICK_MS: u64 = 120;
pub const REWARD: u32 = 10;
const MIN_SIDE: u16 = 8;
const MAX_SIDE: u16 = 60;
const MIN_TICK_MS: u64 = 30;
const MAX_TICK_MS: u64 = 1000;
const SAMPLES_PER_CELL: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point
{
    pub x: i32,
    pub y: i32,
}

impl Point
{
    pub const fn new(x: i32, y: i32) -> Self
    {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading
{
    Up,
    Down,
    Left,
    Right,
}

impl Heading
{
    pub fn delta(self) -> (i32, i32)
    {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self
    {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status
{
    Running,
    Crashed,
    BoardFull,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent
{
    Moved,
    Ate,
    Crashed,
    BoardFull,
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile
{
    Empty,
    Head,
    Body,
    Target,
}

/// Source of candidate target cells. Anything implementing `rand::Rng`
/// samples uniformly over the board; tests can script exact cells.
pub trait CellSource
{
    fn next_cell(&mut self, width: u16, height: u16) -> Point;
}

impl<R: Rng> CellSource for R
{
    fn next_cell(&mut self, width: u16, height: u16) -> Point
    {
        Point::new(
            self.gen_range(0..i32::from(width.max(1))),
            self.gen_range(0..i32::from(height.max(1))),
        )
    }
}

#[derive(Clone, Debug)]
pub struct GameState
{
    width: u16,
    height: u16,
    body: Vec<Point>,
    heading: Heading,
    target: Option<Point>,
    score: u32,
    status: Status,
}

impl GameState
{
    pub fn new(width: u16, height: u16, source: &mut impl CellSource) -> Self
    {
        let width = width.max(1);
        let height = height.max(1);
        let start = Point::new(i32::from(width / 2), i32::from(height / 2));
        let mut state = Self {
            width,
            height,
            body: vec![start],
            heading: Heading::Right,
            target: None,
            score: 0,
            status: Status::Running,
        };
        state.target = state.place_target(source);
        if state.target.is_none() {
            state.status = Status::BoardFull;
        }
        state
    }

    pub fn width(&self) -> u16
    {
        self.width
    }

    pub fn height(&self) -> u16
    {
        self.height
    }

    pub fn body(&self) -> &[Point]
    {
        &self.body
    }

    pub fn head(&self) -> Point
    {
        self.body[0]
    }

    pub fn heading(&self) -> Heading
    {
        self.heading
    }

    pub fn target(&self) -> Option<Point>
    {
        self.target
    }

    pub fn score(&self) -> u32
    {
        self.score
    }

    pub fn status(&self) -> Status
    {
        self.status
    }

    pub fn is_terminal(&self) -> bool
    {
        self.status != Status::Running
    }

    /// Reversing straight into the neck is ignored, as is any change once the
    /// game has ended. Returns whether the heading was replaced.
    pub fn set_heading(&mut self, heading: Heading) -> bool
    {
        if self.is_terminal() || heading == self.heading.opposite() {
            return false;
        }
        self.heading = heading;
        true
    }

    pub fn step(&mut self, source: &mut impl CellSource) -> StepEvent
    {
        if self.is_terminal() {
            return StepEvent::Idle;
        }

        let (dx, dy) = self.heading.delta();
        let head = self.head();
        let candidate = Point::new(head.x + dx, head.y + dy);

        if !self.in_bounds(candidate) || self.body.contains(&candidate) {
            self.status = Status::Crashed;
            debug!("snake crashed at ({}, {}) with score {}", candidate.x, candidate.y, self.score);
            return StepEvent::Crashed;
        }

        self.body.insert(0, candidate);

        if self.target == Some(candidate) {
            self.score += REWARD;
            self.target = self.place_target(source);
            match self.target {
                Some(target) => {
                    debug!("target eaten, next at ({}, {}), score {}", target.x, target.y, self.score);
                    StepEvent::Ate
                }
                None => {
                    self.status = Status::BoardFull;
                    info!("board filled with score {}", self.score);
                    StepEvent::BoardFull
                }
            }
        } else {
            self.body.pop();
            StepEvent::Moved
        }
    }

    pub fn tiles(&self) -> Vec<Vec<Tile>>
    {
        let mut grid = vec![vec![Tile::Empty; self.width as usize]; self.height as usize];
        if let Some(target) = self.target {
            grid[target.y as usize][target.x as usize] = Tile::Target;
        }
        for (idx, cell) in self.body.iter().enumerate() {
            grid[cell.y as usize][cell.x as usize] = if idx == 0 { Tile::Head } else { Tile::Body };
        }
        grid
    }

    fn in_bounds(&self, cell: Point) -> bool
    {
        cell.x >= 0 && cell.y >= 0 && cell.x < i32::from(self.width) && cell.y < i32::from(self.height)
    }

    fn area(&self) -> usize
    {
        self.width as usize * self.height as usize
    }

    // Rejection sampling, bounded so a skewed source cannot spin forever; the
    // fallback is the first free cell in row-major order.
    fn place_target(&self, source: &mut impl CellSource) -> Option<Point>
    {
        if self.body.len() >= self.area() {
            return None;
        }
        for _ in 0..self.area() * SAMPLES_PER_CELL {
            let cell = source.next_cell(self.width, self.height);
            if self.in_bounds(cell) && !self.body.contains(&cell) {
                return Some(cell);
            }
        }
        (0..i32::from(self.height))
            .flat_map(|y| (0..i32::from(self.width)).map(move |x| Point::new(x, y)))
            .find(|cell| !self.body.contains(cell))
    }
}

pub fn render_rows(tiles: &[Vec<Tile>]) -> Vec<String>
{
    let width = tiles.first().map_or(0, |row| row.len());
    let border = format!("+{}+", "-".repeat(width));
    let mut lines = Vec::with_capacity(tiles.len() + 2);
    lines.push(border.clone());
    for row in tiles {
        let mut line = String::with_capacity(width + 2);
        line.push('|');
        for tile in row {
            line.push(match tile {
                Tile::Empty => ' ',
                Tile::Head => '@',
                Tile::Body => 'o',
                Tile::Target => '*',
            });
        }
        line.push('|');
        lines.push(line);
    }
    lines.push(border);
    lines
}

#[derive(Clone, Debug, PartialEq)]
pub struct SnakeConfig
{
    pub width: u16,
    pub height: u16,
    pub tick: Duration,
    pub seed: Option<u64>,
}

impl SnakeConfig
{
    pub fn from_args(args: &[String]) -> Result<Self, String>
    {
        let mut config = Self::default();
        if let Some(tick_ms) = config::tick_override()? {
            config.tick = clamp_tick(tick_ms);
        }

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag, Some(value.to_string())),
                None => (arg.as_str(), None),
            };
            let mut value = || -> Result<String, String> {
                match &inline {
                    Some(value) => Ok(value.clone()),
                    None => iter
                        .next()
                        .cloned()
                        .ok_or_else(|| format!("Expected value after {flag}")),
                }
            };
            match flag {
                "--width" => config.width = parse_side(&value()?, "width")?,
                "--height" => config.height = parse_side(&value()?, "height")?,
                "--tick-ms" => config.tick = clamp_tick(parse_number(&value()?, "tick-ms")?),
                "--seed" => config.seed = Some(parse_number(&value()?, "seed")?),
                _ => return Err(format!("Unknown snake option '{arg}'")),
            }
        }

        Ok(config)
    }
}

impl Default for SnakeConfig
{
    fn default() -> Self
    {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            seed: None,
        }
    }
}

fn parse_number(value: &str, name: &str) -> Result<u64, String>
{
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("{name} must be a non-negative integer"))
}

fn parse_side(value: &str, name: &str) -> Result<u16, String>
{
    let parsed = parse_number(value, name)?;
    Ok(parsed.clamp(u64::from(MIN_SIDE), u64::from(MAX_SIDE)) as u16)
}

fn clamp_tick(millis: u64) -> Duration
{
    Duration::from_millis(millis.clamp(MIN_TICK_MS, MAX_TICK_MS))
}

pub fn run_with_config(config: SnakeConfig) -> Result<(), String>
{
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut term = TerminalGuard::enter().map_err(|err| err.to_string())?;
    let mut best = 0u32;

    loop {
        let mut game = GameState::new(config.width, config.height, &mut rng);
        info!(
            "snake started on {}x{} board, tick {}ms",
            config.width,
            config.height,
            config.tick.as_millis()
        );

        let start = Instant::now();
        let mut last_tick = Instant::now();
        draw_ui(term.stdout(), &game, best, start.elapsed())?;

        while !game.is_terminal() {
            if handle_input(&mut game)? {
                return Ok(());
            }

            if last_tick.elapsed() >= config.tick {
                game.step(&mut rng);
                draw_ui(term.stdout(), &game, best, start.elapsed())?;
                last_tick = Instant::now();
            }

            std::thread::sleep(Duration::from_millis(1));
        }

        best = best.max(game.score());
        info!("snake finished: {:?} with score {}", game.status(), game.score());
        draw_summary(term.stdout(), &game, best, start.elapsed())?;
        if !wait_for_restart()? {
            return Ok(());
        }
    }
}

fn heading_for_key(code: KeyCode) -> Option<Heading>
{
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Heading::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Heading::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Heading::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Heading::Right),
        _ => None,
    }
}

fn handle_input(game: &mut GameState) -> Result<bool, String>
{
    while event::poll(Duration::from_millis(0)).map_err(|err| err.to_string())? {
        if let Event::Key(KeyEvent { code, modifiers, .. }) =
            event::read().map_err(|err| err.to_string())?
        {
            match code {
                KeyCode::Esc | KeyCode::Char('q') => return Ok(true),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true)
                }
                _ => {
                    if let Some(heading) = heading_for_key(code) {
                        game.set_heading(heading);
                    }
                }
            }
        }
    }

    Ok(false)
}

fn draw_ui(stdout: &mut Stdout, game: &GameState, best: u32, elapsed: Duration) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("Script Catalog - ASCII Snake".to_string());
    lines.push(format!(
        "Board: {}x{}  Score: {:>4}  Best: {:>4}  Length: {:>3}  Time: {:>5.1}s",
        game.width(),
        game.height(),
        game.score(),
        best,
        game.body().len(),
        elapsed.as_secs_f32()
    ));
    lines.extend(render_rows(&game.tiles()));
    lines.push("Controls: arrows or WASD to steer, ESC or q to quit".to_string());
    term::draw_lines(stdout, &lines)
}

fn draw_summary(stdout: &mut Stdout, game: &GameState, best: u32, elapsed: Duration) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push(
        match game.status() {
            Status::BoardFull => "Board filled - you win!",
            _ => "Game over",
        }
        .to_string(),
    );
    lines.push(String::new());
    lines.extend(render_rows(&game.tiles()));
    lines.push(format!("Score: {}", game.score()));
    lines.push(format!("Best: {}", best));
    lines.push(format!("Length: {}", game.body().len()));
    lines.push(format!("Duration: {:>5.1}s", elapsed.as_secs_f32()));
    lines.push(String::new());
    lines.push("Press R to play again, SPACE or ESC to exit.".to_string());
    term::draw_lines(stdout, &lines)
}

fn wait_for_restart() -> Result<bool, String>
{
    term::drain_events()?;

    loop {
        if event::poll(Duration::from_millis(50)).map_err(|err| err.to_string())? {
            if let Event::Key(KeyEvent { code, .. }) = event::read().map_err(|err| err.to_string())? {
                match code {
                    KeyCode::Char('r') | KeyCode::Char('R') => return Ok(true),
                    KeyCode::Char(' ') | KeyCode::Esc | KeyCode::Char('q') => return Ok(false),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    /// Hands out scripted cells in order, then keeps returning the last one.
    struct Script
    {
        cells: Vec<Point>,
        next: usize,
    }

    impl Script
    {
        fn new(cells: &[(i32, i32)]) -> Self
        {
            Self {
                cells: cells.iter().map(|&(x, y)| Point::new(x, y)).collect(),
                next: 0,
            }
        }
    }

    impl CellSource for Script
    {
        fn next_cell(&mut self, _width: u16, _height: u16) -> Point
        {
            let cell = self.cells[self.next.min(self.cells.len() - 1)];
            self.next += 1;
            cell
        }
    }

    fn points(cells: &[(i32, i32)]) -> Vec<Point>
    {
        cells.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn new_game_starts_centred_heading_right()
    {
        let game = GameState::new(20, 15, &mut Script::new(&[(3, 3)]));
        assert_eq!(game.body(), points(&[(10, 7)]).as_slice());
        assert_eq!(game.heading(), Heading::Right);
        assert_eq!(game.target(), Some(Point::new(3, 3)));
        assert_eq!(game.score(), 0);
        assert!(!game.is_terminal());
    }

    #[test]
    fn eating_the_target_grows_and_scores()
    {
        let mut source = Script::new(&[(11, 7), (0, 0)]);
        let mut game = GameState::new(20, 15, &mut source);
        assert_eq!(game.step(&mut source), StepEvent::Ate);
        assert_eq!(game.body(), points(&[(11, 7), (10, 7)]).as_slice());
        assert_eq!(game.score(), REWARD);
        assert_eq!(game.target(), Some(Point::new(0, 0)));
        assert!(!game.is_terminal());
    }

    #[test]
    fn leaving_the_board_crashes_without_moving()
    {
        let mut source = Script::new(&[(5, 5)]);
        let mut game = GameState::new(20, 15, &mut source);
        game.body = points(&[(0, 7)]);
        game.heading = Heading::Left;

        assert_eq!(game.step(&mut source), StepEvent::Crashed);
        assert!(game.is_terminal());
        assert_eq!(game.status(), Status::Crashed);
        assert_eq!(game.body(), points(&[(0, 7)]).as_slice());
    }

    #[test]
    fn running_into_the_body_crashes()
    {
        let mut source = Script::new(&[(0, 0)]);
        let mut game = GameState::new(20, 15, &mut source);
        game.body = points(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)]);
        game.heading = Heading::Down;

        assert_eq!(game.step(&mut source), StepEvent::Crashed);
        assert_eq!(game.body().len(), 5);
    }

    #[test]
    fn plain_move_keeps_length()
    {
        let mut source = Script::new(&[(0, 0)]);
        let mut game = GameState::new(20, 15, &mut source);
        game.body = points(&[(5, 5), (4, 5), (3, 5)]);

        assert_eq!(game.step(&mut source), StepEvent::Moved);
        assert_eq!(game.body(), points(&[(6, 5), (5, 5), (4, 5)]).as_slice());
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn step_after_terminal_is_a_no_op()
    {
        let mut source = Script::new(&[(5, 5)]);
        let mut game = GameState::new(20, 15, &mut source);
        game.body = points(&[(19, 2)]);
        assert_eq!(game.step(&mut source), StepEvent::Crashed);

        let before = game.clone();
        assert_eq!(game.step(&mut source), StepEvent::Idle);
        assert_eq!(game.body(), before.body());
        assert_eq!(game.score(), before.score());
        assert_eq!(game.target(), before.target());
        assert!(!game.set_heading(Heading::Up));
        assert_eq!(game.heading(), before.heading());
    }

    #[test]
    fn reversal_is_ignored_but_turns_apply()
    {
        let mut game = GameState::new(20, 15, &mut Script::new(&[(0, 0)]));
        assert!(!game.set_heading(Heading::Left));
        assert_eq!(game.heading(), Heading::Right);
        assert!(game.set_heading(Heading::Up));
        assert_eq!(game.heading(), Heading::Up);
        assert!(!game.set_heading(Heading::Down));
        assert!(game.set_heading(Heading::Up));
    }

    #[test]
    fn filling_the_board_is_a_win()
    {
        let mut source = Script::new(&[(1, 0), (0, 0), (0, 1)]);
        let mut game = GameState::new(2, 2, &mut source);
        assert_eq!(game.head(), Point::new(1, 1));
        assert_eq!(game.target(), Some(Point::new(1, 0)));

        assert!(game.set_heading(Heading::Up));
        assert_eq!(game.step(&mut source), StepEvent::Ate);
        assert!(game.set_heading(Heading::Left));
        assert_eq!(game.step(&mut source), StepEvent::Ate);
        assert!(game.set_heading(Heading::Down));
        assert_eq!(game.step(&mut source), StepEvent::BoardFull);

        assert_eq!(game.status(), Status::BoardFull);
        assert!(game.is_terminal());
        assert_eq!(game.target(), None);
        assert_eq!(game.body().len(), 4);
        assert_eq!(game.score(), REWARD * 3);
    }

    #[test]
    fn placement_falls_back_when_source_only_hits_the_body()
    {
        let mut source = Script::new(&[(10, 7)]);
        let game = GameState::new(20, 15, &mut source);
        assert_eq!(game.target(), Some(Point::new(0, 0)));
    }

    #[test]
    fn tiles_mark_head_body_and_target()
    {
        let mut source = Script::new(&[(0, 0)]);
        let mut game = GameState::new(4, 3, &mut source);
        game.body = points(&[(2, 1), (1, 1)]);
        let tiles = game.tiles();
        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[0][0], Tile::Target);
        assert_eq!(tiles[1][2], Tile::Head);
        assert_eq!(tiles[1][1], Tile::Body);
        assert_eq!(tiles[2][3], Tile::Empty);

        let rows = render_rows(&tiles);
        assert_eq!(rows, vec!["+----+", "|*   |", "| o@ |", "|    |", "+----+"]);
    }

    #[test]
    fn config_parses_both_flag_forms()
    {
        let args: Vec<String> = ["--width=30", "--height", "12", "--tick-ms=5", "--seed", "42"]
            .iter()
            .map(|arg| arg.to_string())
            .collect();
        let config = SnakeConfig::from_args(&args).unwrap();
        assert_eq!(config.width, 30);
        assert_eq!(config.height, 12);
        assert_eq!(config.tick, Duration::from_millis(MIN_TICK_MS));
        assert_eq!(config.seed, Some(42));

        let oversized = SnakeConfig::from_args(&["--width=500".to_string()]).unwrap();
        assert_eq!(oversized.width, MAX_SIDE);
    }

    #[test]
    fn config_rejects_unknown_and_malformed_options()
    {
        assert!(SnakeConfig::from_args(&["--speed=3".to_string()]).is_err());
        assert!(SnakeConfig::from_args(&["--width=wide".to_string()]).is_err());
        assert!(SnakeConfig::from_args(&["--seed".to_string()]).is_err());
    }

    fn heading_strategy() -> impl Strategy<Value = Heading>
    {
        prop::sample::select(vec![Heading::Up, Heading::Down, Heading::Left, Heading::Right])
    }

    proptest! {
        #[test]
        fn random_play_keeps_invariants(
            seed in 0u64..500,
            turns in proptest::collection::vec(proptest::option::of(heading_strategy()), 1..200),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut game = GameState::new(10, 8, &mut rng);

            for turn in turns {
                if let Some(heading) = turn {
                    game.set_heading(heading);
                }
                let before = game.clone();
                let event = game.step(&mut rng);

                match event {
                    StepEvent::Ate | StepEvent::BoardFull => {
                        prop_assert_eq!(game.body().len(), before.body().len() + 1);
                        prop_assert_eq!(game.score(), before.score() + REWARD);
                    }
                    StepEvent::Moved => {
                        prop_assert_eq!(game.body().len(), before.body().len());
                        prop_assert_eq!(game.score(), before.score());
                    }
                    StepEvent::Crashed | StepEvent::Idle => {
                        prop_assert_eq!(game.body(), before.body());
                        prop_assert_eq!(game.score(), before.score());
                    }
                }

                if let Some(target) = game.target() {
                    prop_assert!(!game.body().contains(&target));
                }
                let distinct: HashSet<Point> = game.body().iter().copied().collect();
                prop_assert_eq!(distinct.len(), game.body().len());
                prop_assert!(game.body().len() <= 10 * 8);
            }
        }

        #[test]
        fn opposite_heading_never_applies(first in heading_strategy()) {
            let mut rng = StdRng::seed_from_u64(7);
            let mut game = GameState::new(20, 15, &mut rng);
            game.set_heading(first);
            let current = game.heading();
            prop_assert!(!game.set_heading(current.opposite()));
            prop_assert_eq!(game.heading(), current);
        }
    }
}
