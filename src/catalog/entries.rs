use super::{CatalogEntry, Category, Difficulty};

pub fn builtin() -> Vec<CatalogEntry>
{
    vec![
        CatalogEntry {
            id: "ascii-snake",
            title: "ASCII Snake",
            category: Category::MiniGame,
            difficulty: Difficulty::Intermediate,
            tags: &["game", "grid", "keyboard", "loop"],
            featured: true,
            description: "Classic snake on a 20x15 board. Eat the target to grow, avoid the walls and your own tail.",
            instructions: "Save as snake.py and run `python3 snake.py`. Steer with W/A/S/D, press Q to quit.",
            file_name: "snake.py",
            code: r#"import curses
import random

WIDTH, HEIGHT = 20, 15
DIRS = {ord('w'): (0, -1), ord('s'): (0, 1), ord('a'): (-1, 0), ord('d'): (1, 0)}


def place_food(body):
    while True:
        cell = (random.randrange(WIDTH), random.randrange(HEIGHT))
        if cell not in body:
            return cell


def main(screen):
    curses.curs_set(0)
    screen.timeout(120)
    body = [(WIDTH // 2, HEIGHT // 2)]
    heading = (1, 0)
    food = place_food(body)
    score = 0
    while True:
        key = screen.getch()
        if key == ord('q'):
            break
        if key in DIRS and DIRS[key] != (-heading[0], -heading[1]):
            heading = DIRS[key]
        head = (body[0][0] + heading[0], body[0][1] + heading[1])
        if not (0 <= head[0] < WIDTH and 0 <= head[1] < HEIGHT) or head in body:
            break
        body.insert(0, head)
        if head == food:
            score += 10
            food = place_food(body)
        else:
            body.pop()
        screen.clear()
        screen.addstr(0, 0, f"Score: {score}")
        screen.addstr(food[1] + 1, food[0], '*')
        for x, y in body:
            screen.addstr(y + 1, x, '#')
        screen.refresh()


curses.wrapper(main)
"#,
        },
        CatalogEntry {
            id: "guess-the-number",
            title: "Guess the Number",
            category: Category::MiniGame,
            difficulty: Difficulty::Beginner,
            tags: &["game", "random", "input"],
            featured: true,
            description: "The computer picks a number between 1 and 100 and tells you if each guess is too high or too low.",
            instructions: "Save as guess.py and run `python3 guess.py`.",
            file_name: "guess.py",
            code: r#"import random

secret = random.randint(1, 100)
attempts = 0

while True:
    guess = int(input("Your guess: "))
    attempts += 1
    if guess < secret:
        print("Too low")
    elif guess > secret:
        print("Too high")
    else:
        print(f"Got it in {attempts} attempts!")
        break
"#,
        },
        CatalogEntry {
            id: "rock-paper-scissors",
            title: "Rock Paper Scissors",
            category: Category::MiniGame,
            difficulty: Difficulty::Beginner,
            tags: &["game", "random", "browser"],
            featured: false,
            description: "Best-of-five rock paper scissors against a random opponent, played in the console.",
            instructions: "Paste into the browser devtools console or run with `node rps.js`.",
            file_name: "rps.js",
            code: r#"const moves = ["rock", "paper", "scissors"];
const beats = { rock: "scissors", paper: "rock", scissors: "paper" };
let player = 0;
let cpu = 0;

while (player < 3 && cpu < 3) {
  const mine = moves[Math.floor(Math.random() * 3)];
  const theirs = moves[Math.floor(Math.random() * 3)];
  if (beats[mine] === theirs) player++;
  else if (beats[theirs] === mine) cpu++;
  console.log(`${mine} vs ${theirs} -> ${player}:${cpu}`);
}
console.log(player === 3 ? "You win" : "CPU wins");
"#,
        },
        CatalogEntry {
            id: "bulk-rename",
            title: "Bulk File Renamer",
            category: Category::Utility,
            difficulty: Difficulty::Intermediate,
            tags: &["files", "automation", "regex"],
            featured: true,
            description: "Rename every file in a folder that matches a pattern, with a dry-run preview first.",
            instructions: "Run `python3 rename.py <folder> <pattern> <replacement>`; add --apply to perform the renames.",
            file_name: "rename.py",
            code: r#"import pathlib
import re
import sys

folder, pattern, replacement = sys.argv[1:4]
apply = "--apply" in sys.argv

for path in sorted(pathlib.Path(folder).iterdir()):
    new_name = re.sub(pattern, replacement, path.name)
    if new_name == path.name:
        continue
    print(f"{path.name} -> {new_name}")
    if apply:
        path.rename(path.with_name(new_name))
"#,
        },
        CatalogEntry {
            id: "json-pretty",
            title: "JSON Pretty Printer",
            category: Category::Utility,
            difficulty: Difficulty::Beginner,
            tags: &["json", "format", "cli"],
            featured: false,
            description: "Reads JSON from stdin and prints it indented with sorted keys.",
            instructions: "Pipe any JSON into it: `cat data.json | python3 pretty.py`.",
            file_name: "pretty.py",
            code: r#"import json
import sys

data = json.load(sys.stdin)
print(json.dumps(data, indent=2, sort_keys=True))
"#,
        },
        CatalogEntry {
            id: "disk-usage",
            title: "Largest Files Finder",
            category: Category::Utility,
            difficulty: Difficulty::Advanced,
            tags: &["files", "disk", "shell"],
            featured: false,
            description: "Walks a directory tree and lists the twenty largest files with human-readable sizes.",
            instructions: "Run `bash largest.sh /path/to/dir`.",
            file_name: "largest.sh",
            code: r#"#!/usr/bin/env bash
set -euo pipefail

dir="${1:-.}"
find "$dir" -type f -printf '%s\t%p\n' \
  | sort -rn \
  | head -n 20 \
  | numfmt --field=1 --to=iec
"#,
        },
        CatalogEntry {
            id: "closures",
            title: "Closures Explained",
            category: Category::LearningSnippet,
            difficulty: Difficulty::Intermediate,
            tags: &["functions", "scope", "javascript"],
            featured: true,
            description: "A counter factory showing how inner functions keep access to variables of the outer call.",
            instructions: "Run with `node closures.js` and compare the two counters.",
            file_name: "closures.js",
            code: r#"function makeCounter(start) {
  let count = start;
  return function next() {
    count += 1;
    return count;
  };
}

const a = makeCounter(0);
const b = makeCounter(100);
console.log(a(), a(), b(), a()); // 1 2 101 3
"#,
        },
        CatalogEntry {
            id: "list-comprehensions",
            title: "List Comprehensions",
            category: Category::LearningSnippet,
            difficulty: Difficulty::Beginner,
            tags: &["python", "lists", "loops"],
            featured: false,
            description: "Loops rewritten as comprehensions, including a filter and a nested example.",
            instructions: "Run `python3 comprehensions.py` and read the printed pairs.",
            file_name: "comprehensions.py",
            code: r#"numbers = range(10)

squares = [n * n for n in numbers]
evens = [n for n in numbers if n % 2 == 0]
pairs = [(x, y) for x in range(3) for y in range(3) if x != y]

print(squares)
print(evens)
print(pairs)
"#,
        },
        CatalogEntry {
            id: "async-fetch",
            title: "Async Fetch with Retry",
            category: Category::LearningSnippet,
            difficulty: Difficulty::Advanced,
            tags: &["async", "network", "javascript"],
            featured: false,
            description: "Wraps fetch in a retry loop with exponential backoff and a per-request timeout.",
            instructions: "Run with `node retry.js <url>` on Node 18 or newer.",
            file_name: "retry.js",
            code: r#"async function fetchWithRetry(url, attempts = 4, timeoutMs = 2000) {
  for (let i = 0; i < attempts; i++) {
    const controller = new AbortController();
    const timer = setTimeout(() => controller.abort(), timeoutMs);
    try {
      const res = await fetch(url, { signal: controller.signal });
      if (res.ok) return res;
    } catch (err) {
      console.warn(`attempt ${i + 1} failed: ${err.message}`);
    } finally {
      clearTimeout(timer);
    }
    await new Promise((r) => setTimeout(r, 250 * 2 ** i));
  }
  throw new Error(`gave up on ${url}`);
}

fetchWithRetry(process.argv[2]).then((res) => console.log(res.status));
"#,
        },
    ]
}
