//! Animated terminal demo: watch A* explore a random maze.
//!
//! Run: cargo run --bin maze-demo
//!
//! One search step happens per frame. Green cells are the open set,
//! magenta cells the closed set, red the best path so far. Press `q` or
//! Escape to quit early; once the search finishes, any key exits.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use rand::RngExt;

use stepfind_core::{Maze, Point};
use stepfind_search::{Movement, Searcher, Status};

const WIDTH: i32 = 54;
const HEIGHT: i32 = 30;
const WALL_PROBABILITY: f64 = 0.3;
const MOVEMENT: Movement = Movement::Diagonal;
const FRAME_DELAY: Duration = Duration::from_millis(30);

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rng();
    // Start on the left edge, end on the right edge, random rows.
    let start = Point::new(0, rng.random_range(0..HEIGHT));
    let end = Point::new(WIDTH - 1, rng.random_range(0..HEIGHT));
    let maze = Maze::generate(WIDTH, HEIGHT, start, end, WALL_PROBABILITY, &mut rng)?;
    let mut searcher = Searcher::new(maze, MOVEMENT)?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::Clear(ClearType::All)
    )?;

    let result = animate(&mut stdout, &mut searcher);

    let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    result
}

fn animate(out: &mut impl Write, searcher: &mut Searcher) -> Result<(), Box<dyn std::error::Error>> {
    let mut steps = 0usize;
    loop {
        let status = searcher.step();
        steps += 1;
        draw(out, searcher, steps)?;

        if status.is_terminal() {
            // Leave the final frame up until a key is pressed.
            loop {
                if let Event::Key(_) = event::read()? {
                    return Ok(());
                }
            }
        }

        // The poll timeout doubles as frame pacing.
        if event::poll(FRAME_DELAY)? {
            if let Event::Key(KeyEvent {
                code, modifiers, ..
            }) = event::read()?
            {
                let ctrl_c = code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL);
                if code == KeyCode::Char('q') || code == KeyCode::Esc || ctrl_c {
                    return Ok(());
                }
            }
        }
    }
}

/// What a cell should look like this frame, later layers painting over
/// earlier ones: maze, open set, closed set, path, endpoints.
#[derive(Clone, Copy)]
struct Tile {
    ch: char,
    color: Color,
}

fn draw(
    out: &mut impl Write,
    searcher: &Searcher,
    steps: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let maze = searcher.maze();
    let w = maze.width();
    let h = maze.height();
    let idx = |p: Point| (p.y * w + p.x) as usize;

    let mut tiles = vec![
        Tile {
            ch: '.',
            color: Color::DarkGrey,
        };
        (w * h) as usize
    ];
    for y in 0..h {
        for x in 0..w {
            let p = Point::new(x, y);
            if maze.wall(p) {
                tiles[idx(p)] = Tile {
                    ch: '#',
                    color: Color::White,
                };
            }
        }
    }
    for p in searcher.closed_set() {
        tiles[idx(p)] = Tile {
            ch: 'o',
            color: Color::Magenta,
        };
    }
    for p in searcher.open_set() {
        tiles[idx(p)] = Tile {
            ch: 'o',
            color: Color::Green,
        };
    }
    if let Some(path) = searcher.path() {
        for &p in path {
            tiles[idx(p)] = Tile {
                ch: '*',
                color: Color::Red,
            };
        }
    }
    tiles[idx(maze.start())] = Tile {
        ch: '@',
        color: Color::Blue,
    };
    tiles[idx(maze.end())] = Tile {
        ch: '>',
        color: Color::Blue,
    };

    for y in 0..h {
        queue!(out, cursor::MoveTo(0, y as u16))?;
        for x in 0..w {
            let tile = tiles[idx(Point::new(x, y))];
            queue!(out, SetForegroundColor(tile.color), Print(tile.ch))?;
        }
    }

    let status_line = match searcher.status() {
        Status::Running => format!(
            "step {steps}  open {}  closed {}",
            searcher.open_set().count(),
            searcher.closed_set().count()
        ),
        Status::Succeeded => format!(
            "found a path of {} cells in {steps} steps - press any key",
            searcher.path().map_or(0, <[Point]>::len)
        ),
        Status::Exhausted => format!("no path exists ({steps} steps) - press any key"),
    };
    queue!(
        out,
        cursor::MoveTo(0, h as u16 + 1),
        ResetColor,
        terminal::Clear(ClearType::CurrentLine),
        Print(status_line)
    )?;
    out.flush()?;
    Ok(())
}
