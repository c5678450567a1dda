//! Checkpoint Dash entry point
//!
//! Terminal frontend: a crossterm raw-mode frame loop drives the simulation
//! tick, key events feed discrete movement commands, and the drained sim
//! events update the HUD. Leaderboard I/O runs on a worker thread and is
//! polled without blocking, so a slow or dead score server never stalls play.

use std::io::{Stdout, Write, stdout};
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{self, Color},
    terminal,
};

use checkpoint_dash::config::GameConfig;
use checkpoint_dash::leaderboard::{
    DEFAULT_TOP_N, HttpScoreStore, MemoryScoreStore, ScoreEntry, ScoreStore,
};
use checkpoint_dash::sim::{
    Direction, GameEvent, GamePhase, GameState, Outcome, apply_input, start, tick,
};

/// World units per terminal cell
const PX_PER_COL: i32 = 10;
const PX_PER_ROW: i32 = 20;

/// ~30 fps, matching a browser animation-frame cadence closely enough
const FRAME: Duration = Duration::from_millis(33);

/// Work shipped to the leaderboard thread; replies come back as entry lists
enum StoreJob {
    Submit { name: String, score: u32 },
    Fetch,
}

/// Frontend-side session bookkeeping
struct Ui {
    message: String,
    name_input: String,
    submitted: bool,
    leaderboard: Vec<ScoreEntry>,
}

impl Ui {
    fn new() -> Self {
        Self {
            message: String::new(),
            name_input: String::new(),
            submitted: false,
            leaderboard: Vec::new(),
        }
    }

    /// Consume sim render events; the core only emits values, drawing and
    /// messaging happen here.
    fn absorb(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::SessionStarted => {
                    self.message.clear();
                    self.name_input.clear();
                    self.submitted = false;
                }
                GameEvent::SessionEnded { outcome, score } => {
                    self.message = match outcome {
                        Outcome::Win => format!("You made it back! Final score: {score}"),
                        Outcome::Tagged => format!("You got tagged! Final score: {score}"),
                    };
                }
                // Positions, camera and score are re-read from the state
                // when drawing; nothing to retain here.
                _ => {}
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config_path =
        std::env::var("CHECKPOINT_DASH_CONFIG").unwrap_or_else(|_| "checkpoint-dash.json".into());
    let config = GameConfig::load(Path::new(&config_path));

    let store: Box<dyn ScoreStore + Send> = match std::env::var("CHECKPOINT_DASH_API") {
        Ok(url) => {
            log::info!("using remote leaderboard at {url}");
            Box::new(HttpScoreStore::new(url))
        }
        Err(_) => {
            log::info!("CHECKPOINT_DASH_API not set, leaderboard is local-only");
            Box::new(MemoryScoreStore::new())
        }
    };
    let (jobs, results) = spawn_store_worker(store);
    // Warm the display before the first session
    let _ = jobs.send(StoreJob::Fetch);

    let seed = std::time::UNIX_EPOCH
        .elapsed()
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(config, seed);
    let mut ui = Ui::new();

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;

    let run = run_loop(&mut out, &mut state, &mut ui, &jobs, &results);

    execute!(out, terminal::LeaveAlternateScreen, cursor::Show)?;
    terminal::disable_raw_mode()?;
    run
}

fn run_loop(
    out: &mut Stdout,
    state: &mut GameState,
    ui: &mut Ui,
    jobs: &mpsc::Sender<StoreJob>,
    results: &mpsc::Receiver<Vec<ScoreEntry>>,
) -> Result<()> {
    loop {
        let frame_start = Instant::now();

        // Drain all pending key events; each arrow press is one step
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Up => apply_input(state, Direction::Up),
                    KeyCode::Down => apply_input(state, Direction::Down),
                    KeyCode::Left => apply_input(state, Direction::Left),
                    KeyCode::Right => apply_input(state, Direction::Right),
                    code => handle_menu_key(code, state, ui, jobs)?,
                }
            }
        }

        // One frame tick: guard patrol and collision re-check
        tick(state);
        ui.absorb(state.drain_events());

        // Non-blocking pickup of leaderboard replies
        while let Ok(entries) = results.try_recv() {
            ui.leaderboard = entries;
        }

        draw(out, state, ui)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

/// Keys that are not movement: start/restart, quit from menus, name entry
fn handle_menu_key(
    code: KeyCode,
    state: &mut GameState,
    ui: &mut Ui,
    jobs: &mpsc::Sender<StoreJob>,
) -> Result<()> {
    match state.phase {
        GamePhase::Idle => {
            if matches!(code, KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char(' ')) {
                start(state);
            }
        }
        GamePhase::Running => {}
        GamePhase::Ended => {
            if ui.submitted {
                if matches!(code, KeyCode::Enter | KeyCode::Char('r')) {
                    start(state);
                }
                return Ok(());
            }
            // Name entry for the score submission
            match code {
                KeyCode::Char(c) if ui.name_input.len() < 16 => ui.name_input.push(c),
                KeyCode::Backspace => {
                    ui.name_input.pop();
                }
                KeyCode::Enter => {
                    let name = if ui.name_input.trim().is_empty() {
                        "Anonymous".to_string()
                    } else {
                        ui.name_input.trim().to_string()
                    };
                    // Fire-and-forget: exactly one submit per ended session
                    let _ = jobs.send(StoreJob::Submit { name, score: state.score() });
                    ui.submitted = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Worker thread owning the score store. Submits are followed by a refresh;
/// failures degrade to an empty list and a warning, never an error upstream.
fn spawn_store_worker(
    store: Box<dyn ScoreStore + Send>,
) -> (mpsc::Sender<StoreJob>, mpsc::Receiver<Vec<ScoreEntry>>) {
    let (job_tx, job_rx) = mpsc::channel::<StoreJob>();
    let (result_tx, result_rx) = mpsc::channel::<Vec<ScoreEntry>>();

    std::thread::spawn(move || {
        while let Ok(job) = job_rx.recv() {
            if let StoreJob::Submit { name, score } = &job {
                if let Err(err) = store.submit(name, *score) {
                    log::warn!("score submit failed: {err}");
                }
            }
            // Every job ends with a display refresh
            let entries = match store.fetch_top(DEFAULT_TOP_N) {
                Ok(entries) => entries,
                Err(err) => {
                    log::warn!("leaderboard fetch failed: {err}");
                    Vec::new()
                }
            };
            if result_tx.send(entries).is_err() {
                break;
            }
        }
    });

    (job_tx, result_rx)
}

/// Stamp a world-space box onto the character grid, offset by the camera
fn stamp(grid: &mut [Vec<char>], x: i32, y: i32, w: i32, h: i32, top_px: i32, glyph: char) {
    let cols = grid.first().map_or(0, Vec::len) as i32;
    let rows = grid.len() as i32;
    for py in (y - top_px) / PX_PER_ROW..=(y + h - 1 - top_px) / PX_PER_ROW {
        for px in x / PX_PER_COL..=(x + w - 1) / PX_PER_COL {
            if px >= 0 && px < cols && py >= 0 && py < rows {
                grid[py as usize][px as usize] = glyph;
            }
        }
    }
}

fn draw(out: &mut Stdout, state: &GameState, ui: &Ui) -> Result<()> {
    let config = &state.config;
    let cols = (config.viewport_width / PX_PER_COL) as usize;
    let rows = (config.viewport_height / PX_PER_ROW) as usize;
    let top_px = state.camera_offset;

    let mut grid = vec![vec![' '; cols]; rows];

    // Scoring lines and the checkpoint zone boundary
    for i in 1..=config.total_lines {
        let line_y = i * config.line_spacing;
        let row = (line_y - top_px) / PX_PER_ROW;
        if row >= 0 && (row as usize) < rows {
            grid[row as usize] = vec!['-'; cols];
        }
    }
    let checkpoint_row = (config.checkpoint_y - top_px) / PX_PER_ROW;
    if checkpoint_row >= 0 && (checkpoint_row as usize) < rows {
        grid[checkpoint_row as usize] = vec!['='; cols];
    }

    for guard in &state.guards {
        stamp(&mut grid, guard.x, guard.y, guard.width, guard.height, top_px, '#');
    }
    let p = &state.player;
    stamp(&mut grid, p.x, p.y, p.width, p.height, top_px, '@');

    queue!(out, cursor::MoveTo(0, 0), terminal::Clear(terminal::ClearType::All))?;
    queue!(
        out,
        style::SetForegroundColor(Color::Yellow),
        style::Print(format!("Score: {}", state.score())),
        style::ResetColor
    )?;

    for (row, line) in grid.iter().enumerate() {
        let text: String = line.iter().collect();
        queue!(out, cursor::MoveTo(0, row as u16 + 1), style::Print(text))?;
    }

    let status_row = rows as u16 + 2;
    match state.phase {
        GamePhase::Idle => {
            queue!(
                out,
                cursor::MoveTo(0, status_row),
                style::Print("Reach the top, come back alive. Enter to start, Esc to quit."),
            )?;
            draw_leaderboard(out, ui, status_row + 2)?;
        }
        GamePhase::Running => {
            queue!(
                out,
                cursor::MoveTo(0, status_row),
                style::Print("Arrows move one step. Dodge the # guards."),
            )?;
        }
        GamePhase::Ended => {
            queue!(
                out,
                cursor::MoveTo(0, status_row),
                style::SetForegroundColor(Color::Cyan),
                style::Print(&ui.message),
                style::ResetColor
            )?;
            if ui.submitted {
                queue!(
                    out,
                    cursor::MoveTo(0, status_row + 1),
                    style::Print("Enter to play again, Esc to quit."),
                )?;
            } else {
                queue!(
                    out,
                    cursor::MoveTo(0, status_row + 1),
                    style::Print(format!("Your name: {}_ (Enter to submit)", ui.name_input)),
                )?;
            }
            draw_leaderboard(out, ui, status_row + 3)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn draw_leaderboard(out: &mut Stdout, ui: &Ui, from_row: u16) -> Result<()> {
    queue!(out, cursor::MoveTo(0, from_row), style::Print("-- Leaderboard --"))?;
    if ui.leaderboard.is_empty() {
        queue!(out, cursor::MoveTo(0, from_row + 1), style::Print("(no scores yet)"))?;
        return Ok(());
    }
    for (i, entry) in ui.leaderboard.iter().enumerate() {
        queue!(
            out,
            cursor::MoveTo(0, from_row + 1 + i as u16),
            style::Print(format!("{}. {}: {}", i + 1, entry.name, entry.score)),
        )?;
    }
    Ok(())
}
