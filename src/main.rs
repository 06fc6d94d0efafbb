//! Guild of Exiles - Entry Point
//!
//! Initializes logging and the terminal, loads game data, then runs the
//! frame loop that drives input, the map tick and rendering.

use std::fs::OpenOptions;
use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use guild_of_exiles::data::{DataManager, data_directory};
use guild_of_exiles::game::{Store, SystemClock, TickTimer};
use guild_of_exiles::ui::App;

/// Target frames per second for the UI loop
const TARGET_FPS: u64 = 30;
const FRAME_TIME: Duration = Duration::from_millis(1000 / TARGET_FPS);

fn main() -> Result<()> {
    // Log to a file so the TUI is not overwritten
    let log_target: Box<dyn io::Write + Send> = match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("guild-of-exiles.log")
    {
        Ok(file) => Box::new(file),
        Err(_) => Box::new(io::sink()),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(log_target))
        .init();

    log::info!("Starting Guild of Exiles v{}", env!("CARGO_PKG_VERSION"));

    let data = DataManager::load_from_dir(&data_directory());
    let tick_interval = Duration::from_millis(data.config.tick_interval_ms);
    let mut store = Store::builder().data(data).clock(SystemClock).build();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&store);
    let result = run_loop(&mut terminal, &mut app, &mut store, tick_interval);
    app.unmount_all();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("Game exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Guild of Exiles shut down cleanly");
    result
}

/// Input, tick, render until the player quits
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &mut Store,
    tick_interval: Duration,
) -> Result<()> {
    let mut timer = TickTimer::new(tick_interval);
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let delta = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, not releases
                if key.kind == KeyEventKind::Press {
                    match app.handle_input(key, store) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => log::warn!("Input handling error: {}", e),
                    }
                }
            }
        }

        if timer.update(delta) {
            let completed = store.tick_maps();
            if !completed.is_empty() {
                let names: Vec<String> = completed
                    .iter()
                    .filter_map(|id| store.state().map(id).map(|map| map.name.clone()))
                    .collect();
                app.notify("Map complete", format!("{} ready to claim", names.join(", ")));
            }
        }

        terminal.draw(|frame| app.render(frame))?;

        let frame_time = frame_start.elapsed();
        if frame_time < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - frame_time);
        }
    }

    Ok(())
}
