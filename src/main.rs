use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tui_atlas::app::App;
use tui_atlas::data::GeometryRepository;
use tui_atlas::map::GeometryCache;
use tui_atlas::ui;

fn main() -> Result<()> {
    // Optional bundle path; otherwise the embedded outlines are used
    let bundle_path = std::env::args().nth(1).map(PathBuf::from);

    let mut terminal = ratatui::init();
    terminal.clear()?;

    let result = run(&mut terminal, bundle_path);

    ratatui::restore();
    result
}

fn run(terminal: &mut DefaultTerminal, bundle_path: Option<PathBuf>) -> Result<()> {
    let repository = Arc::new(GeometryRepository::new());
    let cache = Arc::new(GeometryCache::new());
    let mut app = App::new(repository, cache);
    app.spawn_load(bundle_path);

    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Short poll so the first frame after the background load lands
        // without a keypress
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.cursor_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_next(),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
        _ => {}
    }
}
