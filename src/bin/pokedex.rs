// Native binary for Pokedex - Terminal UI mode

use anyhow::{anyhow, Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::OpenOptions,
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use pokedex::{
    api::{CatalogApi, PokeApi},
    app::{App, InputMode},
    config::{load, Config},
    effects::{run_command, spawn_command},
    hydrate::HydrationPolicy,
    theme::Theme,
    types::AppEvent,
    ui,
};

/// Everything needed to start upstream work for a transition
struct Runtime {
    api: Arc<dyn CatalogApi>,
    policy: HydrationPolicy,
    tx: UnboundedSender<AppEvent>,
}

impl Runtime {
    fn dispatch(&self, app: &mut App, ev: AppEvent) {
        let cmds = app.on_event(ev);
        self.spawn_all(app, cmds);
    }

    fn spawn_all(&self, app: &mut App, cmds: Vec<pokedex::Command>) {
        for cmd in cmds {
            app.log_debug(format!("[CMD] {cmd:?}"));
            spawn_command(self.api.clone(), cmd, self.policy, self.tx.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let cfg = load().context("Failed to load configuration")?;
    init_logging(&cfg)?;
    cfg.log_summary();

    let api: Arc<dyn CatalogApi> =
        Arc::new(PokeApi::new(&cfg.api_url, cfg.http_timeout_ms, cfg.http_retries));

    if cfg.print {
        return print_page(&cfg, api.as_ref()).await;
    }

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // app + channels
    let (tx, rx) = unbounded_channel::<AppEvent>();
    let rt = Runtime { api, policy: cfg.hydration, tx };
    let mut app = App::new(cfg.page_size, cfg.start_page, cfg.discard_stale, cfg.render_fps);
    rt.dispatch(&mut app, AppEvent::Init);

    // main loop
    let res = run_loop(&mut app, &mut terminal, rx, &rt).await;

    // cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    res
}

fn init_logging(cfg: &Config) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = &cfg.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    } else if !cfg.print {
        // stderr would draw over the alternate screen
        return Ok(());
    }
    builder.init();
    Ok(())
}

/// Headless mode: load the start page once and print it
async fn print_page(cfg: &Config, api: &dyn CatalogApi) -> Result<()> {
    let mut app = App::new(cfg.page_size, cfg.start_page, cfg.discard_stale, cfg.render_fps);
    for cmd in app.on_event(AppEvent::Init) {
        let ev = run_command(api, cmd, cfg.hydration).await;
        if let AppEvent::PageFailed { error, .. } = &ev {
            return Err(anyhow!("Failed to load page {}: {error}", cfg.start_page));
        }
        app.on_event(ev);
    }

    for it in app.items() {
        println!(
            "{:>6}  {:<16} {:<18} {}",
            format!("#{}", it.id),
            it.name,
            it.tags.join(","),
            it.image.as_deref().unwrap_or("-")
        );
    }
    println!(
        "page {}/{} · size {} · {} total",
        app.current_page(),
        app.page_count(),
        app.page_size(),
        app.total()
    );
    Ok(())
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
    rt: &Runtime,
) -> Result<()> {
    let theme = Theme::default();
    let mut last_frame = Instant::now();
    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(app.fps()) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        // input or network completions
        if event::poll(wait)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    handle_key(app, k, rt);
                }
            }
        }
        while let Ok(ev) = rx.try_recv() {
            rt.dispatch(app, ev);
        }

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app, &theme))?;
            last_frame = Instant::now();
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, k: KeyEvent, rt: &Runtime) {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (k.code, k.modifiers) {
        rt.dispatch(app, AppEvent::Quit);
        return;
    }

    // Stats overlay swallows keys until closed
    if app.overlay().is_some() {
        if matches!(k.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('i')) {
            rt.dispatch(app, AppEvent::CloseStats);
        }
        return;
    }

    match app.input_mode() {
        InputMode::Search => {
            match k.code {
                KeyCode::Char(c) => {
                    let mut text = app.search().to_string();
                    text.push(c);
                    rt.dispatch(app, AppEvent::SearchInput(text));
                }
                KeyCode::Backspace => {
                    let mut text = app.search().to_string();
                    text.pop();
                    rt.dispatch(app, AppEvent::SearchInput(text));
                }
                KeyCode::Enter => {
                    app.close_search();
                    rt.dispatch(app, AppEvent::SearchSubmitted);
                }
                KeyCode::Esc => app.close_search(),
                _ => {}
            }
            return;
        }
        InputMode::Chips => {
            match k.code {
                KeyCode::Left => app.chip_left(),
                KeyCode::Right => app.chip_right(),
                KeyCode::Enter | KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') => {
                    if let Some(tag) = app.selected_filter().map(str::to_string) {
                        rt.dispatch(app, AppEvent::TagRemoved(tag));
                    }
                }
                KeyCode::Esc => app.close_chips(),
                _ => {}
            }
            return;
        }
        InputMode::Normal => {}
    }

    match (k.code, k.modifiers) {
        (KeyCode::Char('q'), _) => rt.dispatch(app, AppEvent::Quit),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.up(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.down(),
        (KeyCode::Home, _) => app.home(),
        (KeyCode::End, _) => app.end(),
        (KeyCode::Left, _) => {
            let cmds = app.page_back();
            rt.spawn_all(app, cmds);
        }
        (KeyCode::Right, _) => {
            let cmds = app.page_forward();
            rt.spawn_all(app, cmds);
        }
        (KeyCode::Char('s'), _) => {
            let size = app.page_size().next();
            rt.dispatch(app, AppEvent::PageSizeChanged(size));
        }
        (KeyCode::Char('S'), _) => {
            let size = app.page_size().prev();
            rt.dispatch(app, AppEvent::PageSizeChanged(size));
        }
        (KeyCode::Char('/'), _) => app.start_search(),
        (KeyCode::Char('x'), _) => app.start_chips(),
        (KeyCode::Char('r'), _) => rt.dispatch(app, AppEvent::Reload),
        (KeyCode::Enter, _) | (KeyCode::Char('i'), _) => {
            let idx = app.selected_index();
            rt.dispatch(app, AppEvent::OpenStats(idx));
        }
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => app.toggle_debug_panel(),
        (KeyCode::Char(c @ '1'..='9'), _) => {
            let n = (c as usize) - ('1' as usize);
            if let Some(tag) = app.selected_item_tag(n) {
                rt.dispatch(app, AppEvent::TagClicked(tag));
            }
        }
        _ => {}
    }
}
