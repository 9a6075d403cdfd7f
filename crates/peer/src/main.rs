mod config;
mod events;
mod keys;
mod tui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use linkfire::{
    GameSession, InputState, NullTransport, Settings, TcpTransport, Transport, WallMap,
    generated_player_id,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use config::{PeerConfig, PeerMode, host_addr, join_addr};
use events::{LogLevel, describe};
use keys::{KeyIntent, KeyLatch};
use tui::{TuiState, View};

#[derive(Parser)]
#[command(name = "linkfire-peer")]
#[command(about = "Two-peer arena shooter")]
struct Args {
    #[arg(long, conflicts_with = "join", help = "Host a session")]
    host: bool,

    #[arg(long, value_name = "ADDR", help = "Join a host at ADDR[:PORT]")]
    join: Option<String>,

    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    #[arg(short, long, default_value_t = linkfire::DEFAULT_PORT)]
    port: u16,

    #[arg(long, help = "Player id, unique per session [default: generated]")]
    player_id: Option<String>,

    #[arg(short, long, default_value_t = linkfire::DEFAULT_TICK_RATE)]
    tick_rate: u32,

    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    #[arg(long)]
    headless: bool,

    #[arg(long, help = "Stop after this many seconds")]
    duration_secs: Option<u64>,
}

impl Args {
    fn into_config(self) -> PeerConfig {
        let mode = match (self.host, self.join) {
            (_, Some(addr)) => PeerMode::Join {
                addr: join_addr(&addr, self.port),
            },
            (true, None) => PeerMode::Host {
                bind: host_addr(&self.bind, self.port),
            },
            (false, None) => PeerMode::Offline,
        };

        PeerConfig {
            mode,
            player_id: self.player_id.unwrap_or_else(generated_player_id),
            tick_rate: self.tick_rate,
            settings_path: self.settings,
            headless: self.headless,
            duration: self.duration_secs.map(Duration::from_secs),
        }
    }
}

/// Hosting or joining falls back to single player instead of failing.
fn open_transport(mode: &PeerMode) -> (Box<dyn Transport>, Option<String>) {
    let result = match mode {
        PeerMode::Offline => return (Box::new(NullTransport::new()), None),
        PeerMode::Host { bind } => TcpTransport::host(bind),
        PeerMode::Join { addr } => TcpTransport::join(addr),
    };

    match result {
        Ok(transport) => (Box::new(transport), None),
        Err(err) => {
            let message = format!("Network unavailable ({err}), playing offline");
            (
                Box::new(NullTransport::with_status("Offline (network failed)")),
                Some(message),
            )
        }
    }
}

fn main() -> Result<()> {
    let config = Args::parse().into_config();

    if config.headless {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let settings = Settings::load_or_default(&config.settings_path);
    let (transport, failure) = open_transport(&config.mode);
    let mut session = GameSession::new(
        config.session_config(&settings),
        WallMap::default(),
        transport,
    );

    if config.headless {
        if let Some(message) = failure {
            log::warn!("{message}");
        }
        run_headless(&mut session, &config)?;
    } else {
        let mut tui_state = TuiState::new();
        if let Some(message) = failure {
            tui_state.log_warn(message);
        }
        run_with_tui(&mut session, &config, &mut tui_state)?;
    }

    session.shutdown();
    Ok(())
}

fn watch_ctrl_c(running: Arc<AtomicBool>) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    thread::spawn(move || {
        if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
            running.store(false, Ordering::SeqCst);
        }
    });
    Ok(())
}

fn run_headless(session: &mut GameSession, config: &PeerConfig) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    watch_ctrl_c(Arc::clone(&running))?;

    log::info!(
        "{} started: {}",
        config.player_id,
        session.transport().status()
    );

    let started = Instant::now();
    let mut last = started;
    let mut input = InputState::new();
    let frame_time = Duration::from_secs_f32(1.0 / config.tick_rate.max(1) as f32);

    while running.load(Ordering::SeqCst) {
        if config.duration.is_some_and(|limit| started.elapsed() >= limit) {
            break;
        }

        let now = Instant::now();
        session.advance((now - last).as_secs_f32(), &mut input);
        last = now;

        for event in session.drain_events() {
            match describe(&event) {
                (LogLevel::Info, message) => log::info!("{message}"),
                (LogLevel::Warn, message) => log::warn!("{message}"),
                (LogLevel::Error, message) => log::error!("{message}"),
            }
        }

        thread::sleep(frame_time);
    }

    log::info!("{} shutting down", config.player_id);
    Ok(())
}

fn run_with_tui(
    session: &mut GameSession,
    config: &PeerConfig,
    tui_state: &mut TuiState,
) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = tui_loop(&mut terminal, session, config, tui_state);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;

    result
}

fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut GameSession,
    config: &PeerConfig,
    tui_state: &mut TuiState,
) -> io::Result<()> {
    tui_state.log_info(format!(
        "{} started: {}",
        config.player_id,
        session.transport().status()
    ));

    let started = Instant::now();
    let mut last = started;
    let mut latch = KeyLatch::new();
    let mut input = InputState::new();

    loop {
        if config.duration.is_some_and(|limit| started.elapsed() >= limit) {
            break;
        }

        let mut quit = false;
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match latch.press(key.code, Instant::now()) {
                KeyIntent::Quit => quit = true,
                KeyIntent::NewRound => session.start_round(),
                KeyIntent::TogglePause => {
                    session.toggle_pause();
                }
                KeyIntent::Action(action) => input.push_action(action),
                KeyIntent::Held | KeyIntent::Ignored => {}
            }
        }
        if quit {
            break;
        }

        let now = Instant::now();
        let delta = (now - last).as_secs_f32();
        last = now;

        input.set_buttons(latch.buttons(now));
        input.accumulate_mouse_delta(latch.mouse_delta(now, delta));
        session.advance(delta, &mut input);

        for event in session.drain_events() {
            let (level, message) = describe(&event);
            tui_state.log(level, message);
        }

        let output = session.frame();
        let view = View {
            player_id: &config.player_id,
            tick: session.tick_count(),
            round: session.round(),
            output: &output,
            stats: session.transport().stats(),
        };
        terminal.draw(|frame| tui::render(frame, tui_state, &view))?;

        thread::sleep(Duration::from_millis(16));
    }

    Ok(())
}
