use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use drumkit::audio::{self, AudioHandle};
use drumkit::loader::sample_loader;
use drumkit::logging;
use drumkit::pipeline::persistence::JsonFileStore;
use drumkit::timing::MonotonicClock;
use drumkit::tui;
use drumkit::{DrumKit, Effects, InputEvent, KitEvent};

const FRAME: Duration = Duration::from_millis(16); // ~60fps

/// A keyboard drum kit with a recorder, player and metronome.
#[derive(Parser, Debug)]
#[command(name = "drumkit", version)]
struct Args {
    /// Directory holding `.drumkit/` (settings and log). Defaults to the cwd.
    #[arg(long, env = "DRUMKIT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory with one `<sound>.wav` per drum. Defaults to `<data-dir>/sounds`.
    #[arg(long)]
    sounds: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `drumkit=trace`. Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    /// Run without opening an audio device.
    #[arg(long)]
    no_audio: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let log_path = logging::init_logging(&data_dir, args.log_level.as_deref())?;
    log::info!("drumkit starting, logging to {}", log_path.display());

    let audio = if args.no_audio {
        AudioHandle::silent()
    } else {
        audio::start_audio().unwrap_or_else(|e| {
            log::warn!("no audio output, running silent: {e:#}");
            AudioHandle::silent()
        })
    };
    let sounds_dir = args.sounds.unwrap_or_else(|| data_dir.join("sounds"));
    if !audio.is_silent() {
        audio.send_all(sample_loader::load_kit(&sounds_dir, audio.sample_rate()));
    }

    let store = JsonFileStore::open(&data_dir);
    let mut kit = DrumKit::new(Box::new(MonotonicClock::new()), Box::new(store));

    terminal::enable_raw_mode()?;
    let _guard = TerminalGuard; // restores the terminal however we leave
    crossterm::execute!(std::io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let mut tui_state = tui::mode::TuiState::default();

    loop {
        let now = Instant::now();
        tui_state.expire_flashes(now);
        let ds = kit.display_state();

        term.draw(|frame| {
            let area = frame.area();
            tui::view::render(frame, area, &ds, &mut tui_state, now);
        })?;

        // wake up early for a due metronome tick or playback step
        let timeout = kit.next_deadline().map_or(FRAME, |d| d.min(FRAME));
        let events = tui::input::poll_input(timeout, &mut tui_state, &ds)?;
        for event in events {
            let quit = event == InputEvent::Quit;
            dispatch(kit.handle_input(event), &audio, &mut tui_state);
            if quit {
                log::info!("drumkit quitting");
                return Ok(());
            }
        }

        dispatch(kit.tick(), &audio, &mut tui_state);
    }
}

fn dispatch(fx: Effects, audio: &AudioHandle, ts: &mut tui::mode::TuiState) {
    audio.send_all(fx.audio);
    for event in fx.events {
        match event {
            KitEvent::PadHit { sound, .. } => ts.flash(sound, Instant::now()),
            other => log::debug!("{other:?}"),
        }
    }
}

struct TerminalGuard;
impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
