//! jot entrypoint: startup, logging, and the runtime thread topology.
//!
//! Three concurrent activities:
//! * an input thread polling the terminal and forwarding decoded events over
//!   a bounded channel;
//! * the main input/render loop, which blocks on that channel, dispatches,
//!   and repaints;
//! * a command consumer draining the capacity-1 command queue and executing
//!   textual commands serially, requesting a repaint when done.
//!
//! The editor state lives behind one mutex shared by the loop and the
//! consumer; each event or command completes entirely under the lock, so a
//! document is only ever mutated by one of them at a time and no edit is
//! left half-applied.

use anyhow::Result;
use clap::Parser;
use core_actions::{Dispatcher, commands};
use core_console::Console;
use core_events::{CommandSender, Event, InputEvent, command_queue, decode, event_channel};
use core_render::frame::draw_frame;
use core_render::writer::CrosstermSurface;
use core_render::Surface;
use core_state::{Document, EditorState};
use core_symbol::{NullSymbols, SymbolProvider};
use core_terminal::TerminalSession;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Once};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

/// Environment variable naming the diagnostic log file. Unset disables
/// logging entirely.
const LOG_FILE_ENV: &str = "JOT_LOG_FILE";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "jot", version, about = "jot editor")]
struct Args {
    /// Optional path to open at startup. A missing file starts an empty
    /// buffer with that name.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `jot.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// State shared between the main loop and the command consumer. The console
/// slot doubles as the focus flag.
struct Shared {
    state: EditorState,
    console: Option<Console>,
}

fn lock(shared: &Arc<Mutex<Shared>>) -> MutexGuard<'_, Shared> {
    // A panicking holder already restored the terminal via the guard; the
    // state itself stays usable.
    shared.lock().unwrap_or_else(|p| p.into_inner())
}

fn configure_logging() -> Option<WorkerGuard> {
    let path = std::env::var(LOG_FILE_ENV).ok()?;
    if path.is_empty() {
        return None;
    }
    let path = PathBuf::from(path);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."))
        .to_path_buf();
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "jot.log".to_string());
    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    match tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            error!(target: "runtime.panic", %panic_info, "panic");
            default_panic(panic_info);
        }));
    });
}

/// Build the initial document. A missing startup file is a new buffer named
/// after it; any other read failure aborts startup before the terminal is
/// touched.
fn load_initial_document(
    args: &Args,
    provider: &dyn SymbolProvider,
) -> Result<(Document, bool)> {
    let Some(path) = args.path.as_ref() else {
        return Ok((Document::empty(), false));
    };
    match core_actions::io_ops::read_lines(path) {
        Ok(store) => {
            let mut doc = Document::with_store(store, Some(path.clone()));
            match provider.index(path, &doc.store.to_text()) {
                Ok(idx) => doc.symbols = idx,
                Err(e) => {
                    error!(target: "symbols", %e, "symbol_index_failed_startup");
                }
            }
            Ok((doc, false))
        }
        Err(core_actions::io_ops::PersistError::Io(e))
            if e.kind() == std::io::ErrorKind::NotFound =>
        {
            let mut doc = Document::empty();
            doc.file_name = Some(path.clone());
            Ok((doc, true))
        }
        Err(e) => Err(e.into()),
    }
}

fn spawn_input_thread(
    tx: crossbeam_channel::Sender<Event>,
    shutdown: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        while !shutdown.load(Ordering::SeqCst) {
            match crossterm::event::poll(Duration::from_millis(50)) {
                Ok(true) => match crossterm::event::read() {
                    Ok(ev) => {
                        if let Some(ev) = decode::decode(ev)
                            && tx.send(Event::Input(ev)).is_err()
                        {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(target: "runtime.input", %e, "input_read_error");
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    error!(target: "runtime.input", %e, "input_poll_error");
                    break;
                }
            }
        }
    })
}

fn spawn_command_consumer(
    rx: crossbeam_channel::Receiver<String>,
    shared: Arc<Mutex<Shared>>,
    provider: Arc<dyn SymbolProvider>,
    events: crossbeam_channel::Sender<Event>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        // Strictly serial: one command finishes before the next is taken.
        while let Ok(cmd) = rx.recv() {
            let dirty = {
                let mut s = lock(&shared);
                let Shared { state, console } = &mut *s;
                commands::execute(&cmd, state, console, provider.as_ref())
            };
            if dirty {
                // The consumer runs outside the loop's own repaint step.
                let _ = events.try_send(Event::RenderRequested);
            }
        }
    })
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = core_config::load_from(args.config.clone())?;
    let provider: Arc<dyn SymbolProvider> = Arc::new(NullSymbols);

    let (doc, open_failed) = load_initial_document(&args, provider.as_ref())?;
    let opened = doc
        .file_name
        .as_ref()
        .map(|p| p.display().to_string());
    let mut state = EditorState::new(doc);
    state.line_number = config.editor.line_numbers;
    state.wheel_step = config.scroll.wheel_step;
    if open_failed {
        state.set_status("new file");
    }
    info!(
        target: "runtime.startup",
        path = opened.as_deref(),
        open_failed,
        line_numbers = state.line_number,
        "bootstrap_complete"
    );

    let mut terminal = TerminalSession::enter()?;
    terminal.set_title("jot")?;

    let shared = Arc::new(Mutex::new(Shared {
        state,
        console: None,
    }));
    let (event_tx, event_rx) = event_channel();
    let (cmd_tx, cmd_rx) = command_queue();
    let shutdown = Arc::new(AtomicBool::new(false));

    let input_handle = spawn_input_thread(event_tx.clone(), shutdown.clone());
    let consumer_handle = spawn_command_consumer(
        cmd_rx,
        shared.clone(),
        provider.clone(),
        event_tx.clone(),
    );

    let mut surface = CrosstermSurface::new();
    let mut dispatcher = Dispatcher::new();

    // Seed dimensions and paint the first frame before the first event.
    {
        let (w, h) = surface.size();
        let mut s = lock(&shared);
        let Shared { state, console } = &mut *s;
        dispatcher.dispatch(state, console, InputEvent::Resize(w, h), &cmd_tx);
        draw_frame(&mut surface, state, console.as_ref());
        surface.present()?;
    }

    run_loop(
        &shared,
        &event_rx,
        &cmd_tx,
        &mut surface,
        &mut dispatcher,
    );

    shutdown.store(true, Ordering::SeqCst);
    drop(event_tx);
    drop(cmd_tx);
    let _ = input_handle.join();
    let _ = consumer_handle.join();
    terminal.restore()?;
    info!(target: "runtime", "shutdown");
    Ok(())
}

fn run_loop(
    shared: &Arc<Mutex<Shared>>,
    events: &crossbeam_channel::Receiver<Event>,
    commands_tx: &CommandSender,
    surface: &mut CrosstermSurface,
    dispatcher: &mut Dispatcher,
) {
    while let Ok(event) = events.recv() {
        let mut s = lock(shared);
        let Shared { state, console } = &mut *s;
        let result = match event {
            Event::Input(ev) => dispatcher.dispatch(state, console, ev, commands_tx),
            Event::RenderRequested => core_actions::DispatchResult::dirty(),
        };
        if result.quit {
            return;
        }
        if result.dirty {
            draw_frame(surface, state, console.as_ref());
            if let Err(e) = surface.present() {
                error!(target: "render", %e, "present_failed");
            }
        }
    }
}
