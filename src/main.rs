use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use taraq::app::{App, Focus, StatusLevel};
use taraq::config::{self, Config};
use taraq::core::AppContext;
use taraq::export::{self, ExportFormat, ExportableResult, ExportableStatus};
use taraq::infrastructure::runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
use taraq::store::{HistoryStore, MemoryStore, SqliteStore, HISTORY_CAPACITY};
use taraq::ui::{self, format};

#[derive(Debug, Parser)]
#[command(
    name = "taraq",
    version,
    about = "taraq: Taraxa balance lookup and chain status, in the terminal"
)]
struct Args {
    /// HTTP JSON-RPC endpoint (overrides the config file)
    #[arg(long, global = true)]
    rpc: Option<String>,

    /// Config file (default: $TARAQ_CONFIG or ~/.config/taraq/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep history in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Query one address and print its balance
    Balance {
        address: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the current block height and connectivity
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Show recent queries
    History {
        #[arg(long, default_value_t = HISTORY_CAPACITY)]
        limit: usize,
        #[arg(long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
        /// Forget all recorded queries
        #[arg(long, conflicts_with_all = ["limit", "format"])]
        clear: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.command.is_none());

    let config = config::load(args.config.as_deref()).with_rpc(args.rpc.as_deref());
    let history = open_history(args.ephemeral);
    let ctx = AppContext::from_config(&config, history)?;

    match args.command {
        None => run_tui(&config, ctx),
        Some(command) => run_command(command, ctx),
    }
}

/// CLI logs go to stderr; the TUI logs to a file so the screen stays clean
fn init_logging(tui: bool) {
    let filter = EnvFilter::try_from_env("TARAQ_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    if !tui {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
        return;
    }

    let Some(path) = config::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init();
    }
}

fn open_history(ephemeral: bool) -> HistoryStore {
    let memory = || HistoryStore::open(Box::new(MemoryStore::new()));
    if ephemeral {
        return memory();
    }
    let Some(db_path) = config::history_db_path() else {
        warn!("no data directory, history kept in memory");
        return memory();
    };
    if let Some(parent) = db_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match SqliteStore::open(&db_path) {
        Ok(store) => HistoryStore::open(Box::new(store)),
        Err(err) => {
            warn!(error = %format!("{:#}", err), "history database disabled, keeping history in memory");
            memory()
        }
    }
}

// ----- CLI -----

fn run_command(command: Command, mut ctx: AppContext) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Balance { address, json } => {
            let result = rt.block_on(ctx.query.query_balance(&address))?;
            if json {
                export::write_value(&mut out, &ExportableResult::from(&result))?;
            } else {
                writeln!(out, "{} TARA", format::format_balance(result.balance_decimal, 6))?;
                writeln!(out, "address  {}", result.address)?;
                writeln!(out, "wei      {}", result.balance_wei)?;
                writeln!(out, "latency  {} ms", result.latency_ms)?;
            }
        }
        Command::Status { json } => {
            let status = rt.block_on(ctx.status.refresh_status());
            if json {
                export::write_value(&mut out, &ExportableStatus::from(&status))?;
            } else {
                let (label, _) = format::network_label(&status);
                writeln!(out, "{}  {}", ctx.endpoint(), label)?;
                writeln!(out, "block    {}", format::group_digits(status.block_height))?;
            }
            if !status.connected {
                bail!("{} is unreachable", ctx.endpoint());
            }
        }
        Command::History {
            limit,
            format,
            clear,
        } => {
            if clear {
                ctx.query.history_mut().clear()?;
                writeln!(out, "History cleared")?;
            } else {
                let entries = ctx.query.history().list(limit);
                export::write_history(&mut out, entries, format, Utc::now())?;
            }
        }
    }
    Ok(())
}

// ----- TUI -----

fn run_tui(config: &Config, ctx: AppContext) -> Result<()> {
    info!(endpoint = %config.rpc, "starting tui");
    let runtime = RuntimeBridge::new(ctx)?;

    let mut app = App::new(config.rpc.clone(), config.chain_id, config.network_name.clone());
    app.set_status("Connecting…", StatusLevel::Info);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, &runtime);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: &RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => handle_key(&mut app, key),
                Event::Paste(text) => {
                    app.focus = Focus::Input;
                    app.set_input(&text);
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::QueryCompleted(result) => app.apply_query_completed(result),
            RuntimeEvent::QueryFailed { address, message } => {
                app.apply_query_failed(&address, &message)
            }
            RuntimeEvent::StatusChanged(status) => app.apply_status(status),
            RuntimeEvent::HistoryChanged(entries) => app.apply_history(entries),
            RuntimeEvent::Warning { message } => app.apply_warning(message),
        }
    }

    for address in app.take_query_requests() {
        if let Err(err) = runtime.send(RuntimeCommand::QueryBalance {
            address: address.clone(),
        }) {
            app.apply_query_failed(&address, &err.to_string());
        }
    }
    if app.take_refresh_request() {
        if let Err(err) = runtime.send(RuntimeCommand::RefreshStatus) {
            app.set_status(err.to_string(), StatusLevel::Error);
        }
    }
    if app.take_clear_request() {
        match runtime.send(RuntimeCommand::ClearHistory) {
            Ok(()) => app.set_status("History cleared", StatusLevel::Success),
            Err(err) => app.set_status(err.to_string(), StatusLevel::Error),
        }
    }
    if app.take_export_request() {
        export_history(app);
    }
}

fn export_history(app: &mut App) {
    let Some(dir) = config::data_dir().map(|dir| dir.join("exports")) else {
        app.set_status("No data directory for exports", StatusLevel::Error);
        return;
    };
    match export::export_history_csv(&dir, &app.history) {
        Ok(path) => app.set_status(
            format!("Exported {} entries to {}", app.history.len(), path.display()),
            StatusLevel::Success,
        ),
        Err(err) => app.set_status(format!("Export failed: {:#}", err), StatusLevel::Error),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char('y') if ctrl => copy_to_clipboard(app),
        KeyCode::Char('r') if ctrl => app.request_refresh(),
        KeyCode::Char('d') if ctrl => app.request_clear_history(),
        KeyCode::Char('e') if ctrl => app.request_export(),
        KeyCode::Char('u') if ctrl => app.clear_input(),
        KeyCode::Tab | KeyCode::BackTab => app.cycle_focus(),
        KeyCode::Enter => app.submit(),
        KeyCode::Up if app.focus == Focus::History => app.move_selection_up(),
        KeyCode::Down if app.focus == Focus::History => app.move_selection_down(),
        KeyCode::Backspace => {
            app.focus = Focus::Input;
            app.pop_char();
        }
        KeyCode::Char(ch) if !ctrl => {
            app.focus = Focus::Input;
            app.push_char(ch);
        }
        _ => {}
    }
}

fn copy_to_clipboard(app: &mut App) {
    use arboard::Clipboard;

    let Some(text) = app.copy_target() else {
        app.set_status("Nothing to copy", StatusLevel::Warn);
        return;
    };

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(&text).is_ok() {
                app.set_status(
                    format!("Copied: {}", format::short_address(&text, 6)),
                    StatusLevel::Success,
                );
            } else {
                app.set_status("Failed to copy to clipboard", StatusLevel::Error);
            }
        }
        Err(_) => {
            app.set_status("Clipboard not available", StatusLevel::Error);
        }
    }
}
