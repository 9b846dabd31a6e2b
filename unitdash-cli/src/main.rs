mod commands;
mod sampler;
mod shell;
mod ui;
mod worker;

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tokio::sync::mpsc;

use unitdash_core::cache::SummaryCache;
use unitdash_core::config::DashConfig;
use unitdash_core::discover::UnitDirs;
use unitdash_core::runner::{CommandRunner, capture_text};
use unitdash_core::scope::resolve_scope;
use unitdash_core::systemctl;
use unitdash_core::unit::{ServiceSummary, UnitAction};

use sampler::{PidMetrics, format_bytes};
use shell::ShellRunner;
use ui::theme::styles;
use worker::{Worker, WorkerCommand, WorkerEvent};

#[derive(Parser)]
#[command(name = "unitdash")]
#[command(about = "Inspect and control systemd units from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the dashboard (default when no subcommand is given)
    Tui,
    /// Print summaries for the given units, or for all favorites
    Status {
        units: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// List every unit found in the system and user unit directories
    List,
    Start {
        unit: String,
    },
    Stop {
        unit: String,
    },
    Restart {
        unit: String,
    },
    Enable {
        unit: String,
    },
    Disable {
        unit: String,
    },
    /// Show the journal tail for a unit
    Logs {
        unit: String,
        #[arg(short = 'n', long, default_value_t = 20)]
        lines: usize,
    },
    /// Check the environment for the tools unitdash shells out to
    Doctor,
}

fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Startup preflight: without systemctl nothing below can work.
fn systemctl_available() -> bool {
    std::process::Command::new("sh")
        .arg("-c")
        .arg(systemctl::which("systemctl"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn load_config_or_exit() -> (PathBuf, DashConfig) {
    let path = match DashConfig::default_path() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    match DashConfig::load_or_init(&path) {
        Ok(config) => (path, config),
        Err(e) => {
            eprintln!("error: cannot read {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn home_dir_or_exit() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            eprintln!("error: $HOME is not set");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Doctor reports a missing systemctl instead of dying on it.
    if !matches!(cli.command, Some(Commands::Doctor)) && !systemctl_available() {
        eprintln!("error: 'systemctl' not found on PATH; is this a systemd system?");
        std::process::exit(1);
    }

    match cli.command {
        Some(Commands::Doctor) => {
            commands::doctor::run_doctor();
            Ok(())
        }
        Some(Commands::Status { units, json }) => run_cli_status(units, json).await,
        Some(Commands::List) => run_cli_list(),
        Some(Commands::Start { unit }) => run_cli_action(UnitAction::Start, unit).await,
        Some(Commands::Stop { unit }) => run_cli_action(UnitAction::Stop, unit).await,
        Some(Commands::Restart { unit }) => run_cli_action(UnitAction::Restart, unit).await,
        Some(Commands::Enable { unit }) => run_cli_action(UnitAction::Enable, unit).await,
        Some(Commands::Disable { unit }) => run_cli_action(UnitAction::Disable, unit).await,
        Some(Commands::Logs { unit, lines }) => run_cli_logs(unit, lines).await,
        Some(Commands::Tui) | None => run_tui().await,
    }
}

// --- Non-interactive subcommands ---

#[derive(serde::Serialize)]
struct StatusRow<'a> {
    unit: &'a str,
    #[serde(flatten)]
    summary: &'a ServiceSummary,
}

async fn run_cli_status(units: Vec<String>, json: bool) -> io::Result<()> {
    let (_, config) = load_config_or_exit();
    let units = if units.is_empty() {
        config.favorites.clone()
    } else {
        units
    };
    if units.is_empty() {
        println!("no favorites configured; pass unit names or add favorites in the TUI");
        return Ok(());
    }

    let runner = Arc::new(ShellRunner::new(config.command_timeout_ms));
    let mut cache = SummaryCache::new(runner);

    let mut rows: Vec<(String, ServiceSummary)> = Vec::new();
    for unit in units {
        let summary = cache.get_summary(&unit).await;
        rows.push((unit, summary));
    }

    if json {
        let rows: Vec<StatusRow> = rows
            .iter()
            .map(|(unit, summary)| StatusRow { unit, summary })
            .collect();
        let text = serde_json::to_string_pretty(&rows).map_err(io::Error::other)?;
        println!("{text}");
    } else {
        println!(
            "{:<7} {:<10} {:<10} {:>6}  {:<36} {}",
            "SCOPE", "ACTIVE", "ENABLED", "PORT", "UNIT", "DESCRIPTION"
        );
        for (unit, summary) in &rows {
            println!(
                "{:<7} {:<10} {:<10} {:>6}  {:<36} {}",
                summary.scope.label(),
                summary.active,
                summary.enabled,
                summary.port,
                unit,
                summary.description
            );
        }
    }
    Ok(())
}

fn run_cli_list() -> io::Result<()> {
    let (_, config) = load_config_or_exit();
    let home = home_dir_or_exit();
    let units = UnitDirs::standard(&home)
        .with_limit(config.unit_limit)
        .enumerate_all();
    for unit in units {
        println!("{unit}");
    }
    Ok(())
}

async fn run_cli_action(action: UnitAction, unit: String) -> io::Result<()> {
    let (_, config) = load_config_or_exit();
    let runner = ShellRunner::new(config.command_timeout_ms);

    let scope = resolve_scope(&runner, &unit).await;
    if scope.is_none() {
        eprintln!("{unit}: not found in system or user scope");
        std::process::exit(1);
    }

    let command = systemctl::action(scope, action, &unit, !running_as_root());
    match runner.run_status(&command).await {
        Ok(0) => {
            println!("{unit}: {action} ok");
            Ok(())
        }
        Ok(code) => {
            eprintln!("{unit}: {action} failed (exit {code})");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{unit}: {e}");
            std::process::exit(1);
        }
    }
}

async fn run_cli_logs(unit: String, lines: usize) -> io::Result<()> {
    let (_, config) = load_config_or_exit();
    let runner = ShellRunner::new(config.command_timeout_ms);

    let scope = resolve_scope(&runner, &unit).await;
    if scope.is_none() {
        eprintln!("{unit}: not found in system or user scope");
        std::process::exit(1);
    }

    let journal = capture_text(&runner, &systemctl::journal_tail(scope, &unit, lines)).await;
    if journal.is_empty() {
        println!("(no journal output)");
    } else {
        println!("{journal}");
    }
    Ok(())
}

// --- Terminal setup/teardown ---

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// --- TUI state ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum View {
    #[default]
    Dashboard,
    Browse,
    Detail,
}

#[derive(Default)]
struct DetailPane {
    unit: String,
    journal: String,
    dependencies: String,
    metrics: Option<PidMetrics>,
}

struct App {
    config: DashConfig,
    config_path: PathBuf,
    view: View,
    summaries: BTreeMap<String, ServiceSummary>,
    all_units: Vec<String>,
    dash_selected: usize,
    browse_selected: usize,
    detail: DetailPane,
    status: Option<String>,
    help_open: bool,
    should_quit: bool,
}

impl App {
    fn new(config_path: PathBuf, config: DashConfig) -> Self {
        Self {
            config,
            config_path,
            view: View::default(),
            summaries: BTreeMap::new(),
            all_units: Vec::new(),
            dash_selected: 0,
            browse_selected: 0,
            detail: DetailPane::default(),
            status: None,
            help_open: false,
            should_quit: false,
        }
    }

    fn apply(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Summary { unit, summary } => {
                self.summaries.insert(unit, summary);
            }
            WorkerEvent::Units { names } => {
                self.all_units = names;
                if self.browse_selected >= self.all_units.len() {
                    self.browse_selected = self.all_units.len().saturating_sub(1);
                }
            }
            WorkerEvent::ActionDone { unit, action, ok } => {
                self.status = Some(if ok {
                    format!("{unit}: {action} ok")
                } else {
                    format!("{unit}: {action} failed")
                });
            }
            WorkerEvent::Inspect {
                unit,
                journal,
                dependencies,
                metrics,
            } => {
                if self.detail.unit == unit {
                    self.detail.journal = journal;
                    self.detail.dependencies = dependencies;
                    self.detail.metrics = metrics;
                }
            }
            WorkerEvent::Message { text } => {
                self.status = Some(text);
            }
        }
    }

    fn selected_favorite(&self) -> Option<&String> {
        self.config.favorites.get(self.dash_selected)
    }

    fn selected_browse_unit(&self) -> Option<&String> {
        self.all_units.get(self.browse_selected)
    }

    /// Persist the favorites list; a write failure is a status message,
    /// not a crash; the in-memory list stays authoritative for the run.
    fn save_config(&mut self) {
        if let Err(e) = self.config.save(&self.config_path) {
            self.status = Some(format!("could not save config: {e}"));
        }
    }
}

// --- TUI event loop ---

async fn run_tui() -> io::Result<()> {
    let (config_path, config) = load_config_or_exit();
    let home = home_dir_or_exit();

    let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner::new(config.command_timeout_ms));
    let dirs = UnitDirs::standard(&home).with_limit(config.unit_limit);
    let worker = Worker::new(runner, dirs, !running_as_root());

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (event_tx, event_rx) = mpsc::channel(256);
    tokio::spawn(worker.run(cmd_rx, event_tx));

    let _ = cmd_tx
        .send(WorkerCommand::Summaries {
            units: config.favorites.clone(),
        })
        .await;

    let app = App::new(config_path, config);
    let mut terminal = setup_terminal()?;
    let result = tui_loop(&mut terminal, app, cmd_tx.clone(), event_rx).await;
    let _ = cmd_tx.send(WorkerCommand::Shutdown).await;
    restore_terminal(terminal)?;
    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    cmd_tx: mpsc::Sender<WorkerCommand>,
    mut event_rx: mpsc::Receiver<WorkerEvent>,
) -> io::Result<()> {
    loop {
        while let Ok(event) = event_rx.try_recv() {
            app.apply(event);
        }

        terminal.draw(|f| draw(f, &mut app))?;

        if app.should_quit {
            return Ok(());
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let CEvent::Key(KeyEvent { code, .. }) = event::read()? else {
            continue;
        };

        handle_key(&mut app, code, &cmd_tx).await;
    }
}

async fn handle_key(app: &mut App, code: KeyCode, cmd_tx: &mpsc::Sender<WorkerCommand>) {
    if app.help_open {
        app.help_open = false;
        return;
    }

    match code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') => {
            app.help_open = true;
            return;
        }
        _ => {}
    }

    match app.view {
        View::Dashboard => handle_dashboard_key(app, code, cmd_tx).await,
        View::Browse => handle_browse_key(app, code, cmd_tx).await,
        View::Detail => handle_detail_key(app, code, cmd_tx).await,
    }
}

async fn handle_dashboard_key(app: &mut App, code: KeyCode, cmd_tx: &mpsc::Sender<WorkerCommand>) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.dash_selected = app.dash_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.dash_selected + 1 < app.config.favorites.len() {
                app.dash_selected += 1;
            }
        }
        KeyCode::Enter => {
            if let Some(unit) = app.selected_favorite().cloned() {
                app.view = View::Detail;
                app.detail = DetailPane {
                    unit: unit.clone(),
                    ..DetailPane::default()
                };
                let _ = cmd_tx.send(WorkerCommand::Inspect { unit }).await;
            }
        }
        KeyCode::Char('b') => {
            app.view = View::Browse;
            let _ = cmd_tx.send(WorkerCommand::Enumerate).await;
        }
        KeyCode::Char('r') => {
            if let Some(unit) = app.selected_favorite().cloned() {
                app.status = Some(format!("refreshing {unit}"));
                let _ = cmd_tx.send(WorkerCommand::Refresh { unit }).await;
            }
        }
        KeyCode::Char('R') => {
            // Reload the favorites file, then recompute everything.
            match DashConfig::load_or_init(&app.config_path) {
                Ok(config) => {
                    app.config = config;
                    if app.dash_selected >= app.config.favorites.len() {
                        app.dash_selected = app.config.favorites.len().saturating_sub(1);
                    }
                    app.status = Some("favorites reloaded".to_string());
                    let _ = cmd_tx
                        .send(WorkerCommand::RefreshAll {
                            units: app.config.favorites.clone(),
                        })
                        .await;
                }
                Err(e) => app.status = Some(format!("reload failed: {e}")),
            }
        }
        KeyCode::Char('d') => {
            if let Some(unit) = app.selected_favorite().cloned() {
                app.config.remove_favorite(&unit);
                app.summaries.remove(&unit);
                if app.dash_selected >= app.config.favorites.len() {
                    app.dash_selected = app.config.favorites.len().saturating_sub(1);
                }
                app.save_config();
                app.status = Some(format!("removed {unit}"));
            }
        }
        _ => {}
    }
}

async fn handle_browse_key(app: &mut App, code: KeyCode, cmd_tx: &mpsc::Sender<WorkerCommand>) {
    match code {
        KeyCode::Esc => {
            app.view = View::Dashboard;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.browse_selected = app.browse_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.browse_selected + 1 < app.all_units.len() {
                app.browse_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Char('a') => {
            if let Some(unit) = app.selected_browse_unit().cloned() {
                if app.config.add_favorite(&unit) {
                    app.save_config();
                    app.status = Some(format!("added {unit}"));
                    let _ = cmd_tx
                        .send(WorkerCommand::Summaries {
                            units: vec![unit],
                        })
                        .await;
                } else {
                    app.status = Some(format!("{unit} is already a favorite"));
                }
            }
        }
        KeyCode::Char('r') => {
            let _ = cmd_tx.send(WorkerCommand::Enumerate).await;
        }
        _ => {}
    }
}

async fn handle_detail_key(app: &mut App, code: KeyCode, cmd_tx: &mpsc::Sender<WorkerCommand>) {
    let unit = app.detail.unit.clone();
    let action = match code {
        KeyCode::Esc => {
            app.view = View::Dashboard;
            return;
        }
        KeyCode::Char('l') => {
            let _ = cmd_tx.send(WorkerCommand::Inspect { unit }).await;
            return;
        }
        KeyCode::Char('o') => {
            let port = app.summaries.get(&unit).map(|s| s.port.clone());
            match port {
                Some(port) if port.is_known() => {
                    let _ = cmd_tx
                        .send(WorkerCommand::OpenBrowser {
                            port: port.as_str().to_string(),
                        })
                        .await;
                }
                _ => app.status = Some("no known port to open".to_string()),
            }
            return;
        }
        KeyCode::Char('s') => UnitAction::Start,
        KeyCode::Char('x') => UnitAction::Stop,
        KeyCode::Char('r') => UnitAction::Restart,
        KeyCode::Char('e') => UnitAction::Enable,
        KeyCode::Char('d') => UnitAction::Disable,
        _ => return,
    };

    app.status = Some(format!("{unit}: {action}..."));
    let _ = cmd_tx
        .send(WorkerCommand::Action {
            unit: unit.clone(),
            action,
        })
        .await;
    // Journal and process metrics change with the action; refresh them
    // after the worker has dispatched it.
    let _ = cmd_tx.send(WorkerCommand::Inspect { unit }).await;
}

// --- Rendering ---

fn fit(text: &str, max: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max {
        return text.to_string();
    }
    if max <= 1 {
        return "…".into();
    }
    let mut out: String = chars.into_iter().take(max - 1).collect();
    out.push('…');
    out
}

fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    match app.view {
        View::Dashboard => draw_dashboard(f, app, chunks[0]),
        View::Browse => draw_browse(f, app, chunks[0]),
        View::Detail => draw_detail(f, app, chunks[0]),
    }
    draw_status_line(f, app, chunks[1]);
    draw_key_hints(f, app, chunks[2]);

    if app.help_open {
        draw_help(f);
    }
}

fn summary_line<'a>(index: usize, unit: &'a str, summary: Option<&'a ServiceSummary>) -> Line<'a> {
    let Some(summary) = summary else {
        return Line::from(vec![
            Span::styled(format!("{:>3} ", index + 1), styles::text_muted()),
            Span::styled(format!("{:<36} ", fit(unit, 35)), styles::text()),
            Span::styled("loading…", styles::text_dim()),
        ]);
    };

    Line::from(vec![
        Span::styled(format!("{:>3} ", index + 1), styles::text_muted()),
        Span::styled(
            format!("{:<7} ", summary.scope.label()),
            styles::scope(summary.scope),
        ),
        Span::styled(format!("{:<36} ", fit(unit, 35)), styles::text()),
        Span::styled(
            format!("{:<11} ", summary.active),
            styles::active(&summary.active),
        ),
        Span::styled(
            format!("{:<11} ", summary.enabled),
            styles::enabled(&summary.enabled),
        ),
        Span::styled(format!("{:>6}  ", summary.port.as_str()), styles::text()),
        Span::styled(fit(&summary.description, 40), styles::text_dim()),
    ])
}

fn draw_dashboard(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(" unitdash / favorites ", styles::title()));

    if app.config.favorites.is_empty() {
        let text = Paragraph::new(vec![
            Line::from("No favorites configured."),
            Line::from("Press 'b' to browse all units and 'a' to pin one."),
        ])
        .style(styles::text_dim())
        .block(block);
        f.render_widget(text, area);
        return;
    }

    let header = Line::from(Span::styled(
        format!(
            "    {:<7} {:<36} {:<11} {:<11} {:>6}  {}",
            "SCOPE", "UNIT", "ACTIVE", "ENABLED", "PORT", "DESCRIPTION"
        ),
        styles::text_muted(),
    ));

    let mut items: Vec<ListItem> = vec![ListItem::new(header)];
    items.extend(app.config.favorites.iter().enumerate().map(|(i, unit)| {
        ListItem::new(summary_line(i, unit, app.summaries.get(unit)))
    }));

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selection());

    // Offset by one for the header row.
    let mut state = ListState::default();
    state.select(Some(app.dash_selected + 1));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_browse(f: &mut Frame, app: &mut App, area: Rect) {
    let title = format!(" all units ({}) ", app.all_units.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(title, styles::title()));

    if app.all_units.is_empty() {
        let text = Paragraph::new("Scanning unit directories…")
            .style(styles::text_dim())
            .block(block);
        f.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = app
        .all_units
        .iter()
        .map(|unit| {
            let pinned = app.config.favorites.iter().any(|fav| fav == unit);
            let marker = if pinned { "★ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, styles::key_hint()),
                Span::styled(unit.as_str(), styles::text()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selection());

    let mut state = ListState::default();
    state.select(Some(app.browse_selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_detail(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(5),
            Constraint::Length(9),
        ])
        .split(area);

    let unit = app.detail.unit.as_str();
    let summary = app.summaries.get(unit);

    let mut lines: Vec<Line> = Vec::new();
    match summary {
        Some(summary) => {
            lines.push(Line::from(vec![
                Span::styled("Scope: ", styles::text_muted()),
                Span::styled(summary.scope.label(), styles::scope(summary.scope)),
                Span::styled("   Active: ", styles::text_muted()),
                Span::styled(summary.active.as_str(), styles::active(&summary.active)),
                Span::styled("   Enabled: ", styles::text_muted()),
                Span::styled(summary.enabled.as_str(), styles::enabled(&summary.enabled)),
                Span::styled("   Port: ", styles::text_muted()),
                Span::styled(summary.port.as_str(), styles::text()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Description: ", styles::text_muted()),
                Span::styled(summary.description.as_str(), styles::text()),
            ]));
        }
        None => lines.push(Line::from(Span::styled("loading…", styles::text_dim()))),
    }
    lines.push(match app.detail.metrics {
        Some(metrics) => Line::from(vec![
            Span::styled("Process: ", styles::text_muted()),
            Span::styled(
                format!(
                    "pid {}  cpu {:.1}%  mem {}",
                    metrics.pid,
                    metrics.cpu_percent,
                    format_bytes(metrics.memory_bytes)
                ),
                styles::text(),
            ),
        ]),
        None => Line::from(vec![
            Span::styled("Process: ", styles::text_muted()),
            Span::styled("no main process", styles::text_dim()),
        ]),
    });

    let summary_block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border())
            .title(Span::styled(format!(" {unit} "), styles::title())),
    );
    f.render_widget(summary_block, chunks[0]);

    let journal = if app.detail.journal.is_empty() {
        "(no journal output)"
    } else {
        app.detail.journal.as_str()
    };
    let journal_block = Paragraph::new(journal)
        .style(styles::text())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border())
                .title(Span::styled(" journal ", styles::title())),
        );
    f.render_widget(journal_block, chunks[1]);

    let dependencies = if app.detail.dependencies.is_empty() {
        "(no dependency information)"
    } else {
        app.detail.dependencies.as_str()
    };
    let deps_block = Paragraph::new(dependencies)
        .style(styles::text_dim())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border())
                .title(Span::styled(" dependencies ", styles::title())),
        );
    f.render_widget(deps_block, chunks[2]);
}

fn draw_status_line(f: &mut Frame, app: &App, area: Rect) {
    let text = app.status.as_deref().unwrap_or("");
    f.render_widget(Paragraph::new(text).style(styles::text_dim()), area);
}

fn draw_key_hints(f: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = match app.view {
        View::Dashboard => &[
            ("enter", "detail"),
            ("b", "browse"),
            ("r", "refresh"),
            ("R", "reload"),
            ("d", "unpin"),
            ("?", "help"),
            ("q", "quit"),
        ],
        View::Browse => &[
            ("enter/a", "pin"),
            ("r", "rescan"),
            ("esc", "back"),
            ("q", "quit"),
        ],
        View::Detail => &[
            ("s", "start"),
            ("x", "stop"),
            ("r", "restart"),
            ("e", "enable"),
            ("d", "disable"),
            ("o", "browser"),
            ("l", "logs"),
            ("esc", "back"),
        ],
    };

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {key} "), styles::key_hint()));
        spans.push(Span::styled(format!("{label} "), styles::text_muted()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(50, 60, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled("Keys", styles::title())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  enter ", styles::key_hint()),
            Span::styled("Open the detail view for the selected unit", styles::text()),
        ]),
        Line::from(vec![
            Span::styled("  b     ", styles::key_hint()),
            Span::styled("Browse every unit on the machine", styles::text()),
        ]),
        Line::from(vec![
            Span::styled("  r / R ", styles::key_hint()),
            Span::styled("Refresh the selected unit / reload all favorites", styles::text()),
        ]),
        Line::from(vec![
            Span::styled("  d     ", styles::key_hint()),
            Span::styled("Unpin the selected favorite", styles::text()),
        ]),
        Line::from(vec![
            Span::styled("  s x r ", styles::key_hint()),
            Span::styled("Start / stop / restart (detail view)", styles::text()),
        ]),
        Line::from(vec![
            Span::styled("  e / d ", styles::key_hint()),
            Span::styled("Enable / disable at boot (detail view)", styles::text()),
        ]),
        Line::from(vec![
            Span::styled("  o     ", styles::key_hint()),
            Span::styled("Open localhost:<port> in the browser", styles::text()),
        ]),
        Line::from(vec![
            Span::styled("  q     ", styles::key_hint()),
            Span::styled("Quit", styles::text()),
        ]),
    ];

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border())
            .title(Span::styled(" help ", styles::title())),
    );
    f.render_widget(help, area);
}
