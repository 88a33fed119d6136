//! sowtree: an outline editor for numbered Statement of Work sections.
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::Parser;
use edtui::EditorEventHandler;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sowtree::app_state::{AppState, Flow, View};
use sowtree::document::DocumentSetup;
use sowtree::formats::markdown::MarkdownFormat;
use sowtree::{config, input, logging, toc, ui, Document};
use std::ffi::OsStr;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "sowtree")]
#[command(about = "Numbered section trees for Statement of Work documents", long_about = None)]
struct Args {
    /// Document to open: a saved .json document or a markdown file to import
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Print the table of contents and exit
    #[arg(long)]
    toc: bool,

    /// Page number of the first section in the table of contents
    #[arg(long, value_name = "N")]
    start_page: Option<u32>,

    /// Write the sections as markdown to FILE and exit
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Override the document name
    #[arg(long)]
    name: Option<String>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(flatten)]
    cover: CoverArgs,
}

/// Cover page answers, used when starting a new document.
#[derive(clap::Args, Default, PartialEq, Eq)]
#[command(next_help_heading = "New document")]
struct CoverArgs {
    /// Cover title
    #[arg(long)]
    title: Option<String>,

    /// Project number (default: SOW-<year>-<random NNN>)
    #[arg(long, value_name = "NUMBER")]
    project_number: Option<String>,

    /// Client or product name
    #[arg(long)]
    client: Option<String>,

    /// Building identifier
    #[arg(long)]
    building: Option<String>,

    /// Site location
    #[arg(long)]
    location: Option<String>,

    /// Author name
    #[arg(long)]
    prepared_by: Option<String>,

    /// Team or department
    #[arg(long)]
    department: Option<String>,

    /// Issue date as YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<String>,

    /// Body text of the first section
    #[arg(long)]
    description: Option<String>,

    /// Confidentiality marking
    #[arg(long)]
    confidentiality: Option<String>,
}

impl CoverArgs {
    fn into_setup(self, document_name: Option<String>) -> DocumentSetup {
        DocumentSetup {
            document_name,
            title: self.title,
            project_number: self.project_number,
            client_name: self.client,
            building: self.building,
            location: self.location,
            prepared_by: self.prepared_by,
            department: self.department,
            date: self.date,
            description: self.description,
            confidentiality: self.confidentiality,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut cfg = config::Config::load()?;

    // Override config with command line args
    if let Some(level) = args.log_level {
        cfg.log_level = level;
    }
    if let Some(page) = args.start_page {
        cfg.toc_start_page = page;
    }

    let interactive = !args.toc && args.export.is_none();
    let _guard = logging::init(&cfg, interactive)?;

    let document = match &args.path {
        Some(path) if path.exists() => {
            if args.cover != CoverArgs::default() {
                warn!("cover options only apply to new documents");
            }
            let mut document = input::load_document(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            if let Some(name) = args.name {
                document.document_name = name;
            }
            document
        }
        _ => {
            let today = chrono::Local::now().date_naive();
            let setup = args.cover.into_setup(args.name).with_defaults(today);
            Document::from_setup(&setup, today)
        }
    };

    if !interactive {
        if let Some(out) = &args.export {
            document.export_to(&MarkdownFormat, out)?;
        }
        if args.toc {
            let contents = toc::generate_toc(&document.sections, cfg.toc_start_page);
            for line in contents.render(cfg.toc_width, cfg.toc_indent) {
                println!("{line}");
            }
        }
        return Ok(());
    }

    // Imported markdown is saved as a new JSON document rather than over the source
    let save_path = args
        .path
        .filter(|p| p.extension().and_then(OsStr::to_str) == Some("json"));
    let state = AppState::new(document, save_path, cfg.wrap_width, cfg.toc_start_page);
    run_tui(state, &cfg)
}

fn run_tui(mut app: AppState, cfg: &config::Config) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut editor_handler = EditorEventHandler::default();

    let result = run_app(&mut terminal, &mut app, cfg, &mut editor_handler);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    if let Some(path) = &app.path {
        info!(path = %path.display(), "editor closed");
    }
    Ok(())
}

#[allow(clippy::too_many_lines)]
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    cfg: &config::Config,
    editor_handler: &mut EditorEventHandler,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app, cfg))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.current_view {
            View::Outline => {
                if app.pending_delete.is_some() {
                    if key.code == KeyCode::Char('y') {
                        // Refusals are reported through the status message
                        let _ = app.confirm_delete();
                    } else {
                        app.cancel_delete();
                    }
                    continue;
                }
                app.message = None;
                match key.code {
                    KeyCode::Char('q') => {
                        if app.execute("q") == Flow::Quit {
                            return Ok(());
                        }
                    }
                    KeyCode::Up | KeyCode::Char('k') => app.move_up(),
                    KeyCode::Down | KeyCode::Char('j') => app.move_down(),
                    KeyCode::Left | KeyCode::Char('h') => app.collapse_or_parent(),
                    KeyCode::Right | KeyCode::Char('l') => app.expand_or_child(),
                    KeyCode::Home => app.move_to_first(),
                    KeyCode::End => app.move_to_last(),
                    KeyCode::Char(' ') => app.toggle_expand(),
                    KeyCode::Char('a') => app.add_child(),
                    KeyCode::Char('s') => app.add_sibling(),
                    KeyCode::Char('A') => app.add_top_level(),
                    KeyCode::Char('d') => app.request_delete(),
                    KeyCode::Char('t') => app.current_view = View::Toc,
                    KeyCode::Char(':') => app.begin_command(),
                    KeyCode::Enter => app.enter_detail_view(),
                    _ => {}
                }
            }
            View::Toc => match key.code {
                KeyCode::Char('t' | 'q') | KeyCode::Esc => app.current_view = View::Outline,
                KeyCode::Char(':') => app.begin_command(),
                _ => {}
            },
            View::Detail => {
                let normal = app
                    .editor_state
                    .as_ref()
                    .is_some_and(|s| s.mode == edtui::EditorMode::Normal);
                match key.code {
                    KeyCode::Char(':') if normal => app.begin_command(),
                    KeyCode::Esc if normal => app.exit_detail_view(false),
                    _ => {
                        if let Some(ref mut editor_state) = app.editor_state {
                            editor_handler.on_key_event(key, editor_state);
                        }
                    }
                }
            }
            View::Command => match key.code {
                KeyCode::Char(c) => app.command_buffer.push(c),
                KeyCode::Backspace => {
                    app.command_buffer.pop();
                }
                KeyCode::Esc => app.cancel_command(),
                KeyCode::Enter => {
                    let cmd = app.command_buffer.clone();
                    if app.execute(&cmd) == Flow::Quit {
                        return Ok(());
                    }
                }
                _ => {}
            },
        }
    }
}
