mod app;
mod caret;
mod render;

use anyhow::{Result, anyhow};
use app::{App, LinkField, Mode};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use docviewer_config::{Config, DirectorySource, resolve_documentation};
use docviewer_engine::editing::HeadingTag;
use docviewer_engine::plugins::AccessibilityFocus;
use docviewer_engine::toolbar::{CODE_LANGUAGES, toolbar_layout};
use docviewer_engine::{Repository, io};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{
    env,
    fs::File,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

fn main() -> Result<()> {
    init_logging();

    // Determine repository path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} [repository-path]", args[0]);
            process::exit(1);
        }
    };

    let (repository_path, from_config) = match (args.len(), &config) {
        (2, _) => (PathBuf::from(&args[1]), false),
        (1, Some(config)) => (config.repository_path.clone(), true),
        (1, None) => {
            eprintln!("Error: No repository path provided and no config file found");
            eprintln!("Usage: {} <repository-path>", args[0]);
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
        _ => {
            eprintln!("Usage: {} [repository-path]", args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = io::validate_repository_dir(&repository_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Repository path '{}'{} is invalid: {e}",
            repository_path.display(),
            source
        );
        process::exit(1);
    }

    let fallback_branch = config
        .as_ref()
        .map_or_else(|| "main".to_string(), |config| config.default_branch.clone());
    let source = DirectorySource::new(&repository_path).with_fallback_branch(fallback_branch);
    let Some(dto) = resolve_documentation(&source)? else {
        eprintln!(
            "Error: '{}' has no usable documentation.yaml",
            repository_path.display()
        );
        process::exit(1);
    };

    let mut app = App::open(repository_path.clone(), repository_for(&repository_path)?, dto)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Logs go to a file; the terminal belongs to the editor.
fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    if let Ok(file) = File::create(env::temp_dir().join("docviewer.log")) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

/// Names the checkout like a hosted repository: parent directory as namespace.
fn repository_for(path: &Path) -> Result<Repository> {
    let path = path.canonicalize()?;
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("'{}' has no directory name", path.display()))?;
    let namespace = path
        .parent()
        .and_then(|parent| parent.file_name())
        .map_or_else(|| "local".into(), |namespace| namespace.to_string_lossy());
    Ok(Repository::new(namespace, name.to_string_lossy()))
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if let Err(e) = app.handle_key(key) {
                log::error!("{e:#}");
                app.status = format!("Error: {e}");
            }
            if app.should_quit() {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Toolbar
    let focused = match app.mode {
        Mode::Toolbar { index } => Some(index),
        _ => None,
    };
    let groups = toolbar_layout(&app.editor().toolbar_state());
    let toolbar = Paragraph::new(render::toolbar_line(&groups, app.language(), focused))
        .block(Block::default().borders(Borders::ALL).title("Toolbar"));
    f.render_widget(toolbar, chunks[0]);

    // Document
    let dirty = if app.is_dirty() { " *" } else { "" };
    let title = format!("{}{dirty}", app.document());
    let document = Paragraph::new(render::document_lines(app.editor().editor().state()))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(document, chunks[1]);

    // Status
    let focus = match app.editor().accessibility().focus() {
        AccessibilityFocus::FocusInEditor => "editing",
        AccessibilityFocus::FocusOnEditor => "editor focused (Tab: toolbar, Ctrl+Enter: back in)",
    };
    let link = app
        .nav_link()
        .map(|link| link.to.clone())
        .unwrap_or_default();
    let status = Line::from(vec![
        Span::styled(format!("{focus} "), Style::default().fg(Color::Cyan)),
        Span::raw(format!("{link} ")),
        Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(Paragraph::new(status), chunks[2]);

    let help = Line::from(vec![
        Span::raw("Ctrl+S: Save | "),
        Span::raw("Ctrl+Q: Quit | "),
        Span::raw("Ctrl+T: Toolbar | "),
        Span::raw("Alt+b/i/s/c/k: Inline | Alt+p/u/o/q/e/h: Blocks | Alt+x: Clear"),
    ]);
    f.render_widget(Paragraph::new(help), chunks[3]);

    match &app.mode {
        Mode::HeadingMenu { index } => {
            let items = HeadingTag::ALL
                .iter()
                .map(|tag| format!("Heading {}", tag.level()));
            menu(f, "Heading", items, *index);
        }
        Mode::LanguageMenu { index } => {
            let items = CODE_LANGUAGES.iter().map(|(_, name)| name.to_string());
            menu(f, "Language", items, *index);
        }
        Mode::Link { form, field } => {
            let area = centered(f.area(), 60, 6);
            let marker = |this: LinkField| if *field == this { "> " } else { "  " };
            let lines = vec![
                Line::from(format!("{}URL:  {}", marker(LinkField::Href), form.href)),
                Line::from(format!("{}Text: {}", marker(LinkField::Text), form.text)),
                Line::default(),
                Line::from("Tab: switch field | Enter: apply | Esc: cancel"),
            ];
            f.render_widget(Clear, area);
            f.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Link")),
                area,
            );
        }
        Mode::Editing | Mode::Toolbar { .. } => {}
    }
}

fn menu(f: &mut Frame, title: &str, items: impl Iterator<Item = String>, selected: usize) {
    let items: Vec<ListItem> = items.map(ListItem::new).collect();
    let area = centered(f.area(), 30, items.len() as u16 + 2);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    let mut state = ListState::default();
    state.select(Some(selected));
    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
