use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use docviewer_engine::editing::HeadingTag;
use docviewer_engine::plugins::AccessibilityFocus;
use docviewer_engine::toolbar::{
    CODE_LANGUAGES, CodeLanguageSelector, HeadingSelector, LinkEditor, ToolbarAction,
    ToolbarEffect, ToolbarItem, toolbar_layout,
};
use docviewer_engine::{
    Command, DocumentationDto, DocumentationEditorProps, DocumentationNavLink, IoError,
    MARKDOWN_TRANSFORMERS, MarkdownEditor, Repository, convert_to_markdown_string,
    documentation_editor, io,
};
use relative_path::RelativePathBuf;

use crate::caret;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    Href,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Editing,
    Toolbar { index: usize },
    HeadingMenu { index: usize },
    LanguageMenu { index: usize },
    Link { form: LinkEditor, field: LinkField },
}

pub struct App {
    editor: MarkdownEditor,
    repository_root: PathBuf,
    document: RelativePathBuf,
    nav_link: Option<DocumentationNavLink>,
    latest: Rc<RefCell<Option<String>>>,
    saved: String,
    heading_selector: HeadingSelector,
    language_selector: CodeLanguageSelector,
    pub mode: Mode,
    pub status: String,
    quit_requested: bool,
    should_quit: bool,
}

impl App {
    /// Opens the landing page described by `dto`. A landing page that does not
    /// exist yet starts out empty and is created on the first save.
    pub fn open(repository_root: PathBuf, repository: Repository, dto: DocumentationDto) -> Result<Self> {
        let document = io::landing_page_path(&dto);
        let content = match io::read_document(&document, &repository_root) {
            Ok(content) => Some(content),
            Err(IoError::NotFound(path)) => {
                log::info!("{} does not exist yet", path.display());
                None
            }
            Err(e) => return Err(e.into()),
        };

        let latest = Rc::new(RefCell::new(None));
        let sink = latest.clone();
        let editor = documentation_editor(DocumentationEditorProps {
            content,
            disabled: false,
            on_change: Box::new(move |markdown| *sink.borrow_mut() = Some(markdown)),
        })?
        .ok_or_else(|| anyhow!("Documentation editor is disabled"))?;

        let nav_link = DocumentationNavLink::from_repository(&repository.with_documentation(dto));
        let saved = editor
            .editor()
            .read(|state| convert_to_markdown_string(state, &MARKDOWN_TRANSFORMERS));
        let mut app = Self {
            editor,
            repository_root,
            document,
            nav_link,
            latest,
            saved,
            heading_selector: HeadingSelector::default(),
            language_selector: CodeLanguageSelector::new(),
            mode: Mode::Editing,
            status: String::new(),
            quit_requested: false,
            should_quit: false,
        };
        app.sync_selectors();
        Ok(app)
    }

    pub fn editor(&self) -> &MarkdownEditor {
        &self.editor
    }

    pub fn document(&self) -> &RelativePathBuf {
        &self.document
    }

    pub fn nav_link(&self) -> Option<&DocumentationNavLink> {
        self.nav_link.as_ref()
    }

    pub fn language(&self) -> &str {
        self.language_selector.value()
    }

    /// Caret moves also notify, so compare against what was last saved.
    pub fn is_dirty(&self) -> bool {
        self.latest
            .borrow()
            .as_ref()
            .is_some_and(|markdown| *markdown != self.saved)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn toolbar_items(&self) -> Vec<ToolbarItem> {
        toolbar_layout(&self.editor.toolbar_state())
            .into_iter()
            .flat_map(|group| group.items)
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => return self.save(),
            KeyCode::Char('q') if ctrl => {
                self.quit();
                return Ok(());
            }
            _ => {}
        }
        self.quit_requested = false;

        match std::mem::replace(&mut self.mode, Mode::Editing) {
            Mode::Editing => self.handle_editing_key(key),
            Mode::Toolbar { index } => self.handle_toolbar_key(key, index),
            Mode::HeadingMenu { index } => self.handle_heading_key(key, index),
            Mode::LanguageMenu { index } => self.handle_language_key(key, index),
            Mode::Link { form, field } => self.handle_link_key(key, form, field),
        }
        self.sync_selectors();
        Ok(())
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('t') if ctrl => self.mode = Mode::Toolbar { index: 0 },
            KeyCode::Char(c) if alt => self.shortcut(c),
            KeyCode::Char(c) if !ctrl => {
                self.editor.dispatch(Command::InsertText(c.to_string()));
            }
            KeyCode::Enter => {
                self.editor.dispatch(Command::KeyEnter { ctrl });
            }
            KeyCode::Backspace => {
                self.editor.dispatch(Command::DeleteCharacter { backward: true });
            }
            KeyCode::Delete => {
                self.editor.dispatch(Command::DeleteCharacter { backward: false });
            }
            KeyCode::Esc => {
                self.editor.dispatch(Command::KeyEscape);
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let shift = shift || key.code == KeyCode::BackTab;
                let handled = self.editor.dispatch(Command::KeyTab { shift });
                // With focus on the editor as a whole, Tab leaves it for the toolbar.
                if !handled && self.editor.accessibility().focus() == AccessibilityFocus::FocusOnEditor {
                    self.mode = Mode::Toolbar { index: 0 };
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                self.move_caret(|state| caret::move_horizontal(state, forward, shift));
            }
            KeyCode::Up | KeyCode::Down => {
                let forward = key.code == KeyCode::Down;
                self.move_caret(|state| caret::move_vertical(state, forward));
            }
            KeyCode::Home | KeyCode::End => {
                let end = key.code == KeyCode::End;
                self.move_caret(|state| caret::move_to_block_edge(state, end));
            }
            _ => {}
        }
    }

    fn shortcut(&mut self, c: char) {
        let action = match c {
            'b' => ToolbarAction::Bold,
            'i' => ToolbarAction::Italic,
            's' => ToolbarAction::Strikethrough,
            'c' => ToolbarAction::InlineCode,
            'k' => ToolbarAction::Link,
            'h' => ToolbarAction::HorizontalRule,
            'x' => ToolbarAction::ClearFormat,
            'p' => ToolbarAction::Paragraph,
            'u' => ToolbarAction::BulletList,
            'o' => ToolbarAction::NumberList,
            'q' => ToolbarAction::Quote,
            'e' => ToolbarAction::CodeBlock,
            _ => return,
        };
        self.apply(action);
    }

    fn apply(&mut self, action: ToolbarAction) {
        log::debug!("Toolbar action {action:?}");
        match action.apply(self.editor.editor_mut()) {
            ToolbarEffect::Updated(true) => self.status.clear(),
            ToolbarEffect::Updated(false) => {
                if matches!(
                    action,
                    ToolbarAction::Bold
                        | ToolbarAction::Italic
                        | ToolbarAction::Strikethrough
                        | ToolbarAction::InlineCode
                ) {
                    self.status = "Select some text first".to_string();
                }
            }
            ToolbarEffect::OpenLinkEditor(form) => {
                self.mode = Mode::Link {
                    form,
                    field: LinkField::Href,
                }
            }
        }
    }

    fn handle_toolbar_key(&mut self, key: KeyEvent, index: usize) {
        let items = self.toolbar_items();
        let last = items.len().saturating_sub(1);
        match key.code {
            KeyCode::Left => self.mode = Mode::Toolbar { index: index.saturating_sub(1) },
            KeyCode::Right => self.mode = Mode::Toolbar { index: (index + 1).min(last) },
            KeyCode::Esc => {
                self.editor.dispatch(Command::Focus);
            }
            KeyCode::Enter | KeyCode::Char(' ') => match items.get(index) {
                Some(ToolbarItem::Button(button)) => self.apply(button.action),
                Some(ToolbarItem::HeadingSelector { level, .. }) => {
                    self.heading_selector.toggle_open();
                    self.mode = Mode::HeadingMenu {
                        index: usize::from(*level).saturating_sub(1),
                    };
                }
                Some(ToolbarItem::CodeLanguageSelector) => {
                    let index = CODE_LANGUAGES
                        .iter()
                        .position(|(key, _)| *key == self.language_selector.value())
                        .unwrap_or(0);
                    self.mode = Mode::LanguageMenu { index };
                }
                None => {}
            },
            _ => self.mode = Mode::Toolbar { index: index.min(last) },
        }
    }

    fn handle_heading_key(&mut self, key: KeyEvent, index: usize) {
        match key.code {
            KeyCode::Up => self.mode = Mode::HeadingMenu { index: index.saturating_sub(1) },
            KeyCode::Down => {
                self.mode = Mode::HeadingMenu {
                    index: (index + 1).min(HeadingTag::ALL.len() - 1),
                }
            }
            KeyCode::Enter => {
                if let Some(&tag) = HeadingTag::ALL.get(index) {
                    self.heading_selector.choose(self.editor.editor_mut(), tag);
                }
            }
            KeyCode::Esc => self.heading_selector.toggle_open(),
            _ => self.mode = Mode::HeadingMenu { index },
        }
    }

    fn handle_language_key(&mut self, key: KeyEvent, index: usize) {
        match key.code {
            KeyCode::Up => self.mode = Mode::LanguageMenu { index: index.saturating_sub(1) },
            KeyCode::Down => {
                self.mode = Mode::LanguageMenu {
                    index: (index + 1).min(CODE_LANGUAGES.len() - 1),
                }
            }
            KeyCode::Enter => {
                if let Some((language, _)) = CODE_LANGUAGES.get(index) {
                    self.language_selector
                        .select_language(self.editor.editor_mut(), language);
                }
            }
            KeyCode::Esc => {}
            _ => self.mode = Mode::LanguageMenu { index },
        }
    }

    fn handle_link_key(&mut self, key: KeyEvent, mut form: LinkEditor, field: LinkField) {
        let input = match field {
            LinkField::Href => &mut form.href,
            LinkField::Text => &mut form.text,
        };
        match key.code {
            KeyCode::Esc => return,
            KeyCode::Enter => {
                if form.href.trim().is_empty() {
                    self.status = "A link needs a target".to_string();
                } else {
                    form.submit(self.editor.editor_mut());
                    return;
                }
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let field = match field {
                    LinkField::Href => LinkField::Text,
                    LinkField::Text => LinkField::Href,
                };
                self.mode = Mode::Link { form, field };
                return;
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
        self.mode = Mode::Link { form, field };
    }

    fn move_caret(&mut self, movement: impl FnOnce(&mut docviewer_engine::EditorState)) {
        self.editor.editor_mut().update(|tx| {
            movement(tx);
            Ok(())
        });
    }

    fn sync_selectors(&mut self) {
        self.language_selector.sync(self.editor.editor().state());
    }

    pub fn save(&mut self) -> Result<()> {
        if !self.is_dirty() {
            self.status = "No changes to save".to_string();
            return Ok(());
        }
        let Some(markdown) = self.latest.borrow_mut().take() else {
            return Ok(());
        };
        io::write_document(&self.document, &self.repository_root, &markdown)?;
        self.saved = markdown;
        log::info!("Saved {}", self.document);
        self.status = format!("Saved {}", self.document);
        Ok(())
    }

    fn quit(&mut self) {
        if self.is_dirty() && !self.quit_requested {
            self.quit_requested = true;
            self.status = "Unsaved changes, press Ctrl+Q again to discard them".to_string();
            return;
        }
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn open(content: Option<&str>) -> (tempfile::TempDir, App) {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        if let Some(content) = content {
            fs::write(dir.path().join("docs/index.md"), content).unwrap();
        }
        let dto = DocumentationDto::new("main", "docs", "index.md");
        let app = App::open(dir.path().to_path_buf(), Repository::new("ns", "repo"), dto).unwrap();
        (dir, app)
    }

    #[test]
    fn edits_are_saved_to_the_landing_page() {
        let (dir, mut app) = open(Some("Intro"));
        assert!(!app.is_dirty());
        assert_eq!(
            app.nav_link().unwrap().to,
            "/repo/ns/repo/code/sources/main/docs/index.md"
        );

        type_text(&mut app, " text");
        assert!(app.is_dirty());
        app.handle_key(with(KeyCode::Char('s'), KeyModifiers::CONTROL)).unwrap();

        assert!(!app.is_dirty());
        assert_eq!(
            fs::read_to_string(dir.path().join("docs/index.md")).unwrap(),
            "Intro text"
        );
    }

    #[test]
    fn missing_landing_page_is_created_on_save() {
        let (dir, mut app) = open(None);
        type_text(&mut app, "# Hello");
        app.save().unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("docs/index.md")).unwrap(),
            "# Hello"
        );
    }

    #[test]
    fn enter_starts_a_new_paragraph() {
        let (_dir, mut app) = open(Some("Intro"));
        app.handle_key(key(KeyCode::Enter)).unwrap();
        type_text(&mut app, "Next");
        assert_eq!(app.latest.borrow().as_deref(), Some("Intro\n\nNext"));
    }

    #[test]
    fn heading_menu_retags_the_block() {
        let (_dir, mut app) = open(Some("Title"));
        app.handle_key(with(KeyCode::Char('t'), KeyModifiers::CONTROL)).unwrap();
        app.handle_key(key(KeyCode::Right)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.mode, Mode::HeadingMenu { index: 0 });

        app.handle_key(key(KeyCode::Down)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.mode, Mode::Editing);
        assert_eq!(app.latest.borrow().as_deref(), Some("## Title"));
    }

    #[test]
    fn language_menu_follows_the_code_block() {
        let (_dir, mut app) = open(Some("```go\nfmt.Println()\n```"));
        assert_eq!(app.language(), "go");

        app.handle_key(with(KeyCode::Char('t'), KeyModifiers::CONTROL)).unwrap();
        app.handle_key(key(KeyCode::Right)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.mode, Mode::LanguageMenu { index: 4 });

        app.handle_key(key(KeyCode::Up)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.language(), "ts");
    }

    #[test]
    fn link_form_inserts_a_link() {
        let (_dir, mut app) = open(Some("See"));
        type_text(&mut app, " ");
        app.handle_key(with(KeyCode::Char('k'), KeyModifiers::ALT)).unwrap();
        assert!(matches!(app.mode, Mode::Link { .. }));

        type_text(&mut app, "https://example.com");
        app.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "docs");
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.mode, Mode::Editing);
        assert_eq!(
            app.latest.borrow().as_deref(),
            Some("See [docs](https://example.com)")
        );
    }

    #[test]
    fn quitting_with_unsaved_changes_asks_twice() {
        let (_dir, mut app) = open(Some("Intro"));
        type_text(&mut app, "!");
        let quit = with(KeyCode::Char('q'), KeyModifiers::CONTROL);
        app.handle_key(quit).unwrap();
        assert!(!app.should_quit());
        app.handle_key(quit).unwrap();
        assert!(app.should_quit());
    }
}
