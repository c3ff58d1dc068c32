//! The playground engine
//!
//! Owns an in-memory editor wired to a mention session and applies
//! playground commands to it as the platform events they stand for.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use nu_ansi_term::{Color, Style};
use reedline::{Reedline, Signal};
use serde_json::json;
use tracing::{debug, info};

use super::command::{self, Command, HELP};
use super::prompt::PlaygroundPrompt;
use crate::adapter::{
    EditorEvent, Expander, MemoryEditor, MemoryFrame, MemoryFrames, MemoryHost, MemoryNavigators,
    MemorySurface, OBJECT_REPLACEMENT, Reaction,
};
use crate::config::Config;
use crate::error::{MentionsError, Result};
use crate::negotiation::{ProviderResult, SuggestionProvider};
use crate::session::{
    CommitOutcome, InputOutcome, KeyOutcome, Phase, Resolution, Session, SessionOptions,
};
use crate::surface::{FocusTarget, FrameLocator, KeyPress, OptionItem, Surface, Target};

/// Source the remote frame starts from
const FRAME_SRC: &str = "/mentions";

/// Whether the caller should keep feeding commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Serves the configured candidates whose content contains the captured text
struct CandidateProvider {
    candidates: Vec<OptionItem>,
    surface: Arc<MemorySurface>,
}

#[async_trait]
impl SuggestionProvider for CandidateProvider {
    async fn suggest(&self, key: &str, text: &str) -> Option<ProviderResult> {
        let needle = text.to_lowercase();
        let hits: Vec<OptionItem> = self
            .candidates
            .iter()
            .filter(|item| item.content.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        debug!(%key, %text, hits = hits.len(), "candidates filtered");

        let matched = !hits.is_empty();
        self.surface.set_options(hits);
        Some(if matched {
            ProviderResult::matched(self.surface.clone())
        } else {
            ProviderResult::unmatched(self.surface.clone())
        })
    }
}

/// Colors output when enabled
#[derive(Debug, Clone, Copy)]
struct Painter {
    enabled: bool,
}

impl Painter {
    fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn good(&self, text: &str) -> String {
        self.paint(Color::Green.normal(), text)
    }

    fn quiet(&self, text: &str) -> String {
        self.paint(Color::DarkGray.normal(), text)
    }

    fn warn(&self, text: &str) -> String {
        self.paint(Color::Yellow.normal(), text)
    }

    fn strong(&self, text: &str) -> String {
        self.paint(Style::new().bold(), text)
    }
}

/// Interactive mention session over an in-memory editor
pub struct Playground {
    editor: MemoryEditor,
    navigators: Arc<MemoryNavigators>,
    expander: Expander,
    painter: Painter,
}

impl Playground {
    /// Build the editor, its session and a suggestion source.
    ///
    /// With `expander.name` and `expander.frame` both set, suggestions come
    /// from a remote frame serving the candidates; otherwise a provider
    /// filters them into an ephemeral surface.
    pub fn new(config: &Config) -> Result<Self> {
        let attribute = &config.expander.attachment_attribute;
        let candidates: Vec<OptionItem> = config
            .playground
            .candidates
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let payload = json!({ "sgid": name.to_lowercase().replace(' ', "-") });
                OptionItem::new(name.clone())
                    .with_id(format!("candidate-{i}"))
                    .with_attribute(attribute.clone(), payload.to_string())
            })
            .collect();

        let frames = Arc::new(MemoryFrames::new());
        if let Some(frame) = &config.expander.frame {
            frames.insert(frame.clone(), MemoryFrame::new(FRAME_SRC, candidates.clone()));
        }
        let locator: Arc<dyn FrameLocator> = frames;
        let options = SessionOptions::from_config(&config.expander, Some(locator));
        let remote = options.remote.is_some();

        let editor = MemoryEditor::rich();
        let navigators = Arc::new(MemoryNavigators::new());
        let mut session = Session::attach(
            Box::new(MemoryHost::new(editor.clone())),
            options,
            navigators.clone(),
        )?;

        if !remote {
            session.add_provider(Arc::new(CandidateProvider {
                candidates,
                surface: MemorySurface::new(Vec::new()),
            }));
        }
        info!(remote, keys = %config.expander.keys, "playground ready");

        Ok(Self {
            editor,
            navigators,
            expander: Expander::new(session),
            painter: Painter {
                enabled: config.playground.color_output,
            },
        })
    }

    pub fn editor(&self) -> &MemoryEditor {
        &self.editor
    }

    pub fn session(&self) -> &Session {
        self.expander.session()
    }

    pub fn prompt(&self) -> PlaygroundPrompt {
        PlaygroundPrompt::new(&self.session().phase())
    }

    /// Parse and execute one line
    pub async fn run_line(&mut self, line: &str) -> Result<Flow> {
        match command::parse(line)? {
            Some(command) => self.execute(command).await,
            None => Ok(Flow::Continue(String::new())),
        }
    }

    /// Execute one command
    ///
    /// # Returns
    /// * `Result<Flow>` - Report of what the session did, or `Quit`
    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        let report = match command {
            Command::Type(text) => {
                self.editor.type_text(&text);
                self.input().await?
            }
            Command::Set(text) => {
                self.editor.set_text(&text);
                self.input().await?
            }
            Command::Back(count) => {
                let mut lines = Vec::with_capacity(count);
                for _ in 0..count {
                    self.editor.backspace();
                    lines.push(self.input().await?);
                }
                lines.join("\n")
            }
            Command::Paste(text) => {
                self.dispatch(EditorEvent::Paste(Target::Editor)).await?;
                self.editor.type_text(&text);
                self.input().await?
            }
            Command::Key(name) => {
                let event = EditorEvent::KeyDown {
                    target: Target::Editor,
                    key: KeyPress::new(name),
                };
                let reaction = self.dispatch(event).await?;
                self.describe(&reaction)
            }
            Command::Blur => {
                self.editor.set_focus(FocusTarget::Elsewhere);
                let reaction = self.dispatch(EditorEvent::FocusOut(Target::Editor)).await?;
                self.describe(&reaction)
            }
            Command::Focus => {
                self.editor.set_focus(FocusTarget::Editor);
                self.painter.quiet("editor focused")
            }
            Command::Pick(index) => self.pick(index).await?,
            Command::Dismiss => {
                let reaction = self.dispatch(EditorEvent::Dismiss).await?;
                self.describe(&reaction)
            }
            Command::Show => self.show(),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Flow::Quit),
        };
        Ok(Flow::Continue(report))
    }

    async fn dispatch(&mut self, event: EditorEvent) -> Result<Reaction> {
        self.expander.dispatch(event).await
    }

    async fn input(&mut self) -> Result<String> {
        let reaction = self.dispatch(EditorEvent::Input(Target::Editor)).await?;
        Ok(self.describe(&reaction))
    }

    async fn pick(&mut self, index: usize) -> Result<String> {
        let Some(surface) = self.session().surface() else {
            return Ok(self.painter.warn("no menu open"));
        };
        let Some(item) = surface.options().into_iter().nth(index) else {
            return Ok(self.painter.warn(&format!("no option {index}")));
        };

        self.dispatch(EditorEvent::PointerDown).await?;
        let reaction = self.dispatch(EditorEvent::Commit(item)).await?;
        Ok(self.describe(&reaction))
    }

    fn describe(&self, reaction: &Reaction) -> String {
        let p = &self.painter;
        match reaction {
            Reaction::Recorded => p.quiet("recorded"),
            Reaction::Input(InputOutcome::Ignored) => p.quiet("ignored"),
            Reaction::Input(InputOutcome::Suppressed) => p.quiet("skipped after paste"),
            Reaction::Input(InputOutcome::Cleared { closed: true }) => p.warn("menu closed"),
            Reaction::Input(InputOutcome::Cleared { closed: false }) => p.quiet("no mention"),
            Reaction::Input(InputOutcome::Matched(ticket)) => {
                format!("matched {}{}", ticket.matched.key, ticket.matched.text)
            }
            Reaction::Negotiated(Resolution::Activated) => {
                format!("{}\n{}", p.good("menu open"), self.menu_lines().join("\n"))
            }
            Reaction::Negotiated(Resolution::Refused) => p.warn("menu refused, editor not focused"),
            Reaction::Negotiated(Resolution::Closed { closed: true }) => {
                p.warn("no suggestions, menu closed")
            }
            Reaction::Negotiated(Resolution::Closed { closed: false }) => {
                p.quiet("no suggestions")
            }
            Reaction::Negotiated(Resolution::Stale) => p.quiet("stale suggestions dropped"),
            Reaction::Key(KeyOutcome::Passed) => p.quiet("key passed to editor"),
            Reaction::Key(KeyOutcome::Swallowed) => match self.navigators.selected() {
                Some(selected) if self.session().is_active() => {
                    format!("selected option {selected}")
                }
                _ => p.warn("menu closed"),
            },
            Reaction::Key(KeyOutcome::Committed(outcome)) | Reaction::Commit(outcome) => {
                self.describe_commit(outcome)
            }
            Reaction::Closed(true) => p.warn("menu closed"),
            Reaction::Closed(false) => p.quiet("nothing to close"),
        }
    }

    fn describe_commit(&self, outcome: &CommitOutcome) -> String {
        match outcome {
            CommitOutcome::Ignored => self.painter.quiet("nothing to commit"),
            CommitOutcome::Vetoed => self.painter.warn("commit vetoed"),
            CommitOutcome::Inserted { object, .. } => {
                let object = serde_json::to_string(object.as_map()).unwrap_or_default();
                format!("{} {}", self.painter.good("inserted"), object)
            }
        }
    }

    fn menu_lines(&self) -> Vec<String> {
        let Some(surface) = self.session().surface() else {
            return Vec::new();
        };
        let selected = self.navigators.selected();
        surface
            .options()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if selected == Some(i) {
                    format!("> {i}: {}", self.painter.strong(&item.content))
                } else {
                    format!("  {i}: {}", item.content)
                }
            })
            .collect()
    }

    /// Document with the cursor drawn as `|`, then the phase and the menu
    fn show(&self) -> String {
        let mut document: Vec<char> = self.editor.text().chars().collect();
        let cursor = self.editor.cursor().min(document.len());
        document.insert(cursor, '|');
        let document: String = document
            .into_iter()
            .map(|c| if c == OBJECT_REPLACEMENT { '◆' } else { c })
            .collect();

        let phase = match self.session().phase() {
            Phase::Idle => "idle".to_string(),
            Phase::Pending(m) => format!("pending {}{}", m.key, m.text),
            Phase::Active(m) => format!("active {}{}", m.key, m.text),
        };

        let mut lines = vec![
            format!("{} {}", self.painter.strong("text:"), document),
            format!("{} {}", self.painter.strong("phase:"), phase),
            format!(
                "{} {}",
                self.painter.strong("look-back:"),
                self.session().look_back()
            ),
        ];
        lines.extend(self.menu_lines());
        for object in self.editor.objects() {
            let object = serde_json::to_string(object.as_map()).unwrap_or_default();
            lines.push(format!("{} {}", self.painter.strong("object:"), object));
        }
        lines.join("\n")
    }

    /// Run every line of a script file, echoing each command
    pub async fn run_script(&mut self, path: &Path) -> Result<()> {
        let script = fs::read_to_string(path)?;
        for (number, line) in script.lines().enumerate() {
            if command::parse(line)?.is_none() {
                continue;
            }
            println!("{}", self.painter.quiet(&format!("> {line}")));
            match self.run_line(line).await {
                Ok(Flow::Continue(report)) => println!("{report}"),
                Ok(Flow::Quit) => break,
                Err(e) => {
                    return Err(MentionsError::Generic(format!(
                        "{}:{}: {e}",
                        path.display(),
                        number + 1
                    )));
                }
            }
        }
        Ok(())
    }

    /// Read commands from the terminal until `quit` or end of input
    pub async fn run_interactive(&mut self) -> Result<()> {
        let mut line_editor = Reedline::create();
        println!("Type 'help' for commands.");

        loop {
            let prompt = self.prompt();
            let line = match line_editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => line,
                Ok(Signal::CtrlC) => continue,
                Ok(_) => break,
                Err(e) => return Err(MentionsError::Generic(format!("Read error: {e}"))),
            };

            match self.run_line(&line).await {
                Ok(Flow::Continue(report)) if report.is_empty() => {}
                Ok(Flow::Continue(report)) => println!("{report}"),
                Ok(Flow::Quit) => break,
                Err(e) => eprintln!("{e}"),
            }
        }

        println!("Goodbye!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpanderConfig;

    fn plain_config() -> Config {
        let mut config = Config::default();
        config.playground.color_output = false;
        config
    }

    async fn run(playground: &mut Playground, line: &str) -> String {
        match playground.run_line(line).await.unwrap() {
            Flow::Continue(report) => report,
            Flow::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn test_menu_opens_with_filtered_candidates() {
        let mut playground = Playground::new(&plain_config()).unwrap();
        let report = run(&mut playground, "type @al").await;

        assert!(report.starts_with("menu open"));
        assert!(report.contains("Alan Turing"));
        assert!(!report.contains("Grace Hopper"));
        assert!(matches!(playground.session().phase(), Phase::Active(_)));
    }

    #[tokio::test]
    async fn test_pick_inserts_object() {
        let mut playground = Playground::new(&plain_config()).unwrap();
        run(&mut playground, "type hi @gra").await;
        let report = run(&mut playground, "pick 0").await;

        assert!(report.starts_with("inserted"));
        assert!(report.contains("\"sgid\":\"grace-hopper\""));
        assert_eq!(playground.editor().text(), format!("hi {OBJECT_REPLACEMENT}"));
        assert!(!playground.session().is_active());
    }

    #[tokio::test]
    async fn test_no_candidates_keeps_menu_closed() {
        let mut playground = Playground::new(&plain_config()).unwrap();
        let report = run(&mut playground, "type @zz").await;
        assert_eq!(report, "no suggestions");
    }

    #[tokio::test]
    async fn test_escape_then_typing_stays_closed() {
        let mut playground = Playground::new(&plain_config()).unwrap();
        run(&mut playground, "type @a").await;
        assert_eq!(run(&mut playground, "key Escape").await, "menu closed");
        assert_eq!(run(&mut playground, "type l").await, "no mention");
    }

    #[tokio::test]
    async fn test_arrow_keys_select() {
        let mut playground = Playground::new(&plain_config()).unwrap();
        run(&mut playground, "type @a").await;
        assert_eq!(run(&mut playground, "key ArrowDown").await, "selected option 1");
        let report = run(&mut playground, "key Enter").await;
        assert!(report.starts_with("inserted"));
    }

    #[tokio::test]
    async fn test_remote_frame_mode() {
        let mut config = plain_config();
        config.expander = ExpanderConfig {
            name: Some("query".to_string()),
            frame: Some("people".to_string()),
            ..ExpanderConfig::default()
        };
        let mut playground = Playground::new(&config).unwrap();

        let report = run(&mut playground, "type @ken").await;
        assert!(report.contains("Ken Thompson"));
    }

    #[tokio::test]
    async fn test_show_draws_cursor() {
        let mut playground = Playground::new(&plain_config()).unwrap();
        run(&mut playground, "type ab").await;
        let report = run(&mut playground, "show").await;
        assert!(report.contains("text: ab|"));
        assert!(report.contains("phase: idle"));
    }

    #[tokio::test]
    async fn test_quit() {
        let mut playground = Playground::new(&plain_config()).unwrap();
        assert_eq!(playground.run_line("quit").await.unwrap(), Flow::Quit);
    }
}
