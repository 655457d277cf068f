//! Editor state
//! Everything a context may read or change while handling a key
//!
//! ## state/ Invariants
//!
//! - Contexts never touch the stack directly; pushes are queued here and
//!   applied by the stack after returns settle.
//! - The active layout always matches the `layout` option.
//! - The message line is the only place errors are shown to the user.

use crate::command::{self, ExecutionResult};
use crate::config::Config;
use crate::context::{Context, ContextRegistry};
use crate::document::Document;
use crate::error::{ErrorSeverity, FimError, Result};
use crate::history::CommandHistory;
use crate::key::KeyEvent;
use crate::layout::{self, Layout, LayoutType, Qwerty};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Contents of the bottom line of the screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MessageLine {
    #[default]
    Clear,
    /// Mode banner such as `-- INSERT --`
    Mode(String),
    /// A line being edited, with its cursor (in characters)
    Prompt {
        prefix: char,
        text: String,
        cursor: usize,
    },
    Message {
        severity: ErrorSeverity,
        text: String,
    },
}

pub struct EditorState {
    pub config: Config,
    pub registry: ContextRegistry,
    pub document: Document,
    pub history: CommandHistory,
    layout: Box<dyn Layout>,
    /// Option value the current layout was built from
    layout_type: LayoutType,
    message: MessageLine,
    quit: bool,
    pending: VecDeque<Box<dyn Context>>,
    /// File the config was loaded from, for `:source` without arguments
    config_path: Option<PathBuf>,
}

impl EditorState {
    /// Editor state with the QWERTY layout; call [`EditorState::sync_options`]
    /// to pick up the layout and history options of `config`
    pub fn new(config: Config, registry: ContextRegistry, document: Document) -> Self {
        Self {
            config,
            registry,
            document,
            history: CommandHistory::default(),
            layout: Box::new(Qwerty),
            layout_type: LayoutType::Qwerty,
            message: MessageLine::Clear,
            quit: false,
            pending: VecDeque::new(),
            config_path: None,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    /// Translate a key typed on the user's layout into canonical form
    #[must_use]
    pub fn to_canonical(&self, key: KeyEvent) -> KeyEvent {
        self.layout.to_canonical(key)
    }

    pub fn set_config_path(&mut self, path: Option<PathBuf>) {
        self.config_path = path;
    }

    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Directory relative layout paths are resolved against
    fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    /// Bring the layout and history in line with the current options
    ///
    /// If the layout cannot be loaded, the `layout` option is reverted and
    /// the old layout stays active.
    pub fn sync_options(&mut self) -> Result<()> {
        let options = self.config.options();
        if options.history != self.history.capacity() {
            self.history.set_capacity(options.history);
        }
        let base_dir = self.base_dir();
        let wanted = options.layout.resolved(&base_dir);
        if wanted != self.layout_type {
            match layout::load(&wanted, &base_dir) {
                Ok(layout) => {
                    tracing::info!(layout = layout.name(), "switched keyboard layout");
                    self.layout = layout;
                    self.config.options_mut().layout = wanted.clone();
                    self.layout_type = wanted;
                }
                Err(err) => {
                    self.config.options_mut().layout = self.layout_type.clone();
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    /// Queue a context to be pushed once the current returns settle
    pub fn push_context(&mut self, ctx: Box<dyn Context>) {
        self.pending.push_back(ctx);
    }

    /// Queue the context bound to `key` in `context`; false if nothing is bound
    pub fn push_binding(&mut self, context: &str, key: KeyEvent) -> bool {
        let Some(factory) = self.config.query(context, key) else {
            return false;
        };
        tracing::debug!(%context, %key, target = factory.name(), "binding");
        let ctx = factory.create();
        self.push_context(ctx);
        true
    }

    pub(crate) fn next_pending(&mut self) -> Option<Box<dyn Context>> {
        self.pending.pop_front()
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub fn message(&self) -> &MessageLine {
        &self.message
    }

    pub fn set_message(&mut self, message: MessageLine) {
        self.message = message;
    }

    pub fn clear_message(&mut self) {
        self.message = MessageLine::Clear;
    }

    /// Show an informational message
    pub fn notify(&mut self, text: impl Into<String>) {
        self.message = MessageLine::Message {
            severity: ErrorSeverity::Info,
            text: text.into(),
        };
    }

    /// Show an error on the message line and log it
    pub fn report(&mut self, err: &FimError) {
        match err.severity {
            ErrorSeverity::Info | ErrorSeverity::Warning => {
                tracing::warn!(code = %err.code, kind = %err.kind, "{}", err.message);
            }
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                tracing::error!(code = %err.code, kind = %err.kind, "{}", err.message);
            }
        }
        self.message = MessageLine::Message {
            severity: err.severity,
            text: err.message.clone(),
        };
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Parse and run an ex command line
    pub fn execute_command(&mut self, line: &str) -> Result<()> {
        let parsed = command::parse(line);
        tracing::debug!(command = ?parsed, "execute");
        match command::execute(parsed, self) {
            ExecutionResult::Success => Ok(()),
            ExecutionResult::Quit => {
                self.request_quit();
                Ok(())
            }
            ExecutionResult::Message(text) => {
                self.notify(text);
                Ok(())
            }
            ExecutionResult::Failure(err) => Err(err),
        }
    }
}
