//! Editor core
//! Ties the terminal, the context stack and the editor state together
//!
//! ## editor/ Invariants
//!
//! - Every key read from the terminal is translated to canonical form
//!   before it is dispatched.
//! - A failed dispatch is shown on the message line; it never ends the loop.
//! - The terminal is restored whenever `run` returns.

use crate::constants::errors;
use crate::context::{Context, ContextMessage, ContextStack, NormalMode};
use crate::error::{ErrorType, FimError, Result};
use crate::key::KeyEvent;
use crate::render::Renderer;
use crate::state::EditorState;
use crate::term::TerminalBackend;

/// Main editor struct
pub struct Editor<T: TerminalBackend> {
    /// Terminal backend
    pub term: T,
    stack: ContextStack,
    state: EditorState,
    renderer: Renderer,
    /// Whether the terminal is in raw mode and needs restoring
    terminal_active: bool,
}

impl<T: TerminalBackend> Editor<T> {
    /// Create an editor with normal mode at the bottom of the stack
    pub fn new(term: T, state: EditorState) -> Self {
        Self::with_root(term, state, Box::new(NormalMode::new()))
    }

    /// Create an editor with a custom bottom context
    pub fn with_root(term: T, state: EditorState, root: Box<dyn Context>) -> Self {
        Self {
            term,
            stack: ContextStack::new(root),
            state,
            renderer: Renderer::new(),
            terminal_active: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    #[must_use]
    pub fn stack(&self) -> &ContextStack {
        &self.stack
    }

    /// Run the main loop until a quit is requested
    pub fn run(&mut self) -> Result<()> {
        self.term.init().map_err(terminal_error)?;
        self.terminal_active = true;
        tracing::info!(document = self.state.document.display_name(), "editor started");

        let result = self.event_loop();

        self.restore_terminal();
        tracing::info!("editor stopped");
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        self.render()?;
        while !self.state.should_quit() {
            let key = self.term.read_key().map_err(terminal_error)?;
            self.process_key(key);
            self.render()?;
        }
        Ok(())
    }

    /// Handle one key as typed on the user's keyboard
    pub fn process_key(&mut self, key: KeyEvent) {
        let key = self.state.to_canonical(key);
        match self.stack.dispatch(&mut self.state, key) {
            Ok(report) => {
                for msg in report.messages {
                    self.handle_root_message(msg);
                }
            }
            Err(err) => self.state.report(&err),
        }
    }

    /// Messages returned by the bottom context
    fn handle_root_message(&mut self, msg: ContextMessage) {
        match msg {
            ContextMessage::Str(line) => {
                if let Err(err) = self.state.execute_command(&line) {
                    self.state.report(&err);
                }
            }
            ContextMessage::Unit => {}
            ContextMessage::Bool(_)
            | ContextMessage::Int(_)
            | ContextMessage::Float(_)
            | ContextMessage::BitSet(_) => {
                tracing::debug!(message = ?msg, "dropped message from the bottom context");
            }
        }
    }

    /// Draw the current frame
    pub fn render(&mut self) -> Result<()> {
        let Editor {
            term,
            stack,
            state,
            renderer,
            ..
        } = self;
        renderer
            .render(term, state, stack.top_name())
            .map_err(|e| FimError::new(ErrorType::Renderer, errors::RENDER_FAILED, e))
    }

    fn restore_terminal(&mut self) {
        if self.terminal_active {
            self.term.deinit();
            self.terminal_active = false;
        }
    }
}

impl<T: TerminalBackend> Drop for Editor<T> {
    fn drop(&mut self) {
        self.restore_terminal();
    }
}

fn terminal_error(message: String) -> FimError {
    FimError::new(ErrorType::Renderer, errors::TERMINAL_ERROR, message)
}
