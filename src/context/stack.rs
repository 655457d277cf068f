//! The context stack and its dispatch cycle
//!
//! One key event runs one cycle:
//!
//! 1. `forward` on the top context.
//! 2. Returns settle: a context that returns a message is popped and the
//!    message goes to the new top's `receive`, repeating while messages flow.
//!    A message returned by the bottom context is handed to the caller.
//! 3. Pushes requested through [`EditorState::push_context`] are applied one
//!    at a time: push, `setup`, then settle whatever that returned.
//!
//! A failing hook aborts the cycle and puts the stack back the way it was.

use super::{Context, ContextMessage};
use crate::constants::{dispatch::MAX_CASCADE, errors};
use crate::error::{ErrorType, FimError, Result};
use crate::key::KeyEvent;
use crate::state::EditorState;

/// What one dispatch cycle did
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DispatchReport {
    /// Contexts pushed during the cycle
    pub pushed: usize,
    /// Contexts popped during the cycle
    pub popped: usize,
    /// Messages returned by the bottom context, in order
    pub messages: Vec<ContextMessage>,
}

pub struct ContextStack {
    root: Box<dyn Context>,
    /// Contexts above the root, topmost last
    above: Vec<Box<dyn Context>>,
}

/// Bookkeeping that lets a failed cycle be undone
struct Cycle {
    /// How many of the contexts that were above the root when the cycle
    /// started are still in place
    live: usize,
    /// Original contexts popped during the cycle, in pop order
    saved: Vec<Box<dyn Context>>,
    steps: usize,
    report: DispatchReport,
}

impl Cycle {
    fn step(&mut self) -> Result<()> {
        self.steps += 1;
        if self.steps > MAX_CASCADE {
            return Err(FimError::critical(
                ErrorType::Internal,
                errors::CASCADE_LIMIT,
                format!("key event cascaded past {MAX_CASCADE} context changes"),
            ));
        }
        Ok(())
    }
}

impl ContextStack {
    pub fn new(root: Box<dyn Context>) -> Self {
        Self {
            root,
            above: Vec::new(),
        }
    }

    /// Number of contexts, root included
    #[must_use]
    pub fn depth(&self) -> usize {
        self.above.len() + 1
    }

    #[must_use]
    pub fn top_name(&self) -> &str {
        self.top().name()
    }

    /// Context names from the bottom up
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        std::iter::once(&self.root)
            .chain(self.above.iter())
            .map(|ctx| ctx.name())
            .collect()
    }

    fn top(&self) -> &dyn Context {
        match self.above.last() {
            Some(ctx) => ctx.as_ref(),
            None => self.root.as_ref(),
        }
    }

    fn top_mut(&mut self) -> &mut Box<dyn Context> {
        match self.above.last_mut() {
            Some(ctx) => ctx,
            None => &mut self.root,
        }
    }

    /// Run one dispatch cycle for `key`
    ///
    /// On error, queued pushes are discarded and the stack holds the same
    /// contexts, in the same order, as before the call. Side effects the
    /// contexts had on `ed` are not rolled back.
    pub fn dispatch(&mut self, ed: &mut EditorState, key: KeyEvent) -> Result<DispatchReport> {
        let mut cycle = Cycle {
            live: self.above.len(),
            saved: Vec::new(),
            steps: 0,
            report: DispatchReport::default(),
        };

        match self.run(ed, key, &mut cycle) {
            Ok(()) => {
                tracing::debug!(
                    %key,
                    pushed = cycle.report.pushed,
                    popped = cycle.report.popped,
                    top = self.top_name(),
                    "dispatch"
                );
                Ok(cycle.report)
            }
            Err(err) => {
                tracing::warn!(%key, error = %err, "dispatch failed, restoring context stack");
                ed.clear_pending();
                self.above.truncate(cycle.live);
                self.above.extend(cycle.saved.into_iter().rev());
                Err(err)
            }
        }
    }

    fn run(&mut self, ed: &mut EditorState, key: KeyEvent, cycle: &mut Cycle) -> Result<()> {
        let msg = self.top_mut().forward(ed, key)?;
        self.settle(ed, msg, cycle)?;
        self.apply_pushes(ed, cycle)
    }

    fn settle(
        &mut self,
        ed: &mut EditorState,
        mut msg: Option<ContextMessage>,
        cycle: &mut Cycle,
    ) -> Result<()> {
        while let Some(m) = msg.take() {
            let Some(done) = self.above.pop() else {
                cycle.report.messages.push(m);
                return Ok(());
            };
            cycle.step()?;
            cycle.report.popped += 1;
            tracing::trace!(context = done.name(), message = ?m, "pop");
            if self.above.len() < cycle.live {
                cycle.live = self.above.len();
                cycle.saved.push(done);
            }
            msg = self.top_mut().receive(ed, m)?;
        }
        Ok(())
    }

    fn apply_pushes(&mut self, ed: &mut EditorState, cycle: &mut Cycle) -> Result<()> {
        while let Some(ctx) = ed.next_pending() {
            cycle.step()?;
            cycle.report.pushed += 1;
            tracing::trace!(context = ctx.name(), "push");
            self.above.push(ctx);
            let msg = self.top_mut().setup(ed)?;
            self.settle(ed, msg, cycle)?;
        }
        Ok(())
    }

    /// Heap addresses of the contexts, bottom up
    #[cfg(test)]
    pub(crate) fn identities(&self) -> Vec<*const ()> {
        std::iter::once(&self.root)
            .chain(self.above.iter())
            .map(|ctx| ctx.as_ref() as *const dyn Context as *const ())
            .collect()
    }
}
