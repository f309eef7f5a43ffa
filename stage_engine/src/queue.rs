//! Per-actor action FIFO.
//!
//! At most one action is current at any time; consumed actions are dropped
//! and never re-executed. When the current action reports completion the
//! next one's `execute` runs immediately, in the same frame.

use std::collections::VecDeque;

use crate::actions::{Action, ActionContext};

#[derive(Debug, Default)]
pub struct ActionQueue {
    pending: VecDeque<Action>,
    current: Option<Action>,
    executing: bool,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    /// Drop everything, including the current action.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.current = None;
        self.executing = false;
    }

    /// Actions not yet finished, counting the current one.
    pub fn remaining(&self) -> usize {
        self.pending.len() + usize::from(self.current.is_some())
    }

    pub fn is_executing(&self) -> bool {
        self.executing
    }

    pub fn current_kind(&self) -> Option<&'static str> {
        self.current.as_ref().map(Action::kind)
    }

    /// Begin execution. The first action's `execute` runs now; an empty
    /// queue finishes immediately.
    pub fn start(&mut self, ctx: &mut ActionContext<'_>) {
        self.executing = true;
        if self.current.is_none() {
            self.advance(ctx);
        }
    }

    /// Poll the current action once; advance the cursor on completion.
    pub fn update(&mut self, ctx: &mut ActionContext<'_>) {
        if !self.executing {
            return;
        }
        let completed = match self.current.as_ref() {
            Some(action) => action.is_complete(ctx),
            None => {
                self.executing = false;
                return;
            }
        };
        if completed {
            self.advance(ctx);
        }
    }

    fn advance(&mut self, ctx: &mut ActionContext<'_>) {
        self.current = self.pending.pop_front();
        match self.current.as_mut() {
            Some(action) => action.execute(ctx),
            None => self.executing = false,
        }
    }
}
