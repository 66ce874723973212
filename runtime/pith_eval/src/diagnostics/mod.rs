//! Call stack tracking for the runtime.
//!
//! Each user-function call pushes a `CallFrame`; the depth check is part of
//! `push()`. The default limit matches the classic recursion limit of 1000
//! frames.

use pith_ir::{Name, StringInterner};
use pith_value::{recursion_limit_exceeded, BacktraceFrame, ErrorValue};

/// Default maximum call depth.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// A single frame in the live call stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CallFrame {
    /// Interned function name.
    pub name: Name,
}

impl CallFrame {
    #[inline]
    pub fn new(name: Name) -> Self {
        CallFrame { name }
    }
}

/// Live call stack.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// Create an empty stack. `None` means unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a call frame, checking the depth limit.
    ///
    /// Returns a `RecursionError` if the limit is reached. The frame is NOT
    /// pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), ErrorValue> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the most recent call frame.
    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    #[inline]
    pub fn current_frame(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    /// Live frames as backtrace entries, most recent call first.
    pub fn capture(&self, interner: &StringInterner) -> Vec<BacktraceFrame> {
        self.frames
            .iter()
            .rev()
            .map(|f| BacktraceFrame {
                name: interner.lookup(f.name).to_string(),
            })
            .collect()
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_DEPTH))
    }
}
