//! Argument and return-value pipelines
//!
//! A `Pipeline` is the only thing that distinguishes one entry point from
//! another: every entry point calls the same target, editing the arguments on
//! the way in and the result on the way out.

use crate::args::{self, Args};
use serde_json::Value;

/// Edit applied to the argument list before the target runs
#[derive(Debug, Clone, PartialEq)]
pub enum ArgEditor {
    /// Wrap the argument at `index` into a one-element array
    Pluralize {
        /// Plural position
        index: usize,
    },
    /// Accept one item or an array at `index`, normalizing to an array
    Arrify {
        /// Plural position
        index: usize,
    },
    /// Merge `preset` into the options mapping at `index`; preset keys win
    Optionize {
        /// Option position
        index: usize,
        /// Preset options
        preset: Value,
    },
    /// Insert `value` as a new argument at `index`
    Insert {
        /// Option position
        index: usize,
        /// Positional preset
        value: Value,
    },
}

impl ArgEditor {
    /// Editor injecting `preset` at `index`
    ///
    /// Object presets are merged into the existing options argument; any other
    /// preset is inserted as an extra positional argument.
    pub fn inject(index: usize, preset: Value) -> Self {
        if preset.is_object() {
            ArgEditor::Optionize { index, preset }
        } else {
            ArgEditor::Insert {
                index,
                value: preset,
            }
        }
    }

    /// Apply this editor to `args`
    pub fn apply(&self, args: Args) -> Args {
        match self {
            ArgEditor::Pluralize { index } => args::edit_arg(args, *index, args::pluralize),
            ArgEditor::Arrify { index } => args::edit_arg(args, *index, args::arrify),
            ArgEditor::Optionize { index, preset } => {
                args::edit_arg(args, *index, |current| args::merge_options(current, preset))
            }
            ArgEditor::Insert { index, value } => args::insert_arg(args, *index, value.clone()),
        }
    }
}

/// Edit applied to the target's result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnEditor {
    /// Collapse a one-element array to its element
    UnCollect,
}

impl ReturnEditor {
    /// Apply this editor to `value`
    pub fn apply(&self, value: Value) -> Value {
        match self {
            ReturnEditor::UnCollect => args::un_collect(value),
        }
    }
}

/// Ordered argument and return editors for one entry point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    arg_editors: Vec<ArgEditor>,
    return_editors: Vec<ReturnEditor>,
}

impl Pipeline {
    /// Pipeline that leaves arguments and result untouched
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument editor
    pub fn arg(mut self, editor: ArgEditor) -> Self {
        self.arg_editors.push(editor);
        self
    }

    /// Append a return editor
    pub fn returns(mut self, editor: ReturnEditor) -> Self {
        self.return_editors.push(editor);
        self
    }

    /// Append a return editor if one is given
    pub fn maybe_returns(self, editor: Option<ReturnEditor>) -> Self {
        match editor {
            Some(editor) => self.returns(editor),
            None => self,
        }
    }

    /// Argument editors in application order
    pub fn arg_editors(&self) -> &[ArgEditor] {
        &self.arg_editors
    }

    /// Return editors in application order
    pub fn return_editors(&self) -> &[ReturnEditor] {
        &self.return_editors
    }

    /// True when the pipeline changes neither arguments nor result
    pub fn is_identity(&self) -> bool {
        self.arg_editors.is_empty() && self.return_editors.is_empty()
    }

    /// Apply the argument editors in order
    pub fn edit_args(&self, args: Args) -> Args {
        self.arg_editors
            .iter()
            .fold(args, |args, editor| editor.apply(args))
    }

    /// Apply the return editors in order
    pub fn edit_return(&self, value: Value) -> Value {
        self.return_editors
            .iter()
            .fold(value, |value, editor| editor.apply(value))
    }

    /// Edit `args`, call `target`, edit its result
    ///
    /// Errors from `target` are returned untouched and skip the return editors.
    pub fn run<F, E>(&self, target: F, args: Args) -> Result<Value, E>
    where
        F: FnOnce(Args) -> Result<Value, E>,
    {
        let value = target(self.edit_args(args))?;
        Ok(self.edit_return(value))
    }
}
