// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::io::IsTerminal;

use crossterm::style::Stylize;

use crate::errors::{ProcessError, ProcessorError};
use crate::processors::{Context, GroupProcessor, ParamValue, Params, ProcessorBase};

/// Number of spaces separating nesting levels when printing a tree.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// How processor names are drawn in diagnostic lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    #[default]
    Plain,
    /// Cyan, for terminals.
    Highlighted,
}

impl NameStyle {
    /// `Highlighted` when stderr is a terminal, `Plain` otherwise.
    pub fn for_stderr() -> Self {
        if std::io::stderr().is_terminal() {
            NameStyle::Highlighted
        } else {
            NameStyle::Plain
        }
    }

    pub fn apply(self, name: &str) -> String {
        match self {
            NameStyle::Plain => name.to_string(),
            NameStyle::Highlighted => name.cyan().to_string(),
        }
    }
}

/// Declares the parameter names a processor variant recognizes.
///
/// ```
/// use pocketchemist::traits::ParamSchema;
///
/// struct Apodization;
///
/// impl ParamSchema for Apodization {
///     const TYPE_NAME: &'static str = "Apodization";
///     const REQUIRED_PARAMS: &'static [&'static str] = &["shape"];
///     const OPTIONAL_PARAMS: &'static [&'static str] = &["width"];
/// }
/// ```
pub trait ParamSchema {
    /// Display name used when a processor has no explicit name.
    const TYPE_NAME: &'static str;
    const REQUIRED_PARAMS: &'static [&'static str] = &[];
    const OPTIONAL_PARAMS: &'static [&'static str] = &[];
}

/// A unit of work over a shared [`Context`].
///
/// Implementors hold a [`ProcessorBase`] built from their [`ParamSchema`] and
/// implement `process`; naming, parameter access and diagnostic printing come
/// from the base. [`GroupProcessor`] implements the same trait, so trees of
/// processors nest to any depth.
pub trait Processor: Send + Sync {
    /// Name, parameters and schema shared by every processor.
    fn base(&self) -> &ProcessorBase;

    /// Run this stage. Inputs are read from `context` and outputs written
    /// back into it for later stages.
    fn process(&self, context: &mut Context) -> Result<(), ProcessError>;

    fn name(&self) -> &str {
        self.base().name()
    }

    fn params(&self) -> &Params {
        self.base().params()
    }

    fn get_param(&self, name: &str) -> Option<&ParamValue> {
        self.base().get_param(name)
    }

    /// Like `get_param`, but an absent parameter is an `UnknownAttribute` error.
    fn param(&self, name: &str) -> Result<&ParamValue, ProcessorError> {
        self.base().param(name)
    }

    /// Short one-line description, e.g. for `Debug` output.
    fn describe(&self) -> String {
        self.name().to_string()
    }

    /// Diagnostic lines for this processor, without printing them.
    fn render(&self, level: usize, indent_width: usize, item_number: Option<usize>) -> Vec<String> {
        self.render_styled(level, indent_width, item_number, NameStyle::Plain)
    }

    /// `render` with processor names drawn in `style`. Processors that add
    /// lines of their own override this one.
    fn render_styled(
        &self,
        level: usize,
        indent_width: usize,
        item_number: Option<usize>,
        style: NameStyle,
    ) -> Vec<String> {
        vec![self.base().render_line_styled(level, indent_width, item_number, style)]
    }

    /// Print the diagnostic lines to stderr, highlighting names on a terminal.
    fn print(&self, level: usize, indent_width: usize, item_number: Option<usize>) {
        for line in self.render_styled(level, indent_width, item_number, NameStyle::for_stderr()) {
            eprintln!("{}", line);
        }
    }

    /// Group capability query used by dynamic tree builders.
    fn as_group_mut(&mut self) -> Option<&mut GroupProcessor> {
        None
    }
}

impl fmt::Debug for dyn Processor + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
