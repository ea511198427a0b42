//! Command registration and dispatch
//!
//! Commands are registered once at startup and looked up by name for every
//! input line. The handler receives the shell state and a cursor over the
//! rest of the line; it consumes its own arguments with [`get_arg`].

pub mod args;
pub mod dispatch;

pub use args::get_arg;
pub use dispatch::{process_command, Shell, ShellError};

use std::sync::Arc;

use anyhow::Result;

/// A named debugger command.
pub trait Command {
    /// Primary command name, matched case-insensitively.
    fn name(&self) -> &'static str;

    /// Help text shown by `help <name>`. The text carries its own trailing
    /// newline; the formatter prints it verbatim.
    fn help(&self) -> &'static str;

    /// Execute against the remainder of the input line.
    ///
    /// The returned status does not abort dispatch; it is recorded on the
    /// shell and folded into the process exit status in batch mode.
    fn run(&self, shell: &mut Shell, args: &mut &str) -> Result<()>;
}

/// Ordered command table; registration order is help-listing order.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command at the end of the display order.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.push(command);
    }

    /// Case-insensitive exact-match lookup; first match wins.
    pub fn find(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.commands
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// Commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
