//! nanodbg Core Library
//!
//! Command shell internals for the nanodbg debugger front-end:
//! - command registration and line dispatch
//! - typed runtime options
//! - address expression evaluation against a symbol table
//! - the interactive read-eval loop

pub mod command;
pub mod expr;
pub mod help;
pub mod options;
pub mod reader;

pub use command::{get_arg, process_command, Command, CommandRegistry, Shell, ShellError};
pub use expr::{addr_exp, ExprError, SymbolResolver};
pub use help::HelpCommand;
pub use options::{OptCommand, OptionDef, OptionRegistry, OptionType, OptionValue};
pub use reader::{reader_loop, LineReader, StdinReader, PROMPT};
