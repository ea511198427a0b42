//! Help and usage formatting.
//!
//! The bare listing lays command names out in columns filled top to
//! bottom, fitted into a 72-column display. Topic help looks the topic up
//! as both a command and an option and prints whichever match.

use anyhow::{bail, Result};
use std::fmt::Write as _;

use crate::command::{get_arg, Command, CommandRegistry, Shell};

/// Width the command columns are fitted into.
const LIST_WIDTH: usize = 72;

/// Render the command listing: names in column-major order, padded to the
/// widest name plus two, plus the fixed trailer lines.
pub fn render_command_list(commands: &CommandRegistry) -> String {
    let names: Vec<&str> = commands.iter().map(|c| c.name()).collect();
    let total = names.len();

    let max_len = names.iter().map(|n| n.len()).max().unwrap_or(0) + 2;
    let cols = (LIST_WIDTH / max_len).max(1);
    let rows = (total + cols - 1) / cols;

    let mut out = String::from("Available commands:\n");
    for row in 0..rows {
        out.push_str("    ");
        for col in 0..cols {
            let index = col * rows + row;
            if index >= total {
                break;
            }
            let name = names[index];
            out.push_str(name);
            for _ in name.len()..max_len {
                out.push(' ');
            }
        }
        out.push('\n');
    }

    out.push_str("Type \"help <command>\" for more information.\n");
    out.push_str("Press Ctrl+D to quit.\n");
    out
}

/// Render help for one topic, which may name a command, an option, or
/// both. Returns None when the topic matches neither.
pub fn render_topic(shell: &Shell, topic: &str) -> Option<String> {
    let command = shell.commands.find(topic);
    let option = shell.options.find(topic);

    if command.is_none() && option.is_none() {
        return None;
    }

    let mut out = String::new();
    if let Some(command) = command {
        let _ = write!(out, "COMMAND: {}\n{}", command.name(), command.help());
        if option.is_some() {
            out.push('\n');
        }
    }
    if let Some(option) = option {
        let _ = write!(
            out,
            "OPTION: {} ({})\n{}",
            option.name(),
            option.kind().label(),
            option.help()
        );
    }
    Some(out)
}

/// The `help` command.
pub struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn help(&self) -> &'static str {
        "Usage: help [command]\n\
         Print a listing of commands, or help on a given command or\n\
         option.\n"
    }

    fn run(&self, shell: &mut Shell, args: &mut &str) -> Result<()> {
        let Some(topic) = get_arg(args) else {
            print!("{}", render_command_list(&shell.commands));
            return Ok(());
        };

        match render_topic(shell, topic) {
            Some(text) => {
                print!("{}", text);
                Ok(())
            }
            None => {
                eprintln!("help: unknown command: {}", topic);
                bail!("help: unknown command: {}", topic);
            }
        }
    }
}
