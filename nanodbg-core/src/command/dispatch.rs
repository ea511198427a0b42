//! Line dispatch and shell state.

use log::debug;
use thiserror::Error;

use crate::command::{get_arg, Command, CommandRegistry};
use crate::expr::SymbolResolver;
use crate::options::{OptionDef, OptionRegistry};

/// Dispatch-level failure. Handler failures are not dispatch failures;
/// they are recorded on the shell and only affect the batch exit status.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("unknown command: {0} (try \"help\")")]
    UnknownCommand(String),
}

/// Process-wide shell state threaded through every command handler.
///
/// Owns the command and option registries and the symbol table handle, so
/// there is exactly one instance per process without any ambient globals.
pub struct Shell {
    pub commands: CommandRegistry,
    pub options: OptionRegistry,
    pub symbols: Box<dyn SymbolResolver>,
    interactive: bool,
    last_command_ok: bool,
}

impl Shell {
    pub fn new(symbols: Box<dyn SymbolResolver>) -> Self {
        let mut options = OptionRegistry::new();
        options.register(OptionDef::boolean(
            "color",
            false,
            "Colorize debugger output.\n",
        ));

        Self {
            commands: CommandRegistry::new(),
            options,
            symbols,
            interactive: false,
            last_command_ok: true,
        }
    }

    /// Whether the currently executing command came from the live loop
    /// rather than a batch source.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Status of the most recent handler; batch mode folds this into the
    /// process exit status.
    pub fn last_command_ok(&self) -> bool {
        self.last_command_ok
    }

    /// Emit an ANSI escape prefix to stdout when the `color` option is on.
    /// Returns the number of bytes written.
    pub fn colorize(&self, code: &str) -> usize {
        if !self.options.boolean("color") {
            return 0;
        }

        let text = format!("\x1b[{}", code);
        print!("{}", text);
        text.len()
    }
}

/// Dispatch one input line.
///
/// The line is split into a command word and a remainder; the handler gets
/// a cursor over the remainder. An empty line is a no-op success. Dispatch
/// succeeds for any known command regardless of what the handler returns;
/// the handler's status is recorded for the batch path. The interactive
/// flag is saved and restored around the handler, so a command that
/// dispatches further commands leaves the outer flag intact.
pub fn process_command(shell: &mut Shell, line: &str, interactive: bool) -> Result<(), ShellError> {
    let mut cursor = line.trim_end();

    let Some(word) = get_arg(&mut cursor) else {
        return Ok(());
    };

    let Some(command) = shell.commands.find(word).cloned() else {
        eprintln!("unknown command: {} (try \"help\")", word);
        return Err(ShellError::UnknownCommand(word.to_string()));
    };

    debug!("dispatching {:?}", command.name());

    let saved = shell.interactive;
    shell.interactive = interactive;
    let status = command.run(shell, &mut cursor);
    shell.interactive = saved;

    if let Err(err) = &status {
        debug!("command {:?} failed: {:#}", command.name(), err);
    }
    shell.last_command_ok = status.is_ok();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use anyhow::{bail, Result};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use std::sync::Arc;

    fn shell() -> Shell {
        Shell::new(Box::new(HashMap::<String, u16>::new()))
    }

    struct Recorder {
        name: &'static str,
        seen: Rc<RefCell<Vec<(String, bool)>>>,
        fail: bool,
    }

    impl Command for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn help(&self) -> &'static str {
            "Records its invocations.\n"
        }

        fn run(&self, shell: &mut Shell, args: &mut &str) -> Result<()> {
            self.seen
                .borrow_mut()
                .push((args.to_string(), shell.is_interactive()));
            if self.fail {
                bail!("recorded failure");
            }
            Ok(())
        }
    }

    #[test]
    fn empty_line_is_a_no_op_success() {
        let mut shell = shell();
        assert!(process_command(&mut shell, "", true).is_ok());
        assert!(process_command(&mut shell, "   \t ", true).is_ok());
    }

    #[test]
    fn unknown_command_is_a_recoverable_failure() {
        let mut shell = shell();
        let result = process_command(&mut shell, "frobnicate now", true);
        assert!(matches!(result, Err(ShellError::UnknownCommand(word)) if word == "frobnicate"));

        // The shell keeps working afterwards.
        assert!(process_command(&mut shell, "", true).is_ok());
    }

    #[test]
    fn handler_gets_trimmed_remainder_and_interactive_flag() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut shell = shell();
        shell.commands.register(Arc::new(Recorder {
            name: "probe",
            seen: seen.clone(),
            fail: false,
        }));

        assert!(process_command(&mut shell, "  PROBE   one two  \n", true).is_ok());
        assert_eq!(*seen.borrow(), vec![("one two".to_string(), true)]);

        assert!(process_command(&mut shell, "probe", false).is_ok());
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1], ("".to_string(), false));
    }

    #[test]
    fn handler_failure_does_not_fail_dispatch() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut shell = shell();
        shell.commands.register(Arc::new(Recorder {
            name: "brittle",
            seen,
            fail: true,
        }));

        assert!(process_command(&mut shell, "brittle", true).is_ok());
        assert!(!shell.last_command_ok());

        shell.commands.register(Arc::new(Recorder {
            name: "solid",
            seen: Rc::new(RefCell::new(Vec::new())),
            fail: false,
        }));
        assert!(process_command(&mut shell, "solid", true).is_ok());
        assert!(shell.last_command_ok());
    }

    struct Nested {
        inner_seen: Rc<RefCell<Vec<bool>>>,
    }

    impl Command for Nested {
        fn name(&self) -> &'static str {
            "outer"
        }

        fn help(&self) -> &'static str {
            "Dispatches a nested command.\n"
        }

        fn run(&self, shell: &mut Shell, _args: &mut &str) -> Result<()> {
            assert!(shell.is_interactive());
            let _ = process_command(shell, "inner", false);
            // The outer dispatch's flag is restored after the nested call.
            self.inner_seen.borrow_mut().push(shell.is_interactive());
            Ok(())
        }
    }

    #[test]
    fn nested_dispatch_restores_interactive_flag() {
        let inner_seen = Rc::new(RefCell::new(Vec::new()));
        let outer_seen = Rc::new(RefCell::new(Vec::new()));

        let mut shell = shell();
        shell.commands.register(Arc::new(Nested {
            inner_seen: inner_seen.clone(),
        }));
        shell.commands.register(Arc::new(Recorder {
            name: "inner",
            seen: outer_seen.clone(),
            fail: false,
        }));

        assert!(process_command(&mut shell, "outer", true).is_ok());
        // Inner handler saw interactive=false, outer saw true again after.
        assert_eq!(*outer_seen.borrow(), vec![("".to_string(), false)]);
        assert_eq!(*inner_seen.borrow(), vec![true]);
        assert!(!shell.is_interactive());
    }

    #[test]
    fn colorize_honors_the_color_option() {
        let mut shell = shell();
        assert_eq!(shell.colorize("1;32m"), 0);

        let resolver = HashMap::<String, u16>::new();
        shell
            .options
            .find_mut("color")
            .unwrap()
            .parse("on", &resolver)
            .unwrap();
        assert_eq!(shell.colorize("1;32m"), 7);
    }
}
