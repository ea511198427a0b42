//! nanodbg - interactive command shell for a 16-bit MCU debugger
//! front-end.
//!
//! With no arguments, runs the interactive read-eval loop. Any arguments
//! are each executed as one command line without entering the loop, and
//! the exit status reflects their outcome.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::info;

use nanodbg_core::command::process_command;
use nanodbg_core::help::HelpCommand;
use nanodbg_core::options::OptCommand;
use nanodbg_core::reader::reader_loop;
use nanodbg_core::Shell;

mod input;
mod symbols;

fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries command output.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let symbols = symbols::SharedSymbols::new();
    let mut shell = Shell::new(Box::new(symbols.clone()));
    shell.commands.register(Arc::new(HelpCommand));
    shell.commands.register(Arc::new(OptCommand));
    shell
        .commands
        .register(Arc::new(symbols::SymCommand::new(symbols)));

    let batch: Vec<String> = std::env::args().skip(1).collect();
    if !batch.is_empty() {
        return run_batch(&mut shell, &batch);
    }

    info!("starting interactive session");
    let mut reader = input::make_reader();
    reader_loop(&mut shell, reader.as_mut());

    ExitCode::SUCCESS
}

/// Execute each argument as one command line. Unknown commands and
/// handler failures do not stop the run; either makes the exit status
/// nonzero.
fn run_batch(shell: &mut Shell, lines: &[String]) -> ExitCode {
    let mut ok = true;
    for line in lines {
        if process_command(shell, line, false).is_err() || !shell.last_command_ok() {
            ok = false;
        }
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
