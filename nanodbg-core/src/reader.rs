//! The interactive read-eval loop.
//!
//! Acquires lines through a [`LineReader`] collaborator and feeds them to
//! the dispatcher. A minimal stdin-backed reader is provided for builds
//! without line editing.

use std::io::{self, Read, Write};

use log::warn;

use crate::command::{process_command, Shell};
use crate::help;

/// Prompt shown for each input line.
pub const PROMPT: &str = "(nanodbg) ";

/// Fallback line buffer size; longer input is split across reads.
const LINE_BUF_SIZE: usize = 128;

/// Line acquisition collaborator.
pub trait LineReader {
    /// Read one line, displaying the prompt. None signals end-of-input.
    /// Read failures are handled inside the implementation.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Record a line in input history; no-op by default.
    fn add_history(&mut self, _line: &str) {}
}

/// Run the interactive loop until end-of-input.
///
/// Prints the command listing once on entry. Every acquired line is
/// recorded in history and dispatched with interactive=true; dispatch
/// failures never stop the loop.
pub fn reader_loop(shell: &mut Shell, reader: &mut dyn LineReader) {
    println!();
    print!("{}", help::render_command_list(&shell.commands));

    while let Some(line) = reader.read_line(PROMPT) {
        reader.add_history(&line);
        let _ = process_command(shell, &line, true);
    }

    println!();
}

/// Minimal stdin reader used when no line-editing backend is available.
#[derive(Default)]
pub struct StdinReader;

impl LineReader for StdinReader {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let mut buf = [0u8; LINE_BUF_SIZE];
        loop {
            print!("{}", prompt);
            let _ = io::stdout().flush();

            match read_bounded_line(&mut io::stdin().lock(), &mut buf) {
                Ok(0) => return None,
                Ok(len) => return Some(String::from_utf8_lossy(&buf[..len]).into_owned()),
                Err(err) => {
                    // Not end-of-input; report and try again.
                    warn!("read_line: {}", err);
                    println!();
                }
            }
        }
    }
}

/// Read up to one byte short of the buffer, or through a newline,
/// whichever comes first. Returns the number of bytes read; 0 means
/// end-of-input.
fn read_bounded_line(input: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut len = 0;
    while len + 1 < buf.len() {
        let mut byte = [0u8; 1];
        if input.read(&mut byte)? == 0 {
            break;
        }
        buf[len] = byte[0];
        len += 1;
        if byte[0] == b'\n' {
            break;
        }
    }
    Ok(len)
}
