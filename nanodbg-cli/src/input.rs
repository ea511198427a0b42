//! Line acquisition for the interactive loop.
//!
//! Uses rustyline when the `readline` feature is enabled and falls back
//! to the core's bounded stdin reader otherwise, or when the editor fails
//! to initialize (for example on a dumb terminal).

use nanodbg_core::reader::{LineReader, StdinReader};

#[cfg(feature = "readline")]
mod editor {
    use nanodbg_core::reader::LineReader;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use tracing::warn;

    /// rustyline-backed reader with in-memory history.
    pub struct EditorReader {
        editor: DefaultEditor,
    }

    impl EditorReader {
        pub fn new() -> anyhow::Result<Self> {
            Ok(Self {
                editor: DefaultEditor::new()?,
            })
        }
    }

    impl LineReader for EditorReader {
        fn read_line(&mut self, prompt: &str) -> Option<String> {
            loop {
                match self.editor.readline(prompt) {
                    Ok(line) => return Some(line),
                    // ^C drops the pending line and prompts again.
                    Err(ReadlineError::Interrupted) => continue,
                    Err(ReadlineError::Eof) => return None,
                    Err(err) => {
                        warn!("readline: {}", err);
                        return None;
                    }
                }
            }
        }

        fn add_history(&mut self, line: &str) {
            let _ = self.editor.add_history_entry(line);
        }
    }
}

/// Pick the best available reader.
pub fn make_reader() -> Box<dyn LineReader> {
    #[cfg(feature = "readline")]
    match editor::EditorReader::new() {
        Ok(reader) => return Box::new(reader),
        Err(err) => tracing::warn!("line editing unavailable: {}", err),
    }

    Box::new(StdinReader)
}
