//! Word splitting over an input-line cursor.

/// Take the next whitespace-delimited word from the cursor.
///
/// Skips leading whitespace, returns the word, and advances the cursor
/// past the word and any whitespace that follows it, so the cursor lands
/// on the start of the next word or at end of input. Returns None when
/// only whitespace (or nothing) remains; the cursor is left untouched in
/// that case.
///
/// Command handlers use this to consume their own arguments from the
/// remainder the dispatcher hands them.
pub fn get_arg<'a>(text: &mut &'a str) -> Option<&'a str> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return None;
    }

    let end = trimmed
        .find(char::is_whitespace)
        .unwrap_or(trimmed.len());
    let (word, rest) = trimmed.split_at(end);
    *text = rest.trim_start();
    Some(word)
}
