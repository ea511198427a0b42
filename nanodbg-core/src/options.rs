//! Typed runtime options
//!
//! Named, mutable settings registered by their owning subsystems into one
//! process-wide list. Lookup is case-insensitive and first-match; the list
//! is prepended on registration, so the most recently registered option
//! shadows an earlier one with the same name.

use std::fmt;

use anyhow::{bail, Result};

use crate::command::{get_arg, Command, Shell};
use crate::expr::{self, ExprError, SymbolResolver};

/// Option value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Boolean,
    Numeric,
    Text,
}

impl OptionType {
    /// Human-readable type name used in help output.
    pub fn label(self) -> &'static str {
        match self {
            OptionType::Boolean => "boolean",
            OptionType::Numeric => "numeric",
            OptionType::Text => "text",
        }
    }
}

/// Current value of an option; the variant fixes the option's type for its
/// whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Boolean(bool),
    Numeric(u16),
    /// Bounded text storage. The capacity belongs to the registering
    /// subsystem's buffer; parsing truncates to it silently.
    Text { value: String, capacity: usize },
}

impl OptionValue {
    pub fn kind(&self) -> OptionType {
        match self {
            OptionValue::Boolean(_) => OptionType::Boolean,
            OptionValue::Numeric(_) => OptionType::Numeric,
            OptionValue::Text { .. } => OptionType::Text,
        }
    }
}

/// A registered option.
pub struct OptionDef {
    name: &'static str,
    value: OptionValue,
    help: &'static str,
}

impl OptionDef {
    pub fn boolean(name: &'static str, value: bool, help: &'static str) -> Self {
        Self {
            name,
            value: OptionValue::Boolean(value),
            help,
        }
    }

    pub fn numeric(name: &'static str, value: u16, help: &'static str) -> Self {
        Self {
            name,
            value: OptionValue::Numeric(value),
            help,
        }
    }

    pub fn text(name: &'static str, value: &str, capacity: usize, help: &'static str) -> Self {
        Self {
            name,
            value: OptionValue::Text {
                value: truncate_to(value, capacity),
                capacity,
            },
            help,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn help(&self) -> &'static str {
        self.help
    }

    pub fn kind(&self) -> OptionType {
        self.value.kind()
    }

    pub fn value(&self) -> &OptionValue {
        &self.value
    }

    /// Type-directed parse of one word into the value slot.
    ///
    /// Boolean and text parses cannot fail; numeric parsing goes through
    /// the address-expression evaluator and inherits its semantics.
    pub fn parse(&mut self, word: &str, symbols: &dyn SymbolResolver) -> Result<(), ExprError> {
        match &mut self.value {
            OptionValue::Boolean(value) => {
                *value = parse_boolean(word);
                Ok(())
            }
            OptionValue::Numeric(value) => {
                *value = expr::addr_exp(symbols, word)?;
                Ok(())
            }
            OptionValue::Text { value, capacity } => {
                *value = truncate_to(word, *capacity);
                Ok(())
            }
        }
    }
}

impl fmt::Display for OptionDef {
    /// Renders the way the `opt` command shows it: name right-aligned in a
    /// fixed 32-column field, then the typed value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>32} = ", self.name)?;
        match &self.value {
            OptionValue::Boolean(value) => {
                write!(f, "{}", if *value { "true" } else { "false" })
            }
            OptionValue::Numeric(value) => write!(f, "0x{:x} ({})", value, value),
            OptionValue::Text { value, .. } => write!(f, "{}", value),
        }
    }
}

/// Permissive prefix-based boolean parse: a leading digit above '0', a
/// leading 't' or 'y', or the two bytes "on" mean true; anything else,
/// including "0", "false" and "off", means false. Byte-wise and
/// lowercase-sensitive.
fn parse_boolean(word: &str) -> bool {
    let bytes = word.as_bytes();
    match bytes.first() {
        Some(b'1'..=b'9') => true,
        Some(b't') | Some(b'y') => true,
        Some(b'o') => bytes.get(1) == Some(&b'n'),
        _ => false,
    }
}

/// Truncate to a byte capacity, backing up to a char boundary so the
/// result stays valid UTF-8.
fn truncate_to(word: &str, capacity: usize) -> String {
    if word.len() <= capacity {
        return word.to_string();
    }
    let mut end = capacity;
    while !word.is_char_boundary(end) {
        end -= 1;
    }
    word[..end].to_string()
}

/// Process-wide option list.
#[derive(Default)]
pub struct OptionRegistry {
    options: Vec<OptionDef>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend to the list; name uniqueness is not enforced here, lookup
    /// simply takes the first match.
    pub fn register(&mut self, option: OptionDef) {
        self.options.insert(0, option);
    }

    /// Case-insensitive first-match lookup.
    pub fn find(&self, name: &str) -> Option<&OptionDef> {
        self.options
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut OptionDef> {
        self.options
            .iter_mut()
            .find(|o| o.name.eq_ignore_ascii_case(name))
    }

    /// Options in list order, most recently registered first.
    pub fn iter(&self) -> impl Iterator<Item = &OptionDef> {
        self.options.iter()
    }

    /// Convenience read of a boolean option; false when the option is
    /// missing or of another type.
    pub fn boolean(&self, name: &str) -> bool {
        matches!(
            self.find(name).map(OptionDef::value),
            Some(OptionValue::Boolean(true))
        )
    }
}

/// The `opt` command: query or set runtime options.
pub struct OptCommand;

impl Command for OptCommand {
    fn name(&self) -> &'static str {
        "opt"
    }

    fn help(&self) -> &'static str {
        "Usage: opt [name] [value]\n\
         Query or set option variables. With no arguments, all option\n\
         values are displayed.\n"
    }

    fn run(&self, shell: &mut Shell, args: &mut &str) -> Result<()> {
        let Some(name) = get_arg(args) else {
            for option in shell.options.iter() {
                println!("{}", option);
            }
            return Ok(());
        };

        let word = *args;

        let Some(option) = shell.options.find_mut(name) else {
            eprintln!("opt: no such option: {}", name);
            bail!("opt: no such option: {}", name);
        };

        if word.is_empty() {
            println!("{}", option);
            return Ok(());
        }

        // The value is the whole remainder, not a single word; numeric
        // options may be full address expressions with spaces.
        if let Err(err) = option.parse(word, shell.symbols.as_ref()) {
            eprintln!("{}", err);
            eprintln!("opt: can't parse option: {}", word);
            bail!("opt: can't parse option: {}", word);
        }

        Ok(())
    }
}
