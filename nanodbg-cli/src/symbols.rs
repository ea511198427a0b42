//! In-memory symbol table and the `sym` command.
//!
//! The shell evaluates address expressions through a shared handle to this
//! table; the `sym` command mutates it through the same handle.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{bail, Result};
use nanodbg_core::command::{get_arg, Command, Shell};
use nanodbg_core::expr::{addr_exp, SymbolResolver};

/// Name to address map with name-ordered listing.
#[derive(Default)]
pub struct SymbolTable {
    entries: BTreeMap<String, u16>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, addr: u16) {
        self.entries.insert(name.to_string(), addr);
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.entries.iter().map(|(name, addr)| (name.as_str(), *addr))
    }
}

impl SymbolResolver for SymbolTable {
    fn lookup(&self, name: &str) -> Option<u16> {
        self.entries.get(name).copied()
    }
}

/// Shared handle to the table: the shell reads through it while the `sym`
/// command writes through it.
#[derive(Clone, Default)]
pub struct SharedSymbols(Rc<RefCell<SymbolTable>>);

impl SharedSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &Rc<RefCell<SymbolTable>> {
        &self.0
    }
}

impl SymbolResolver for SharedSymbols {
    fn lookup(&self, name: &str) -> Option<u16> {
        self.0.borrow().lookup(name)
    }
}

/// The `sym` command: manage the symbol table.
pub struct SymCommand {
    symbols: SharedSymbols,
}

impl SymCommand {
    pub fn new(symbols: SharedSymbols) -> Self {
        Self { symbols }
    }

    fn list(&self, shell: &Shell) {
        for (name, addr) in self.symbols.0.borrow().iter() {
            shell.colorize("1;32m");
            print!("0x{:04x}", addr);
            shell.colorize("0m");
            println!(": {}", name);
        }
    }
}

impl Command for SymCommand {
    fn name(&self) -> &'static str {
        "sym"
    }

    fn help(&self) -> &'static str {
        "Usage: sym [subcommand] [arguments]\n\
         sym set <name> <value>   add or update a symbol\n\
         sym del <name>           delete a symbol\n\
         sym list                 list all symbols (the default)\n\
         sym clear                clear the symbol table\n\
         Values are address expressions and may reference other symbols.\n"
    }

    fn run(&self, shell: &mut Shell, args: &mut &str) -> Result<()> {
        let Some(subcommand) = get_arg(args) else {
            self.list(shell);
            return Ok(());
        };

        match subcommand.to_ascii_lowercase().as_str() {
            "list" => {
                self.list(shell);
                Ok(())
            }
            "clear" => {
                self.symbols.0.borrow_mut().clear();
                Ok(())
            }
            "set" => {
                let Some(name) = get_arg(args) else {
                    eprintln!("sym: set needs a symbol name");
                    bail!("sym: set needs a symbol name");
                };
                let value = *args;
                if value.is_empty() {
                    eprintln!("sym: set needs a value");
                    bail!("sym: set needs a value");
                }

                // Evaluate through the shell's resolver so symbols may be
                // defined in terms of existing ones.
                let addr = match addr_exp(shell.symbols.as_ref(), value) {
                    Ok(addr) => addr,
                    Err(err) => {
                        eprintln!("{}", err);
                        eprintln!("sym: can't parse value: {}", value);
                        bail!("sym: can't parse value: {}", value);
                    }
                };

                self.symbols.0.borrow_mut().set(name, addr);
                Ok(())
            }
            "del" => {
                let Some(name) = get_arg(args) else {
                    eprintln!("sym: del needs a symbol name");
                    bail!("sym: del needs a symbol name");
                };
                if !self.symbols.0.borrow_mut().remove(name) {
                    eprintln!("sym: no such symbol: {}", name);
                    bail!("sym: no such symbol: {}", name);
                }
                Ok(())
            }
            other => {
                eprintln!("sym: unknown subcommand: {}", other);
                bail!("sym: unknown subcommand: {}", other);
            }
        }
    }
}
