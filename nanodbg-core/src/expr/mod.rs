//! Address expression evaluation
//!
//! Parses restricted arithmetic over decimal literals, hex literals and
//! symbol names into 16-bit target addresses.

pub mod error;
pub mod eval;

pub use error::ExprError;
pub use eval::addr_exp;

/// Symbol table lookup used by the evaluator.
///
/// The symbol table itself lives outside this crate; anything that can map
/// a name to a 16-bit address can back an evaluation.
pub trait SymbolResolver {
    /// Resolve a symbol name to its address, or None if unknown.
    fn lookup(&self, name: &str) -> Option<u16>;
}

impl SymbolResolver for std::collections::HashMap<String, u16> {
    fn lookup(&self, name: &str) -> Option<u16> {
        self.get(name).copied()
    }
}
