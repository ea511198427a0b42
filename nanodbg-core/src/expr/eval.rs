//! Address expression evaluator
//!
//! A single left-to-right scan over the input. Each additive term is a
//! decimal integer, a "0x"-prefixed hex integer, or a symbol name resolved
//! through a [`SymbolResolver`]. The signed sum is masked to the low 16
//! bits, so negative results wrap around the address space.

use log::trace;

use super::error::ExprError;
use super::SymbolResolver;

/// Longest token the scanner keeps; characters beyond this are dropped
/// without a diagnostic.
const TOKEN_MAX: usize = 63;

/// Transient scan state for one evaluation.
struct TokenAccumulator {
    buf: String,
    mult: i32,
    sum: i32,
}

impl TokenAccumulator {
    fn new() -> Self {
        Self {
            buf: String::new(),
            mult: 1,
            sum: 0,
        }
    }

    /// Characters that may appear inside a token.
    fn is_token_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | ':')
    }

    fn push(&mut self, c: char) {
        if self.buf.len() < TOKEN_MAX {
            self.buf.push(c);
        }
    }

    /// Classify the pending token and fold it into the running sum.
    fn flush(&mut self, symbols: &dyn SymbolResolver) -> Result<(), ExprError> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let token = std::mem::take(&mut self.buf);

        if token.bytes().all(|b| b.is_ascii_digit()) {
            self.add(parse_decimal(&token));
            return Ok(());
        }

        let bytes = token.as_bytes();
        if bytes[0] == b'0' && bytes.len() > 1 && bytes[1].eq_ignore_ascii_case(&b'x') {
            self.add(parse_hex(&token[2..]));
            return Ok(());
        }

        match symbols.lookup(&token) {
            Some(value) => {
                self.add(i32::from(value));
                Ok(())
            }
            None => Err(ExprError::UnknownToken { token }),
        }
    }

    fn add(&mut self, value: i32) {
        self.sum = self.sum.wrapping_add(self.mult.wrapping_mul(value));
    }
}

/// Wrapping decimal accumulation; the token is known to be all digits.
fn parse_decimal(token: &str) -> i32 {
    token
        .bytes()
        .fold(0i32, |acc, b| acc.wrapping_mul(10).wrapping_add(i32::from(b - b'0')))
}

/// Parse the leading hex digits; trailing garbage is ignored and an empty
/// digit run yields 0 (strtol semantics).
fn parse_hex(digits: &str) -> i32 {
    digits
        .chars()
        .map_while(|c| c.to_digit(16))
        .fold(0i32, |acc, d| acc.wrapping_mul(16).wrapping_add(d as i32))
}

/// Evaluate an address expression against a symbol table.
pub fn addr_exp(symbols: &dyn SymbolResolver, text: &str) -> Result<u16, ExprError> {
    let mut acc = TokenAccumulator::new();

    for c in text.chars() {
        if TokenAccumulator::is_token_char(c) {
            acc.push(c);
        } else {
            acc.flush(symbols)?;
            // Only an explicit sign updates the multiplier. Any other
            // separator leaves it alone, so a sign carries across
            // whitespace onto the following term.
            if c == '+' {
                acc.mult = 1;
            }
            if c == '-' {
                acc.mult = -1;
            }
        }
    }
    acc.flush(symbols)?;

    let addr = (acc.sum & 0xffff) as u16;
    trace!("addr_exp({:?}) = 0x{:04x}", text, addr);
    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn symtab() -> HashMap<String, u16> {
        let mut map = HashMap::new();
        map.insert("start".to_string(), 0x1100);
        map.insert("sym1".to_string(), 0x0200);
        map.insert("sym2".to_string(), 0x0034);
        map.insert("__isr.vec:3".to_string(), 0xfff0);
        map
    }

    #[test]
    fn literal_sums() {
        let t = symtab();
        assert_eq!(addr_exp(&t, "0x10+5"), Ok(21));
        assert_eq!(addr_exp(&t, "10-0x5"), Ok(5));
        assert_eq!(addr_exp(&t, "4096"), Ok(4096));
    }

    #[test]
    fn negative_sum_wraps_to_16_bits() {
        let t = symtab();
        assert_eq!(addr_exp(&t, "-1"), Ok(0xffff));
        assert_eq!(addr_exp(&t, "0-0x10"), Ok(0xfff0));
    }

    #[test]
    fn symbols_resolve_and_sum() {
        let t = symtab();
        assert_eq!(addr_exp(&t, "start"), Ok(0x1100));
        assert_eq!(addr_exp(&t, "sym1+sym2"), Ok(0x0234));
        assert_eq!(addr_exp(&t, "start-sym1"), Ok(0x0f00));
    }

    #[test]
    fn symbol_names_take_extended_characters() {
        let t = symtab();
        assert_eq!(addr_exp(&t, "__isr.vec:3"), Ok(0xfff0));
    }

    #[test]
    fn unknown_symbol_fails_without_partial_result() {
        let t = symtab();
        assert_eq!(
            addr_exp(&t, "start+bogus"),
            Err(ExprError::UnknownToken {
                token: "bogus".to_string()
            })
        );
        assert!(addr_exp(&t, "foo").is_err());
    }

    #[test]
    fn sign_persists_across_whitespace() {
        let t = symtab();
        // The minus before "3" is still in effect for "2".
        assert_eq!(addr_exp(&t, "5-3 2"), Ok(0));
        assert_eq!(addr_exp(&t, "10 - 2"), Ok(8));
    }

    #[test]
    fn hex_prefix_is_case_insensitive() {
        let t = symtab();
        assert_eq!(addr_exp(&t, "0X10"), Ok(16));
        assert_eq!(addr_exp(&t, "0xFf"), Ok(255));
    }

    #[test]
    fn hex_trailing_garbage_parses_as_far_as_possible() {
        let t = symtab();
        assert_eq!(addr_exp(&t, "0xzz"), Ok(0));
        assert_eq!(addr_exp(&t, "0x1g"), Ok(1));
        assert_eq!(addr_exp(&t, "0x"), Ok(0));
    }

    #[test]
    fn empty_and_separator_only_input_is_zero() {
        let t = symtab();
        assert_eq!(addr_exp(&t, ""), Ok(0));
        assert_eq!(addr_exp(&t, "   "), Ok(0));
        assert_eq!(addr_exp(&t, "+ -"), Ok(0));
    }

    #[test]
    fn token_truncates_at_63_characters() {
        let mut t = symtab();
        let long_name: String = std::iter::repeat('a').take(80).collect();
        let truncated: String = std::iter::repeat('a').take(63).collect();
        t.insert(truncated, 0x4242);
        // The oversized token is classified from its first 63 characters.
        assert_eq!(addr_exp(&t, &long_name), Ok(0x4242));
    }
}
