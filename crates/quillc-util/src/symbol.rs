//! Symbol module - String interning for identifier and literal handling.
//!
//! A [`Symbol`] is a compact 4-byte handle to an interned string. Interning
//! gives O(1) equality (index comparison) and lets tokens, AST nodes, and
//! IR nodes share one copy of every name that appears in a program.
//!
//! The interner is process-wide and thread-safe: the lookup map is a
//! [`DashMap`] and the index-to-string table is an append-only vector
//! behind a [`RwLock`]. Interned strings are leaked to obtain `'static`
//! lifetime; the table lives for the program duration and entries are never
//! removed.
//!
//! The Quill keywords, `this`, and the reserved `$RETURNS` binding are
//! pre-interned at fixed indices so the constants in [`kw`] are usable
//! without touching the table.
//!
//! # Examples
//!
//! ```
//! use quillc_util::{kw, Symbol};
//!
//! let a = Symbol::intern("count");
//! let b = Symbol::intern("count");
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "count");
//!
//! assert_eq!(Symbol::intern("LET"), kw::LET);
//! ```

use std::fmt;
use std::sync::LazyLock;

use dashmap::DashMap;
use parking_lot::RwLock;

/// Strings pre-interned at table construction, in index order.
///
/// The constants in [`kw`] must match this list position for position.
const KNOWN: &[&str] = &[
    "LET", "DEF", "IF", "ELSE", "FOR", "IN", "RETURN", "DO", "END", "OBJECT", "AND", "OR", "NIL",
    "TRUE", "FALSE", "this", "$RETURNS",
];

/// Pre-interned keyword and reserved-name symbols.
///
/// Quill keywords are lexed as plain identifier tokens; the parser tells
/// them apart by literal, and these constants give it (and the analyzer)
/// allocation-free handles for the comparisons.
pub mod kw {
    use super::Symbol;

    pub const LET: Symbol = Symbol(0);
    pub const DEF: Symbol = Symbol(1);
    pub const IF: Symbol = Symbol(2);
    pub const ELSE: Symbol = Symbol(3);
    pub const FOR: Symbol = Symbol(4);
    pub const IN: Symbol = Symbol(5);
    pub const RETURN: Symbol = Symbol(6);
    pub const DO: Symbol = Symbol(7);
    pub const END: Symbol = Symbol(8);
    pub const OBJECT: Symbol = Symbol(9);
    pub const AND: Symbol = Symbol(10);
    pub const OR: Symbol = Symbol(11);
    pub const NIL: Symbol = Symbol(12);
    pub const TRUE: Symbol = Symbol(13);
    pub const FALSE: Symbol = Symbol(14);

    /// `this` - the receiver binding inside object method bodies.
    pub const THIS: Symbol = Symbol(15);

    /// `$RETURNS` - the analyzer's reserved return-type binding. `$` is not
    /// a valid identifier start, so user source can never shadow it.
    pub const RETURNS: Symbol = Symbol(16);
}

/// A 4-byte handle to an interned string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Interns a string, returning its symbol.
    ///
    /// The same string always yields the same symbol.
    pub fn intern(string: &str) -> Symbol {
        TABLE.intern(string)
    }

    /// Returns the interned string for this symbol.
    #[inline]
    pub fn as_str(self) -> &'static str {
        TABLE.resolve(self)
    }

    /// Raw table index, exposed for debugging.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

/// Global string table, initialized on first use with the known symbols.
static TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

/// Thread-safe string table.
struct StringTable {
    /// Interned string to symbol.
    map: DashMap<&'static str, Symbol>,

    /// Symbol index to interned string.
    strings: RwLock<Vec<&'static str>>,
}

impl StringTable {
    fn new() -> Self {
        let table = Self {
            map: DashMap::with_capacity(KNOWN.len() * 4),
            strings: RwLock::new(Vec::with_capacity(KNOWN.len() * 4)),
        };
        for known in KNOWN {
            table.intern(known);
        }
        table
    }

    fn intern(&self, string: &str) -> Symbol {
        if let Some(symbol) = self.map.get(string) {
            return *symbol;
        }

        let mut strings = self.strings.write();
        // Another thread may have interned this string while we waited.
        if let Some(symbol) = self.map.get(string) {
            return *symbol;
        }

        let leaked: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let symbol = Symbol(strings.len() as u32);
        strings.push(leaked);
        self.map.insert(leaked, symbol);
        symbol
    }

    fn resolve(&self, symbol: Symbol) -> &'static str {
        self.strings.read()[symbol.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_same_string() {
        let a = Symbol::intern("hello");
        let b = Symbol::intern("hello");
        assert_eq!(a, b);
    }

    #[test]
    fn test_intern_distinct_strings() {
        let a = Symbol::intern("hello");
        let b = Symbol::intern("world");
        assert_ne!(a, b);
    }

    #[test]
    fn test_as_str_round_trip() {
        let sym = Symbol::intern("round_trip");
        assert_eq!(sym.as_str(), "round_trip");
    }

    #[test]
    fn test_known_symbols_have_fixed_indices() {
        assert_eq!(Symbol::intern("LET"), kw::LET);
        assert_eq!(Symbol::intern("DEF"), kw::DEF);
        assert_eq!(Symbol::intern("END"), kw::END);
        assert_eq!(Symbol::intern("this"), kw::THIS);
        assert_eq!(Symbol::intern("$RETURNS"), kw::RETURNS);
    }

    #[test]
    fn test_keyword_as_str() {
        assert_eq!(kw::OBJECT.as_str(), "OBJECT");
        assert_eq!(kw::RETURNS.as_str(), "$RETURNS");
    }

    #[test]
    fn test_display_uses_interned_string() {
        let sym = Symbol::intern("printable");
        assert_eq!(sym.to_string(), "printable");
    }

    #[test]
    fn test_concurrent_interning() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| Symbol::intern("shared")))
            .collect();
        let symbols: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(symbols.windows(2).all(|w| w[0] == w[1]));
    }
}
