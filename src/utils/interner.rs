//! Global string interner.
//!
//! Manipulator identity keys and property field paths are compared and
//! hashed every frame. Interning turns them into integer symbols so those
//! comparisons are O(1) and allocation free.

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

/// Global interner instance.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// Compact integer identifier for an interned string.
pub type Symbol = Spur;

/// Interns a string, returning its symbol.
///
/// Returns the existing symbol if the string was interned before.
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Looks up the symbol of an already-interned string without allocating.
#[inline]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolves a symbol back to its string.
#[inline]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}
