//! Currency unit descriptors used to tag [`Money`](crate::domain::Money) values.

use std::fmt::Debug;
use std::hash::Hash;

/// Where a unit's display symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolPosition {
    /// `$5.00`
    Prefix,
    /// `3 sat`
    Suffix,
}

/// Type-level description of a currency unit.
///
/// Implementors are zero-sized markers. The unit fixes how many fractional
/// digits an amount may carry and how it is labelled for display.
pub trait Unit: Copy + Debug + Default + Eq + Ord + Hash + Send + Sync + 'static {
    /// Number of fractional digits an amount in this unit may carry.
    const DECIMAL_PLACES: u32;
    /// Short uppercase code, used in error messages.
    const CODE: &'static str;
    /// Display symbol.
    const SYMBOL: &'static str;
    /// Placement of [`Unit::SYMBOL`].
    const SYMBOL_POSITION: SymbolPosition;
}

/// US dollars, quoted to the cent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dollar;

impl Unit for Dollar {
    const DECIMAL_PLACES: u32 = 2;
    const CODE: &'static str = "USD";
    const SYMBOL: &'static str = "$";
    const SYMBOL_POSITION: SymbolPosition = SymbolPosition::Prefix;
}

/// Satoshis, the indivisible bitcoin sub-unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Satoshi;

impl Unit for Satoshi {
    const DECIMAL_PLACES: u32 = 0;
    const CODE: &'static str = "SAT";
    const SYMBOL: &'static str = "sat";
    const SYMBOL_POSITION: SymbolPosition = SymbolPosition::Suffix;
}
