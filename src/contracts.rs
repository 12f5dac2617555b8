//! Futures contract tick specifications
//!
//! The table is built once at startup, from the built-in instrument list plus
//! any contracts declared in configuration, and is read-only afterwards.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::errors::{CalcError, Result};

/// Tick metadata for one futures contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSpec {
    /// Display name, e.g. "ES (E-mini S&P 500)"
    pub name: String,
    /// Minimum price increment
    pub tick_size: Decimal,
    /// Dollar value of one tick for one contract
    pub tick_value: Decimal,
}

impl ContractSpec {
    pub fn new(name: impl Into<String>, tick_size: Decimal, tick_value: Decimal) -> Self {
        Self {
            name: name.into(),
            tick_size,
            tick_value,
        }
    }

    /// Root symbol: the part of the display name before " ("
    pub fn symbol(&self) -> &str {
        self.name
            .split_once(" (")
            .map(|(symbol, _)| symbol)
            .unwrap_or(&self.name)
            .trim()
    }

    /// Both tick size and tick value must be strictly positive
    pub fn is_valid(&self) -> bool {
        self.tick_size > Decimal::ZERO && self.tick_value > Decimal::ZERO
    }
}

/// Built-in contracts, in display order
fn builtin_specs() -> Vec<ContractSpec> {
    [
        // Equity index
        ("NQ (E-mini Nasdaq 100)", dec!(0.25), dec!(5.00)),
        ("ES (E-mini S&P 500)", dec!(0.25), dec!(12.50)),
        ("YM (E-mini Dow)", dec!(1.0), dec!(5.00)),
        ("RTY (E-mini Russell 2000)", dec!(0.10), dec!(5.00)),
        // Energy
        ("CL (Crude Oil)", dec!(0.01), dec!(10.00)),
        ("NG (Natural Gas)", dec!(0.001), dec!(10.00)),
        ("HO (Heating Oil)", dec!(0.0001), dec!(4.20)),
        ("RB (RBOB Gasoline)", dec!(0.0001), dec!(4.20)),
        // Metals
        ("GC (Gold)", dec!(0.10), dec!(10.00)),
        ("SI (Silver)", dec!(0.005), dec!(25.00)),
        ("PA (Palladium)", dec!(0.10), dec!(5.00)),
        ("HG (Copper)", dec!(0.0005), dec!(12.50)),
        ("PL (Platinum)", dec!(0.10), dec!(5.00)),
        // Rates
        ("ZB (30-Year T-Bond)", dec!(0.015625), dec!(31.25)),
        ("ZN (10-Year T-Note)", dec!(0.015625), dec!(15.625)),
        ("ZF (5-Year T-Note)", dec!(0.0078125), dec!(7.8125)),
        ("ZT (2-Year T-Note)", dec!(0.0078125), dec!(7.8125)),
        // Currencies
        ("6A (Australian Dollar)", dec!(0.0001), dec!(10.00)),
        ("6B (British Pound)", dec!(0.0001), dec!(6.25)),
        ("6C (Canadian Dollar)", dec!(0.0001), dec!(10.00)),
        ("6J (Japanese Yen)", dec!(0.000001), dec!(12.50)),
        ("6E (Euro)", dec!(0.00005), dec!(6.25)),
        ("6S (Swiss Franc)", dec!(0.0001), dec!(12.50)),
        ("6N (New Zealand Dollar)", dec!(0.0001), dec!(10.00)),
        // Softs
        ("CC (Cocoa)", dec!(1.0), dec!(10.00)),
        ("KC (Coffee)", dec!(0.05), dec!(18.75)),
        ("CT (Cotton)", dec!(0.01), dec!(500.00)),
        ("OJ (Orange Juice)", dec!(0.0005), dec!(7.50)),
        ("LBR (Lumber)", dec!(0.10), dec!(11.00)),
        ("SB (Sugar)", dec!(0.0001), dec!(11.20)),
        // Meats
        ("LE (Live Cattle)", dec!(0.025), dec!(400.00)),
        ("HE (Lean Hogs)", dec!(0.025), dec!(400.00)),
        // Grains
        ("ZC (Corn)", dec!(0.25), dec!(12.50)),
        ("ZO (Oats)", dec!(0.25), dec!(12.50)),
        ("ZW (Wheat)", dec!(0.25), dec!(12.50)),
        ("ZS (Soybeans)", dec!(0.25), dec!(12.50)),
        ("ZM (Soybean Meal)", dec!(0.1), dec!(10.00)),
        ("ZL (Soybean Oil)", dec!(0.01), dec!(6.00)),
        // Crypto
        ("BTC (Bitcoin Futures)", dec!(5.0), dec!(25.00)),
        ("ETH (Ethereum Futures)", dec!(0.10), dec!(5.00)),
    ]
    .into_iter()
    .map(|(name, tick_size, tick_value)| ContractSpec::new(name, tick_size, tick_value))
    .collect()
}

/// Ordered, read-only mapping from display name to [`ContractSpec`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractTable {
    specs: Vec<ContractSpec>,
}

impl ContractTable {
    /// The built-in instrument table
    pub fn builtin() -> Self {
        Self {
            specs: builtin_specs(),
        }
    }

    /// Built-in table extended with extra contracts
    ///
    /// An extra whose name matches a built-in replaces it in place; other
    /// extras are appended in the order given. Every entry must have a positive
    /// tick size and tick value, and names may not repeat among the extras.
    pub fn with_extra(extra: Vec<ContractSpec>) -> Result<Self> {
        let mut table = Self::builtin();
        let mut seen: Vec<String> = Vec::with_capacity(extra.len());

        for spec in extra {
            if !spec.is_valid() {
                return Err(CalcError::Configuration(format!(
                    "contract {:?} must have positive tick_size and tick_value (got {} / {})",
                    spec.name, spec.tick_size, spec.tick_value
                )));
            }
            if seen.contains(&spec.name) {
                return Err(CalcError::Configuration(format!(
                    "contract {:?} is declared more than once",
                    spec.name
                )));
            }
            seen.push(spec.name.clone());

            match table.position(&spec.name) {
                Some(index) => table.specs[index] = spec,
                None => table.specs.push(spec),
            }
        }

        Ok(table)
    }

    /// Display names in order
    pub fn list(&self) -> Vec<&str> {
        self.specs.iter().map(|spec| spec.name.as_str()).collect()
    }

    /// Look up a contract by display name
    ///
    /// # Panics
    /// Panics if `name` is not in the table. Names offered to the user are
    /// exactly the table's names, so a miss here is a programming error; use
    /// [`ContractTable::find`] for names that come from outside.
    pub fn lookup(&self, name: &str) -> &ContractSpec {
        match self.find(name) {
            Some(spec) => spec,
            None => panic!("contract {name:?} is not in the contract table"),
        }
    }

    /// Look up a contract by display name
    pub fn find(&self, name: &str) -> Option<&ContractSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Look up a contract by root symbol (case-insensitive)
    pub fn find_symbol(&self, symbol: &str) -> Option<&ContractSpec> {
        let symbol = symbol.trim();
        self.specs
            .iter()
            .find(|spec| spec.symbol().eq_ignore_ascii_case(symbol))
    }

    /// Resolve a user-supplied symbol or display name
    pub fn resolve(&self, name_or_symbol: &str) -> Result<&ContractSpec> {
        self.find(name_or_symbol)
            .or_else(|| self.find_symbol(name_or_symbol))
            .ok_or_else(|| CalcError::UnknownContract(name_or_symbol.to_string()))
    }

    /// Index of a display name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.name == name)
    }

    /// Contract at a display index
    pub fn get(&self, index: usize) -> Option<&ContractSpec> {
        self.specs.get(index)
    }

    /// The default selection
    pub fn first(&self) -> &ContractSpec {
        // Both constructors start from the non-empty built-in list.
        &self.specs[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContractSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for ContractTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builtin_table_is_valid() {
        let table = ContractTable::builtin();
        assert_eq!(table.len(), 40);
        assert!(table.iter().all(ContractSpec::is_valid));
        assert_eq!(table.first().name, "NQ (E-mini Nasdaq 100)");
    }

    #[test]
    fn test_list_preserves_order() {
        let table = ContractTable::builtin();
        let names = table.list();
        assert_eq!(names[0], "NQ (E-mini Nasdaq 100)");
        assert_eq!(names[1], "ES (E-mini S&P 500)");
        assert_eq!(names[39], "ETH (Ethereum Futures)");
    }

    #[test]
    fn test_lookup() {
        let table = ContractTable::builtin();
        let es = table.lookup("ES (E-mini S&P 500)");
        assert_eq!(es.tick_size, dec!(0.25));
        assert_eq!(es.tick_value, dec!(12.50));

        let zf = table.lookup("ZF (5-Year T-Note)");
        assert_eq!(zf.tick_size, dec!(0.0078125));
        assert_eq!(zf.tick_value, dec!(7.8125));
    }

    #[test]
    #[should_panic(expected = "not in the contract table")]
    fn test_lookup_unknown_panics() {
        ContractTable::builtin().lookup("XX (Nonexistent)");
    }

    #[test]
    fn test_symbol() {
        let table = ContractTable::builtin();
        assert_eq!(table.lookup("RTY (E-mini Russell 2000)").symbol(), "RTY");
        assert_eq!(ContractSpec::new("MES", dec!(0.25), dec!(1.25)).symbol(), "MES");
    }

    #[test]
    fn test_find_symbol_case_insensitive() {
        let table = ContractTable::builtin();
        assert_eq!(table.find_symbol("es").unwrap().name, "ES (E-mini S&P 500)");
        assert_eq!(table.find_symbol("6J").unwrap().tick_size, dec!(0.000001));
        assert!(table.find_symbol("XX").is_none());
    }

    #[test]
    fn test_resolve() {
        let table = ContractTable::builtin();
        assert_eq!(table.resolve("GC").unwrap().name, "GC (Gold)");
        assert_eq!(table.resolve("GC (Gold)").unwrap().name, "GC (Gold)");
        assert!(matches!(
            table.resolve("nope"),
            Err(CalcError::UnknownContract(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_with_extra_appends_and_replaces() {
        let table = ContractTable::with_extra(vec![
            ContractSpec::new("MES (Micro E-mini S&P 500)", dec!(0.25), dec!(1.25)),
            ContractSpec::new("ES (E-mini S&P 500)", dec!(0.25), dec!(12.75)),
        ])
        .unwrap();

        assert_eq!(table.len(), 41);
        assert_eq!(table.position("ES (E-mini S&P 500)"), Some(1));
        assert_eq!(table.lookup("ES (E-mini S&P 500)").tick_value, dec!(12.75));
        assert_eq!(table.get(40).unwrap().symbol(), "MES");
    }

    #[test]
    fn test_with_extra_rejects_invalid() {
        let zero_tick = ContractTable::with_extra(vec![ContractSpec::new(
            "BAD",
            Decimal::ZERO,
            dec!(1),
        )]);
        assert!(matches!(zero_tick, Err(CalcError::Configuration(_))));

        let duplicate = ContractTable::with_extra(vec![
            ContractSpec::new("MNQ", dec!(0.25), dec!(0.5)),
            ContractSpec::new("MNQ", dec!(0.25), dec!(0.5)),
        ]);
        assert!(matches!(duplicate, Err(CalcError::Configuration(_))));
    }
}
