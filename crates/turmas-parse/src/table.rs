//! Table extraction strategies and their shared output type.

use std::fmt;

use turmas_core::RawRow;

use crate::lattice::LatticeSettings;
use crate::stream::StreamSettings;
use crate::text::WordOptions;

/// Strategy for table detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Detect tables from ruling lines.
    #[default]
    Lattice,
    /// Detect tables from text alignment (no visible borders needed).
    Stream,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Lattice => "lattice",
            Strategy::Stream => "stream",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for table detection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TableSettings {
    pub strategy: Strategy,
    pub lattice: LatticeSettings,
    pub stream: StreamSettings,
    pub words: WordOptions,
}

impl TableSettings {
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}

/// A table as plain rows of cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// 0-based page the table was found on, when known.
    pub page: Option<usize>,
    /// Class label carried by the source itself (CSV dumps).
    pub label: Option<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_default_is_lattice() {
        assert_eq!(Strategy::default(), Strategy::Lattice);
        assert_eq!(TableSettings::default().strategy, Strategy::Lattice);
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::Lattice.to_string(), "lattice");
        assert_eq!(Strategy::Stream.to_string(), "stream");
    }

    #[test]
    fn test_with_strategy_keeps_default_tolerances() {
        let settings = TableSettings::with_strategy(Strategy::Stream);
        assert_eq!(settings.strategy, Strategy::Stream);
        assert_eq!(settings.lattice.snap_tolerance, 3.0);
        assert_eq!(settings.stream.min_words_vertical, 3);
    }

    #[test]
    fn test_raw_table_len() {
        let table = RawTable {
            page: Some(0),
            label: None,
            rows: vec![vec!["a".to_string()], vec![]],
        };
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }
}
