use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::builtin;
use super::table::RateTable;
use crate::error::ChildSupportError;
use crate::types::FinancialYear;
use crate::ChildSupportResult;

/// Rate tables keyed by financial year. Serialized as a list of tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RateTable>", into = "Vec<RateTable>")]
pub struct RateTableRegistry {
    tables: BTreeMap<FinancialYear, RateTable>,
}

impl RateTableRegistry {
    pub fn builtin() -> Self {
        let tables = builtin::all()
            .into_iter()
            .map(|t| (t.financial_year, t))
            .collect();
        RateTableRegistry { tables }
    }

    pub fn get(&self, year: &FinancialYear) -> ChildSupportResult<&RateTable> {
        self.tables
            .get(year)
            .ok_or_else(|| ChildSupportError::UnsupportedFinancialYear {
                year: year.to_string(),
            })
    }

    pub fn contains(&self, year: &FinancialYear) -> bool {
        self.tables.contains_key(year)
    }

    pub fn years(&self) -> impl Iterator<Item = FinancialYear> + '_ {
        self.tables.keys().copied()
    }

    pub fn latest(&self) -> Option<&RateTable> {
        self.tables.values().next_back()
    }

    /// Adds or replaces the table for its financial year.
    pub fn insert(&mut self, table: RateTable) -> Option<RateTable> {
        self.tables.insert(table.financial_year, table)
    }

    pub fn validate(&self) -> ChildSupportResult<()> {
        if self.tables.is_empty() {
            return Err(ChildSupportError::invalid_config(
                "rate_tables",
                "at least one rate table is required",
            ));
        }
        self.tables.values().try_for_each(RateTable::validate)
    }
}

impl Default for RateTableRegistry {
    fn default() -> Self {
        RateTableRegistry::builtin()
    }
}

impl TryFrom<Vec<RateTable>> for RateTableRegistry {
    type Error = String;

    fn try_from(tables: Vec<RateTable>) -> Result<Self, Self::Error> {
        let mut map = BTreeMap::new();
        for table in tables {
            let year = table.financial_year;
            if map.insert(year, table).is_some() {
                return Err(format!("duplicate rate table for {year}"));
            }
        }
        Ok(RateTableRegistry { tables: map })
    }
}

impl From<RateTableRegistry> for Vec<RateTable> {
    fn from(registry: RateTableRegistry) -> Self {
        registry.tables.into_values().collect()
    }
}
