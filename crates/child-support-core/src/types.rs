use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values, in Australian dollars. Never f64.
pub type Money = Decimal;

/// Percentages on a 0-100 scale (care, cost and income percentages).
pub type Percent = Decimal;

/// Rates expressed as decimals (0.50 = 50%).
pub type Rate = Decimal;

/// One of the two parents in an assessment. `ParentA` is input index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentId {
    ParentA,
    ParentB,
}

impl ParentId {
    pub const BOTH: [ParentId; 2] = [ParentId::ParentA, ParentId::ParentB];

    pub fn index(self) -> usize {
        match self {
            ParentId::ParentA => 0,
            ParentId::ParentB => 1,
        }
    }

    pub fn other(self) -> ParentId {
        match self {
            ParentId::ParentA => ParentId::ParentB,
            ParentId::ParentB => ParentId::ParentA,
        }
    }
}

impl fmt::Display for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentId::ParentA => write!(f, "parent A"),
            ParentId::ParentB => write!(f, "parent B"),
        }
    }
}

// ---------------------------------------------------------------------------
// Financial year
// ---------------------------------------------------------------------------

/// Australian financial year, 1 July to 30 June, identified by the calendar
/// year it starts in. Written as "2025-26".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FinancialYear(i32);

impl FinancialYear {
    pub fn starting(year: i32) -> Self {
        FinancialYear(year)
    }

    pub fn start_year(self) -> i32 {
        self.0
    }

    /// The financial year a date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= 7 {
            FinancialYear(date.year())
        } else {
            FinancialYear(date.year() - 1)
        }
    }

    pub fn start_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 7, 1)
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.0, (self.0 + 1).rem_euclid(100))
    }
}

impl FromStr for FinancialYear {
    type Err = String;

    /// Accepts "2025-26", "2025-2026" and the shorthand "2025".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || format!("'{s}' is not a financial year (expected e.g. \"2025-26\")");

        let (start, end) = match s.split_once('-') {
            Some((start, end)) => (start, Some(end)),
            None => (s, None),
        };
        if start.len() != 4 || !start.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let year: i32 = start.parse().map_err(|_| bad())?;

        match end {
            None => Ok(FinancialYear(year)),
            Some(end) if end.len() == 2 && end.bytes().all(|b| b.is_ascii_digit()) => {
                let suffix: i32 = end.parse().map_err(|_| bad())?;
                if suffix == (year + 1).rem_euclid(100) {
                    Ok(FinancialYear(year))
                } else {
                    Err(format!("'{s}' does not span consecutive years"))
                }
            }
            Some(end) if end.len() == 4 && end.bytes().all(|b| b.is_ascii_digit()) => {
                let next: i32 = end.parse().map_err(|_| bad())?;
                if next == year + 1 {
                    Ok(FinancialYear(year))
                } else {
                    Err(format!("'{s}' does not span consecutive years"))
                }
            }
            Some(_) => Err(bad()),
        }
    }
}

impl TryFrom<String> for FinancialYear {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FinancialYear> for String {
    fn from(year: FinancialYear) -> Self {
        year.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_year_parse_forms() {
        let expected = FinancialYear::starting(2025);
        assert_eq!("2025-26".parse::<FinancialYear>().unwrap(), expected);
        assert_eq!("2025-2026".parse::<FinancialYear>().unwrap(), expected);
        assert_eq!(" 2025 ".parse::<FinancialYear>().unwrap(), expected);
    }

    #[test]
    fn test_financial_year_rejects_garbage() {
        assert!("2025-27".parse::<FinancialYear>().is_err());
        assert!("25-26".parse::<FinancialYear>().is_err());
        assert!("next year".parse::<FinancialYear>().is_err());
        assert!("".parse::<FinancialYear>().is_err());
    }

    #[test]
    fn test_financial_year_display_wraps_century() {
        assert_eq!(FinancialYear::starting(2025).to_string(), "2025-26");
        assert_eq!(FinancialYear::starting(2099).to_string(), "2099-00");
    }

    #[test]
    fn test_financial_year_containing_date() {
        let june = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let july = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        assert_eq!(FinancialYear::containing(june), FinancialYear::starting(2025));
        assert_eq!(FinancialYear::containing(july), FinancialYear::starting(2026));
    }

    #[test]
    fn test_financial_year_serde_as_string() {
        let year = FinancialYear::starting(2026);
        let json = serde_json::to_string(&year).unwrap();
        assert_eq!(json, "\"2026-27\"");
        let back: FinancialYear = serde_json::from_str(&json).unwrap();
        assert_eq!(back, year);
    }

    #[test]
    fn test_parent_other() {
        assert_eq!(ParentId::ParentA.other(), ParentId::ParentB);
        assert_eq!(ParentId::ParentB.index(), 1);
    }
}
