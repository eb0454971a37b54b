use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::input;

/// Enquiry details, from a file, piped stdin or individual flags
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EnquiryArgs {
    /// Path to a JSON or YAML enquiry (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Financial year, e.g. 2025-26 (defaults to the year containing --as-of)
    #[arg(long)]
    pub financial_year: Option<String>,

    /// Parent A taxable income
    #[arg(long)]
    pub income_a: Option<Decimal>,

    /// Parent B taxable income
    #[arg(long)]
    pub income_b: Option<Decimal>,

    /// A child as AGE:CARE_A or AGE:CARE_A:CARE_B (repeatable)
    #[arg(long = "child", value_name = "AGE:CARE_A")]
    pub children: Vec<String>,

    /// Ages of parent A's children in other cases (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub other_case_a: Vec<u8>,

    /// Ages of parent B's children in other cases (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub other_case_b: Vec<u8>,

    /// Relevant dependents under 13 living with parent A
    #[arg(long, default_value_t = 0)]
    pub dependents_a: u8,

    /// Relevant dependents under 13 living with parent B
    #[arg(long, default_value_t = 0)]
    pub dependents_b: u8,

    /// Parent A receives an income support payment
    #[arg(long)]
    pub income_support_a: bool,

    /// Parent B receives an income support payment
    #[arg(long)]
    pub income_support_b: bool,

    /// Date the estimate is made on, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

impl EnquiryArgs {
    /// The raw enquiry document. Flag input is assembled into the same
    /// shape a file would have so it passes through the same validation.
    pub fn raw(&self) -> Result<Value, Box<dyn std::error::Error>> {
        if let Some(doc) = input::read_enquiry(self.input.as_deref())? {
            return Ok(doc);
        }

        let income_a = self
            .income_a
            .ok_or("--income-a is required (or provide --input)")?;
        let income_b = self
            .income_b
            .ok_or("--income-b is required (or provide --input)")?;
        if self.children.is_empty() {
            return Err("at least one --child is required (or provide --input)".into());
        }
        let children = self
            .children
            .iter()
            .map(|spec| parse_child(spec))
            .collect::<Result<Vec<_>, _>>()?;

        let mut raw = json!({
            "parents": [
                {
                    "income": income_a.to_string(),
                    "otherCaseChildren": self.other_case_a,
                    "relevantDependents": self.dependents_a,
                    "incomeSupport": self.income_support_a,
                },
                {
                    "income": income_b.to_string(),
                    "otherCaseChildren": self.other_case_b,
                    "relevantDependents": self.dependents_b,
                    "incomeSupport": self.income_support_b,
                }
            ],
            "children": children,
        });
        if let Some(year) = &self.financial_year {
            raw["financialYear"] = json!(year);
        }
        Ok(raw)
    }

    /// Timestamp for the computation: midnight UTC on `--as-of`, or now.
    pub fn computed_at(&self) -> DateTime<Utc> {
        match self.as_of {
            Some(date) => Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
            None => Utc::now(),
        }
    }
}

/// Parses AGE:CARE_A[:CARE_B]. Parent B's care defaults to the remainder.
fn parse_child(spec: &str) -> Result<Value, String> {
    let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
    let bad = || format!("invalid --child '{spec}', expected AGE:CARE_A or AGE:CARE_A:CARE_B");

    let (age, care_a, care_b) = match parts.as_slice() {
        [age, care_a] => {
            let care_a: Decimal = care_a.parse().map_err(|_| bad())?;
            (*age, care_a, Decimal::ONE_HUNDRED - care_a)
        }
        [age, care_a, care_b] => (
            *age,
            care_a.parse().map_err(|_| bad())?,
            care_b.parse().map_err(|_| bad())?,
        ),
        _ => return Err(bad()),
    };
    let age: u8 = age.parse().map_err(|_| bad())?;

    Ok(json!({
        "age": age,
        "carePercentages": [care_a.to_string(), care_b.to_string()],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_child_defaults_parent_b_care() {
        let child = parse_child("8:35").unwrap();
        assert_eq!(child["age"], json!(8));
        assert_eq!(child["carePercentages"][1], json!(dec!(65).to_string()));
    }

    #[test]
    fn test_parse_child_explicit_care() {
        let child = parse_child("14:40:60").unwrap();
        assert_eq!(child["carePercentages"], json!(["40", "60"]));
    }

    #[test]
    fn test_parse_child_rejects_garbage() {
        assert!(parse_child("8").is_err());
        assert!(parse_child("eight:50").is_err());
        assert!(parse_child("8:50:50:0").is_err());
    }
}
