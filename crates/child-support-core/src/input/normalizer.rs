use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Map, Value};

use super::coerce::{parse_bool, parse_decimal, parse_whole};
use super::model::{AssessmentInput, Child, LeadContext, Parent, RelevantDependents, ADULT_AGE};
use crate::error::{ChildSupportError, ValidationError};
use crate::rates::RateTableRegistry;
use crate::types::{FinancialYear, Percent};
use crate::ChildSupportResult;

const CARE_TOLERANCE: Decimal = dec!(0.5);
const MAX_DEPENDENTS: u32 = 20;
/// Stand-in age for an other-case child whose age was not given.
const DEFAULT_OTHER_CASE_AGE: u8 = 6;

type Object = Map<String, Value>;

/// Normalizes raw form input, defaulting the financial year from today's date.
pub fn normalize(raw: &Value, registry: &RateTableRegistry) -> ChildSupportResult<AssessmentInput> {
    normalize_as_of(raw, registry, Utc::now().date_naive())
}

/// Validates and coerces raw form input into an [`AssessmentInput`].
///
/// Every offending field is reported. A well-formed financial year with no
/// rate table fails with `UnsupportedFinancialYear` when it is the only
/// problem, otherwise it is listed with the other violations.
pub fn normalize_as_of(
    raw: &Value,
    registry: &RateTableRegistry,
    as_of: NaiveDate,
) -> ChildSupportResult<AssessmentInput> {
    let Some(obj) = raw.as_object() else {
        return Err(ValidationError::single("$", "expected a JSON object").into());
    };

    let mut errors = ValidationError::default();
    let financial_year = read_financial_year(obj, as_of, &mut errors);
    let parents = read_parents(obj, &mut errors);
    let children = read_children(obj, &mut errors);
    let lead = read_lead(obj, &mut errors);

    if let Some(year) = financial_year {
        if !registry.contains(&year) {
            if errors.is_empty() {
                return Err(ChildSupportError::UnsupportedFinancialYear {
                    year: year.to_string(),
                });
            }
            errors.push("financialYear", format!("no rate table for {year}"));
        }
    }

    match (financial_year, parents, children) {
        (Some(financial_year), Some(parents), Some(children)) if errors.is_empty() => {
            Ok(AssessmentInput {
                financial_year,
                parents,
                children,
                lead,
            })
        }
        _ => Err(errors.into()),
    }
}

/// First present, non-null value among the accepted spellings of a key.
fn field<'a>(obj: &'a Object, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| obj.get(*name).filter(|v| !v.is_null()))
}

// ---------------------------------------------------------------------------
// Financial year
// ---------------------------------------------------------------------------

fn read_financial_year(
    obj: &Object,
    as_of: NaiveDate,
    errors: &mut ValidationError,
) -> Option<FinancialYear> {
    let parsed = match field(obj, &["financialYear", "financial_year"]) {
        None => return Some(FinancialYear::containing(as_of)),
        Some(Value::String(s)) => s.parse::<FinancialYear>(),
        Some(Value::Number(n)) => n.to_string().parse::<FinancialYear>(),
        Some(_) => Err("expected a string such as \"2025-26\"".to_string()),
    };
    match parsed {
        Ok(year) => Some(year),
        Err(reason) => {
            errors.push("financialYear", reason);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Parents
// ---------------------------------------------------------------------------

fn read_parents(obj: &Object, errors: &mut ValidationError) -> Option<[Parent; 2]> {
    let list = match field(obj, &["parents"]) {
        None => {
            errors.push("parents", "two parents are required");
            return None;
        }
        Some(Value::Array(list)) => list,
        Some(_) => {
            errors.push("parents", "expected a list of two parents");
            return None;
        }
    };
    if list.len() != 2 {
        errors.push(
            "parents",
            format!("exactly two parents are required, got {}", list.len()),
        );
        return None;
    }

    let a = read_parent(&list[0], "parents[0]", errors);
    let b = read_parent(&list[1], "parents[1]", errors);
    Some([a?, b?])
}

fn read_parent(value: &Value, path: &str, errors: &mut ValidationError) -> Option<Parent> {
    let Some(obj) = value.as_object() else {
        errors.push(path, "expected an object");
        return None;
    };
    let before = errors.len();

    let income = match field(obj, &["income", "taxableIncome", "taxable_income"]) {
        None => {
            errors.push(format!("{path}.income"), "income is required");
            Decimal::ZERO
        }
        Some(v) => match parse_decimal(v) {
            Ok(income) if income < Decimal::ZERO => {
                errors.push(format!("{path}.income"), "income must not be negative");
                Decimal::ZERO
            }
            Ok(income) => income,
            Err(reason) => {
                errors.push(format!("{path}.income"), reason);
                Decimal::ZERO
            }
        },
    };

    let relevant_dependents = read_relevant_dependents(obj, path, errors);
    let other_case_children = read_other_cases(obj, path, errors);
    let income_support = match field(obj, &["incomeSupport", "income_support"]) {
        None => false,
        Some(v) => parse_bool(v).unwrap_or_else(|reason| {
            errors.push(format!("{path}.incomeSupport"), reason);
            false
        }),
    };

    (errors.len() == before).then_some(Parent {
        income,
        relevant_dependents,
        other_case_children,
        income_support,
    })
}

fn read_relevant_dependents(
    obj: &Object,
    path: &str,
    errors: &mut ValidationError,
) -> RelevantDependents {
    let field_path = format!("{path}.relevantDependents");
    let count = |value: Option<&Value>, errors: &mut ValidationError| -> u8 {
        match value.map(|v| parse_whole(v, MAX_DEPENDENTS)) {
            None => 0,
            Some(Ok(n)) => u8::try_from(n).unwrap_or(u8::MAX),
            Some(Err(reason)) => {
                errors.push(field_path.clone(), reason);
                0
            }
        }
    };

    match field(obj, &["relevantDependents", "relevant_dependents"]) {
        None => RelevantDependents::default(),
        Some(Value::Object(deps)) => RelevantDependents {
            under_13: count(field(deps, &["under13", "under_13"]), errors),
            thirteen_plus: count(
                field(deps, &["thirteenPlus", "thirteen_plus", "over13"]),
                errors,
            ),
        },
        // A bare count is taken as younger children.
        Some(v) => RelevantDependents {
            under_13: count(Some(v), errors),
            thirteen_plus: 0,
        },
    }
}

fn read_other_cases(obj: &Object, path: &str, errors: &mut ValidationError) -> Vec<u8> {
    let field_path = format!("{path}.otherCaseChildren");
    let mut ages = Vec::new();

    match field(obj, &["otherCaseChildren", "other_case_children"]) {
        None => {}
        Some(Value::Array(list)) => {
            for (i, item) in list.iter().enumerate() {
                let age = item
                    .as_object()
                    .and_then(|o| field(o, &["age"]))
                    .unwrap_or(item);
                match parse_whole(age, u32::from(ADULT_AGE)) {
                    Ok(age) => ages.push(u8::try_from(age).unwrap_or(ADULT_AGE)),
                    Err(reason) => errors.push(format!("{field_path}[{i}]"), reason),
                }
            }
        }
        Some(_) => errors.push(field_path.clone(), "expected a list of child ages"),
    }

    let obligation = match field(obj, &["otherCaseObligation", "other_case_obligation"]) {
        None => false,
        Some(v) => parse_bool(v).unwrap_or_else(|reason| {
            errors.push(format!("{path}.otherCaseObligation"), reason);
            false
        }),
    };
    if obligation && ages.is_empty() {
        ages.push(DEFAULT_OTHER_CASE_AGE);
    }
    ages
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

fn read_children(obj: &Object, errors: &mut ValidationError) -> Option<Vec<Child>> {
    let list = match field(obj, &["children"]) {
        Some(Value::Array(list)) if !list.is_empty() => list,
        Some(Value::Array(_)) | None => {
            errors.push("children", "at least one child is required");
            return None;
        }
        Some(_) => {
            errors.push("children", "expected a list of children");
            return None;
        }
    };

    let children: Vec<Option<Child>> = list
        .iter()
        .enumerate()
        .map(|(i, value)| read_child(value, i, errors))
        .collect();
    children.into_iter().collect()
}

fn read_child(value: &Value, index: usize, errors: &mut ValidationError) -> Option<Child> {
    let path = format!("children[{index}]");
    let Some(obj) = value.as_object() else {
        errors.push(path, "expected an object");
        return None;
    };

    let age = match field(obj, &["age"]) {
        None => {
            errors.push(format!("{path}.age"), "age is required");
            None
        }
        Some(v) => match parse_whole(v, u32::from(ADULT_AGE)) {
            Ok(age) => u8::try_from(age).ok(),
            Err(reason) => {
                errors.push(format!("{path}.age"), reason);
                None
            }
        },
    };

    let care = read_care(obj, &path, index, errors);
    Some(Child { age: age?, care: care? })
}

fn read_care(
    obj: &Object,
    path: &str,
    index: usize,
    errors: &mut ValidationError,
) -> Option<[Percent; 2]> {
    let field_path = format!("{path}.carePercentages");
    let (a, b) = match field(obj, &["carePercentages", "care_percentages", "care"]) {
        None => {
            errors.push(field_path, "care percentages are required");
            return None;
        }
        Some(Value::Object(map)) => (
            field(map, &["0", "parentA", "parent_a"]),
            field(map, &["1", "parentB", "parent_b"]),
        ),
        Some(Value::Array(list)) if list.len() <= 2 => (list.first(), list.get(1)),
        Some(_) => {
            errors.push(field_path, "expected care for parent 0 and parent 1");
            return None;
        }
    };

    let mut share = |value: Option<&Value>, parent: usize| -> Option<Percent> {
        let Some(value) = value else {
            return Some(Decimal::ZERO);
        };
        match parse_decimal(value) {
            Ok(p) if p >= Decimal::ZERO && p <= Decimal::ONE_HUNDRED => Some(p),
            Ok(p) => {
                errors.push(
                    format!("{field_path}[{parent}]"),
                    format!("{p} is outside 0 to 100"),
                );
                None
            }
            Err(reason) => {
                errors.push(format!("{field_path}[{parent}]"), reason);
                None
            }
        }
    };
    let care_a = share(a, 0);
    let care_b = share(b, 1);
    let (care_a, care_b) = (care_a?, care_b?);

    let total = care_a + care_b;
    if (total - Decimal::ONE_HUNDRED).abs() > CARE_TOLERANCE {
        errors.push(
            field_path,
            format!(
                "care percentages for child {} sum to {total}, expected 100",
                index + 1
            ),
        );
        return None;
    }
    Some(balance_care(care_a, care_b))
}

/// Absorbs a rounding remainder into the larger share so the pair sums to
/// exactly 100. Ties go to parent A.
fn balance_care(a: Percent, b: Percent) -> [Percent; 2] {
    let remainder = Decimal::ONE_HUNDRED - (a + b);
    if b > a {
        [a, b + remainder]
    } else {
        [a + remainder, b]
    }
}

// ---------------------------------------------------------------------------
// Lead context
// ---------------------------------------------------------------------------

fn read_lead(obj: &Object, errors: &mut ValidationError) -> LeadContext {
    let Some(value) = field(obj, &["lead", "leadContext", "lead_context"]) else {
        return LeadContext::default();
    };
    let Some(lead) = value.as_object() else {
        errors.push("lead", "expected an object");
        return LeadContext::default();
    };

    let special_circumstances = read_strings(
        lead,
        &["specialCircumstances", "special_circumstances"],
        "lead.specialCircumstances",
        errors,
    );
    let financial_tags = read_strings(
        lead,
        &["financialTags", "financial_tags"],
        "lead.financialTags",
        errors,
    );

    let court_date = match field(lead, &["courtDate", "court_date"]) {
        None => None,
        Some(Value::String(s)) => parse_date(s).or_else(|| {
            errors.push("lead.courtDate", format!("'{s}' is not a date (YYYY-MM-DD)"));
            None
        }),
        Some(_) => {
            errors.push("lead.courtDate", "expected a date string");
            None
        }
    };

    let binding_agreement = match field(lead, &["bindingAgreement", "binding_agreement"]) {
        None => false,
        Some(v) => parse_bool(v).unwrap_or_else(|reason| {
            errors.push("lead.bindingAgreement", reason);
            false
        }),
    };

    LeadContext {
        special_circumstances,
        financial_tags,
        court_date,
        binding_agreement,
    }
}

fn read_strings(
    obj: &Object,
    names: &[&str],
    path: &str,
    errors: &mut ValidationError,
) -> Vec<String> {
    match field(obj, names) {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match item.as_str() {
                Some(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Some(_) => None,
                None => {
                    errors.push(format!("{path}[{i}]"), "expected a string");
                    None
                }
            })
            .collect(),
        Some(_) => {
            errors.push(path, "expected a list of strings");
            Vec::new()
        }
    }
}

/// Dates as "YYYY-MM-DD" or a full RFC 3339 timestamp.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
