use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{FinancialYear, Money, ParentId, Percent};

/// A child aged 18 is reported but not assessed.
pub const ADULT_AGE: u8 = 18;

/// Canonical, validated input to the engine. Built by the normalizer or by
/// callers that already hold typed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub financial_year: FinancialYear,
    pub parents: [Parent; 2],
    pub children: Vec<Child>,
    #[serde(default)]
    pub lead: LeadContext,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    /// Adjusted taxable income for child support purposes.
    pub income: Money,
    #[serde(default)]
    pub relevant_dependents: RelevantDependents,
    /// Ages of this parent's children in other child support cases.
    #[serde(default)]
    pub other_case_children: Vec<u8>,
    /// Receives an income support payment (pension or allowance).
    #[serde(default)]
    pub income_support: bool,
}

/// Other biological or adopted children living with a parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevantDependents {
    pub under_13: u8,
    pub thirteen_plus: u8,
}

impl RelevantDependents {
    pub fn total(&self) -> usize {
        usize::from(self.under_13) + usize::from(self.thirteen_plus)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub age: u8,
    /// Share of nights with parent A and parent B. Sums to 100.
    pub care: [Percent; 2],
}

impl Child {
    pub fn is_adult(&self) -> bool {
        self.age >= ADULT_AGE
    }

    pub fn care_of(&self, parent: ParentId) -> Percent {
        self.care[parent.index()]
    }
}

/// Enquiry context from the lead form. Only the scoring rules read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadContext {
    #[serde(default)]
    pub special_circumstances: Vec<String>,
    #[serde(default)]
    pub financial_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_date: Option<NaiveDate>,
    #[serde(default)]
    pub binding_agreement: bool,
}

impl AssessmentInput {
    pub fn parent(&self, id: ParentId) -> &Parent {
        &self.parents[id.index()]
    }

    /// Children below the adult age, in input order.
    pub fn assessable_children(&self) -> impl Iterator<Item = &Child> + '_ {
        self.children.iter().filter(|c| !c.is_adult())
    }

    pub fn assessable_ages(&self) -> Vec<u8> {
        self.assessable_children().map(|c| c.age).collect()
    }

    pub fn has_other_cases(&self) -> bool {
        self.parents.iter().any(|p| !p.other_case_children.is_empty())
    }
}
