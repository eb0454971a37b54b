use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Percent;

/// A parent must have at least this much (rounded) care of a child to
/// receive child support for that child.
pub const RECEIVING_CARE_THRESHOLD: Decimal = dec!(35);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareBand {
    /// 0-13%
    BelowRegularCare,
    /// 14-34%
    RegularCare,
    /// 35-65%
    SharedCare,
    /// 66-86%
    PrimaryCare,
    /// 87-100%
    AbovePrimaryCare,
}

impl CareBand {
    pub fn from_rounded(care: Percent) -> CareBand {
        if care <= dec!(13) {
            CareBand::BelowRegularCare
        } else if care <= dec!(34) {
            CareBand::RegularCare
        } else if care <= dec!(65) {
            CareBand::SharedCare
        } else if care <= dec!(86) {
            CareBand::PrimaryCare
        } else {
            CareBand::AbovePrimaryCare
        }
    }
}

/// Care below 50% rounds down and care of 50% or more rounds up, to a
/// whole percentage.
pub fn round_care(care: Percent) -> Percent {
    if care < dec!(50) {
        care.floor()
    } else {
        care.ceil()
    }
}

/// Cost percentage for a whole-number care percentage.
pub fn cost_percentage(rounded_care: Percent) -> Percent {
    let c = rounded_care;
    if c <= dec!(13) {
        Decimal::ZERO
    } else if c <= dec!(34) {
        dec!(24)
    } else if c <= dec!(47) {
        dec!(25) + dec!(2) * (c - dec!(35))
    } else if c <= dec!(52) {
        dec!(50)
    } else if c <= dec!(65) {
        dec!(51) + dec!(2) * (c - dec!(53))
    } else if c <= dec!(86) {
        dec!(76)
    } else {
        Decimal::ONE_HUNDRED
    }
}
