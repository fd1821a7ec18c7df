//! Billing cycle anchors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CalculationError;

/// Start and end day-of-month per cycle id. `None` is the last day of the month.
const CYCLE_ANCHORS: [(u32, Option<u32>); 6] = [
    (1, None),
    (6, Some(5)),
    (11, Some(10)),
    (16, Some(15)),
    (21, Some(20)),
    (26, Some(25)),
];

/// One of the six monthly billing cycles.
///
/// Cycle 1 runs from the 1st to the end of the month. Cycles 2-6 start on a
/// fixed day and end the day before it in the following month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BillingCycle(u32);

impl BillingCycle {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 6;

    pub fn id(&self) -> u32 {
        self.0
    }

    /// Day of month a period starts on.
    pub fn start_day(&self) -> u32 {
        self.anchors().0
    }

    /// Day of the following month a period ends on, or `None` for month end.
    pub fn end_day(&self) -> Option<u32> {
        self.anchors().1
    }

    /// Whether periods follow calendar months.
    pub fn is_calendar_month(&self) -> bool {
        self.end_day().is_none()
    }

    fn anchors(&self) -> (u32, Option<u32>) {
        CYCLE_ANCHORS[(self.0 - Self::MIN) as usize]
    }
}

impl TryFrom<u32> for BillingCycle {
    type Error = CalculationError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&id) {
            Ok(Self(id))
        } else {
            Err(CalculationError::UnknownBillingCycle(id))
        }
    }
}

impl From<BillingCycle> for u32 {
    fn from(cycle: BillingCycle) -> Self {
        cycle.0
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end_day() {
            Some(end) => write!(f, "cycle {} (day {} to day {})", self.0, self.start_day(), end),
            None => write!(f, "cycle {} (day 1 to month end)", self.0),
        }
    }
}
