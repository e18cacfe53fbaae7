//! Travel comparison between the parse-order and optimized timelines.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How much shorter the optimized travel is than the original.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reduction {
    /// `original - optimized`, always positive.
    pub distance: f64,
    /// `round(100 * distance / original)`; `None` when the original
    /// distance is not positive.
    pub percent: Option<i64>,
}

/// Final travel totals of both timelines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Total pen-up travel of the parse order.
    pub original_distance: f64,
    /// Total pen-up travel of the optimized order.
    pub optimized_distance: f64,
    /// Present only when the optimized travel is strictly shorter.
    pub reduction: Option<Reduction>,
}

/// Compare the finished travel totals of both timelines.
///
/// A reduction is reported only when it is positive; an optimized order
/// that is no better is reported plainly, never as a negative saving.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn compare(original_distance: f64, optimized_distance: f64) -> ComparisonSummary {
    let diff = original_distance - optimized_distance;
    let reduction = (diff > 0.0).then(|| Reduction {
        distance: diff,
        percent: (original_distance > 0.0)
            .then(|| (100.0 * diff / original_distance).round() as i64),
    });

    ComparisonSummary {
        original_distance,
        optimized_distance,
        reduction,
    }
}

impl fmt::Display for ComparisonSummary {
    /// Renders the optimized distance, followed by the saving when one
    /// exists, e.g. `82px (-56px, -41%)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}px", self.optimized_distance.round())?;
        if let Some(reduction) = self.reduction {
            write!(f, " (-{:.0}px", reduction.distance.round())?;
            if let Some(percent) = reduction.percent {
                write!(f, ", -{percent}%")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
