//! Opinion Polarity
//!
//! The ternary belief state held by every agent.
//!
//! # Example
//!
//! ```
//! use opinion_events::Opinion;
//!
//! assert_eq!(Opinion::Positive.as_i8(), 1);
//! assert_eq!(Opinion::try_from(-1), Ok(Opinion::Negative));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Belief in the circulating claim.
///
/// `Positive` means the agent currently believes the false claim, `Negative`
/// means it believes the fact, `Neutral` means undecided or uninvolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opinion {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl Opinion {
    /// All polarities, in tally order.
    pub const ALL: [Opinion; 3] = [Opinion::Positive, Opinion::Negative, Opinion::Neutral];

    /// Signed integer encoding: -1, 0 or 1.
    pub fn as_i8(self) -> i8 {
        match self {
            Opinion::Negative => -1,
            Opinion::Neutral => 0,
            Opinion::Positive => 1,
        }
    }

    /// Signed float encoding, used as the sign of a numeric payload.
    pub fn as_f64(self) -> f64 {
        f64::from(self.as_i8())
    }

    /// True for `Positive` and `Negative`.
    pub fn is_opinionated(self) -> bool {
        self != Opinion::Neutral
    }
}

/// Error returned when an integer is not one of -1, 0, 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidOpinion(pub i8);

impl fmt::Display for InvalidOpinion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid opinion value {}, expected -1, 0 or 1", self.0)
    }
}

impl std::error::Error for InvalidOpinion {}

impl TryFrom<i8> for Opinion {
    type Error = InvalidOpinion;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Opinion::Negative),
            0 => Ok(Opinion::Neutral),
            1 => Ok(Opinion::Positive),
            other => Err(InvalidOpinion(other)),
        }
    }
}

impl fmt::Display for Opinion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opinion::Negative => write!(f, "negative"),
            Opinion::Neutral => write!(f, "neutral"),
            Opinion::Positive => write!(f, "positive"),
        }
    }
}
