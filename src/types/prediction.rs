//! Churn prediction labels

use std::fmt;

/// Display string for a churn-positive prediction
pub const CHURN_MESSAGE: &str = "Customer will churn";

/// Display string for a churn-negative prediction
pub const NO_CHURN_MESSAGE: &str = "Customer will not churn";

/// Binary churn classification as returned by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChurnLabel {
    /// Class 0
    WillNotChurn,
    /// Class 1
    WillChurn,
}

impl ChurnLabel {
    /// Map a raw class label to a churn label.
    ///
    /// Only 0 and 1 are valid; anything else yields `None`.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(ChurnLabel::WillNotChurn),
            1 => Some(ChurnLabel::WillChurn),
            _ => None,
        }
    }

    /// Raw class label (0 or 1)
    pub fn class(self) -> u8 {
        match self {
            ChurnLabel::WillNotChurn => 0,
            ChurnLabel::WillChurn => 1,
        }
    }

    pub fn is_churn(self) -> bool {
        self == ChurnLabel::WillChurn
    }

    /// Human-readable display string
    pub fn message(self) -> &'static str {
        match self {
            ChurnLabel::WillChurn => CHURN_MESSAGE,
            ChurnLabel::WillNotChurn => NO_CHURN_MESSAGE,
        }
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
