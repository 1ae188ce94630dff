//! Feature assembly for churn model inference.
//!
//! The classifier was trained on the telecom churn dataset columns in the
//! order listed by [`FEATURE_NAMES`]. Every vector handed to the model is
//! assembled in exactly that order.

use crate::error::FormError;
use std::fmt;
use std::str::FromStr;

/// Number of model input features
pub const FEATURE_COUNT: usize = 10;

/// Training column names, in model input order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "AccountWeeks",
    "ContractRenewal",
    "DataPlan",
    "DataUsage",
    "CustServCalls",
    "DayMins",
    "DayCalls",
    "MonthlyCharge",
    "OverageFee",
    "RoamMins",
];

/// Yes/No selection encoded as a 0/1 flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YesNo {
    #[default]
    Yes,
    No,
}

impl YesNo {
    pub fn flag(self) -> u8 {
        match self {
            YesNo::Yes => 1,
            YesNo::No => 0,
        }
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

impl FromStr for YesNo {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(YesNo::Yes),
            "no" => Ok(YesNo::No),
            _ => Err(FormError::InvalidYesNo(s.to_string())),
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YesNo::Yes => f.write_str("Yes"),
            YesNo::No => f.write_str("No"),
        }
    }
}

/// One customer's form submission
#[derive(Debug, Clone, PartialEq)]
pub struct ChurnInput {
    pub account_weeks: u32,
    pub contract_renewal: YesNo,
    pub data_plan: YesNo,
    /// GB
    pub data_usage: f64,
    pub cust_serv_calls: u32,
    pub day_mins: f64,
    pub day_calls: u32,
    pub monthly_charge: f64,
    pub overage_fee: f64,
    pub roam_mins: f64,
}

impl ChurnInput {
    /// Field values paired with their feature names, in model input order
    pub fn named_values(&self) -> [(&'static str, f64); FEATURE_COUNT] {
        [
            (FEATURE_NAMES[0], self.account_weeks as f64),
            (FEATURE_NAMES[1], self.contract_renewal.flag() as f64),
            (FEATURE_NAMES[2], self.data_plan.flag() as f64),
            (FEATURE_NAMES[3], self.data_usage),
            (FEATURE_NAMES[4], self.cust_serv_calls as f64),
            (FEATURE_NAMES[5], self.day_mins),
            (FEATURE_NAMES[6], self.day_calls as f64),
            (FEATURE_NAMES[7], self.monthly_charge),
            (FEATURE_NAMES[8], self.overage_fee),
            (FEATURE_NAMES[9], self.roam_mins),
        ]
    }
}

impl Default for ChurnInput {
    /// Starting values of the prediction form
    fn default() -> Self {
        Self {
            account_weeks: 100,
            contract_renewal: YesNo::Yes,
            data_plan: YesNo::Yes,
            data_usage: 0.0,
            cust_serv_calls: 0,
            day_mins: 0.0,
            day_calls: 0,
            monthly_charge: 0.0,
            overage_fee: 0.0,
            roam_mins: 0.0,
        }
    }
}

/// Fixed-order model input. Always exactly [`FEATURE_COUNT`] values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChurnFeatureVector([f32; FEATURE_COUNT]);

impl ChurnFeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Values paired with their training column names
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

/// Turns form submissions into model input vectors.
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Assemble the feature vector for one submission.
    ///
    /// Values are passed through unchanged apart from the Yes/No flags,
    /// which become 1/0.
    pub fn extract(&self, input: &ChurnInput) -> ChurnFeatureVector {
        ChurnFeatureVector([
            input.account_weeks as f32,
            input.contract_renewal.flag() as f32,
            input.data_plan.flag() as f32,
            input.data_usage as f32,
            input.cust_serv_calls as f32,
            input.day_mins as f32,
            input.day_calls as f32,
            input.monthly_charge as f32,
            input.overage_fee as f32,
            input.roam_mins as f32,
        ])
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> ChurnInput {
        ChurnInput {
            account_weeks: 100,
            contract_renewal: YesNo::Yes,
            data_plan: YesNo::Yes,
            data_usage: 2.0,
            cust_serv_calls: 1,
            day_mins: 200.0,
            day_calls: 100,
            monthly_charge: 70.0,
            overage_fee: 5.0,
            roam_mins: 5.0,
        }
    }

    #[test]
    fn test_feature_extraction_order() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract(&sample_input());

        assert_eq!(features.len(), FEATURE_COUNT);
        assert_eq!(
            features.as_slice(),
            &[100.0, 1.0, 1.0, 2.0, 1.0, 200.0, 100.0, 70.0, 5.0, 5.0]
        );
    }

    #[test]
    fn test_flags_encoding() {
        let extractor = FeatureExtractor::new();
        let input = ChurnInput {
            contract_renewal: "No".parse().unwrap(),
            data_plan: "Yes".parse().unwrap(),
            ..sample_input()
        };

        let features = extractor.extract(&input);
        assert_eq!(features.as_slice()[1], 0.0);
        assert_eq!(features.as_slice()[2], 1.0);
    }

    #[test]
    fn test_yes_no_parsing() {
        assert_eq!("yes".parse::<YesNo>().unwrap(), YesNo::Yes);
        assert_eq!(" NO ".parse::<YesNo>().unwrap(), YesNo::No);
        assert!(matches!(
            "maybe".parse::<YesNo>(),
            Err(FormError::InvalidYesNo(_))
        ));
        assert_eq!(YesNo::from(false).flag(), 0);
    }

    #[test]
    fn test_named_values_match_vector() {
        let input = sample_input();
        let features = FeatureExtractor::new().extract(&input);

        for ((name, value), (vec_name, vec_value)) in
            input.named_values().iter().zip(features.named())
        {
            assert_eq!(*name, vec_name);
            assert_eq!(*value as f32, vec_value);
        }
    }

    #[test]
    fn test_default_input_matches_form_defaults() {
        let input = ChurnInput::default();
        assert_eq!(input.account_weeks, 100);
        assert_eq!(input.contract_renewal, YesNo::Yes);
        assert_eq!(input.data_usage, 0.0);
    }
}
