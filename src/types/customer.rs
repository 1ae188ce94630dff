//! Customer records from the telecom churn dataset

use serde::Deserialize;

/// One row of the telecom churn dataset.
///
/// Only the columns the dashboard charts need are required; the remaining
/// usage columns are carried when present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerRecord {
    /// Churn label (1 = churned, 0 = retained)
    #[serde(rename = "Churn")]
    pub churn: u8,

    /// Account tenure in weeks
    #[serde(rename = "AccountWeeks")]
    pub account_weeks: u32,

    /// Contract renewed (1) or not (0)
    #[serde(rename = "ContractRenewal", default)]
    pub contract_renewal: Option<u8>,

    /// Has a data plan (1) or not (0)
    #[serde(rename = "DataPlan", default)]
    pub data_plan: Option<u8>,

    /// Monthly data usage in GB
    #[serde(rename = "DataUsage")]
    pub data_usage: f64,

    /// Calls to customer service
    #[serde(rename = "CustServCalls")]
    pub cust_serv_calls: u32,

    /// Average daytime minutes per month
    #[serde(rename = "DayMins", default)]
    pub day_mins: Option<f64>,

    /// Average daytime calls
    #[serde(rename = "DayCalls", default)]
    pub day_calls: Option<u32>,

    /// Average monthly bill
    #[serde(rename = "MonthlyCharge")]
    pub monthly_charge: f64,

    /// Largest overage fee in the last year
    #[serde(rename = "OverageFee", default)]
    pub overage_fee: Option<f64>,

    /// Average roaming minutes
    #[serde(rename = "RoamMins", default)]
    pub roam_mins: Option<f64>,
}

impl CustomerRecord {
    /// Create a record with the chart columns set and usage columns empty
    pub fn new(
        churn: u8,
        account_weeks: u32,
        data_usage: f64,
        cust_serv_calls: u32,
        monthly_charge: f64,
    ) -> Self {
        Self {
            churn,
            account_weeks,
            contract_renewal: None,
            data_plan: None,
            data_usage,
            cust_serv_calls,
            day_mins: None,
            day_calls: None,
            monthly_charge,
            overage_fee: None,
            roam_mins: None,
        }
    }

    pub fn churned(&self) -> bool {
        self.churn == 1
    }
}
