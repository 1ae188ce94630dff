//! Terminal page: dashboard section, prediction form and error banners

use crate::app::App;
use crate::error::{ArtifactUnavailable, PredictError};
use crate::feature_extractor::{ChurnInput, YesNo};
use crate::form::{FieldSpec, InferenceForm, PredictionOutcome};
use anyhow::{Context, Result};
use dialoguer::console::{style, Emoji};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

pub const TITLE: &str = "DropAlert - Telecom Churn Predictor";

static ALERT: Emoji<'_, '_> = Emoji("🚨 ", "");
static DASHBOARD: Emoji<'_, '_> = Emoji("📊 ", "");
static PREDICT: Emoji<'_, '_> = Emoji("🔍 ", "");
static CHURN: Emoji<'_, '_> = Emoji("❌ ", "");
static NO_CHURN: Emoji<'_, '_> = Emoji("✅ ", "");

const YES_NO: [&str; 2] = ["Yes", "No"];

pub fn print_title() {
    println!("\n{}{}\n", ALERT, style(TITLE).bold());
}

fn print_section(emoji: &Emoji<'_, '_>, title: &str) {
    println!("{}{}", emoji, style(title).bold().underlined());
}

/// Visible error state for a page section whose artifact is missing
pub fn error_banner(section: &str, error: &ArtifactUnavailable) -> String {
    format!("{} unavailable: {}", section, error)
}

fn print_banner(message: &str) {
    println!("{}{}", ALERT, style(message).red().bold());
}

/// Render the dashboard section, or its error banner
pub fn print_dashboard(app: &App) {
    print_section(&DASHBOARD, "Churn Insights Dashboard");
    match app.dashboard() {
        Ok(dashboard) => println!("{}", dashboard),
        Err(e) => print_banner(&error_banner("Dashboard", e)),
    }
}

pub fn print_outcome(outcome: &PredictionOutcome) {
    if outcome.label.is_churn() {
        println!("{}{}", CHURN, style(outcome.message()).red().bold());
    } else {
        println!("{}{}", NO_CHURN, style(outcome.message()).green().bold());
    }
}

fn print_predict_error(error: &PredictError) {
    match error {
        PredictError::ModelUnavailable(e) => print_banner(&error_banner("Prediction", e)),
        other => print_banner(&other.to_string()),
    }
}

/// One non-interactive prediction. Returns whether a label was produced.
pub fn predict_once(app: &App, input: &ChurnInput) -> bool {
    print_section(&PREDICT, "Predict Churn");
    match app.predict(input) {
        Ok(outcome) => {
            print_outcome(&outcome);
            true
        }
        Err(e) => {
            print_predict_error(&e);
            false
        }
    }
}

fn spec<'a>(form: &'a InferenceForm, name: &str) -> Result<&'a FieldSpec> {
    form.field(name)
        .with_context(|| format!("form has no field named {}", name))
}

fn prompt_integer(theme: &ColorfulTheme, spec: &FieldSpec, default: u32) -> Result<u32> {
    let bounds = spec.clone();
    let value = Input::<u32>::with_theme(theme)
        .with_prompt(spec.label)
        .default(default)
        .validate_with(move |value: &u32| bounds.check(*value as f64).map_err(|e| e.to_string()))
        .interact_text()?;
    Ok(value)
}

fn prompt_decimal(theme: &ColorfulTheme, spec: &FieldSpec, default: f64) -> Result<f64> {
    let bounds = spec.clone();
    let value = Input::<f64>::with_theme(theme)
        .with_prompt(spec.label)
        .default(default)
        .validate_with(move |value: &f64| bounds.check(*value).map_err(|e| e.to_string()))
        .interact_text()?;
    Ok(value)
}

fn prompt_flag(theme: &ColorfulTheme, spec: &FieldSpec, default: YesNo) -> Result<YesNo> {
    let selection = Select::with_theme(theme)
        .with_prompt(spec.label)
        .items(&YES_NO[..])
        .default(if default == YesNo::Yes { 0 } else { 1 })
        .interact()?;
    YES_NO[selection].parse().map_err(Into::into)
}

/// Ask for all ten fields, in model input order
pub fn prompt_input(form: &InferenceForm) -> Result<ChurnInput> {
    let theme = ColorfulTheme::default();
    let defaults = ChurnInput::default();

    Ok(ChurnInput {
        account_weeks: prompt_integer(&theme, spec(form, "AccountWeeks")?, defaults.account_weeks)?,
        contract_renewal: prompt_flag(
            &theme,
            spec(form, "ContractRenewal")?,
            defaults.contract_renewal,
        )?,
        data_plan: prompt_flag(&theme, spec(form, "DataPlan")?, defaults.data_plan)?,
        data_usage: prompt_decimal(&theme, spec(form, "DataUsage")?, defaults.data_usage)?,
        cust_serv_calls: prompt_integer(
            &theme,
            spec(form, "CustServCalls")?,
            defaults.cust_serv_calls,
        )?,
        day_mins: prompt_decimal(&theme, spec(form, "DayMins")?, defaults.day_mins)?,
        day_calls: prompt_integer(&theme, spec(form, "DayCalls")?, defaults.day_calls)?,
        monthly_charge: prompt_decimal(
            &theme,
            spec(form, "MonthlyCharge")?,
            defaults.monthly_charge,
        )?,
        overage_fee: prompt_decimal(&theme, spec(form, "OverageFee")?, defaults.overage_fee)?,
        roam_mins: prompt_decimal(&theme, spec(form, "RoamMins")?, defaults.roam_mins)?,
    })
}

/// Interactive prediction form, repeated until the user stops
pub fn run_form(app: &App) -> Result<()> {
    print_section(&PREDICT, "Predict Churn");

    if let Err(e) = app.model() {
        print_banner(&error_banner("Prediction", e));
        return Ok(());
    }

    loop {
        let input = prompt_input(app.form())?;
        match app.predict(&input) {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => print_predict_error(&e),
        }

        let again = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Predict another customer?")
            .default(false)
            .interact()?;
        if !again {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArtifactKind;

    #[test]
    fn test_error_banner_names_section_and_path() {
        let err = ArtifactUnavailable::missing(ArtifactKind::Model, "artifacts/rf_model.onnx");
        assert_eq!(
            error_banner("Prediction", &err),
            "Prediction unavailable: model artifact not found at artifacts/rf_model.onnx"
        );
    }

    #[test]
    fn test_every_field_has_a_prompt_spec() {
        let form = InferenceForm::new();
        for name in crate::feature_extractor::FEATURE_NAMES {
            assert!(spec(&form, name).is_ok(), "missing spec for {name}");
        }
    }
}
