//! Command-line stand-in for the customer details form

use std::path::Path;

use churn_core::{Feature, FeatureValue, RawSelections};
use clap::Args;

use crate::error::CliError;

/// Customer details; anything left out takes its default
#[derive(Debug, Clone, Default, Args)]
pub struct FormArgs {
    /// Senior Citizen (No, Yes)
    #[arg(long)]
    pub senior_citizen: Option<String>,
    /// Partner (Yes, No)
    #[arg(long)]
    pub partner: Option<String>,
    /// Dependents (No, Yes)
    #[arg(long)]
    pub dependents: Option<String>,
    /// Total tenure in months
    #[arg(long, allow_negative_numbers = true)]
    pub tenure_months: Option<f64>,
    /// Multiple Lines (No, Yes, No phone service)
    #[arg(long)]
    pub multiple_lines: Option<String>,
    /// Internet Service (Fiber optic, No, DSL)
    #[arg(long)]
    pub internet_service: Option<String>,
    /// Online Security (No, No internet service, Yes)
    #[arg(long)]
    pub online_security: Option<String>,
    /// Online Backup (No, No internet service, Yes)
    #[arg(long)]
    pub online_backup: Option<String>,
    /// Device Protection (Yes, No internet service, No)
    #[arg(long)]
    pub device_protection: Option<String>,
    /// Tech Support (Yes, No internet service, No)
    #[arg(long)]
    pub tech_support: Option<String>,
    /// Streaming TV (Yes, No internet service, No)
    #[arg(long)]
    pub streaming_tv: Option<String>,
    /// Streaming Movies (Yes, No internet service, No)
    #[arg(long)]
    pub streaming_movies: Option<String>,
    /// Current contract period (Two year, One year, Month-to-month)
    #[arg(long)]
    pub contract: Option<String>,
    /// Paperless Billing (Yes, No)
    #[arg(long)]
    pub paperless_billing: Option<String>,
    /// Payment Method (Credit card (automatic), Mailed check,
    /// Bank transfer (automatic), Electronic check)
    #[arg(long)]
    pub payment_method: Option<String>,
    /// Monthly charges
    #[arg(long, allow_negative_numbers = true)]
    pub monthly_charges: Option<f64>,
    /// Total charges
    #[arg(long, allow_negative_numbers = true)]
    pub total_charges: Option<f64>,
    /// Customer lifetime value
    #[arg(long, allow_negative_numbers = true)]
    pub cltv: Option<f64>,
}

impl FormArgs {
    /// Selections for every flag that was given
    pub fn to_selections(&self) -> RawSelections {
        let categorical = [
            (Feature::SeniorCitizen, &self.senior_citizen),
            (Feature::Partner, &self.partner),
            (Feature::Dependents, &self.dependents),
            (Feature::MultipleLines, &self.multiple_lines),
            (Feature::InternetService, &self.internet_service),
            (Feature::OnlineSecurity, &self.online_security),
            (Feature::OnlineBackup, &self.online_backup),
            (Feature::DeviceProtection, &self.device_protection),
            (Feature::TechSupport, &self.tech_support),
            (Feature::StreamingTv, &self.streaming_tv),
            (Feature::StreamingMovies, &self.streaming_movies),
            (Feature::Contract, &self.contract),
            (Feature::PaperlessBilling, &self.paperless_billing),
            (Feature::PaymentMethod, &self.payment_method),
        ];
        let numeric = [
            (Feature::TenureMonths, self.tenure_months),
            (Feature::MonthlyCharges, self.monthly_charges),
            (Feature::TotalCharges, self.total_charges),
            (Feature::Cltv, self.cltv),
        ];

        let mut selections = RawSelections::new();
        for (feature, value) in categorical {
            if let Some(value) = value {
                selections.set(feature, value.as_str());
            }
        }
        for (feature, value) in numeric {
            if let Some(value) = value {
                selections.set(feature, FeatureValue::Numeric(value));
            }
        }
        selections
    }
}

/// Read selections from a JSON document keyed by feature name
pub fn read_selections(path: &Path) -> Result<RawSelections, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::InputFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Selections from an optional input file, overridden by any flags
pub fn collect_selections(input: Option<&Path>, form: &FormArgs) -> Result<RawSelections, CliError> {
    let mut selections = match input {
        Some(path) => read_selections(path)?,
        None => RawSelections::new(),
    };
    selections.merge(form.to_selections());
    Ok(selections)
}
