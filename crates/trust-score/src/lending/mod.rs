//! Loan application validation against a profile's eligibility terms, and
//! repayment quotes for accepted applications.

use crate::scoring::{monthly_emi, LoanEligibility};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_LOAN_AMOUNT: f64 = 1_000.0;
pub const MIN_TERM_MONTHS: u32 = 3;
const SUGGESTED_AMOUNT_FLOOR: f64 = 25_000.0;
const AMOUNT_ROUNDING: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanPurpose {
    #[serde(rename = "Medical Expenses")]
    Medical,
    Education,
    #[serde(rename = "Home Renovation")]
    HomeRenovation,
    #[serde(rename = "Debt Consolidation")]
    DebtConsolidation,
    Wedding,
    Travel,
    #[serde(rename = "Electronics Purchase")]
    Electronics,
    #[serde(rename = "Vehicle Purchase")]
    Vehicle,
    Business,
    Other,
}

impl LoanPurpose {
    pub const ALL: [LoanPurpose; 10] = [
        LoanPurpose::Medical,
        LoanPurpose::Education,
        LoanPurpose::HomeRenovation,
        LoanPurpose::DebtConsolidation,
        LoanPurpose::Wedding,
        LoanPurpose::Travel,
        LoanPurpose::Electronics,
        LoanPurpose::Vehicle,
        LoanPurpose::Business,
        LoanPurpose::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LoanPurpose::Medical => "Medical Expenses",
            LoanPurpose::Education => "Education",
            LoanPurpose::HomeRenovation => "Home Renovation",
            LoanPurpose::DebtConsolidation => "Debt Consolidation",
            LoanPurpose::Wedding => "Wedding",
            LoanPurpose::Travel => "Travel",
            LoanPurpose::Electronics => "Electronics Purchase",
            LoanPurpose::Vehicle => "Vehicle Purchase",
            LoanPurpose::Business => "Business",
            LoanPurpose::Other => "Other",
        }
    }
}

impl fmt::Display for LoanPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LoanPurpose {
    type Err = LoanApplicationError;

    /// Accepts the display label or a short keyword (`medical`, `vehicle`, ...).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key: String = value
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();

        let purpose = match key.as_str() {
            "medical" | "medicalexpenses" => LoanPurpose::Medical,
            "education" => LoanPurpose::Education,
            "home" | "homerenovation" | "renovation" => LoanPurpose::HomeRenovation,
            "debt" | "debtconsolidation" => LoanPurpose::DebtConsolidation,
            "wedding" => LoanPurpose::Wedding,
            "travel" => LoanPurpose::Travel,
            "electronics" | "electronicspurchase" => LoanPurpose::Electronics,
            "vehicle" | "vehiclepurchase" => LoanPurpose::Vehicle,
            "business" => LoanPurpose::Business,
            "other" => LoanPurpose::Other,
            _ => return Err(LoanApplicationError::UnknownPurpose(value.trim().to_string())),
        };
        Ok(purpose)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub amount: f64,
    pub term_months: u32,
    #[serde(default)]
    pub purpose: Option<LoanPurpose>,
}

/// Repayment figures for a validated application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub amount: f64,
    pub term_months: u32,
    pub purpose: LoanPurpose,
    pub interest_rate: f64,
    pub monthly_emi: f64,
    pub total_repayment: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoanApplicationError {
    #[error("profile is not eligible for a loan")]
    NotEligible,
    #[error("loan amount must be between {min} and {max} (found {found})")]
    AmountOutOfRange { min: f64, max: f64, found: f64 },
    #[error("loan term must be between {min} and {max} months (found {found})")]
    TermOutOfRange { min: u32, max: u32, found: u32 },
    #[error("loan purpose is required")]
    MissingPurpose,
    #[error("unknown loan purpose `{0}`")]
    UnknownPurpose(String),
}

impl LoanApplication {
    /// Checks the application against the profile's terms, in the order an
    /// applicant would fix them: eligibility, amount, term, purpose.
    pub fn validate(&self, terms: &LoanEligibility) -> Result<LoanPurpose, LoanApplicationError> {
        if !terms.eligible || terms.max_amount < MIN_LOAN_AMOUNT {
            return Err(LoanApplicationError::NotEligible);
        }

        if !(self.amount.is_finite()
            && self.amount >= MIN_LOAN_AMOUNT
            && self.amount <= terms.max_amount)
        {
            return Err(LoanApplicationError::AmountOutOfRange {
                min: MIN_LOAN_AMOUNT,
                max: terms.max_amount,
                found: self.amount,
            });
        }

        if self.term_months < MIN_TERM_MONTHS || self.term_months > terms.max_duration_months {
            return Err(LoanApplicationError::TermOutOfRange {
                min: MIN_TERM_MONTHS,
                max: terms.max_duration_months,
                found: self.term_months,
            });
        }

        self.purpose.ok_or(LoanApplicationError::MissingPurpose)
    }

    pub fn quote(&self, terms: &LoanEligibility) -> Result<LoanQuote, LoanApplicationError> {
        let purpose = self.validate(terms)?;
        let monthly_emi = monthly_emi(self.amount, terms.interest_rate, self.term_months);
        let total_repayment = monthly_emi * f64::from(self.term_months);
        let total_interest = (total_repayment - self.amount).max(0.0);

        Ok(LoanQuote {
            amount: self.amount,
            term_months: self.term_months,
            purpose,
            interest_rate: terms.interest_rate,
            monthly_emi,
            total_repayment,
            total_interest,
        })
    }
}

/// Starting amount offered to an applicant: half the ceiling rounded down to the
/// nearest thousand, at least 25 000, never above the ceiling itself.
pub fn suggested_amount(max_amount: f64) -> f64 {
    if !(max_amount.is_finite() && max_amount > 0.0) {
        return 0.0;
    }
    let half = (max_amount * 0.5 / AMOUNT_ROUNDING).floor() * AMOUNT_ROUNDING;
    half.max(SUGGESTED_AMOUNT_FLOOR).min(max_amount)
}
