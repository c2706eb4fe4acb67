use super::config::{ComponentWeights, LoanPolicyConfig};
use super::rules::ScoreComponents;
use serde::{Deserialize, Serialize};

pub const MIN_SCORE: u16 = 300;
pub const MAX_SCORE: u16 = 900;

/// Score band. Each band includes its lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoreCategory {
    Poor,
    Fair,
    Good,
    #[serde(rename = "Very Good")]
    VeryGood,
    Excellent,
}

impl ScoreCategory {
    pub fn from_score(score: u16) -> Self {
        match score {
            800.. => ScoreCategory::Excellent,
            740..=799 => ScoreCategory::VeryGood,
            670..=739 => ScoreCategory::Good,
            580..=669 => ScoreCategory::Fair,
            _ => ScoreCategory::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreCategory::Poor => "Poor",
            ScoreCategory::Fair => "Fair",
            ScoreCategory::Good => "Good",
            ScoreCategory::VeryGood => "Very Good",
            ScoreCategory::Excellent => "Excellent",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "poor" => Some(ScoreCategory::Poor),
            "fair" => Some(ScoreCategory::Fair),
            "good" => Some(ScoreCategory::Good),
            "very good" | "very_good" => Some(ScoreCategory::VeryGood),
            "excellent" => Some(ScoreCategory::Excellent),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Loan terms a score qualifies for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanEligibility {
    pub eligible: bool,
    pub max_amount: f64,
    pub max_duration_months: u32,
    /// Annual percentage rate.
    pub interest_rate: f64,
    pub monthly_emi: f64,
    pub disposable_income: f64,
}

/// Maps the weighted component average from `[0, 100]` onto the score range.
pub(crate) fn composite_score(components: &ScoreComponents, weights: &ComponentWeights) -> u16 {
    let weighted: f64 = components
        .as_array()
        .iter()
        .zip(weights.as_array())
        .map(|(component, weight)| f64::from(*component) * weight)
        .sum();
    clamp_score(f64::from(MIN_SCORE) + 6.0 * weighted)
}

/// Rounds and clamps into `[300, 900]`; anything non-finite lands on the floor.
pub fn clamp_score(raw: f64) -> u16 {
    if !raw.is_finite() {
        return MIN_SCORE;
    }
    raw.round()
        .clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u16
}

pub(crate) fn loan_eligibility(
    score: u16,
    disposable_income: f64,
    policy: &LoanPolicyConfig,
) -> LoanEligibility {
    let disposable_income = if disposable_income.is_finite() {
        disposable_income.max(0.0)
    } else {
        0.0
    };

    if score < policy.minimum_eligible_score {
        return LoanEligibility {
            eligible: false,
            max_amount: 0.0,
            max_duration_months: 0,
            interest_rate: policy.rate_ceiling,
            monthly_emi: 0.0,
            disposable_income,
        };
    }

    let span = f64::from(MAX_SCORE.saturating_sub(policy.minimum_eligible_score)).max(1.0);
    let position = (f64::from(score - policy.minimum_eligible_score) / span).clamp(0.0, 1.0);

    let raw_amount = policy.base_amount + position * (policy.amount_ceiling - policy.base_amount);
    let max_amount = ((raw_amount / policy.amount_step).floor() * policy.amount_step)
        .clamp(policy.base_amount.min(policy.amount_ceiling), policy.amount_ceiling);

    let raw_rate = policy.rate_ceiling - position * (policy.rate_ceiling - policy.rate_floor);
    let interest_rate = ((raw_rate * 100.0).round() / 100.0).max(policy.rate_floor);

    let max_duration_months = match ScoreCategory::from_score(score) {
        ScoreCategory::Excellent => policy.excellent_term_months,
        ScoreCategory::VeryGood => policy.very_good_term_months,
        ScoreCategory::Good => policy.good_term_months,
        ScoreCategory::Fair | ScoreCategory::Poor => policy.fair_term_months,
    };

    LoanEligibility {
        eligible: true,
        max_amount,
        max_duration_months,
        interest_rate,
        monthly_emi: monthly_emi(max_amount, interest_rate, max_duration_months),
        disposable_income,
    }
}

/// Equated monthly instalment: `P·r·(1+r)ⁿ / ((1+r)ⁿ − 1)` with `r` the monthly rate.
/// Degenerate inputs (no rate, no term, non-finite result) yield zero.
pub fn monthly_emi(principal: f64, annual_rate: f64, months: u32) -> f64 {
    let monthly_rate = annual_rate / 12.0 / 100.0;
    if !(monthly_rate > 0.0) || months == 0 || !(principal.is_finite() && principal > 0.0) {
        return 0.0;
    }

    let factor = (1.0 + monthly_rate).powf(f64::from(months));
    let emi = principal * monthly_rate * factor / (factor - 1.0);
    if emi.is_finite() {
        emi
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_boundaries_are_inclusive_on_the_lower_bound() {
        assert_eq!(ScoreCategory::from_score(900), ScoreCategory::Excellent);
        assert_eq!(ScoreCategory::from_score(800), ScoreCategory::Excellent);
        assert_eq!(ScoreCategory::from_score(799), ScoreCategory::VeryGood);
        assert_eq!(ScoreCategory::from_score(740), ScoreCategory::VeryGood);
        assert_eq!(ScoreCategory::from_score(739), ScoreCategory::Good);
        assert_eq!(ScoreCategory::from_score(670), ScoreCategory::Good);
        assert_eq!(ScoreCategory::from_score(669), ScoreCategory::Fair);
        assert_eq!(ScoreCategory::from_score(580), ScoreCategory::Fair);
        assert_eq!(ScoreCategory::from_score(579), ScoreCategory::Poor);
        assert_eq!(ScoreCategory::from_score(300), ScoreCategory::Poor);
    }

    #[test]
    fn bands_cover_every_score_without_gaps() {
        let mut previous = ScoreCategory::Poor;
        for score in MIN_SCORE..=MAX_SCORE {
            let category = ScoreCategory::from_score(score);
            assert!(category >= previous, "bands must not regress at {score}");
            previous = category;
        }
        assert_eq!(previous, ScoreCategory::Excellent);
    }

    #[test]
    fn category_labels_round_trip() {
        for category in [
            ScoreCategory::Poor,
            ScoreCategory::Fair,
            ScoreCategory::Good,
            ScoreCategory::VeryGood,
            ScoreCategory::Excellent,
        ] {
            assert_eq!(ScoreCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(
            serde_json::to_value(ScoreCategory::VeryGood).unwrap(),
            serde_json::json!("Very Good")
        );
    }

    #[test]
    fn emi_matches_closed_form() {
        let emi = monthly_emi(50_000.0, 14.0, 12);
        let r: f64 = 14.0 / 12.0 / 100.0;
        let factor = (1.0 + r).powi(12);
        let expected = 50_000.0 * r * factor / (factor - 1.0);
        assert!((emi - expected).abs() < 1e-6);
        assert!(emi > 4_400.0 && emi < 4_600.0, "emi was {emi}");
    }

    #[test]
    fn degenerate_emi_inputs_are_zero() {
        assert_eq!(monthly_emi(50_000.0, 14.0, 0), 0.0);
        assert_eq!(monthly_emi(50_000.0, 0.0, 12), 0.0);
        assert_eq!(monthly_emi(50_000.0, -3.0, 12), 0.0);
        assert_eq!(monthly_emi(50_000.0, f64::NAN, 12), 0.0);
        assert_eq!(monthly_emi(0.0, 14.0, 12), 0.0);
    }

    #[test]
    fn clamp_score_handles_out_of_range_and_nan() {
        assert_eq!(clamp_score(120.0), MIN_SCORE);
        assert_eq!(clamp_score(1_200.0), MAX_SCORE);
        assert_eq!(clamp_score(f64::NAN), MIN_SCORE);
        assert_eq!(clamp_score(f64::INFINITY), MIN_SCORE);
        assert_eq!(clamp_score(745.4), 745);
    }

    #[test]
    fn ineligible_below_minimum_score() {
        let terms = loan_eligibility(579, 2_000.0, &LoanPolicyConfig::default());
        assert!(!terms.eligible);
        assert_eq!(terms.max_amount, 0.0);
        assert_eq!(terms.max_duration_months, 0);
        assert_eq!(terms.monthly_emi, 0.0);
        assert_eq!(terms.disposable_income, 2_000.0);
    }

    #[test]
    fn terms_improve_with_score() {
        let policy = LoanPolicyConfig::default();
        let fair = loan_eligibility(580, 0.0, &policy);
        let good = loan_eligibility(700, 0.0, &policy);
        let top = loan_eligibility(900, 0.0, &policy);

        assert!(fair.eligible);
        assert_eq!(fair.max_amount, 5_000.0);
        assert_eq!(fair.interest_rate, 22.0);
        assert_eq!(fair.max_duration_months, 12);

        assert!(good.max_amount > fair.max_amount);
        assert!(good.interest_rate < fair.interest_rate);
        assert_eq!(good.max_duration_months, 24);

        assert_eq!(top.max_amount, 200_000.0);
        assert_eq!(top.interest_rate, 10.0);
        assert_eq!(top.max_duration_months, 60);
        assert!(top.monthly_emi > 0.0);
    }

    #[test]
    fn amounts_are_monotonic_across_the_eligible_range() {
        let policy = LoanPolicyConfig::default();
        let mut previous = loan_eligibility(580, 0.0, &policy);
        for score in 581..=MAX_SCORE {
            let terms = loan_eligibility(score, 0.0, &policy);
            assert!(terms.max_amount >= previous.max_amount);
            assert!(terms.interest_rate <= previous.interest_rate);
            assert!(terms.max_duration_months >= previous.max_duration_months);
            previous = terms;
        }
    }

    #[test]
    fn negative_disposable_income_is_floored() {
        let terms = loan_eligibility(700, -500.0, &LoanPolicyConfig::default());
        assert_eq!(terms.disposable_income, 0.0);
    }
}
