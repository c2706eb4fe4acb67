use super::policy::ScoreCategory;
use super::rules::ScoreComponents;
use super::ScoreResult;
use serde::{Deserialize, Serialize};

const PAYMENT_HISTORY_TARGET: u8 = 80;
const UTILIZATION_TARGET: u8 = 80;
const CREDIT_AGE_TARGET: u8 = 70;
const ACTIVITY_TARGET: u8 = 80;
const PATTERNS_TARGET: u8 = 80;
const GENERAL_ADVICE_BELOW: u16 = 700;

/// Human-facing reading of a [`ScoreResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreInsights {
    pub category: ScoreCategory,
    pub message: String,
    pub suggestions: Vec<String>,
}

pub(crate) fn generate_insights(result: &ScoreResult) -> ScoreInsights {
    ScoreInsights {
        category: result.category,
        message: band_message(result.category).to_string(),
        suggestions: improvement_suggestions(result.score, &result.components),
    }
}

fn band_message(category: ScoreCategory) -> &'static str {
    match category {
        ScoreCategory::Excellent => {
            "Excellent trust score. You qualify for the best loan rates."
        }
        ScoreCategory::VeryGood => {
            "Very good trust score. You qualify for favorable loan terms."
        }
        ScoreCategory::Good => "Good trust score. Most lenders will approve your applications.",
        ScoreCategory::Fair => "Fair trust score. Expect higher interest rates.",
        ScoreCategory::Poor => "Your trust score needs improvement. Start with the suggestions below.",
    }
}

/// One suggestion per component below its target, plus general advice for
/// scores under 700. Never empty.
pub fn improvement_suggestions(score: u16, components: &ScoreComponents) -> Vec<String> {
    let checks = [
        (
            components.payment_history < PAYMENT_HISTORY_TARGET,
            "Complete payments successfully to raise your payment history score.",
        ),
        (
            components.credit_utilization < UTILIZATION_TARGET,
            "Keep monthly spending well below monthly income to lower utilization.",
        ),
        (
            components.credit_age < CREDIT_AGE_TARGET,
            "Keep your payment accounts active over time to build history length.",
        ),
        (
            components.upi_activity < ACTIVITY_TARGET,
            "Use UPI regularly to show consistent activity.",
        ),
        (
            components.transaction_patterns < PATTERNS_TARGET,
            "Keep transaction amounts and timing consistent and avoid sudden large withdrawals.",
        ),
    ];

    let mut suggestions: Vec<String> = checks
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, text)| text.to_string())
        .collect();

    if score < GENERAL_ADVICE_BELOW {
        suggestions.push("Pay down existing debts to improve your overall trust score.".to_string());
        suggestions
            .push("Avoid applying for several new loans in a short period.".to_string());
    }

    if suggestions.is_empty() {
        suggestions.push(
            "Your score is in good shape. Keep up your current financial habits.".to_string(),
        );
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_components() -> ScoreComponents {
        ScoreComponents {
            payment_history: 100,
            credit_utilization: 90,
            credit_age: 75,
            upi_activity: 85,
            transaction_patterns: 80,
        }
    }

    #[test]
    fn strong_profile_gets_positive_default() {
        let suggestions = improvement_suggestions(820, &strong_components());
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("good shape"));
    }

    #[test]
    fn each_weak_component_adds_one_suggestion() {
        let mut components = strong_components();
        components.credit_age = 69;
        components.upi_activity = 10;
        let suggestions = improvement_suggestions(760, &components);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].contains("history length"));
        assert!(suggestions[1].contains("UPI"));
    }

    #[test]
    fn low_scores_add_general_advice() {
        let suggestions = improvement_suggestions(699, &strong_components());
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.iter().all(|text| !text.contains("good shape")));

        let floor = improvement_suggestions(300, &ScoreComponents::default());
        assert_eq!(floor.len(), 7);
    }

    #[test]
    fn every_band_has_a_message() {
        for score in [300, 580, 670, 740, 800] {
            assert!(!band_message(ScoreCategory::from_score(score)).is_empty());
        }
    }
}
