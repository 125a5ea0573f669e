//! The one-line insight shown on the dashboard.

use serde::Serialize;

use crate::{amount::Amount, currency::format_currency};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Warning,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub message: String,
    pub tone: Tone,
}

impl Insight {
    fn new(tone: Tone, message: String) -> Self {
        Self { message, tone }
    }
}

/// The figures an [Insight] is derived from.
#[derive(Debug, Clone, Copy)]
pub struct InsightInput<'a> {
    pub income: Amount,
    pub expense: Amount,
    pub savings_rate: f64,
    /// The name of the expense category with the most spending.
    pub top_category: Option<&'a str>,
    pub currency: &'a str,
}

/// Pick the insight for the period. The first matching rule wins.
pub fn generate_insight(input: InsightInput) -> Insight {
    let InsightInput {
        income,
        expense,
        savings_rate,
        top_category,
        currency,
    } = input;
    let rounded_rate = savings_rate.round();

    if income == 0 && expense > 0 {
        return Insight::new(
            Tone::Warning,
            format!(
                "You've spent {} with no income recorded this month.",
                format_currency(expense, currency)
            ),
        );
    }

    if income == 0 && expense == 0 {
        return Insight::new(
            Tone::Neutral,
            "No transactions recorded this month. Start tracking to see insights.".to_owned(),
        );
    }

    if savings_rate < 0.0 {
        return Insight::new(
            Tone::Warning,
            format!(
                "Spending exceeds income by {}. Consider reducing expenses.",
                format_currency(expense - income, currency)
            ),
        );
    }

    if savings_rate >= 30.0 {
        return Insight::new(
            Tone::Positive,
            format!("Excellent! You're saving {rounded_rate}% of your income this month."),
        );
    }

    if savings_rate >= 20.0 {
        let message = match top_category {
            Some(top) => {
                format!("Good progress! {rounded_rate}% savings rate. {top} is your top expense.")
            }
            None => format!("Good progress! {rounded_rate}% savings rate."),
        };
        return Insight::new(Tone::Positive, message);
    }

    match top_category {
        Some(top) => Insight::new(
            Tone::Neutral,
            format!("{top} is your biggest expense category this month."),
        ),
        None => Insight::new(
            Tone::Neutral,
            "Track more transactions to unlock detailed insights.".to_owned(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{Insight, InsightInput, Tone, generate_insight};

    fn input(income: i64, expense: i64, top_category: Option<&str>) -> InsightInput<'_> {
        let savings_rate = if income > 0 {
            (income - expense) as f64 / income as f64 * 100.0
        } else {
            0.0
        };

        InsightInput {
            income,
            expense,
            savings_rate,
            top_category,
            currency: "USD",
        }
    }

    #[test]
    fn spending_without_income_is_a_warning() {
        assert_eq!(
            generate_insight(input(0, 1_500, Some("Food"))),
            Insight {
                message: "You've spent $1,500 with no income recorded this month.".to_owned(),
                tone: Tone::Warning,
            }
        );
    }

    #[test]
    fn nothing_recorded_is_neutral() {
        let insight = generate_insight(input(0, 0, None));

        assert_eq!(insight.tone, Tone::Neutral);
        assert_eq!(
            insight.message,
            "No transactions recorded this month. Start tracking to see insights."
        );
    }

    #[test]
    fn overspending_reports_the_difference() {
        let insight = generate_insight(input(1_000, 1_250, Some("Rent")));

        assert_eq!(insight.tone, Tone::Warning);
        assert_eq!(
            insight.message,
            "Spending exceeds income by $250. Consider reducing expenses."
        );
    }

    #[test]
    fn high_savings_rate_is_excellent() {
        let insight = generate_insight(input(1_000, 600, Some("Food")));

        assert_eq!(insight.tone, Tone::Positive);
        assert_eq!(
            insight.message,
            "Excellent! You're saving 40% of your income this month."
        );
    }

    #[test]
    fn good_savings_rate_mentions_top_category() {
        let insight = generate_insight(input(1_000, 750, Some("Food")));

        assert_eq!(insight.tone, Tone::Positive);
        assert_eq!(
            insight.message,
            "Good progress! 25% savings rate. Food is your top expense."
        );
    }

    #[test]
    fn low_savings_rate_names_biggest_category() {
        let insight = generate_insight(input(1_000, 900, Some("Rent")));

        assert_eq!(
            insight,
            Insight {
                message: "Rent is your biggest expense category this month.".to_owned(),
                tone: Tone::Neutral,
            }
        );
    }

    #[test]
    fn low_savings_rate_without_expenses_by_category() {
        let insight = generate_insight(input(1_000, 900, None));

        assert_eq!(
            insight.message,
            "Track more transactions to unlock detailed insights."
        );
    }
}
