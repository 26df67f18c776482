//! # Salesight Insights
//!
//! Fixed-threshold rules over a `SalesSummary`. Each rule is independent of the
//! others and of evaluation order; a rule emits an `Insight` only when its
//! condition holds. Thresholds come from `configuration::InsightThresholds`.

use analytics::SalesSummary;
use configuration::InsightThresholds;
use core_types::Severity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsightRule {
    RevenueConcentration,
    PortfolioRisk,
    MarginHealth,
    ValueDestruction,
}

impl fmt::Display for InsightRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InsightRule::RevenueConcentration => "revenue concentration",
            InsightRule::PortfolioRisk => "portfolio risk",
            InsightRule::MarginHealth => "margin health",
            InsightRule::ValueDestruction => "value destruction",
        };
        f.write_str(label)
    }
}

/// A generated observation about the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub rule: InsightRule,
    pub severity: Severity,
    pub message: String,
    pub observed: Decimal,
    pub threshold: Decimal,
}

/// The four figures the rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightInputs {
    pub line_count: usize,
    pub top_concentration_pct: Decimal,
    pub portfolio_risk_pct: Decimal,
    pub margin_pct: Decimal,
    pub negative_impact: Decimal,
}

impl From<&SalesSummary> for InsightInputs {
    fn from(summary: &SalesSummary) -> Self {
        Self {
            line_count: summary.line_count,
            top_concentration_pct: summary.top_concentration_pct,
            portfolio_risk_pct: summary.portfolio_risk_pct,
            margin_pct: summary.profitability_pct,
            negative_impact: summary.negative_impact,
        }
    }
}

pub struct InsightGenerator {
    thresholds: InsightThresholds,
}

impl InsightGenerator {
    pub fn new(thresholds: InsightThresholds) -> Self {
        Self { thresholds }
    }

    /// Runs every rule, including over an empty dataset: its zero margin is
    /// still below the margin floor.
    pub fn evaluate(&self, inputs: &InsightInputs) -> Vec<Insight> {
        let insights: Vec<Insight> = [
            self.revenue_concentration(inputs),
            self.portfolio_risk(inputs),
            self.margin_health(inputs),
            self.value_destruction(inputs),
        ]
        .into_iter()
        .flatten()
        .collect();

        tracing::debug!(
            lines = inputs.line_count,
            raised = insights.len(),
            "Insight rules evaluated."
        );
        for insight in &insights {
            match insight.severity {
                Severity::Critical => tracing::warn!(
                    rule = %insight.rule,
                    observed = %insight.observed,
                    "CRITICAL insight raised."
                ),
                Severity::Warning => tracing::info!(
                    rule = %insight.rule,
                    observed = %insight.observed,
                    "Insight raised."
                ),
            }
        }
        insights
    }

    pub fn evaluate_summary(&self, summary: &SalesSummary) -> Vec<Insight> {
        self.evaluate(&InsightInputs::from(summary))
    }

    fn revenue_concentration(&self, inputs: &InsightInputs) -> Option<Insight> {
        let threshold = self.thresholds.max_concentration_pct;
        (inputs.top_concentration_pct > threshold).then(|| Insight {
            rule: InsightRule::RevenueConcentration,
            severity: Severity::Warning,
            message: format!(
                "High revenue concentration in the top {} products. Structural risk is elevated.",
                self.thresholds.concentration_top_n
            ),
            observed: inputs.top_concentration_pct,
            threshold,
        })
    }

    fn portfolio_risk(&self, inputs: &InsightInputs) -> Option<Insight> {
        let threshold = self.thresholds.max_portfolio_risk_pct;
        (inputs.portfolio_risk_pct > threshold).then(|| Insight {
            rule: InsightRule::PortfolioRisk,
            severity: Severity::Warning,
            message: "High share of products sold at a loss. Review pricing.".to_string(),
            observed: inputs.portfolio_risk_pct,
            threshold,
        })
    }

    fn margin_health(&self, inputs: &InsightInputs) -> Option<Insight> {
        let threshold = self.thresholds.min_margin_pct;
        (inputs.margin_pct < threshold).then(|| Insight {
            rule: InsightRule::MarginHealth,
            severity: Severity::Warning,
            message: format!(
                "Overall margin below {}%. The cost structure may be under pressure.",
                threshold.normalize()
            ),
            observed: inputs.margin_pct,
            threshold,
        })
    }

    fn value_destruction(&self, inputs: &InsightInputs) -> Option<Insight> {
        let threshold = self.thresholds.value_destruction_floor;
        (inputs.negative_impact < threshold).then(|| Insight {
            rule: InsightRule::ValueDestruction,
            severity: Severity::Critical,
            message: "Significant value destruction in the portfolio.".to_string(),
            observed: inputs.negative_impact,
            threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn generator() -> InsightGenerator {
        InsightGenerator::new(InsightThresholds::default())
    }

    fn healthy() -> InsightInputs {
        InsightInputs {
            line_count: 10,
            top_concentration_pct: dec!(30),
            portfolio_risk_pct: dec!(5),
            margin_pct: dec!(25),
            negative_impact: Decimal::ZERO,
        }
    }

    fn rules(insights: &[Insight]) -> Vec<InsightRule> {
        insights.iter().map(|i| i.rule).collect()
    }

    #[test]
    fn healthy_dataset_raises_nothing() {
        assert!(generator().evaluate(&healthy()).is_empty());
    }

    #[test]
    fn thresholds_are_strict() {
        let inputs = InsightInputs {
            top_concentration_pct: dec!(50),
            portfolio_risk_pct: dec!(20),
            margin_pct: dec!(15),
            ..healthy()
        };
        assert!(generator().evaluate(&inputs).is_empty());
    }

    #[test]
    fn each_rule_fires_independently() {
        let concentrated = InsightInputs {
            top_concentration_pct: dec!(50.01),
            ..healthy()
        };
        assert_eq!(
            rules(&generator().evaluate(&concentrated)),
            vec![InsightRule::RevenueConcentration]
        );

        let risky = InsightInputs {
            portfolio_risk_pct: dec!(21),
            ..healthy()
        };
        assert_eq!(rules(&generator().evaluate(&risky)), vec![InsightRule::PortfolioRisk]);

        let thin = InsightInputs {
            margin_pct: dec!(14.9),
            ..healthy()
        };
        let insights = generator().evaluate(&thin);
        assert_eq!(rules(&insights), vec![InsightRule::MarginHealth]);
        assert_eq!(insights[0].threshold, dec!(15));
        assert!(insights[0].message.contains("15%"));
    }

    #[test]
    fn value_destruction_is_critical() {
        let inputs = InsightInputs {
            negative_impact: dec!(-0.01),
            ..healthy()
        };
        let insights = generator().evaluate(&inputs);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Critical);
        assert_eq!(insights[0].observed, dec!(-0.01));
    }

    #[test]
    fn all_rules_can_fire_together() {
        let inputs = InsightInputs {
            line_count: 3,
            top_concentration_pct: dec!(90),
            portfolio_risk_pct: dec!(60),
            margin_pct: dec!(-4),
            negative_impact: dec!(-120),
        };
        assert_eq!(generator().evaluate(&inputs).len(), 4);
    }

    #[test]
    fn empty_dataset_still_fails_the_margin_floor() {
        let summary = SalesSummary::new(5);
        let insights = generator().evaluate_summary(&summary);
        assert_eq!(rules(&insights), vec![InsightRule::MarginHealth]);
        assert_eq!(insights[0].observed, Decimal::ZERO);
        assert_eq!(insights[0].severity, Severity::Warning);
    }
}
