//! Ethical scoring.
//!
//! Every function here is pure. Missing metrics take their neutral default,
//! fractional metrics are clamped to `[0, 1]`, and the open-ended quantities
//! (CO2 emissions, water usage) are floored at zero, so every score lands in
//! `[0, 100]`.

use crate::models::{Metric, RiskLevel, ScoreSnapshot, Supplier, SupplierMetrics};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fraction at or above which a supplier is low risk.
pub const LOW_RISK_THRESHOLD: f64 = 0.8;
/// Fraction at or above which a supplier is medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.6;

const LABOR_WEIGHT: f64 = 0.25;
const ENVIRONMENTAL_WEIGHT: f64 = 0.30;
const SOCIAL_WEIGHT: f64 = 0.25;
const CO2_WEIGHT: f64 = 0.20;

/// Which composite formula produces the ethical score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFormula {
    /// Unweighted mean of ten metric contributions.
    #[default]
    EqualWeight,
    /// Labor 25%, environmental 30%, social 25%, CO2 20%, as shown on the evaluation form.
    Weighted,
}

impl ScoringFormula {
    pub fn ethical_score(self, metrics: &SupplierMetrics) -> f64 {
        match self {
            ScoringFormula::EqualWeight => ethical_score(metrics),
            ScoringFormula::Weighted => weighted_ethical_score(metrics),
        }
    }
}

impl FromStr for ScoringFormula {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "equal" | "equal_weight" | "mean" => Ok(ScoringFormula::EqualWeight),
            "weighted" => Ok(ScoringFormula::Weighted),
            other => Err(format!(
                "unknown scoring formula '{}', expected 'equal' or 'weighted'",
                other
            )),
        }
    }
}

impl fmt::Display for ScoringFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringFormula::EqualWeight => write!(f, "equal"),
            ScoringFormula::Weighted => write!(f, "weighted"),
        }
    }
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return SupplierMetrics::DEFAULT_FRACTION;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn to_score(fraction: f64) -> f64 {
    round2(fraction * 100.0)
}

/// Contribution of a fractional metric, higher is better.
fn fraction(metrics: &SupplierMetrics, metric: Metric) -> f64 {
    metrics
        .get(metric)
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(SupplierMetrics::DEFAULT_FRACTION)
}

/// Contribution of a fractional metric where lower is better.
fn inverted(metrics: &SupplierMetrics, metric: Metric) -> f64 {
    1.0 - fraction(metrics, metric)
}

/// Contribution of an open-ended quantity where lower is better: `max(0, 100 - x) / 100`.
fn headroom(metrics: &SupplierMetrics, metric: Metric) -> f64 {
    metrics
        .get(metric)
        .filter(|v| v.is_finite())
        .map(|v| (100.0 - v.max(0.0)).max(0.0) / 100.0)
        .unwrap_or(SupplierMetrics::DEFAULT_FRACTION)
}

/// CO2 contribution in `[0, 1]`.
pub fn co2_contribution(metrics: &SupplierMetrics) -> f64 {
    headroom(metrics, Metric::Co2Emissions)
}

/// Composite ethical score: the mean of ten contributions, scaled to 0-100.
pub fn ethical_score(metrics: &SupplierMetrics) -> f64 {
    let contributions = [
        co2_contribution(metrics),
        fraction(metrics, Metric::DeliveryEfficiency),
        fraction(metrics, Metric::WageFairness),
        fraction(metrics, Metric::HumanRightsIndex),
        fraction(metrics, Metric::WasteManagementScore),
        fraction(metrics, Metric::EnergyEfficiency),
        fraction(metrics, Metric::DiversityInclusionScore),
        fraction(metrics, Metric::TransparencyScore),
        inverted(metrics, Metric::CorruptionRisk),
        fraction(metrics, Metric::QualityControlScore),
    ];
    to_score(mean(&contributions))
}

/// Evaluation-form variant of the composite score.
pub fn weighted_ethical_score(metrics: &SupplierMetrics) -> f64 {
    let labor = mean(&[
        fraction(metrics, Metric::WageFairness),
        fraction(metrics, Metric::HumanRightsIndex),
    ]);
    let environmental = mean(&[
        fraction(metrics, Metric::WasteManagementScore),
        fraction(metrics, Metric::EnergyEfficiency),
        headroom(metrics, Metric::WaterUsage),
    ]);
    let social = mean(&[
        fraction(metrics, Metric::DiversityInclusionScore),
        fraction(metrics, Metric::CommunityEngagement),
    ]);
    let co2 = co2_contribution(metrics);

    to_score(
        labor * LABOR_WEIGHT
            + environmental * ENVIRONMENTAL_WEIGHT
            + social * SOCIAL_WEIGHT
            + co2 * CO2_WEIGHT,
    )
}

pub fn environmental_score(metrics: &SupplierMetrics) -> f64 {
    to_score(mean(&[
        co2_contribution(metrics),
        fraction(metrics, Metric::WasteManagementScore),
        fraction(metrics, Metric::EnergyEfficiency),
        headroom(metrics, Metric::WaterUsage),
    ]))
}

pub fn social_score(metrics: &SupplierMetrics) -> f64 {
    to_score(mean(&[
        fraction(metrics, Metric::WageFairness),
        fraction(metrics, Metric::HumanRightsIndex),
        fraction(metrics, Metric::DiversityInclusionScore),
        fraction(metrics, Metric::CommunityEngagement),
    ]))
}

pub fn governance_score(metrics: &SupplierMetrics) -> f64 {
    to_score(mean(&[
        fraction(metrics, Metric::TransparencyScore),
        inverted(metrics, Metric::CorruptionRisk),
    ]))
}

/// Risk bucket for a composite score expressed as a fraction in `[0, 1]`.
///
/// Both thresholds are inclusive lower bounds.
pub fn risk_level(score_fraction: f64) -> RiskLevel {
    if score_fraction >= LOW_RISK_THRESHOLD {
        RiskLevel::Low
    } else if score_fraction >= MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Risk bucket for a 0-100 ethical score.
pub fn risk_level_for_score(score: f64) -> RiskLevel {
    risk_level(score / 100.0)
}

/// Every derived score for one metric set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub ethical: f64,
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
    pub risk_level: RiskLevel,
}

impl ScoreCard {
    pub fn compute(metrics: &SupplierMetrics, formula: ScoringFormula) -> Self {
        let ethical = formula.ethical_score(metrics);
        Self {
            ethical,
            environmental: environmental_score(metrics),
            social: social_score(metrics),
            governance: governance_score(metrics),
            risk_level: risk_level_for_score(ethical),
        }
    }

    /// Scores already recorded on the supplier, computing whatever is missing.
    pub fn for_supplier(supplier: &Supplier, formula: ScoringFormula) -> Self {
        let computed = Self::compute(&supplier.metrics, formula);
        let ethical = supplier.ethical_score.unwrap_or(computed.ethical);
        Self {
            ethical,
            environmental: supplier.environmental_score.unwrap_or(computed.environmental),
            social: supplier.social_score.unwrap_or(computed.social),
            governance: supplier.governance_score.unwrap_or(computed.governance),
            risk_level: supplier
                .risk_level
                .unwrap_or_else(|| risk_level_for_score(ethical)),
        }
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            overall_score: self.ethical,
            environmental_score: self.environmental,
            social_score: self.social,
            governance_score: self.governance,
        }
    }
}

/// Writes freshly computed scores onto the supplier.
pub fn score_supplier(supplier: &mut Supplier, formula: ScoringFormula) {
    let card = ScoreCard::compute(&supplier.metrics, formula);
    supplier.ethical_score = Some(card.ethical);
    supplier.environmental_score = Some(card.environmental);
    supplier.social_score = Some(card.social);
    supplier.governance_score = Some(card.governance);
    supplier.risk_level = Some(card.risk_level);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_fractions(value: f64) -> SupplierMetrics {
        SupplierMetrics {
            co2_emissions: Some(0.0),
            delivery_efficiency: Some(value),
            wage_fairness: Some(value),
            human_rights_index: Some(value),
            waste_management_score: Some(value),
            energy_efficiency: Some(value),
            diversity_inclusion_score: Some(value),
            transparency_score: Some(value),
            quality_control_score: Some(value),
            corruption_risk: Some(1.0 - value),
            water_usage: Some(0.0),
            community_engagement: Some(value),
        }
    }

    #[test]
    fn test_empty_metrics_score_fifty() {
        let metrics = SupplierMetrics::default();
        assert_eq!(ethical_score(&metrics), 50.0);
        assert_eq!(weighted_ethical_score(&metrics), 50.0);
        assert_eq!(environmental_score(&metrics), 50.0);
        assert_eq!(social_score(&metrics), 50.0);
        assert_eq!(governance_score(&metrics), 50.0);
    }

    #[test]
    fn test_perfect_supplier_scores_hundred() {
        let metrics = all_fractions(1.0);
        assert_eq!(ethical_score(&metrics), 100.0);
        assert_eq!(weighted_ethical_score(&metrics), 100.0);
        assert_eq!(environmental_score(&metrics), 100.0);
        assert_eq!(governance_score(&metrics), 100.0);
    }

    #[test]
    fn test_co2_contribution() {
        let mut metrics = SupplierMetrics {
            co2_emissions: Some(25.0),
            ..Default::default()
        };
        assert_eq!(co2_contribution(&metrics), 0.75);
        metrics.co2_emissions = Some(250.0);
        assert_eq!(co2_contribution(&metrics), 0.0);
        metrics.co2_emissions = Some(-10.0);
        assert_eq!(co2_contribution(&metrics), 1.0);
    }

    #[test]
    fn test_explicit_zero_is_not_missing() {
        let metrics = SupplierMetrics {
            wage_fairness: Some(0.0),
            ..Default::default()
        };
        // (0.5 * 9 + 0.0) / 10
        assert_eq!(ethical_score(&metrics), 45.0);
    }

    #[test]
    fn test_out_of_range_fractions_are_clamped() {
        let metrics = SupplierMetrics {
            wage_fairness: Some(3.0),
            corruption_risk: Some(-2.0),
            ..Default::default()
        };
        // wage -> 1.0, corruption -> 0.0 so its contribution is 1.0
        assert_eq!(ethical_score(&metrics), 60.0);
        assert_eq!(governance_score(&metrics), 75.0);
    }

    #[test]
    fn test_non_finite_values_use_default() {
        let metrics = SupplierMetrics {
            wage_fairness: Some(f64::NAN),
            co2_emissions: Some(f64::INFINITY),
            ..Default::default()
        };
        assert_eq!(ethical_score(&metrics), 50.0);
    }

    #[test]
    fn test_risk_level_boundaries() {
        assert_eq!(risk_level(0.8), RiskLevel::Low);
        assert_eq!(risk_level(0.7999), RiskLevel::Medium);
        assert_eq!(risk_level(0.6), RiskLevel::Medium);
        assert_eq!(risk_level(0.5999), RiskLevel::High);
        assert_eq!(risk_level_for_score(80.0), RiskLevel::Low);
        assert_eq!(risk_level_for_score(60.0), RiskLevel::Medium);
        assert_eq!(risk_level_for_score(59.99), RiskLevel::High);
    }

    #[test]
    fn test_weighted_formula_differs_from_equal_weight() {
        let metrics = SupplierMetrics {
            wage_fairness: Some(1.0),
            human_rights_index: Some(1.0),
            co2_emissions: Some(100.0),
            ..Default::default()
        };
        // labor 1.0*0.25 + env 0.5*0.30 + social 0.5*0.25 + co2 0.0*0.20
        assert_eq!(weighted_ethical_score(&metrics), 52.5);
        // (0.0 + 1.0 + 1.0 + 0.5 * 7) / 10
        assert_eq!(ethical_score(&metrics), 55.0);
    }

    #[test]
    fn test_formula_from_str() {
        assert_eq!("weighted".parse::<ScoringFormula>(), Ok(ScoringFormula::Weighted));
        assert_eq!(" Equal ".parse::<ScoringFormula>(), Ok(ScoringFormula::EqualWeight));
        assert!("ml".parse::<ScoringFormula>().is_err());
    }

    #[test]
    fn test_scorecard_prefers_recorded_scores() {
        let supplier = Supplier {
            id: 1,
            name: "Acme".into(),
            country: "France".into(),
            industry: None,
            metrics: SupplierMetrics::default(),
            ethical_score: Some(81.5),
            environmental_score: None,
            social_score: Some(82.0),
            governance_score: None,
            risk_level: None,
            created_at: Default::default(),
            updated_at: Default::default(),
            is_mock_data: true,
        };
        let card = ScoreCard::for_supplier(&supplier, ScoringFormula::EqualWeight);
        assert_eq!(card.ethical, 81.5);
        assert_eq!(card.social, 82.0);
        assert_eq!(card.environmental, 50.0);
        assert_eq!(card.risk_level, RiskLevel::Low);
    }
}
