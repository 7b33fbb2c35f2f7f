//! Deterministic synthetic payloads served when the backend is unavailable.
//!
//! Everything here is a pure function of its inputs so repeated fallbacks in a
//! session show the same numbers.

use crate::models::*;
use crate::recommendations::{
    assessment, compliance_status, improvement_suggestions, recommendation_text,
};
use crate::scoring::{risk_level_for_score, round1, round2, ScoreCard, ScoringFormula};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

const DEFAULT_INDUSTRY: &str = "Manufacturing";
const UNSPECIFIED_INDUSTRY: &str = "Unspecified";
const MAX_SIMILAR_SUPPLIERS: usize = 3;

struct SeedRow {
    id: i64,
    name: &'static str,
    country: &'static str,
    industry: &'static str,
    co2_emissions: f64,
    delivery_efficiency: f64,
    wage_fairness: f64,
    human_rights_index: f64,
    waste_management_score: f64,
    ethical_score: f64,
    environmental_score: f64,
    social_score: f64,
    governance_score: f64,
    created_at: (i32, u32, u32, u32, u32),
    updated_at: (i32, u32, u32, u32, u32),
}

const SEED: [SeedRow; 12] = [
    SeedRow {
        id: 1,
        name: "Procter & Gamble",
        country: "United States",
        industry: "Consumer Goods",
        co2_emissions: 2.4,
        delivery_efficiency: 0.92,
        wage_fairness: 0.88,
        human_rights_index: 0.85,
        waste_management_score: 0.83,
        ethical_score: 81.5,
        environmental_score: 78.0,
        social_score: 82.0,
        governance_score: 85.0,
        created_at: (2023, 5, 15, 10, 30),
        updated_at: (2024, 1, 12, 9, 45),
    },
    SeedRow {
        id: 2,
        name: "Foxconn Technology Group",
        country: "Taiwan",
        industry: "Electronics Manufacturing",
        co2_emissions: 4.3,
        delivery_efficiency: 0.89,
        wage_fairness: 0.61,
        human_rights_index: 0.58,
        waste_management_score: 0.75,
        ethical_score: 67.4,
        environmental_score: 70.0,
        social_score: 59.0,
        governance_score: 72.0,
        created_at: (2023, 6, 20, 8, 15),
        updated_at: (2024, 2, 18, 11, 30),
    },
    SeedRow {
        id: 3,
        name: "Unilever",
        country: "United Kingdom",
        industry: "Consumer Goods",
        co2_emissions: 1.9,
        delivery_efficiency: 0.87,
        wage_fairness: 0.84,
        human_rights_index: 0.87,
        waste_management_score: 0.89,
        ethical_score: 84.2,
        environmental_score: 85.0,
        social_score: 83.0,
        governance_score: 84.0,
        created_at: (2023, 4, 10, 9, 20),
        updated_at: (2024, 1, 25, 16, 40),
    },
    SeedRow {
        id: 4,
        name: "Samsung Electronics",
        country: "South Korea",
        industry: "Electronics",
        co2_emissions: 16.1,
        delivery_efficiency: 0.91,
        wage_fairness: 0.82,
        human_rights_index: 0.79,
        waste_management_score: 0.81,
        ethical_score: 77.8,
        environmental_score: 75.0,
        social_score: 78.0,
        governance_score: 82.0,
        created_at: (2023, 7, 5, 11, 45),
        updated_at: (2024, 2, 1, 13, 20),
    },
    SeedRow {
        id: 5,
        name: "Nestlé",
        country: "Switzerland",
        industry: "Food & Beverage",
        co2_emissions: 92.0,
        delivery_efficiency: 0.84,
        wage_fairness: 0.76,
        human_rights_index: 0.73,
        waste_management_score: 0.77,
        ethical_score: 72.5,
        environmental_score: 69.0,
        social_score: 74.0,
        governance_score: 80.0,
        created_at: (2023, 3, 18, 7, 30),
        updated_at: (2024, 2, 10, 10, 15),
    },
    SeedRow {
        id: 6,
        name: "Li & Fung",
        country: "Hong Kong",
        industry: "Supply Chain Management",
        co2_emissions: 0.8,
        delivery_efficiency: 0.94,
        wage_fairness: 0.73,
        human_rights_index: 0.68,
        waste_management_score: 0.65,
        ethical_score: 71.2,
        environmental_score: 68.0,
        social_score: 70.0,
        governance_score: 75.0,
        created_at: (2023, 8, 12, 13, 10),
        updated_at: (2024, 1, 27, 9, 50),
    },
    SeedRow {
        id: 7,
        name: "Tyson Foods",
        country: "United States",
        industry: "Food Processing",
        co2_emissions: 25.0,
        delivery_efficiency: 0.82,
        wage_fairness: 0.71,
        human_rights_index: 0.68,
        waste_management_score: 0.66,
        ethical_score: 68.9,
        environmental_score: 64.0,
        social_score: 69.0,
        governance_score: 73.0,
        created_at: (2023, 5, 25, 8, 20),
        updated_at: (2024, 1, 15, 14, 30),
    },
    SeedRow {
        id: 8,
        name: "Danone",
        country: "France",
        industry: "Food & Beverage",
        co2_emissions: 24.7,
        delivery_efficiency: 0.85,
        wage_fairness: 0.83,
        human_rights_index: 0.81,
        waste_management_score: 0.84,
        ethical_score: 80.6,
        environmental_score: 82.0,
        social_score: 81.0,
        governance_score: 79.0,
        created_at: (2023, 6, 14, 10, 45),
        updated_at: (2024, 2, 5, 11, 20),
    },
    SeedRow {
        id: 9,
        name: "General Mills",
        country: "United States",
        industry: "Food & Beverage",
        co2_emissions: 12.0,
        delivery_efficiency: 0.87,
        wage_fairness: 0.85,
        human_rights_index: 0.82,
        waste_management_score: 0.79,
        ethical_score: 79.8,
        environmental_score: 76.0,
        social_score: 83.0,
        governance_score: 82.0,
        created_at: (2023, 4, 28, 9, 30),
        updated_at: (2024, 1, 18, 16, 15),
    },
    SeedRow {
        id: 10,
        name: "Nike",
        country: "United States",
        industry: "Apparel & Footwear",
        co2_emissions: 0.3,
        delivery_efficiency: 0.89,
        wage_fairness: 0.74,
        human_rights_index: 0.76,
        waste_management_score: 0.86,
        ethical_score: 78.3,
        environmental_score: 81.0,
        social_score: 75.0,
        governance_score: 80.0,
        created_at: (2023, 7, 10, 14, 20),
        updated_at: (2024, 2, 12, 10, 40),
    },
    SeedRow {
        id: 11,
        name: "VF Corporation",
        country: "United States",
        industry: "Apparel & Footwear",
        co2_emissions: 2.2,
        delivery_efficiency: 0.86,
        wage_fairness: 0.78,
        human_rights_index: 0.77,
        waste_management_score: 0.81,
        ethical_score: 77.4,
        environmental_score: 79.0,
        social_score: 76.0,
        governance_score: 78.0,
        created_at: (2023, 5, 22, 11, 15),
        updated_at: (2024, 1, 20, 9, 30),
    },
    SeedRow {
        id: 12,
        name: "Haier",
        country: "China",
        industry: "Home Appliances",
        co2_emissions: 18.5,
        delivery_efficiency: 0.84,
        wage_fairness: 0.69,
        human_rights_index: 0.65,
        waste_management_score: 0.72,
        ethical_score: 68.7,
        environmental_score: 71.0,
        social_score: 67.0,
        governance_score: 70.0,
        created_at: (2023, 6, 30, 8, 45),
        updated_at: (2024, 2, 8, 15, 10),
    },
];

fn timestamp((year, month, day, hour, minute): (i32, u32, u32, u32, u32)) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn build(row: &SeedRow) -> Supplier {
    Supplier {
        id: row.id,
        name: row.name.to_string(),
        country: row.country.to_string(),
        industry: Some(row.industry.to_string()),
        metrics: SupplierMetrics {
            co2_emissions: Some(row.co2_emissions),
            delivery_efficiency: Some(row.delivery_efficiency),
            wage_fairness: Some(row.wage_fairness),
            human_rights_index: Some(row.human_rights_index),
            waste_management_score: Some(row.waste_management_score),
            ..Default::default()
        },
        ethical_score: Some(row.ethical_score),
        environmental_score: Some(row.environmental_score),
        social_score: Some(row.social_score),
        governance_score: Some(row.governance_score),
        risk_level: Some(risk_level_for_score(row.ethical_score)),
        created_at: timestamp(row.created_at),
        updated_at: timestamp(row.updated_at),
        is_mock_data: true,
    }
}

/// The fixed demo dataset, in stable id order.
pub fn seed_suppliers() -> Vec<Supplier> {
    SEED.iter().map(build).collect()
}

/// First supplier of the demo dataset.
pub fn demo_supplier() -> Supplier {
    build(&SEED[0])
}

/// A supplier synthesized from form input, with unset metrics defaulted and scores computed.
pub fn new_supplier(
    id: i64,
    input: &SupplierInput,
    formula: ScoringFormula,
    now: DateTime<Utc>,
) -> Supplier {
    let metrics = input.metrics.with_defaults();
    let card = ScoreCard::compute(&metrics, formula);
    Supplier {
        id,
        name: input.name.clone(),
        country: input.country.clone(),
        industry: Some(
            input
                .industry
                .clone()
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_INDUSTRY.to_string()),
        ),
        metrics,
        ethical_score: Some(card.ethical),
        environmental_score: Some(card.environmental),
        social_score: Some(card.social),
        governance_score: Some(card.governance),
        risk_level: Some(card.risk_level),
        created_at: now,
        updated_at: now,
        is_mock_data: true,
    }
}

/// Local stand-in for the backend evaluation endpoint.
pub fn evaluation(input: &SupplierInput, formula: ScoringFormula) -> EvaluationResult {
    let card = ScoreCard::compute(&input.metrics, formula);
    EvaluationResult {
        id: None,
        name: input.name.clone(),
        ethical_score: card.ethical,
        environmental_score: Some(card.environmental),
        social_score: Some(card.social),
        governance_score: Some(card.governance),
        risk_level: Some(card.risk_level),
        recommendation: Some(recommendation_text(card.ethical).to_string()),
        suggestions: improvement_suggestions(&input.metrics),
        assessment: Some(assessment(&input.metrics)),
        compliance_status: Some(compliance_status(card.ethical).to_string()),
        extra: serde_json::Map::new(),
        is_mock_data: true,
    }
}

fn average(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn industry_of(supplier: &Supplier) -> &str {
    supplier
        .industry
        .as_deref()
        .filter(|i| !i.trim().is_empty())
        .unwrap_or(UNSPECIFIED_INDUSTRY)
}

/// Suppliers in the same industry, or everyone when the industry has no other member.
fn peers<'a>(target: &Supplier, all: &'a [Supplier]) -> Vec<&'a Supplier> {
    let same: Vec<&Supplier> = all
        .iter()
        .filter(|s| industry_of(s) == industry_of(target))
        .collect();
    if same.len() > 1 {
        same
    } else {
        all.iter().collect()
    }
}

const DISTRIBUTION_RANGES: [(&str, f64, f64); 5] = [
    ("0-20", f64::NEG_INFINITY, 20.0),
    ("21-40", 20.0, 40.0),
    ("41-60", 40.0, 60.0),
    ("61-80", 60.0, 80.0),
    ("81-100", 80.0, f64::INFINITY),
];

/// Dashboard aggregates over the given suppliers.
pub fn dashboard(suppliers: &[Supplier], formula: ScoringFormula) -> DashboardData {
    let scores: Vec<f64> = suppliers
        .iter()
        .map(|s| ScoreCard::for_supplier(s, formula).ethical)
        .collect();

    let mut suppliers_by_country = BTreeMap::new();
    for supplier in suppliers {
        *suppliers_by_country
            .entry(supplier.country.clone())
            .or_insert(0usize) += 1;
    }

    let ethical_score_distribution = DISTRIBUTION_RANGES
        .iter()
        .map(|(range, low, high)| ScoreBucket {
            range: range.to_string(),
            count: scores.iter().filter(|s| **s > *low && **s <= *high).count(),
        })
        .collect();

    let mut emissions_by_industry: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for supplier in suppliers {
        if let Some(co2) = supplier.metrics.co2_emissions {
            emissions_by_industry
                .entry(industry_of(supplier))
                .or_default()
                .push(co2);
        }
    }
    let co2_emissions_by_industry = emissions_by_industry
        .into_iter()
        .filter_map(|(name, values)| {
            average(values).map(|value| NamedValue {
                name: name.to_string(),
                value: round1(value),
            })
        })
        .collect();

    DashboardData {
        total_suppliers: suppliers.len(),
        avg_ethical_score: average(scores.iter().copied()).map(round1).unwrap_or(0.0),
        avg_co2_emissions: average(suppliers.iter().filter_map(|s| s.metrics.co2_emissions))
            .map(round1)
            .unwrap_or(0.0),
        suppliers_by_country,
        ethical_score_distribution,
        co2_emissions_by_industry,
        is_mock_data: true,
    }
}

/// Suppliers ranked best first, each with its recommendation text.
pub fn recommendations(suppliers: &[Supplier], formula: ScoringFormula) -> Vec<RecommendedSupplier> {
    let mut ranked: Vec<(f64, &Supplier)> = suppliers
        .iter()
        .map(|s| (ScoreCard::for_supplier(s, formula).ethical, s))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    ranked
        .into_iter()
        .map(|(score, supplier)| RecommendedSupplier {
            supplier: stamped(supplier.clone(), true),
            recommendation: Some(recommendation_text(score).to_string()),
        })
        .collect()
}

/// Re-scores `supplier` with `changes` applied and reports the shift.
///
/// Predicted scores are the recorded scores moved by the difference the
/// scoring engine sees between the old and the adjusted metrics.
pub fn simulation(
    supplier: &Supplier,
    changes: &MetricChanges,
    formula: ScoringFormula,
) -> SimulationResult {
    let mut adjusted = supplier.metrics.clone();
    for (name, value) in changes {
        match Metric::from_name(name) {
            Some(metric) => adjusted.set(metric, Some(*value)),
            None => tracing::debug!("Ignoring unknown metric '{}' in simulation", name),
        }
    }

    let before = ScoreCard::compute(&supplier.metrics, formula);
    let after = ScoreCard::compute(&adjusted, formula);
    let current = ScoreCard::for_supplier(supplier, formula).snapshot();
    let shift = |base: f64, old: f64, new: f64| round2((base + new - old).clamp(0.0, 100.0));

    let predicted = ScoreSnapshot {
        overall_score: shift(current.overall_score, before.ethical, after.ethical),
        environmental_score: shift(
            current.environmental_score,
            before.environmental,
            after.environmental,
        ),
        social_score: shift(current.social_score, before.social, after.social),
        governance_score: shift(current.governance_score, before.governance, after.governance),
    };

    SimulationResult {
        current_scores: current,
        predicted_scores: predicted,
        improvements: ScoreSnapshot {
            overall_score: round2(predicted.overall_score - current.overall_score),
            environmental_score: round2(
                predicted.environmental_score - current.environmental_score,
            ),
            social_score: round2(predicted.social_score - current.social_score),
            governance_score: round2(predicted.governance_score - current.governance_score),
        },
        is_mock_data: true,
    }
}

/// Share of `values` strictly below `value`, as a 0-100 percentile.
fn percentile(value: f64, values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let below = values.iter().filter(|v| **v < value).count();
    round1(below as f64 / values.len() as f64 * 100.0)
}

fn scaled(metrics: &SupplierMetrics, metric: Metric, factor: f64) -> f64 {
    let value = metrics.value_or_default(metric) * factor;
    if metric.is_fractional() {
        round2(value.min(1.0))
    } else {
        round2(value)
    }
}

fn scenario(
    name: &str,
    description: &str,
    changes: &[(Metric, f64)],
    supplier: &Supplier,
    formula: ScoringFormula,
) -> ImprovementScenario {
    let changes: MetricChanges = changes
        .iter()
        .map(|(metric, factor)| {
            (
                metric.name().to_string(),
                scaled(&supplier.metrics, *metric, *factor),
            )
        })
        .collect();
    let impact = simulation(supplier, &changes, formula);
    ImprovementScenario {
        name: name.to_string(),
        description: description.to_string(),
        changes,
        impact,
    }
}

pub fn detailed_analysis(
    supplier: &Supplier,
    all: &[Supplier],
    formula: ScoringFormula,
) -> DetailedAnalysis {
    let card = ScoreCard::for_supplier(supplier, formula);
    let peer_cards: Vec<ScoreCard> = peers(supplier, all)
        .into_iter()
        .map(|s| ScoreCard::for_supplier(s, formula))
        .collect();

    let column = |pick: fn(&ScoreCard) -> f64| -> Vec<f64> { peer_cards.iter().map(pick).collect() };
    let ethical = column(|c| c.ethical);
    let environmental = column(|c| c.environmental);
    let social = column(|c| c.social);
    let governance = column(|c| c.governance);
    let mean_of = |values: &[f64]| average(values.iter().copied()).map(round1).unwrap_or(0.0);

    DetailedAnalysis {
        id: supplier.id,
        name: supplier.name.clone(),
        country: supplier.country.clone(),
        industry: supplier.industry.clone(),
        scores: AnalysisScores {
            overall: card.ethical,
            environmental: card.environmental,
            social: card.social,
            governance: card.governance,
            risk_level: card.risk_level,
        },
        industry_benchmarks: IndustryBenchmarks {
            avg_ethical_score: mean_of(&ethical),
            avg_environmental_score: mean_of(&environmental),
            avg_social_score: mean_of(&social),
            avg_governance_score: mean_of(&governance),
            best_ethical_score: ethical.iter().copied().fold(card.ethical, f64::max),
            worst_ethical_score: ethical.iter().copied().fold(card.ethical, f64::min),
        },
        percentiles: Percentiles {
            overall: percentile(card.ethical, &ethical),
            environmental: percentile(card.environmental, &environmental),
            social: percentile(card.social, &social),
            governance: percentile(card.governance, &governance),
        },
        suggestions: improvement_suggestions(&supplier.metrics),
        improvement_scenarios: vec![
            scenario(
                "Environmental Focus",
                "Cut CO2 emissions by 20% and improve waste management by 20%",
                &[(Metric::Co2Emissions, 0.8), (Metric::WasteManagementScore, 1.2)],
                supplier,
                formula,
            ),
            scenario(
                "Social Responsibility Focus",
                "Improve wage fairness and human rights by 20%",
                &[(Metric::WageFairness, 1.2), (Metric::HumanRightsIndex, 1.2)],
                supplier,
                formula,
            ),
        ],
        is_mock_data: true,
    }
}

fn with_scores(supplier: &Supplier, formula: ScoringFormula) -> Supplier {
    let card = ScoreCard::for_supplier(supplier, formula);
    Supplier {
        ethical_score: Some(card.ethical),
        environmental_score: Some(card.environmental),
        social_score: Some(card.social),
        governance_score: Some(card.governance),
        risk_level: Some(card.risk_level),
        is_mock_data: true,
        ..supplier.clone()
    }
}

pub fn analytics(supplier: &Supplier, all: &[Supplier], formula: ScoringFormula) -> SupplierAnalytics {
    let peers = peers(supplier, all);

    let mut industry_average = BTreeMap::new();
    for metric in Metric::ALL {
        if let Some(avg) = average(peers.iter().filter_map(|s| s.metrics.get(metric))) {
            industry_average.insert(metric.name().to_string(), round2(avg));
        }
    }
    if let Some(avg) = average(
        peers
            .iter()
            .map(|s| ScoreCard::for_supplier(s, formula).ethical),
    ) {
        industry_average.insert("ethical_score".to_string(), round2(avg));
    }

    let own_score = ScoreCard::for_supplier(supplier, formula).ethical;
    let mut similar: Vec<(f64, &Supplier)> = all
        .iter()
        .filter(|s| s.id != supplier.id && industry_of(s) == industry_of(supplier))
        .map(|s| {
            let distance = (ScoreCard::for_supplier(s, formula).ethical - own_score).abs();
            (distance, s)
        })
        .collect();
    similar.sort_by(|a, b| a.0.total_cmp(&b.0));

    SupplierAnalytics {
        supplier: with_scores(supplier, formula),
        industry_average,
        similar_suppliers: similar
            .into_iter()
            .take(MAX_SIMILAR_SUPPLIERS)
            .map(|(_, s)| with_scores(s, formula))
            .collect(),
        suggestions: improvement_suggestions(&supplier.metrics),
        is_mock_data: true,
    }
}
