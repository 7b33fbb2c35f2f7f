use crate::errors::FetchError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// ============ Metrics ============

/// Qualitative risk bucket derived from the ethical score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "high", alias = "HIGH", alias = "critical", alias = "Critical")]
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// A single raw supplier metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Co2Emissions,
    DeliveryEfficiency,
    WageFairness,
    HumanRightsIndex,
    WasteManagementScore,
    EnergyEfficiency,
    DiversityInclusionScore,
    TransparencyScore,
    QualityControlScore,
    CorruptionRisk,
    WaterUsage,
    CommunityEngagement,
}

impl Metric {
    pub const ALL: [Metric; 12] = [
        Metric::Co2Emissions,
        Metric::DeliveryEfficiency,
        Metric::WageFairness,
        Metric::HumanRightsIndex,
        Metric::WasteManagementScore,
        Metric::EnergyEfficiency,
        Metric::DiversityInclusionScore,
        Metric::TransparencyScore,
        Metric::QualityControlScore,
        Metric::CorruptionRisk,
        Metric::WaterUsage,
        Metric::CommunityEngagement,
    ];

    /// Wire name, as used in the backend JSON.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Co2Emissions => "co2_emissions",
            Metric::DeliveryEfficiency => "delivery_efficiency",
            Metric::WageFairness => "wage_fairness",
            Metric::HumanRightsIndex => "human_rights_index",
            Metric::WasteManagementScore => "waste_management_score",
            Metric::EnergyEfficiency => "energy_efficiency",
            Metric::DiversityInclusionScore => "diversity_inclusion_score",
            Metric::TransparencyScore => "transparency_score",
            Metric::QualityControlScore => "quality_control_score",
            Metric::CorruptionRisk => "corruption_risk",
            Metric::WaterUsage => "water_usage",
            Metric::CommunityEngagement => "community_engagement",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.name() == name)
    }

    /// Fractional metrics live in [0,1]; the others are open-ended quantities.
    pub fn is_fractional(self) -> bool {
        !matches!(self, Metric::Co2Emissions | Metric::WaterUsage)
    }

    /// True when a lower value is the better one.
    pub fn lower_is_better(self) -> bool {
        matches!(
            self,
            Metric::Co2Emissions | Metric::WaterUsage | Metric::CorruptionRisk
        )
    }

    pub fn default_value(self) -> f64 {
        match self {
            Metric::Co2Emissions => SupplierMetrics::DEFAULT_EMISSIONS,
            Metric::WaterUsage => SupplierMetrics::DEFAULT_WATER_USAGE,
            _ => SupplierMetrics::DEFAULT_FRACTION,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw supplier metrics. Every field is optional so partial form input can be scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_emissions: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wage_fairness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_rights_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_management_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversity_inclusion_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_control_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corruption_risk: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_engagement: Option<f64>,
}

impl SupplierMetrics {
    pub const DEFAULT_FRACTION: f64 = 0.5;
    pub const DEFAULT_EMISSIONS: f64 = 50.0;
    pub const DEFAULT_WATER_USAGE: f64 = 50.0;

    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Co2Emissions => self.co2_emissions,
            Metric::DeliveryEfficiency => self.delivery_efficiency,
            Metric::WageFairness => self.wage_fairness,
            Metric::HumanRightsIndex => self.human_rights_index,
            Metric::WasteManagementScore => self.waste_management_score,
            Metric::EnergyEfficiency => self.energy_efficiency,
            Metric::DiversityInclusionScore => self.diversity_inclusion_score,
            Metric::TransparencyScore => self.transparency_score,
            Metric::QualityControlScore => self.quality_control_score,
            Metric::CorruptionRisk => self.corruption_risk,
            Metric::WaterUsage => self.water_usage,
            Metric::CommunityEngagement => self.community_engagement,
        }
    }

    /// Value of `metric`, or its neutral default when absent or not finite.
    pub fn value_or_default(&self, metric: Metric) -> f64 {
        self.get(metric)
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| metric.default_value())
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        let slot = match metric {
            Metric::Co2Emissions => &mut self.co2_emissions,
            Metric::DeliveryEfficiency => &mut self.delivery_efficiency,
            Metric::WageFairness => &mut self.wage_fairness,
            Metric::HumanRightsIndex => &mut self.human_rights_index,
            Metric::WasteManagementScore => &mut self.waste_management_score,
            Metric::EnergyEfficiency => &mut self.energy_efficiency,
            Metric::DiversityInclusionScore => &mut self.diversity_inclusion_score,
            Metric::TransparencyScore => &mut self.transparency_score,
            Metric::QualityControlScore => &mut self.quality_control_score,
            Metric::CorruptionRisk => &mut self.corruption_risk,
            Metric::WaterUsage => &mut self.water_usage,
            Metric::CommunityEngagement => &mut self.community_engagement,
        };
        *slot = value;
    }

    /// Copy with every unset metric filled from its default.
    pub fn with_defaults(&self) -> Self {
        let mut filled = self.clone();
        for metric in Metric::ALL {
            if filled.get(metric).filter(|v| v.is_finite()).is_none() {
                filled.set(metric, Some(metric.default_value()));
            }
        }
        filled
    }
}

// ============ Supplier ============

/// One supply-chain entity, as held by the backend or the fallback store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(flatten)]
    pub metrics: SupplierMetrics,
    /// `None` until the supplier has been evaluated.
    #[serde(default)]
    pub ethical_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    /// The Unix epoch when the backend omits it.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "isMockData", default)]
    pub is_mock_data: bool,
}

/// Partial supplier submitted by the add and evaluate forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierInput {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(flatten)]
    pub metrics: SupplierMetrics,
}

impl From<&Supplier> for SupplierInput {
    fn from(supplier: &Supplier) -> Self {
        Self {
            name: supplier.name.clone(),
            country: supplier.country.clone(),
            industry: supplier.industry.clone(),
            metrics: supplier.metrics.clone(),
        }
    }
}

// ============ Listing envelope ============

/// A decoded collection response: either a paginated envelope or a bare array.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Page { results: Vec<T>, next: Option<String> },
    Bare(Vec<T>),
}

#[derive(Deserialize)]
struct Envelope<T> {
    results: Vec<T>,
    #[serde(default)]
    next: Option<String>,
}

impl<T: DeserializeOwned> Listing<T> {
    /// Discriminates on the top-level shape: arrays are bare listings, objects
    /// must carry a `results` array. Anything else is a decode failure.
    pub fn from_value(value: Value) -> Result<Self, FetchError> {
        match value {
            Value::Array(_) => serde_json::from_value(value)
                .map(Listing::Bare)
                .map_err(|e| FetchError::Decode(format!("invalid list item: {}", e))),
            Value::Object(ref map) if map.contains_key("results") => {
                let envelope: Envelope<T> = serde_json::from_value(value)
                    .map_err(|e| FetchError::Decode(format!("invalid page envelope: {}", e)))?;
                Ok(Listing::Page {
                    results: envelope.results,
                    next: envelope.next.filter(|n| !n.trim().is_empty()),
                })
            }
            other => Err(FetchError::Decode(format!(
                "expected an array or a paginated envelope, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without results",
    }
}

// ============ Evaluation ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Result of `POST /suppliers/evaluate/`, or its local stand-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub ethical_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_status: Option<String>,
    /// Backend fields this crate does not model, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
    #[serde(rename = "isMockData", default)]
    pub is_mock_data: bool,
}

// ============ Dashboard ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBucket {
    pub range: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub total_suppliers: usize,
    pub avg_ethical_score: f64,
    pub avg_co2_emissions: f64,
    pub suppliers_by_country: BTreeMap<String, usize>,
    pub ethical_score_distribution: Vec<ScoreBucket>,
    #[serde(default)]
    pub co2_emissions_by_industry: Vec<NamedValue>,
    #[serde(rename = "isMockData", default)]
    pub is_mock_data: bool,
}

// ============ Recommendations ============

/// A supplier ranked for the recommendations view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedSupplier {
    #[serde(flatten)]
    pub supplier: Supplier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

// ============ Analysis ============

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub overall_score: f64,
    pub environmental_score: f64,
    pub social_score: f64,
    pub governance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub current_scores: ScoreSnapshot,
    pub predicted_scores: ScoreSnapshot,
    /// Predicted minus current, in score points.
    pub improvements: ScoreSnapshot,
    #[serde(rename = "isMockData", default)]
    pub is_mock_data: bool,
}

/// Requested what-if adjustments, keyed by metric wire name.
pub type MetricChanges = BTreeMap<String, f64>;

/// Body of a simulation request: `{"changes": {"co2_emissions": 20.0}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(default)]
    pub changes: MetricChanges,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementScenario {
    pub name: String,
    pub description: String,
    pub changes: MetricChanges,
    pub impact: SimulationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisScores {
    pub overall: f64,
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryBenchmarks {
    pub avg_ethical_score: f64,
    pub avg_environmental_score: f64,
    pub avg_social_score: f64,
    pub avg_governance_score: f64,
    pub best_ethical_score: f64,
    pub worst_ethical_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub overall: f64,
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub id: i64,
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub scores: AnalysisScores,
    pub industry_benchmarks: IndustryBenchmarks,
    pub percentiles: Percentiles,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub improvement_scenarios: Vec<ImprovementScenario>,
    #[serde(rename = "isMockData", default)]
    pub is_mock_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierAnalytics {
    pub supplier: Supplier,
    pub industry_average: BTreeMap<String, f64>,
    #[serde(default)]
    pub similar_suppliers: Vec<Supplier>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(rename = "isMockData", default)]
    pub is_mock_data: bool,
}

// ============ Provenance ============

/// Records whether a payload came from the backend or from the fallback path.
pub trait Provenance {
    fn set_mock_data(&mut self, is_mock: bool);
    fn is_mock_data(&self) -> bool;
}

macro_rules! impl_provenance {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Provenance for $ty {
                fn set_mock_data(&mut self, is_mock: bool) {
                    self.is_mock_data = is_mock;
                }

                fn is_mock_data(&self) -> bool {
                    self.is_mock_data
                }
            }
        )*
    };
}

impl_provenance!(
    Supplier,
    EvaluationResult,
    DashboardData,
    SimulationResult,
    DetailedAnalysis,
);

impl Provenance for RecommendedSupplier {
    fn set_mock_data(&mut self, is_mock: bool) {
        self.supplier.set_mock_data(is_mock);
    }

    fn is_mock_data(&self) -> bool {
        self.supplier.is_mock_data
    }
}

impl Provenance for SupplierAnalytics {
    fn set_mock_data(&mut self, is_mock: bool) {
        self.is_mock_data = is_mock;
        self.supplier.set_mock_data(is_mock);
        for similar in &mut self.similar_suppliers {
            similar.set_mock_data(is_mock);
        }
    }

    fn is_mock_data(&self) -> bool {
        self.is_mock_data
    }
}

impl<T: Provenance> Provenance for Vec<T> {
    fn set_mock_data(&mut self, is_mock: bool) {
        for item in self.iter_mut() {
            item.set_mock_data(is_mock);
        }
    }

    fn is_mock_data(&self) -> bool {
        !self.is_empty() && self.iter().all(Provenance::is_mock_data)
    }
}

/// Sets the provenance flag and hands the value back.
pub fn stamped<T: Provenance>(mut value: T, is_mock: bool) -> T {
    value.set_mock_data(is_mock);
    value
}
