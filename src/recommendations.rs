use crate::models::{Assessment, Metric, SupplierMetrics};

/// Overall verdict bucket for a 0-100 ethical score, most favourable first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RecommendationTier {
    Excellent,
    MeetsStandards,
    Moderate,
    BelowStandards,
}

impl RecommendationTier {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            RecommendationTier::Excellent
        } else if score >= 65.0 {
            RecommendationTier::MeetsStandards
        } else if score >= 50.0 {
            RecommendationTier::Moderate
        } else {
            RecommendationTier::BelowStandards
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RecommendationTier::Excellent => {
                "Excellent ethical performance. Prioritize this supplier for future contracts."
            }
            RecommendationTier::MeetsStandards => {
                "Meets ethical standards with room for improvement in specific areas."
            }
            RecommendationTier::Moderate => {
                "Moderate ethical performance. Request improvements before expanding the relationship."
            }
            RecommendationTier::BelowStandards => {
                "Below acceptable ethical standards. Consider alternative suppliers."
            }
        }
    }
}

pub fn recommendation_text(score: f64) -> &'static str {
    RecommendationTier::for_score(score).message()
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Below(f64),
    Above(f64),
}

impl Trigger {
    fn fires(self, value: f64) -> bool {
        match self {
            Trigger::Below(limit) => value < limit,
            Trigger::Above(limit) => value > limit,
        }
    }
}

struct Rule {
    metric: Metric,
    trigger: Trigger,
    text: &'static str,
}

const SUGGESTION_RULES: &[Rule] = &[
    Rule {
        metric: Metric::WageFairness,
        trigger: Trigger::Below(0.7),
        text: "Review and improve wage policies to ensure fair compensation across the workforce",
    },
    Rule {
        metric: Metric::HumanRightsIndex,
        trigger: Trigger::Below(0.7),
        text: "Strengthen human rights due diligence and worker protection policies",
    },
    Rule {
        metric: Metric::WasteManagementScore,
        trigger: Trigger::Below(0.7),
        text: "Implement better waste management and recycling practices",
    },
    Rule {
        metric: Metric::Co2Emissions,
        trigger: Trigger::Above(40.0),
        text: "Transition to renewable energy sources to reduce carbon emissions",
    },
    Rule {
        metric: Metric::DeliveryEfficiency,
        trigger: Trigger::Below(0.7),
        text: "Optimize logistics and delivery planning to improve efficiency",
    },
];

const MAINTAIN_STANDARDS: &str =
    "Maintain current high standards and continue monitoring performance";

/// Improvement suggestions in fixed rule order; one fallback line when nothing triggers.
pub fn improvement_suggestions(metrics: &SupplierMetrics) -> Vec<String> {
    let suggestions = apply_rules(SUGGESTION_RULES, metrics);
    if suggestions.is_empty() {
        vec![MAINTAIN_STANDARDS.to_string()]
    } else {
        suggestions
    }
}

const STRENGTH_RULES: &[Rule] = &[
    Rule {
        metric: Metric::Co2Emissions,
        trigger: Trigger::Below(30.0),
        text: "Low carbon emissions compared to industry average",
    },
    Rule {
        metric: Metric::WasteManagementScore,
        trigger: Trigger::Above(0.7),
        text: "Excellent waste management practices",
    },
    Rule {
        metric: Metric::WageFairness,
        trigger: Trigger::Above(0.7),
        text: "Strong commitment to fair wage practices",
    },
    Rule {
        metric: Metric::HumanRightsIndex,
        trigger: Trigger::Above(0.7),
        text: "Strong human rights protections and policies",
    },
    Rule {
        metric: Metric::DiversityInclusionScore,
        trigger: Trigger::Above(0.7),
        text: "Excellent diversity and inclusion initiatives",
    },
    Rule {
        metric: Metric::TransparencyScore,
        trigger: Trigger::Above(0.7),
        text: "High level of corporate transparency",
    },
    Rule {
        metric: Metric::CorruptionRisk,
        trigger: Trigger::Below(0.3),
        text: "Low corruption risk",
    },
    Rule {
        metric: Metric::DeliveryEfficiency,
        trigger: Trigger::Above(0.7),
        text: "Highly efficient delivery systems",
    },
    Rule {
        metric: Metric::QualityControlScore,
        trigger: Trigger::Above(0.7),
        text: "Superior quality control processes",
    },
];

const WEAKNESS_RULES: &[Rule] = &[
    Rule {
        metric: Metric::Co2Emissions,
        trigger: Trigger::Above(70.0),
        text: "High carbon emissions relative to industry standards",
    },
    Rule {
        metric: Metric::WasteManagementScore,
        trigger: Trigger::Below(0.3),
        text: "Poor waste management practices",
    },
    Rule {
        metric: Metric::WageFairness,
        trigger: Trigger::Below(0.3),
        text: "Concerning wage fairness practices",
    },
    Rule {
        metric: Metric::HumanRightsIndex,
        trigger: Trigger::Below(0.3),
        text: "Human rights compliance issues identified",
    },
    Rule {
        metric: Metric::DiversityInclusionScore,
        trigger: Trigger::Below(0.3),
        text: "Limited diversity and inclusion initiatives",
    },
    Rule {
        metric: Metric::TransparencyScore,
        trigger: Trigger::Below(0.3),
        text: "Lack of corporate transparency",
    },
    Rule {
        metric: Metric::CorruptionRisk,
        trigger: Trigger::Above(0.7),
        text: "High corruption risk identified",
    },
    Rule {
        metric: Metric::DeliveryEfficiency,
        trigger: Trigger::Below(0.3),
        text: "Inefficient delivery systems",
    },
    Rule {
        metric: Metric::QualityControlScore,
        trigger: Trigger::Below(0.3),
        text: "Deficient quality control processes",
    },
];

const GENERIC_STRENGTHS: [&str; 3] = [
    "Established reputation in the industry",
    "Commitment to sustainability principles",
    "Responsive management structure",
];

const GENERIC_WEAKNESSES: [&str; 3] = [
    "Limited documentation of sustainability practices",
    "Potential challenges with supply chain visibility",
    "Opportunity to enhance stakeholder engagement",
];

const MIN_STRENGTHS: usize = 3;
const MIN_WEAKNESSES: usize = 2;
const MAX_ITEMS: usize = 3;

fn apply_rules(rules: &[Rule], metrics: &SupplierMetrics) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| rule.trigger.fires(metrics.value_or_default(rule.metric)))
        .map(|rule| rule.text.to_string())
        .collect()
}

fn padded(mut items: Vec<String>, minimum: usize, generic: &[&str]) -> Vec<String> {
    if items.len() < minimum {
        items.extend(generic.iter().map(|s| s.to_string()));
    }
    items.truncate(MAX_ITEMS);
    items
}

/// Strengths and weaknesses, at most three of each.
pub fn assessment(metrics: &SupplierMetrics) -> Assessment {
    Assessment {
        strengths: padded(
            apply_rules(STRENGTH_RULES, metrics),
            MIN_STRENGTHS,
            &GENERIC_STRENGTHS,
        ),
        weaknesses: padded(
            apply_rules(WEAKNESS_RULES, metrics),
            MIN_WEAKNESSES,
            &GENERIC_WEAKNESSES,
        ),
    }
}

pub fn compliance_status(score: f64) -> &'static str {
    if score > 75.0 {
        "Compliant"
    } else if score > 50.0 {
        "Partially Compliant"
    } else {
        "Non-Compliant"
    }
}
