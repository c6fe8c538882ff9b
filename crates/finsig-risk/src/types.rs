//! Risk aggregation data types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One collected article, in the article-source collaborator's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Pre-computed sentiment in [-1, 1].
    pub sentiment: f64,
    /// ISO-8601 publication timestamp.
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub source: ArticleSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSource {
    pub name: String,
}

/// Coarse categorical risk label.
///
/// `Unknown` is reserved for the no-articles case; scored assessments are
/// always LOW, MEDIUM, or HIGH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

/// Normalized component scores, each in [0, 100].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RiskComponents {
    pub sentiment_score: f64,
    pub frequency_score: f64,
    pub recency_score: f64,
    pub credibility_score: f64,
}

/// Aggregate risk for one entity, computed fresh from a window of articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk: f64,
    pub risk_level: RiskLevel,
    pub articles_analyzed: usize,
    pub avg_sentiment: f64,
    pub components: RiskComponents,
}

/// Per-source trust weights in [0, 1], with a configured default for
/// sources not in the table. Unknown is not the same as untrusted.
#[derive(Debug, Clone)]
pub struct SourceCredibility {
    weights: HashMap<String, f64>,
    default_weight: f64,
}

impl SourceCredibility {
    #[must_use]
    pub fn new(weights: HashMap<String, f64>, default_weight: f64) -> Self {
        let weights = weights
            .into_iter()
            .map(|(name, w)| (name.to_lowercase(), w))
            .collect();
        Self {
            weights,
            default_weight,
        }
    }

    /// Built-in weight table with a caller-chosen default for unknown
    /// sources.
    #[must_use]
    pub fn with_default_weight(default_weight: f64) -> Self {
        Self {
            default_weight,
            ..Self::default()
        }
    }

    /// Look up a source's weight by name, case-insensitively.
    #[must_use]
    pub fn weight(&self, source_name: &str) -> f64 {
        self.weights
            .get(&source_name.to_lowercase())
            .copied()
            .unwrap_or(self.default_weight)
    }

    #[must_use]
    pub fn default_weight(&self) -> f64 {
        self.default_weight
    }
}

impl Default for SourceCredibility {
    fn default() -> Self {
        let mut weights = HashMap::new();
        weights.insert("reuters".to_string(), 0.95);
        weights.insert("bloomberg".to_string(), 0.95);
        weights.insert("financial times".to_string(), 0.9);
        weights.insert("wall street journal".to_string(), 0.9);
        weights.insert("cnbc".to_string(), 0.8);
        weights.insert("marketwatch".to_string(), 0.75);
        weights.insert("business insider".to_string(), 0.65);
        weights.insert("seeking alpha".to_string(), 0.6);
        Self::new(weights, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_deserializes_from_collaborator_wire_shape() {
        let json = r#"{
            "sentiment": -0.4,
            "publishedAt": "2026-08-20T12:00:00Z",
            "source": {"name": "Reuters"}
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.sentiment, -0.4);
        assert_eq!(article.source.name, "Reuters");
    }

    #[test]
    fn risk_level_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Unknown).unwrap(),
            "\"UNKNOWN\""
        );
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn credibility_lookup_is_case_insensitive() {
        let credibility = SourceCredibility::default();
        assert_eq!(credibility.weight("Reuters"), 0.95);
        assert_eq!(credibility.weight("REUTERS"), 0.95);
    }

    #[test]
    fn unknown_source_gets_default_weight_not_zero() {
        let credibility = SourceCredibility::default();
        assert_eq!(credibility.weight("Some Blog"), 0.5);
    }

    #[test]
    fn with_default_weight_keeps_builtin_table() {
        let credibility = SourceCredibility::with_default_weight(0.3);
        assert_eq!(credibility.weight("bloomberg"), 0.95);
        assert_eq!(credibility.weight("Some Blog"), 0.3);
    }
}
