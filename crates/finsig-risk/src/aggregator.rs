//! Weighted multi-signal risk aggregation.

use chrono::{DateTime, Utc};

use finsig_core::{ConfigError, RiskWeights};

use crate::types::{Article, RiskAssessment, RiskComponents, RiskLevel, SourceCredibility};

/// Recency contributed by an article whose timestamp cannot be parsed:
/// neutral rather than failing the whole computation.
const UNPARSABLE_RECENCY: f64 = 50.0;

/// Combines sentiment, frequency, recency, and credibility into one score.
///
/// Weights and the credibility table are fixed at construction, so several
/// profiles can coexist; nothing here reads ambient global state.
pub struct RiskAggregator {
    weights: RiskWeights,
    credibility: SourceCredibility,
}

impl RiskAggregator {
    /// Build an aggregator with validated weights.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWeights`] when the weights do not sum
    /// to 1.0.
    pub fn new(
        weights: RiskWeights,
        credibility: SourceCredibility,
    ) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self {
            weights,
            credibility,
        })
    }

    /// Aggregator with default weights and credibility table.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            weights: RiskWeights::default(),
            credibility: SourceCredibility::default(),
        }
    }

    /// Compute the risk assessment for an entity from its recent articles.
    ///
    /// An empty article set short-circuits to `overall_risk = 0.0`,
    /// `risk_level = UNKNOWN`.
    #[must_use]
    pub fn calculate_risk(
        &self,
        entity_name: &str,
        articles: &[Article],
        time_window_days: u32,
    ) -> RiskAssessment {
        self.calculate_risk_at(entity_name, articles, time_window_days, Utc::now())
    }

    /// [`calculate_risk`](Self::calculate_risk) at an explicit evaluation
    /// time, for deterministic recency scoring.
    #[must_use]
    pub fn calculate_risk_at(
        &self,
        entity_name: &str,
        articles: &[Article],
        time_window_days: u32,
        now: DateTime<Utc>,
    ) -> RiskAssessment {
        if articles.is_empty() {
            tracing::debug!(entity = entity_name, "no articles, risk unknown");
            return RiskAssessment {
                overall_risk: 0.0,
                risk_level: RiskLevel::Unknown,
                articles_analyzed: 0,
                avg_sentiment: 0.0,
                components: RiskComponents::default(),
            };
        }

        #[allow(clippy::cast_precision_loss)]
        let count = articles.len() as f64;

        // Only negative average sentiment contributes; positive news never
        // subtracts risk.
        let avg_sentiment = articles.iter().map(|a| a.sentiment).sum::<f64>() / count;
        let sentiment_score = (-avg_sentiment * 100.0).max(0.0);

        let window = f64::from(time_window_days.max(1));
        let frequency_score = (count / window * 20.0).min(100.0);

        let recency_score = articles
            .iter()
            .map(|a| recency_for(a, now))
            .sum::<f64>()
            / count;

        let credibility_score = articles
            .iter()
            .map(|a| self.credibility.weight(&a.source.name) * 100.0)
            .sum::<f64>()
            / count;

        let overall_risk = sentiment_score * self.weights.sentiment
            + frequency_score * self.weights.frequency
            + recency_score * self.weights.recency
            + credibility_score * self.weights.credibility;

        let assessment = RiskAssessment {
            overall_risk: round2(overall_risk),
            risk_level: level_for(overall_risk),
            articles_analyzed: articles.len(),
            avg_sentiment: round2(avg_sentiment),
            components: RiskComponents {
                sentiment_score: round2(sentiment_score),
                frequency_score: round2(frequency_score),
                recency_score: round2(recency_score),
                credibility_score: round2(credibility_score),
            },
        };
        tracing::info!(
            entity = entity_name,
            overall_risk = assessment.overall_risk,
            risk_level = ?assessment.risk_level,
            articles = articles.len(),
            "computed entity risk"
        );
        assessment
    }
}

/// Linear decay from 100 to 0 at ten days old, clamped to [0, 100] so
/// future-dated timestamps cannot overshoot. Unparsable timestamps score 50.
fn recency_for(article: &Article, now: DateTime<Utc>) -> f64 {
    match DateTime::parse_from_rfc3339(&article.published_at) {
        Ok(published) => {
            let days_ago = (now - published.with_timezone(&Utc)).num_days();
            #[allow(clippy::cast_precision_loss)]
            let age_penalty = days_ago as f64 * 10.0;
            (100.0 - age_penalty).clamp(0.0, 100.0)
        }
        Err(e) => {
            tracing::debug!(
                published_at = %article.published_at,
                error = %e,
                "unparsable article timestamp, using neutral recency"
            );
            UNPARSABLE_RECENCY
        }
    }
}

/// Canonical thresholds: 70 and above is HIGH, 40 and above is MEDIUM.
fn level_for(risk_score: f64) -> RiskLevel {
    if risk_score >= 70.0 {
        RiskLevel::High
    } else if risk_score >= 40.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
