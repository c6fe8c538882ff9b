//! Sentiment scoring and multi-factor risk aggregation for FINSIG.
//!
//! Scores article text with a financial-domain lexicon and combines
//! sentiment, mention frequency, recency, and source credibility into one
//! risk score per tracked entity.

pub mod aggregator;
pub mod sentiment;
pub mod types;

pub use aggregator::RiskAggregator;
pub use sentiment::{analyze, analyze_context, SentimentLabel, SentimentResult};
pub use types::{Article, ArticleSource, RiskAssessment, RiskComponents, RiskLevel, SourceCredibility};
