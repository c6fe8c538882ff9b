//! Financial-domain lexicon sentiment scorer.

use serde::{Deserialize, Serialize};

/// Compound score at or above which text is labeled positive; the negated
/// value bounds the negative label. Fixed contract.
const LABEL_THRESHOLD: f64 = 0.05;

/// Normalization constant for the compound score (`sum / sqrt(sum² + ALPHA)`).
const ALPHA: f64 = 15.0;

/// Domain-specific word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative.
const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("growth", 0.4),
    ("growing", 0.3),
    ("grew", 0.3),
    ("strong", 0.4),
    ("excellent", 0.5),
    ("good", 0.3),
    ("great", 0.4),
    ("profit", 0.4),
    ("profitable", 0.5),
    ("gain", 0.3),
    ("gains", 0.3),
    ("beat", 0.4),
    ("exceeded", 0.4),
    ("outperform", 0.4),
    ("upgrade", 0.4),
    ("upgraded", 0.4),
    ("record", 0.3),
    ("positive", 0.4),
    ("improved", 0.3),
    ("improvement", 0.3),
    ("momentum", 0.3),
    ("success", 0.4),
    ("successful", 0.4),
    ("win", 0.4),
    ("rally", 0.3),
    // Negative signals
    ("loss", -0.4),
    ("losses", -0.4),
    ("decline", -0.4),
    ("declined", -0.4),
    ("weak", -0.4),
    ("miss", -0.4),
    ("missed", -0.4),
    ("downgrade", -0.5),
    ("downgraded", -0.5),
    ("lawsuit", -0.5),
    ("fraud", -0.7),
    ("bankruptcy", -0.8),
    ("bankrupt", -0.8),
    ("default", -0.6),
    ("investigation", -0.5),
    ("probe", -0.4),
    ("recall", -0.6),
    ("layoffs", -0.5),
    ("warning", -0.4),
    ("concern", -0.3),
    ("concerns", -0.3),
    ("risk", -0.2),
    ("volatile", -0.3),
    ("plunge", -0.6),
    ("plunged", -0.6),
    ("crash", -0.7),
    ("scandal", -0.6),
    ("penalty", -0.4),
    ("fine", -0.3),
    ("negative", -0.4),
    ("bad", -0.4),
    ("terrible", -0.6),
    ("failed", -0.4),
    ("failure", -0.4),
];

/// Words that flip the polarity of the word that follows them.
const NEGATORS: &[&str] = &["not", "no", "never", "without"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// Polarity scores for one text.
///
/// `compound` is in [-1, 1]; `positive`/`negative`/`neutral` are token
/// proportions summing to ~1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResult {
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub label: SentimentLabel,
}

/// Score a text's polarity with the domain lexicon.
///
/// Tokens are lowercased with surrounding punctuation stripped; matched
/// weights are summed (a preceding negator flips a word's sign) and
/// normalized to [-1, 1]. Empty or unmatched text scores 0 and is neutral.
#[must_use]
pub fn analyze(text: &str) -> SentimentResult {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    if tokens.is_empty() {
        return SentimentResult {
            compound: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
            label: SentimentLabel::Neutral,
        };
    }

    let mut sum = 0.0_f64;
    let mut positive_hits = 0_usize;
    let mut negative_hits = 0_usize;

    for (i, token) in tokens.iter().enumerate() {
        let Some(&(_, weight)) = LEXICON.iter().find(|(word, _)| word == token) else {
            continue;
        };
        let negated = i > 0 && NEGATORS.contains(&tokens[i - 1].as_str());
        let weight = if negated { -weight } else { weight };
        if weight > 0.0 {
            positive_hits += 1;
        } else {
            negative_hits += 1;
        }
        sum += weight;
    }

    let compound = (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0);

    #[allow(clippy::cast_precision_loss)]
    let total = tokens.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let positive = positive_hits as f64 / total;
    #[allow(clippy::cast_precision_loss)]
    let negative = negative_hits as f64 / total;
    let neutral = (1.0 - positive - negative).max(0.0);

    SentimentResult {
        compound,
        positive,
        negative,
        neutral,
        label: label_for(compound),
    }
}

/// Score only the sentences that mention the entity.
///
/// Sentences are `.`-delimited; the match is a case-insensitive substring.
/// When no sentence mentions the entity, the whole text is scored instead.
#[must_use]
pub fn analyze_context(text: &str, entity_name: &str) -> SentimentResult {
    let needle = entity_name.to_lowercase();
    let relevant: Vec<&str> = text
        .split('.')
        .filter(|sentence| sentence.to_lowercase().contains(&needle))
        .collect();

    if relevant.is_empty() {
        return analyze(text);
    }

    analyze(&relevant.join(" "))
}

fn label_for(compound: f64) -> SentimentLabel {
    if compound >= LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if compound <= -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
