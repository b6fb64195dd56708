//! Lexicon-based polarity scoring for news headlines and summaries

use std::collections::HashSet;

const POSITIVE_WORDS: &[&str] = &[
    "bullish", "rally", "rallies", "surge", "surges", "gain", "gains", "profit", "profits",
    "growth", "beat", "beats", "upgrade", "upgraded", "outperform", "strong", "stronger",
    "positive", "rise", "rises", "increase", "breakthrough", "innovation", "success",
    "exceed", "exceeds", "momentum", "buy", "recommend", "optimistic", "record", "high",
    "advance", "dividend", "buyback", "repurchase", "accretive", "upside", "recovery",
    "rebound", "expansion", "robust", "accelerating", "overweight", "raised", "soar",
    "soars", "tailwind", "win", "wins",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bearish", "decline", "declines", "loss", "losses", "fall", "falls", "plunge",
    "plunges", "crash", "miss", "misses", "downgrade", "downgraded", "underperform",
    "weak", "weaker", "negative", "drop", "drops", "decrease", "concern", "concerns",
    "risk", "fail", "fails", "disappoint", "disappointing", "slump", "sell", "warning",
    "pessimistic", "low", "retreat", "fear", "fears", "trouble", "dilution", "dilutive",
    "headwind", "lawsuit", "litigation", "recall", "investigation", "probe", "default",
    "bankruptcy", "restructuring", "layoff", "layoffs", "downside", "overvalued",
    "bubble", "underweight", "lowered", "suspended", "tumble", "tumbles",
];

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't",
    "weren't", "won't", "wouldn't", "couldn't", "shouldn't", "hardly", "barely",
    "neither", "nor", "without",
];

/// How many tokens back a negation word still flips polarity
const NEGATION_WINDOW: usize = 3;

/// Scores free text in `[-1, 1]` by counting lexicon hits
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
    negation: HashSet<&'static str>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
            negation: NEGATION_WORDS.iter().copied().collect(),
        }
    }

    /// `(positive - negative) / (positive + negative)`, or 0 with no hits.
    ///
    /// A lexicon word preceded by a negation within three tokens counts
    /// toward the opposite polarity.
    pub fn score(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| {
                c.is_whitespace() || matches!(c, ',' | ';' | '.' | '!' | '?' | ':' | '"' | '(' | ')')
            })
            .filter(|w| !w.is_empty())
            .collect();

        let mut positive = 0_u32;
        let mut negative = 0_u32;
        let mut last_negation: Option<usize> = None;

        for (i, word) in words.iter().enumerate() {
            if self.negation.contains(word) {
                last_negation = Some(i);
                continue;
            }

            let is_positive = self.positive.contains(word);
            let is_negative = self.negative.contains(word);
            if !is_positive && !is_negative {
                continue;
            }

            let negated = last_negation.is_some_and(|n| i - n <= NEGATION_WINDOW);
            if is_positive != negated {
                positive += 1;
            } else {
                negative += 1;
            }
        }

        let hits = positive + negative;
        if hits == 0 {
            return 0.0;
        }
        (f64::from(positive) - f64::from(negative)) / f64::from(hits)
    }
}
