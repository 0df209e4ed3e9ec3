//! Heuristic Scorer
//!
//! Scans message text against the indicator lexicons and the structural
//! patterns, accumulates a bounded score and picks a scam type.

use crate::detection::lexicon::{prepare_lexicons, IndicatorLexicon, LexiconCategory};
use crate::detection::structural::StructuralPatterns;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const MAX_SCORE: u32 = 100;
const LOTTERY_KEYWORD: &str = "lottery";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScamType {
    #[serde(rename = "Phishing Scam")]
    Phishing,
    #[serde(rename = "Investment Scam")]
    Investment,
    #[serde(rename = "Lottery Scam")]
    Lottery,
    #[serde(rename = "General Scam")]
    General,
}

impl ScamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScamType::Phishing => "Phishing Scam",
            ScamType::Investment => "Investment Scam",
            ScamType::Lottery => "Lottery Scam",
            ScamType::General => "General Scam",
        }
    }
}

impl fmt::Display for ScamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub raw_score: u32,
    pub matched_indicators: Vec<String>,
    pub scam_type: ScamType,
}

pub struct HeuristicScorer {
    lexicons: Vec<IndicatorLexicon>,
    patterns: StructuralPatterns,
}

impl HeuristicScorer {
    pub fn new(lexicons: &[IndicatorLexicon]) -> anyhow::Result<Self> {
        Ok(Self {
            lexicons: prepare_lexicons(lexicons)?,
            patterns: StructuralPatterns::new()?,
        })
    }

    pub fn lexicons(&self) -> &[IndicatorLexicon] {
        &self.lexicons
    }

    /// Scores a message. Total over all inputs, including empty text.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let lower = text.to_lowercase();
        let mut score: u32 = 0;
        let mut indicators = Indicators::default();
        let mut hit_categories = HashSet::new();

        for lexicon in &self.lexicons {
            for phrase in lexicon.matches(&lower) {
                log::debug!("Lexicon '{}' matched '{}'", lexicon.category, phrase);
                score = score.saturating_add(lexicon.weight);
                indicators.insert(phrase);
                hit_categories.insert(lexicon.category);
            }
        }

        for signal in self.patterns.detect(text, &lower) {
            log::debug!("Structural signal: {}", signal.label());
            score = score.saturating_add(signal.weight());
            indicators.insert(signal.label());
        }

        let scam_type = if hit_categories.contains(&LexiconCategory::Financial) {
            ScamType::Phishing
        } else if hit_categories.contains(&LexiconCategory::InvestmentScam) {
            ScamType::Investment
        } else if lower.contains(LOTTERY_KEYWORD) {
            ScamType::Lottery
        } else {
            ScamType::General
        };

        AnalysisResult {
            raw_score: score.min(MAX_SCORE),
            matched_indicators: indicators.into_vec(),
            scam_type,
        }
    }
}

/// Insertion-ordered set of indicator labels.
#[derive(Default)]
struct Indicators {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl Indicators {
    fn insert(&mut self, label: &str) {
        if self.seen.insert(label.to_string()) {
            self.ordered.push(label.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
