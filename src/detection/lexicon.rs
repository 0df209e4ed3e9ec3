use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Category of a lexical scam signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LexiconCategory {
    Urgency,
    Threat,
    Financial,
    PersonalInfo,
    InvestmentScam,
    SocialManipulation,
}

impl LexiconCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LexiconCategory::Urgency => "urgency",
            LexiconCategory::Threat => "threat",
            LexiconCategory::Financial => "financial",
            LexiconCategory::PersonalInfo => "personal-info",
            LexiconCategory::InvestmentScam => "investment-scam",
            LexiconCategory::SocialManipulation => "social-manipulation",
        }
    }
}

impl fmt::Display for LexiconCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named set of trigger phrases sharing one weight.
///
/// Each phrase is matched as a case-insensitive substring and contributes the
/// weight at most once per message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorLexicon {
    pub category: LexiconCategory,
    pub weight: u32,
    pub phrases: Vec<String>,
}

impl IndicatorLexicon {
    pub fn new(category: LexiconCategory, weight: u32, phrases: &[&str]) -> Self {
        Self {
            category,
            weight,
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Lowercases and de-duplicates phrases, keeping first-seen order.
    pub fn normalized(&self) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        let mut phrases = Vec::with_capacity(self.phrases.len());

        for phrase in &self.phrases {
            let phrase = phrase.to_lowercase();
            if phrase.trim().is_empty() {
                anyhow::bail!("Lexicon '{}' contains an empty phrase", self.category);
            }
            if seen.insert(phrase.clone()) {
                phrases.push(phrase);
            }
        }

        Ok(Self {
            category: self.category,
            weight: self.weight,
            phrases,
        })
    }

    /// Phrases present in already-lowercased text.
    pub fn matches<'a>(&'a self, lower_text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.phrases
            .iter()
            .map(String::as_str)
            .filter(move |phrase| lower_text.contains(phrase))
    }
}

/// The built-in lexicon table.
pub fn default_lexicons() -> Vec<IndicatorLexicon> {
    vec![
        IndicatorLexicon::new(
            LexiconCategory::Urgency,
            15,
            &["urgent", "immediately", "now", "hurry"],
        ),
        IndicatorLexicon::new(
            LexiconCategory::Threat,
            20,
            &["blocked", "suspended", "terminated", "deactivated"],
        ),
        IndicatorLexicon::new(
            LexiconCategory::Financial,
            20,
            &["bank", "account", "otp", "kyc", "upi", "loan"],
        ),
        IndicatorLexicon::new(
            LexiconCategory::PersonalInfo,
            25,
            &["password", "pin", "cvv", "verify"],
        ),
        IndicatorLexicon::new(
            LexiconCategory::InvestmentScam,
            25,
            &[
                "multibagger",
                "guaranteed",
                "double",
                "profit",
                "returns",
                "stock tip",
                "investment",
                "crypto",
                "high returns",
                "limited seats",
                "pump",
                "go up",
                "target price",
            ],
        ),
        IndicatorLexicon::new(
            LexiconCategory::SocialManipulation,
            20,
            &[
                "join free",
                "whatsapp group",
                "telegram group",
                "no advance payment",
            ],
        ),
    ]
}

/// Normalizes a lexicon table and rejects duplicate categories.
pub fn prepare_lexicons(lexicons: &[IndicatorLexicon]) -> anyhow::Result<Vec<IndicatorLexicon>> {
    if lexicons.is_empty() {
        anyhow::bail!("At least one indicator lexicon is required");
    }

    let mut categories = HashSet::new();
    let mut prepared = Vec::with_capacity(lexicons.len());

    for lexicon in lexicons {
        if !categories.insert(lexicon.category) {
            anyhow::bail!("Lexicon category '{}' is defined twice", lexicon.category);
        }
        prepared.push(lexicon.normalized()?);
    }

    Ok(prepared)
}
