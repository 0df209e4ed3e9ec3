use regex::Regex;

const CHAT_INVITE_DOMAIN: &str = "chat.whatsapp.com";
const MIN_SHOUTING_LENGTH: usize = 15;

/// Non-lexical signals, each with a fixed weight and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralSignal {
    SuspiciousLink,
    ChatInviteLink,
    UnrealisticReturns,
    ExcessiveCapitalization,
}

impl StructuralSignal {
    pub fn weight(&self) -> u32 {
        match self {
            StructuralSignal::SuspiciousLink => 25,
            StructuralSignal::ChatInviteLink => 30,
            StructuralSignal::UnrealisticReturns => 20,
            StructuralSignal::ExcessiveCapitalization => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StructuralSignal::SuspiciousLink => "Suspicious Link",
            StructuralSignal::ChatInviteLink => "WhatsApp Invite Link",
            StructuralSignal::UnrealisticReturns => "Unrealistic Returns Pattern",
            StructuralSignal::ExcessiveCapitalization => "Excessive Capitalization",
        }
    }
}

pub struct StructuralPatterns {
    link_regex: Regex,
    returns_regex: Regex,
}

impl StructuralPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            link_regex: Regex::new(r"(http|https)://[^\s]+")?,
            returns_regex: Regex::new(r"\d+\s*(%|\+)|\b\d+\s*to\s*\d+")?,
        })
    }

    /// Returns every structural signal present. Checks are independent, so a
    /// chat invite URL yields both a link and an invite signal.
    pub fn detect(&self, original: &str, lower: &str) -> Vec<StructuralSignal> {
        let mut signals = Vec::new();

        if self.link_regex.is_match(lower) {
            signals.push(StructuralSignal::SuspiciousLink);
        }

        if lower.contains(CHAT_INVITE_DOMAIN) {
            signals.push(StructuralSignal::ChatInviteLink);
        }

        if self.returns_regex.is_match(lower) {
            signals.push(StructuralSignal::UnrealisticReturns);
        }

        if is_shouting(original) {
            signals.push(StructuralSignal::ExcessiveCapitalization);
        }

        signals
    }
}

// Text without any lowercase letters counts, digits and punctuation included.
fn is_shouting(original: &str) -> bool {
    original.chars().count() > MIN_SHOUTING_LENGTH && original == original.to_uppercase()
}
