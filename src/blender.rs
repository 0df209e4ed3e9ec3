//! Decision Blender
//!
//! Merges the rule score with the auxiliary sentiment signal and maps the
//! result to a risk tier and a recommended action.

use crate::scorer::{AnalysisResult, ScamType, MAX_SCORE};
use crate::sentiment::{SentimentError, SentimentSource};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::Duration;

const RULE_WEIGHT: f64 = 0.7;
const AUX_WEIGHT: f64 = 0.3;
const HIGH_RISK_ABOVE: u32 = 75;
const MEDIUM_RISK_ABOVE: u32 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Tiers use strict comparisons: 75 is Medium, 45 is Low.
    pub fn from_score(score: u32) -> Self {
        if score > HIGH_RISK_ABOVE {
            RiskTier::High
        } else if score > MEDIUM_RISK_ABOVE {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }
}

impl Serialize for RiskTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    LikelySafe,
    VerifyBeforeResponding,
    DoNotRespond,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::LikelySafe => "LIKELY SAFE",
            Decision::VerifyBeforeResponding => "VERIFY BEFORE RESPONDING",
            Decision::DoNotRespond => "DO NOT RESPOND",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Decision::DoNotRespond => {
                "This message strongly matches scam behavior patterns. Do not reply, do not click links, and never share personal or financial details."
            }
            Decision::VerifyBeforeResponding => {
                "This message contains suspicious elements. Verify the sender independently before taking any action."
            }
            Decision::LikelySafe => {
                "No major scam indicators detected. Still remain cautious while engaging online."
            }
        }
    }
}

impl From<RiskTier> for Decision {
    fn from(tier: RiskTier) -> Self {
        match tier {
            RiskTier::High => Decision::DoNotRespond,
            RiskTier::Medium => Decision::VerifyBeforeResponding,
            RiskTier::Low => Decision::LikelySafe,
        }
    }
}

impl Serialize for Decision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Final outcome for one message. Field names follow the HTTP wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    #[serde(rename = "score")]
    pub final_score: u32,
    #[serde(rename = "ruleScore")]
    pub rule_score: u32,
    #[serde(rename = "aiScore")]
    pub aux_score: u32,
    #[serde(rename = "riskLevel")]
    pub risk_tier: RiskTier,
    #[serde(rename = "scamType")]
    pub scam_type: ScamType,
    #[serde(rename = "flaggedWords")]
    pub matched_indicators: Vec<String>,
    pub decision: Decision,
    #[serde(rename = "actionAdvice")]
    pub action_advice: String,
    #[serde(rename = "responseConfidence")]
    pub confidence: String,
}

/// Combines the rule score with the unrounded auxiliary signal (0.0..=100.0)
/// without any I/O. Only the reported `aux_score` is rounded.
pub fn blend_scores(analysis: &AnalysisResult, aux_signal: f64) -> Verdict {
    let aux_signal = aux_signal.clamp(0.0, MAX_SCORE as f64);
    let blended = analysis.raw_score as f64 * RULE_WEIGHT + aux_signal * AUX_WEIGHT;
    let final_score = (blended.round() as u32).min(MAX_SCORE);

    let risk_tier = RiskTier::from_score(final_score);
    let decision = Decision::from(risk_tier);

    Verdict {
        final_score,
        rule_score: analysis.raw_score,
        aux_score: aux_signal.round() as u32,
        risk_tier,
        scam_type: analysis.scam_type,
        matched_indicators: analysis.matched_indicators.clone(),
        decision,
        action_advice: decision.advice().to_string(),
        confidence: format!("{}%", final_score),
    }
}

#[derive(Clone)]
pub struct DecisionBlender {
    source: Arc<dyn SentimentSource>,
    timeout: Duration,
}

impl DecisionBlender {
    pub fn new(source: Arc<dyn SentimentSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// One bounded attempt, as confidence x 100 before rounding. Any failure
    /// yields 0.
    pub async fn aux_signal(&self, text: &str) -> f64 {
        let outcome = match tokio::time::timeout(self.timeout, self.source.classify(text)).await {
            Ok(result) => result,
            Err(_) => Err(SentimentError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(prediction) if prediction.is_negative() => {
                prediction.confidence.clamp(0.0, 1.0) * 100.0
            }
            Ok(_) => 0.0,
            Err(e) => {
                log::warn!(
                    "Sentiment source '{}' unavailable, using rule engine only: {}",
                    self.source.name(),
                    e
                );
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{DisabledSentiment, SentimentPrediction};
    use async_trait::async_trait;

    struct FixedSentiment(SentimentPrediction);

    #[async_trait]
    impl SentimentSource for FixedSentiment {
        async fn classify(&self, _text: &str) -> Result<SentimentPrediction, SentimentError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct SlowSentiment;

    #[async_trait]
    impl SentimentSource for SlowSentiment {
        async fn classify(&self, _text: &str) -> Result<SentimentPrediction, SentimentError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(SentimentPrediction {
                label: "NEGATIVE".into(),
                confidence: 1.0,
            })
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn analysis(raw_score: u32) -> AnalysisResult {
        AnalysisResult {
            raw_score,
            matched_indicators: vec!["otp".to_string()],
            scam_type: ScamType::Phishing,
        }
    }

    fn blender(source: impl SentimentSource + 'static) -> DecisionBlender {
        DecisionBlender::new(Arc::new(source), Duration::from_millis(100))
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RiskTier::from_score(0), RiskTier::Low);
        assert_eq!(RiskTier::from_score(45), RiskTier::Low);
        assert_eq!(RiskTier::from_score(46), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(75), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(76), RiskTier::High);
        assert_eq!(RiskTier::from_score(100), RiskTier::High);
    }

    #[test]
    fn test_decision_tracks_tier() {
        for score in 0..=100 {
            let verdict = blend_scores(&analysis(score), 0.0);
            let expected = match verdict.final_score {
                s if s > 75 => (RiskTier::High, "DO NOT RESPOND"),
                s if s > 45 => (RiskTier::Medium, "VERIFY BEFORE RESPONDING"),
                _ => (RiskTier::Low, "LIKELY SAFE"),
            };
            assert_eq!(verdict.risk_tier, expected.0);
            assert_eq!(verdict.decision.label(), expected.1);
            assert!(verdict.final_score <= 100);
        }
    }

    #[test]
    fn test_blend_weights() {
        let verdict = blend_scores(&analysis(100), 0.0);
        assert_eq!(verdict.final_score, 70);
        assert_eq!(verdict.risk_tier, RiskTier::Medium);

        let verdict = blend_scores(&analysis(100), 100.0);
        assert_eq!(verdict.final_score, 100);
        assert_eq!(verdict.decision, Decision::DoNotRespond);
        assert_eq!(verdict.confidence, "100%");

        let verdict = blend_scores(&analysis(50), 90.0);
        assert_eq!(verdict.final_score, 62);
        assert_eq!(verdict.aux_score, 90);
        assert_eq!(verdict.rule_score, 50);
    }

    #[test]
    fn test_aux_signal_blended_before_rounding() {
        // 45 * 0.7 + 46.6 * 0.3 = 45.48; a pre-rounded 47 would give 46
        let verdict = blend_scores(&analysis(45), 46.6);
        assert_eq!(verdict.final_score, 45);
        assert_eq!(verdict.aux_score, 47);
        assert_eq!(verdict.risk_tier, RiskTier::Low);
        assert_eq!(verdict.decision, Decision::LikelySafe);
    }

    #[test]
    fn test_verdict_wire_format() {
        let verdict = blend_scores(&analysis(0), 0.0);
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["score"], 0);
        assert_eq!(json["aiScore"], 0);
        assert_eq!(json["riskLevel"], "Low Risk");
        assert_eq!(json["scamType"], "Phishing Scam");
        assert_eq!(json["flaggedWords"][0], "otp");
        assert_eq!(json["decision"], "LIKELY SAFE");
        assert_eq!(json["responseConfidence"], "0%");
    }

    #[tokio::test]
    async fn test_negative_sentiment_contributes() {
        let blender = blender(FixedSentiment(SentimentPrediction {
            label: "NEGATIVE".into(),
            confidence: 0.876,
        }));
        let signal = blender.aux_signal("text").await;
        assert!((signal - 87.6).abs() < 1e-9);

        let verdict = blend_scores(&analysis(100), signal);
        assert_eq!(verdict.aux_score, 88);
        assert_eq!(verdict.final_score, 96);
        assert_eq!(verdict.risk_tier, RiskTier::High);
    }

    #[tokio::test]
    async fn test_boundary_confidence_stays_low() {
        let blender = blender(FixedSentiment(SentimentPrediction {
            label: "NEGATIVE".into(),
            confidence: 0.466,
        }));
        let verdict = blend_scores(&analysis(45), blender.aux_signal("text").await);
        assert_eq!(verdict.final_score, 45);
        assert_eq!(verdict.aux_score, 47);
        assert_eq!(verdict.decision, Decision::LikelySafe);
    }

    #[tokio::test]
    async fn test_non_negative_labels_ignored() {
        for label in ["POSITIVE", "negative"] {
            let blender = blender(FixedSentiment(SentimentPrediction {
                label: label.into(),
                confidence: 0.99,
            }));
            assert_eq!(blender.aux_signal("text").await, 0.0, "label: {label}");
        }
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_is_clamped() {
        let blender = blender(FixedSentiment(SentimentPrediction {
            label: "NEGATIVE".into(),
            confidence: 3.5,
        }));
        assert_eq!(blender.aux_signal("text").await, 100.0);
    }

    #[tokio::test]
    async fn test_failure_fails_open() {
        let signal = blender(DisabledSentiment).aux_signal("text").await;
        let verdict = blend_scores(&analysis(100), signal);
        assert_eq!(verdict.aux_score, 0);
        assert_eq!(verdict.final_score, 70);
    }

    #[tokio::test]
    async fn test_timeout_fails_open() {
        let signal = blender(SlowSentiment).aux_signal("text").await;
        let verdict = blend_scores(&analysis(100), signal);
        assert_eq!(verdict.aux_score, 0);
        assert_eq!(verdict.final_score, 70);
    }
}
