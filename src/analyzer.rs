use crate::blender::{DecisionBlender, Verdict};
use crate::config::Config;
use crate::scorer::HeuristicScorer;
use crate::sentiment::{DisabledSentiment, HuggingFaceClient, SentimentSource};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Analysis failed: {0}")]
    Internal(String),
}

/// Entry point shared by the HTTP layer and the CLI.
#[derive(Clone)]
pub struct ScamAnalyzer {
    scorer: Arc<HeuristicScorer>,
    blender: DecisionBlender,
}

impl ScamAnalyzer {
    pub fn new(scorer: HeuristicScorer, blender: DecisionBlender) -> Self {
        Self {
            scorer: Arc::new(scorer),
            blender,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let scorer = HeuristicScorer::new(&config.lexicons())?;
        let timeout = Duration::from_secs(config.sentiment.timeout_seconds);

        let source: Arc<dyn SentimentSource> = if config.sentiment.enabled {
            Arc::new(HuggingFaceClient::new(
                config.sentiment.endpoint.clone(),
                config.sentiment.api_token.clone(),
                timeout,
            )?)
        } else {
            Arc::new(DisabledSentiment)
        };

        log::info!(
            "Analyzer ready: {} lexicons, sentiment source '{}'",
            scorer.lexicons().len(),
            source.name()
        );

        Ok(Self::new(scorer, DecisionBlender::new(source, timeout)))
    }

    pub fn scorer(&self) -> &HeuristicScorer {
        &self.scorer
    }

    /// Scores on the blocking pool while the sentiment request is in flight.
    pub async fn analyze(&self, message: &str) -> Result<Verdict, AnalysisError> {
        if message.is_empty() {
            return Err(AnalysisError::InvalidInput("Message is required".to_string()));
        }

        let scorer = Arc::clone(&self.scorer);
        let text = message.to_string();
        let scoring = tokio::task::spawn_blocking(move || scorer.analyze(&text));

        let (analysis, aux_signal) = tokio::join!(scoring, self.blender.aux_signal(message));
        let analysis = analysis.map_err(|e| {
            log::error!("Scoring task failed: {e}");
            AnalysisError::Internal(e.to_string())
        })?;

        let verdict = crate::blender::blend_scores(&analysis, aux_signal);
        log::info!(
            "Analyzed message: rule={} aux={} final={} type={} decision={}",
            verdict.rule_score,
            verdict.aux_score,
            verdict.final_score,
            verdict.scam_type,
            verdict.decision.label()
        );
        Ok(verdict)
    }
}
