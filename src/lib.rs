pub mod analyzer;
pub mod blender;
pub mod config;
pub mod detection;
pub mod scorer;
pub mod sentiment;
pub mod server;

pub use analyzer::{AnalysisError, ScamAnalyzer};
pub use blender::{blend_scores, Decision, DecisionBlender, RiskTier, Verdict};
pub use config::Config;
pub use scorer::{AnalysisResult, HeuristicScorer, ScamType};
