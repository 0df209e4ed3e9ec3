//! Signal detectors used by the heuristic scorer.

pub mod lexicon;
pub mod structural;

pub use lexicon::{default_lexicons, IndicatorLexicon, LexiconCategory};
pub use structural::{StructuralPatterns, StructuralSignal};
