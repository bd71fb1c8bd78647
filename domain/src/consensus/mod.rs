//! Consensus analysis domain
//!
//! Clusters single-word (or short) model answers into consensus groups and
//! derives metrics and insights from the clustering.
//!
//! ```text
//! responses ──► normalize ──► greedy first-match grouping (similarity ≥ 0.8)
//!                                   │
//!                                   ▼
//!                   sort by count ─► percentages ─► palette colors
//!                                   │
//!                                   ▼
//!                ConsensusAnalysis ─► insights / summary statistics
//! ```

pub mod analyzer;
pub mod insight;
pub mod normalize;
pub mod palette;
pub mod similarity;
pub mod summary;

pub use analyzer::{
    ConsensusAnalysis, ConsensusAnalyzer, ConsensusGroup, DEFAULT_SIMILARITY_THRESHOLD,
    ResponseRecord, analyze,
};
pub use insight::{ConsensusStrength, DiversityBand, NO_RESPONSES_INSIGHT, generate_insights};
pub use normalize::normalize;
pub use palette::{PALETTE, color_for, hex_to_rgb};
pub use similarity::similarity;
pub use summary::{DistributionEntry, SummaryStatistics};
