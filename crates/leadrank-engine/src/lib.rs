//! Lead scoring and ranking engine.
//!
//! Reads a raw lead table, normalizes each record, scores it on five
//! policy-driven dimensions, ranks the result, and writes the ranked table.
//! The [`view`] module serves the consumer side of that table.
//!
//! Record sources that harvest authors from publications can build input rows
//! with [`Normalizer::lead_from_affiliation`] and persist them with
//! [`write_raw_leads`]; the scoring pipeline itself only reads that table.

pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod ranker;
pub mod scorer;
pub mod table;
pub mod types;
pub mod view;

pub use error::EngineError;
pub use normalize::{guess_email, linkedin_handle, Normalizer};
pub use pipeline::{run_scoring, LeadEngine};
pub use ranker::{project, rank_leads, rerank_rows, Rankable, Ranking};
pub use scorer::{publication_year, Assessment, Scorer};
pub use table::{read_raw_leads, read_scored_rows, write_raw_leads, write_scored_rows};
pub use types::{BatchReport, BatchSummary, RawRecord, SkipReason, SkippedRecord, TierCounts};
pub use view::{export_view, location_options, LeadFilter, ViewMetrics};
