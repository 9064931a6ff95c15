// Job pipeline: condense postings → persist contexts → rank → select.
// Ranking never hard-fails on format drift; see ranker::RankingMode.

pub mod condenser;
pub mod context_store;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod ranker;
