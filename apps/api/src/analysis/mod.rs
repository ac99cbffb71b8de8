//! Resume-to-job match analysis.

pub mod gaps;
pub mod handlers;
pub mod keywords;
pub mod models;
pub mod pipeline;
pub mod scoring;
pub mod similarity;
pub mod skills;
pub mod taxonomy;
pub mod tokenizer;
