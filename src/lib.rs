//! Daily ranked-ladder history from saved League of Graphs pages.
//!
//! A page embeds each queue's history as two JS literals (`lpData`, `rankData`)
//! inside a `rankingHistory-N` block. [`parser::extract_queue`] slices the block,
//! pulls both literals out, joins them into [`records::Record`]s and runs the
//! cleaning [`passes`], leaving one record per UTC+9 calendar day.

pub mod batch;
pub mod inputs;
pub mod output;
pub mod parser;
pub mod passes;
pub mod records;
pub mod settings;
