//! Bill field extraction module.

mod extractor;
mod parser;
pub mod rules;

pub use extractor::{BillExtractor, BillExtractorBuilder};
pub use parser::BillTextParser;
