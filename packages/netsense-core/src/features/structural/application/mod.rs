//! Structural extraction application layer

mod extractor;

pub use extractor::StructuralExtractor;
