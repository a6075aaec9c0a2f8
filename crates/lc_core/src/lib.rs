pub mod error;
pub mod types;

pub use error::Error;
pub use types::{
    Citation, ExtractedArticle, GeneratedVariant, GenerationResult, LineBreakStyle,
    SearchEnrichment, StyleConfig, WritingStyle,
};

pub type Result<T> = std::result::Result<T, Error>;
