pub mod backend;
pub mod generator;
pub mod pipeline;
pub mod prompt;

pub use backend::{ChatBackend, OpenAiClient};
pub use generator::{ContentGenerator, VARIANT_COUNT};
pub use pipeline::Pipeline;

pub mod prelude {
    pub use super::backend::ChatBackend;
    pub use super::generator::ContentGenerator;
    pub use super::pipeline::Pipeline;
    pub use lc_core::{Error, GenerationResult, Result, StyleConfig};
}
