pub mod gemini;
pub mod handle;
pub mod model;
pub mod parse;
pub mod prompt;
pub mod route;
pub mod service;

pub use gemini::{CompletionClient, GeminiClient};
pub use model::AnalysisResult;
pub use service::AnalysisService;
