pub mod case;
pub mod client;
pub mod llm;
pub mod prompt;
pub mod relay;
pub mod render;
pub mod verdict;

pub use case::{CaseData, CaseFields};
pub use client::{ClientError, JudgeClient, DEFAULT_RELAY_URL};
pub use llm::{GeminiClient, GenerationClient, GenerationError, LlmSettings};
pub use relay::{RelayError, RelayService};
pub use render::{render_verdict, OutputFormat};
pub use verdict::{decode_verdict, DecodeError, VerdictResult, Winner};
