//! OpenTelemetry GenAI Semantic Convention attribute names, plus the
//! operation values vox records on its generative-service spans.
//!
//! Field names are dotted literals in `tracing` macros; these constants keep
//! them greppable and give exporters a single source for the values.

// --- GenAI attributes ---

/// The name of the operation being performed (e.g. "chat").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g. "gemini").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// The model ID requested.
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

// --- Operation name values ---

/// One turn of a conversational session.
pub const OP_CHAT: &str = "chat";

/// Stateless one-shot generation (transcript summaries).
pub const OP_GENERATE_CONTENT: &str = "generate_content";

// --- Provider name values ---

pub const PROVIDER_GEMINI: &str = "gemini";

