// Orangutan Core
// Human-in-the-loop agentic loop for local LLMs

pub mod context;
pub mod model;
pub mod prompt;
pub mod report;
pub mod reporter;
pub mod session;
pub mod tools;
pub mod turn;

pub use context::build_directory_tree;
pub use model::{ChatOutcome, Message, ModelService, OllamaClient, Role, TokenSink};
pub use prompt::build_system_prompt;
pub use report::{contains_report, format_report};
pub use reporter::{ConsoleReporter, NullReporter, StepReporter};
pub use session::ConversationState;
pub use tools::{PromptAnswer, PromptService, ToolContext, ToolRegistry, default_registry};
pub use turn::{TurnError, TurnOutcome, run_turn};
