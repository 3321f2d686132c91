//! Tool handlers
//!
//! One module per tool. [`default_registry`] wires the closed tool set to
//! the specs declared in [`crate::tools::spec`].

pub mod ask_user;
pub mod edit_file;
pub mod list_directory;
pub mod read_file;
pub mod run_command;
pub mod search;
pub mod update_config;
pub mod write_file;

use std::sync::Arc;

use crate::tools::prompt_service::PromptService;
use crate::tools::registry::{ToolHandler, ToolRegistry};
use crate::tools::spec::build_specs;

pub use ask_user::AskUserHandler;
pub use edit_file::EditFileHandler;
pub use list_directory::ListDirectoryHandler;
pub use read_file::ReadFileHandler;
pub use run_command::RunCommandHandler;
pub use search::{SearchContentHandler, SearchFilesHandler};
pub use update_config::UpdateConfigHandler;
pub use write_file::WriteFileHandler;

/// Build the registry with every tool this assistant exposes.
pub fn default_registry(prompt: Arc<dyn PromptService>) -> ToolRegistry {
  let mut registry = ToolRegistry::new();
  for spec in build_specs() {
    let handler: Arc<dyn ToolHandler> = match spec.name.as_str() {
      "ask_user" => Arc::new(AskUserHandler::new(prompt.clone())),
      "read_file" => Arc::new(ReadFileHandler),
      "write_file" => Arc::new(WriteFileHandler),
      "edit_file" => Arc::new(EditFileHandler),
      "run_command" => Arc::new(RunCommandHandler),
      "list_directory" => Arc::new(ListDirectoryHandler),
      "search_files" => Arc::new(SearchFilesHandler),
      "search_content" => Arc::new(SearchContentHandler),
      "update_config" => Arc::new(UpdateConfigHandler),
      other => unreachable!("spec without handler: {other}"),
    };
    registry.register_tool(spec, handler);
  }
  registry
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tools::prompt_service::PromptAnswer;

  struct NoPrompt;

  impl PromptService for NoPrompt {
    fn select(&self, _q: &str, _options: &[String]) -> PromptAnswer {
      PromptAnswer::Cancelled
    }

    fn input(&self, _q: &str) -> PromptAnswer {
      PromptAnswer::Cancelled
    }
  }

  #[test]
  fn every_spec_has_a_handler() {
    let registry = default_registry(Arc::new(NoPrompt));
    assert_eq!(registry.list_specs().len(), 9);
    for spec in registry.list_specs() {
      assert!(registry.get_spec(&spec.name).is_some());
    }
  }
}
