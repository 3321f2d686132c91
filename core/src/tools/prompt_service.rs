//! Interactive prompt collaborator
//!
//! The ask_user tool delegates to this interface. Implementations may block
//! indefinitely: answering is human-paced and carries no timeout.

/// Developer's answer to one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAnswer {
  /// One of the offered options was picked.
  Selected(String),
  /// Free-typed text.
  Text(String),
  /// The developer declined to answer.
  Cancelled,
}

pub trait PromptService: Send + Sync {
  /// Ask with a fixed set of options to pick from.
  fn select(&self, question: &str, options: &[String]) -> PromptAnswer;

  /// Ask for free text.
  fn input(&self, question: &str) -> PromptAnswer;
}
