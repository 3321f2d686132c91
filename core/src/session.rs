//! Conversation state
//!
//! Ordered, append-only message log for one REPL session. The system message
//! installed at construction is always first and is never removed.

use crate::model::{Message, Role};

#[derive(Debug, Clone)]
pub struct ConversationState {
  messages: Vec<Message>,
}

impl ConversationState {
  pub fn new(system_prompt: impl Into<String>) -> Self {
    Self {
      messages: vec![Message::system(system_prompt)],
    }
  }

  pub fn push_user(&mut self, content: impl Into<String>) {
    self.messages.push(Message::user(content));
  }

  pub fn push_assistant(&mut self, content: impl Into<String>) {
    self.messages.push(Message::assistant(content));
  }

  pub fn push_tool_result(&mut self, content: impl Into<String>) {
    self.messages.push(Message::tool_result(content));
  }

  /// Truncate back to just the system message, optionally replacing it.
  pub fn reset(&mut self, system_prompt: Option<String>) {
    let system = match system_prompt {
      Some(prompt) => Message::system(prompt),
      None => self.messages[0].clone(),
    };
    self.messages.clear();
    self.messages.push(system);
  }

  pub fn messages(&self) -> &[Message] {
    &self.messages
  }

  pub fn len(&self) -> usize {
    self.messages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.messages.is_empty()
  }

  pub fn count_role(&self, role: Role) -> usize {
    self.messages.iter().filter(|m| m.role == role).count()
  }
}
