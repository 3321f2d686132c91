use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// JSON schema representation for tool parameter contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonSchema {
  String {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
  },
  Number {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
  },
  Array {
    items: Box<JsonSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
  },
  Object {
    properties: BTreeMap<String, JsonSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<Vec<String>>,
  },
}

/// Static metadata per registered tool. Immutable, built once at startup;
/// also used to enumerate tools in the system prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
  pub name: String,
  pub description: String,
  pub input_schema: JsonSchema,
}

impl ToolSpec {
  pub fn new(
    name: impl Into<String>,
    description: impl Into<String>,
    input_schema: JsonSchema,
  ) -> Self {
    Self {
      name: name.into(),
      description: description.into(),
      input_schema,
    }
  }

  /// Required top-level parameter names, for dispatch-time validation.
  pub fn required_params(&self) -> &[String] {
    match &self.input_schema {
      JsonSchema::Object {
        required: Some(required),
        ..
      } => required,
      _ => &[],
    }
  }

  /// Parameter names with an example value, for the system prompt tool list.
  pub fn params_summary(&self) -> String {
    let JsonSchema::Object { properties, .. } = &self.input_schema else {
      return "{}".to_string();
    };
    let fields: Vec<String> = properties
      .keys()
      .map(|name| format!("\"{name}\": ..."))
      .collect();
    format!("{{{}}}", fields.join(", "))
  }
}

pub fn build_specs() -> Vec<ToolSpec> {
  vec![
    ask_user_tool(),
    read_file_tool(),
    write_file_tool(),
    edit_file_tool(),
    run_command_tool(),
    list_directory_tool(),
    search_files_tool(),
    search_content_tool(),
    update_config_tool(),
  ]
}

fn obj(properties: BTreeMap<String, JsonSchema>, required: &[&str]) -> JsonSchema {
  JsonSchema::Object {
    properties,
    required: if required.is_empty() {
      None
    } else {
      Some(required.iter().map(|s| s.to_string()).collect())
    },
  }
}

fn str_field(desc: &str) -> JsonSchema {
  JsonSchema::String {
    description: Some(desc.to_string()),
  }
}

fn int_field(desc: &str) -> JsonSchema {
  JsonSchema::Number {
    description: Some(desc.to_string()),
  }
}

fn str_list_field(desc: &str) -> JsonSchema {
  JsonSchema::Array {
    items: Box::new(JsonSchema::String { description: None }),
    description: Some(desc.to_string()),
  }
}

fn ask_user_tool() -> ToolSpec {
  let mut props = BTreeMap::new();
  props.insert("question".to_string(), str_field("Question to the developer"));
  props.insert(
    "options".to_string(),
    str_list_field("Choices for the developer to pick from (optional)"),
  );
  ToolSpec::new(
    "ask_user",
    "Ask the developer a question (USE THIS CONSTANTLY)",
    obj(props, &["question"]),
  )
}

fn read_file_tool() -> ToolSpec {
  let mut props = BTreeMap::new();
  props.insert("path".to_string(), str_field("Project-relative file path"));
  props.insert("offset".to_string(), int_field("Start line offset"));
  ToolSpec::new("read_file", "Read file contents", obj(props, &["path"]))
}

fn write_file_tool() -> ToolSpec {
  let mut props = BTreeMap::new();
  props.insert("path".to_string(), str_field("Project-relative file path"));
  props.insert("content".to_string(), str_field("File content"));
  ToolSpec::new(
    "write_file",
    "Create or overwrite a file",
    obj(props, &["path", "content"]),
  )
}

fn edit_file_tool() -> ToolSpec {
  let mut props = BTreeMap::new();
  props.insert("path".to_string(), str_field("Project-relative file path"));
  props.insert("old_string".to_string(), str_field("Text to find"));
  props.insert("new_string".to_string(), str_field("Replacement"));
  ToolSpec::new(
    "edit_file",
    "Replace a specific string in a file",
    obj(props, &["path", "old_string", "new_string"]),
  )
}

fn run_command_tool() -> ToolSpec {
  let mut props = BTreeMap::new();
  props.insert("command".to_string(), str_field("The command to run"));
  ToolSpec::new(
    "run_command",
    "Execute a shell command",
    obj(props, &["command"]),
  )
}

fn list_directory_tool() -> ToolSpec {
  let mut props = BTreeMap::new();
  props.insert("path".to_string(), str_field("Project-relative directory"));
  ToolSpec::new(
    "list_directory",
    "List directory entries with sizes",
    obj(props, &[]),
  )
}

fn search_files_tool() -> ToolSpec {
  let mut props = BTreeMap::new();
  props.insert("pattern".to_string(), str_field("Filename glob pattern"));
  ToolSpec::new(
    "search_files",
    "Find files by name pattern",
    obj(props, &[]),
  )
}

fn search_content_tool() -> ToolSpec {
  let mut props = BTreeMap::new();
  props.insert("pattern".to_string(), str_field("Substring to search for"));
  props.insert("glob".to_string(), str_field("Filename glob filter"));
  ToolSpec::new(
    "search_content",
    "Search file contents for a substring",
    obj(props, &["pattern"]),
  )
}

fn update_config_tool() -> ToolSpec {
  let mut props = BTreeMap::new();
  props.insert("section".to_string(), str_field("Section header name"));
  props.insert("content".to_string(), str_field("New section body"));
  ToolSpec::new(
    "update_config",
    "Update a section of orangutan.md",
    obj(props, &["section", "content"]),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn required_params_come_from_object_schema() {
    let spec = edit_file_tool();
    assert_eq!(spec.required_params(), ["path", "old_string", "new_string"]);
    assert!(list_directory_tool().required_params().is_empty());
  }

  #[test]
  fn specs_cover_the_closed_tool_set() {
    let names: Vec<String> = build_specs().into_iter().map(|s| s.name).collect();
    assert!(names.contains(&"ask_user".to_string()));
    assert!(names.contains(&"edit_file".to_string()));
    assert!(names.contains(&"run_command".to_string()));
    assert_eq!(names.len(), 9);
  }
}
