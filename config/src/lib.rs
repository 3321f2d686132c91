// Orangutan Configuration System
// Runtime settings and per-project orangutan.md management

pub mod project;
pub mod types;

pub use project::{
  build_auto_config, config_exists, config_path, detect_key_files, read_project_file,
  update_section, write_project_file,
};
pub use types::Config;
