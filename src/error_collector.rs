//! Centralized accumulation of non-fatal warnings.
//!
//! Mirrors the original harness's error collector: map and plugin warnings
//! are formatted with a stable prefix and kept in arrival order; writing
//! the dump to disk never aborts the run on failure.

use std::fs;
use std::io::Write;

const ERROR_FILE_NAME: &str = "input_errors.txt";

#[derive(Default)]
pub struct ErrorCollector {
    messages: Vec<String>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_map_warnings(&mut self, map_name: &str, warnings: &[String]) {
        for warning in warnings {
            self.messages.push(format!("Map '{}': {}", map_name, warning));
        }
    }

    pub fn add_game_manager_error(&mut self, path: &str, text: &str) {
        self.messages.push(format!("GameManager '{}': {}", path, text));
    }

    pub fn add_algorithm_error(&mut self, path: &str, text: &str) {
        self.messages.push(format!("Algorithm '{}': {}", path, text));
    }

    pub fn has_errors(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn all_errors(&self) -> &[String] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Best-effort dump to `input_errors.txt`. Never panics; logs and
    /// returns `false` on failure.
    pub fn save_to_file(&self) -> bool {
        if self.messages.is_empty() {
            return true;
        }
        match fs::File::create(ERROR_FILE_NAME) {
            Ok(mut file) => {
                for message in &self.messages {
                    if writeln!(file, "{}", message).is_err() {
                        log::warn!("failed writing a line to {}", ERROR_FILE_NAME);
                        return false;
                    }
                }
                true
            }
            Err(err) => {
                log::warn!("could not create {}: {}", ERROR_FILE_NAME, err);
                false
            }
        }
    }
}
