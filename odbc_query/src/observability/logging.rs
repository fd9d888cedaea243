use crate::diagnostic::SqlState;
use log::Level;
use std::collections::BTreeMap;

/// Thin wrapper over the `log` facade that renders `key=value` metadata
/// after a fixed prefix. Metadata is ordered so lines are stable.
pub struct QueryLogger {
    enabled: bool,
}

impl QueryLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn log_execute(&self, sql: &str, metadata: &BTreeMap<&str, String>) {
        if !self.enabled {
            return;
        }
        log::info!("{}", render(&format!("Execute: {}", sql), metadata));
    }

    pub fn log_page(&self, level: Level, metadata: &BTreeMap<&str, String>) {
        if !self.enabled {
            return;
        }
        log::log!(level, "{}", render("Page", metadata));
    }

    pub fn log_error(&self, state: SqlState, error: &str, metadata: &BTreeMap<&str, String>) {
        if !self.enabled {
            return;
        }
        log::error!(
            "{}",
            render(&format!("Error [{}]: {}", state, error), metadata)
        );
    }
}

impl Default for QueryLogger {
    fn default() -> Self {
        Self::new(true)
    }
}

fn render(prefix: &str, metadata: &BTreeMap<&str, String>) -> String {
    let mut message = prefix.to_string();
    for (key, value) in metadata {
        message.push_str(&format!(", {}={}", key, value));
    }
    message
}
