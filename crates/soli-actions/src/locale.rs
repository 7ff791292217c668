//! Embedded English message catalog.
//!
//! Messages live in `locales/en.toml`, keyed by dotted paths
//! (`error.loan.notFound`). The catalog is parsed once on first access.

use std::collections::HashMap;
use std::sync::OnceLock;

const EN_CATALOG: &str = include_str!("../locales/en.toml");

const GENERIC_KEY: &str = "error.generic";
const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

static MESSAGES: OnceLock<HashMap<String, String>> = OnceLock::new();

fn catalog() -> &'static HashMap<String, String> {
    MESSAGES.get_or_init(|| {
        let mut messages = HashMap::new();
        if let Ok(value) = EN_CATALOG.parse::<toml::Value>() {
            flatten("", &value, &mut messages);
        }
        messages
    })
}

fn flatten(prefix: &str, value: &toml::Value, out: &mut HashMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        toml::Value::String(message) => {
            out.insert(prefix.to_string(), message.clone());
        }
        _ => {}
    }
}

/// Resolve a translation key to its English message.
///
/// Unknown keys fall back to the generic message.
#[must_use]
pub fn message(key: &str) -> String {
    let messages = catalog();
    messages
        .get(key)
        .or_else(|| messages.get(GENERIC_KEY))
        .map_or_else(|| GENERIC_MESSAGE.to_string(), Clone::clone)
}
