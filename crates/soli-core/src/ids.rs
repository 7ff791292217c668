//! Entity ID prefixes.
//!
//! Every row ID is `{prefix}-{8 hex chars}`, generated in SQL via
//! `randomblob(4)` (see `SoliDb::generate_id`). The prefix makes IDs
//! self-describing in logs and Change entries.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_SESSION: &str = "ses";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_CONFIGURATION: &str = "cfg";
pub const PREFIX_LENDER: &str = "ldr";
pub const PREFIX_LOAN: &str = "lon";
pub const PREFIX_TRANSACTION: &str = "txn";
pub const PREFIX_NOTE: &str = "not";
pub const PREFIX_FILE: &str = "fil";
pub const PREFIX_TEMPLATE: &str = "tpl";
pub const PREFIX_VIEW: &str = "viw";
pub const PREFIX_CHANGE: &str = "chg";

/// All prefixes, for exhaustive tests and tooling.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_USER,
    PREFIX_SESSION,
    PREFIX_PROJECT,
    PREFIX_CONFIGURATION,
    PREFIX_LENDER,
    PREFIX_LOAN,
    PREFIX_TRANSACTION,
    PREFIX_NOTE,
    PREFIX_FILE,
    PREFIX_TEMPLATE,
    PREFIX_VIEW,
    PREFIX_CHANGE,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn prefixes_are_three_chars_and_unique() {
        let mut seen = HashSet::new();
        for prefix in ALL_PREFIXES {
            assert_eq!(prefix.len(), 3, "prefix '{prefix}' must be 3 chars");
            assert!(seen.insert(*prefix), "duplicate prefix '{prefix}'");
        }
    }
}
