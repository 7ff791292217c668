//! Action implementations, one module per entity.
//!
//! All methods live on [`crate::Actions`]. Mutations follow the same order:
//! validate, authorize, write, record the change, revalidate. Reads follow
//! fetch-then-authorize, so a missing entity reports not-found rather than
//! forbidden.

pub mod change;
pub mod configuration;
pub mod dashboard;
pub mod file;
pub mod lender;
pub mod loan;
pub mod note;
pub mod project;
pub mod template;
pub mod transaction;
pub mod view;

/// Build an FTS5 `MATCH` operand from free-form search text.
///
/// Every whitespace-separated term becomes a quoted prefix phrase, so input
/// like `greta@example.com` is matched literally instead of being parsed as
/// FTS5 query syntax. Returns an empty string for blank input; callers must
/// not pass that to `MATCH`.
pub(crate) fn fts_prefix_query(raw: &str) -> String {
    raw.split_whitespace()
        .map(|term| format!("\"{}\"*", term.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::fts_prefix_query;

    #[test]
    fn terms_become_quoted_prefixes() {
        assert_eq!(fts_prefix_query("greta"), "\"greta\"*");
        assert_eq!(fts_prefix_query("greta janssen"), "\"greta\"* \"janssen\"*");
        assert_eq!(
            fts_prefix_query("greta@example.com"),
            "\"greta@example.com\"*"
        );
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(fts_prefix_query("o\"brien"), "\"o\"\"brien\"*");
    }

    #[test]
    fn blank_input_yields_empty_query() {
        assert_eq!(fts_prefix_query("   "), "");
    }
}
