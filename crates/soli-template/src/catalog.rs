//! The merge-tag catalog.
//!
//! Templates may only reference the tags enumerated here; the template
//! editor queries this catalog to offer them for insertion. Scalar groups
//! use absolute `{{group.field}}` paths, loop groups list the tags valid
//! inside their `{{#key}}...{{/key}}` block.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One insertable tag with its editor label.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MergeTag {
    pub tag: String,
    pub label: String,
}

/// A group of tags belonging to one dataset of the loan context.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MergeTagGroup {
    pub group: String,
    /// Loop key when the group repeats; its tags are element-relative.
    pub loop_key: Option<String>,
    pub tags: Vec<MergeTag>,
}

fn tag(tag: &str, label: &str) -> MergeTag {
    MergeTag {
        tag: tag.to_string(),
        label: label.to_string(),
    }
}

/// Every tag the engine resolves for a loan, plus the `page.*` tags the
/// downstream PDF layer substitutes after rendering.
#[must_use]
pub fn merge_tag_catalog() -> Vec<MergeTagGroup> {
    vec![
        MergeTagGroup {
            group: "lender".to_string(),
            loop_key: None,
            tags: vec![
                tag("{{lender.name}}", "Lender name"),
                tag("{{lender.email}}", "Lender email"),
                tag("{{lender.phone}}", "Lender phone"),
                tag("{{lender.iban}}", "Lender IBAN"),
                tag("{{lender.street}}", "Street"),
                tag("{{lender.postal_code}}", "Postal code"),
                tag("{{lender.city}}", "City"),
                tag("{{lender.country}}", "Country"),
            ],
        },
        MergeTagGroup {
            group: "loan".to_string(),
            loop_key: None,
            tags: vec![
                tag("{{loan.name}}", "Loan name"),
                tag("{{loan.principal}}", "Principal amount"),
                tag("{{loan.interest_rate}}", "Interest rate (percent)"),
                tag("{{loan.interest_method}}", "Interest method"),
                tag("{{loan.start_date}}", "Start date"),
                tag("{{loan.end_date}}", "End date"),
                tag("{{loan.status}}", "Loan status"),
            ],
        },
        MergeTagGroup {
            group: "transactions".to_string(),
            loop_key: Some("transactions".to_string()),
            tags: vec![
                tag("{{kind}}", "Transaction kind"),
                tag("{{amount}}", "Amount"),
                tag("{{booked_at}}", "Booking date"),
                tag("{{description}}", "Description"),
            ],
        },
        MergeTagGroup {
            group: "notes".to_string(),
            loop_key: Some("notes".to_string()),
            tags: vec![
                tag("{{content}}", "Note text"),
                tag("{{created_at}}", "Note date"),
            ],
        },
        MergeTagGroup {
            group: "config".to_string(),
            loop_key: None,
            tags: vec![
                tag("{{config.display_name}}", "Display name"),
                tag("{{config.primary_color}}", "Primary color"),
            ],
        },
        MergeTagGroup {
            group: "page".to_string(),
            loop_key: None,
            tags: vec![
                tag("{{page.number}}", "Page number"),
                tag("{{page.total}}", "Page count"),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tag_is_well_formed() {
        for group in merge_tag_catalog() {
            assert!(!group.tags.is_empty(), "group {} is empty", group.group);
            for tag in &group.tags {
                assert!(
                    tag.tag.starts_with("{{") && tag.tag.ends_with("}}"),
                    "malformed tag {}",
                    tag.tag
                );
                assert!(!tag.label.is_empty(), "tag {} has no label", tag.tag);
            }
        }
    }

    #[test]
    fn group_names_are_unique() {
        let catalog = merge_tag_catalog();
        let mut names: Vec<&str> = catalog.iter().map(|g| g.group.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn loop_groups_name_their_keys() {
        let catalog = merge_tag_catalog();
        let loop_keys: Vec<&str> = catalog
            .iter()
            .filter_map(|g| g.loop_key.as_deref())
            .collect();
        assert_eq!(loop_keys, ["transactions", "notes"]);
    }
}
