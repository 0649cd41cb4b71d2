//! Rule-based classification of catalog entries.
//!
//! Two independent passes per entry: the issue rules (multi-label) and the
//! category table (first match wins). Priority comes from the category; a
//! sensitive-data hit escalates to critical unless the entry is essential.
//! Essential entries are never flaggable, whatever else matched.

pub mod categories;
pub mod rules;

use serde::{Deserialize, Serialize};

pub use categories::{Action, Category, CategoryTable, Priority};
pub use rules::RuleSet;

use crate::catalog::{CatalogEntry, EntryKind};

/// Derived verdict for one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub entry_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    pub category: String,
    pub action: Action,
    pub priority: Priority,
    pub reason: String,
}

impl Classification {
    /// Flagged entries are removal candidates; essential entries never are.
    pub fn is_flagged(&self) -> bool {
        self.priority != Priority::Essential && !self.issues.is_empty()
    }
}

/// Classifier tying the rule table and category table together.
/// Both tables are injected so they can be tested (and tuned) in isolation.
pub struct Classifier {
    rules: RuleSet,
    categories: CategoryTable,
}

impl Classifier {
    pub fn new(rules: RuleSet, categories: CategoryTable) -> Self {
        Self { rules, categories }
    }

    pub fn with_defaults() -> Self {
        Self::new(RuleSet::builtin(), CategoryTable::builtin())
    }

    pub fn classify(&self, entry: &CatalogEntry, kind: EntryKind) -> Classification {
        let issues = self
            .rules
            .evaluate(&entry.name, entry.description.as_deref(), kind);
        let category = self.categories.assign(&entry.name);

        let mut priority = category.priority;
        if priority != Priority::Essential
            && issues.iter().any(|t| t == rules::tags::SENSITIVE_DATA)
        {
            priority = Priority::Critical;
        }

        let reason = if priority == Priority::Essential {
            format!("{} ({})", category.description, category.name)
        } else if issues.is_empty() {
            category.description.to_string()
        } else {
            format!("{}: {}", category.description, issues.join(", "))
        };

        Classification {
            entry_id: entry.id.clone(),
            issues,
            category: category.name.to_string(),
            action: category.action,
            priority,
            reason,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            data_type: None,
            event_type: None,
            created_at: None,
        }
    }

    #[test]
    fn zip_code_property_is_high_priority_address_data() {
        let c = Classifier::with_defaults().classify(&entry("p1", "zip_code"), EntryKind::Property);
        assert_eq!(c.category, "address_data");
        assert_eq!(c.priority, Priority::High);
        assert!(c.is_flagged());
        assert!(c.issues.iter().any(|t| t == rules::tags::ZIP_CODE));
    }

    #[test]
    fn user_id_is_essential_and_never_flagged() {
        // "userId" trips the mixed-case rule, but essential short-circuits.
        let c = Classifier::with_defaults().classify(&entry("p2", "userId"), EntryKind::Property);
        assert_eq!(c.priority, Priority::Essential);
        assert!(!c.is_flagged());
        assert!(!c.issues.is_empty());
    }

    #[test]
    fn old_debug_flag_is_deprecated_with_debug_issue() {
        let c = Classifier::with_defaults()
            .classify(&entry("p3", "old_debug_flag"), EntryKind::Property);
        assert_eq!(c.category, "deprecated");
        assert_eq!(c.priority, Priority::High);
        assert!(c.issues.iter().any(|t| t == rules::tags::DEBUG_TEMP));
        assert!(c.is_flagged());
    }

    #[test]
    fn sensitive_issue_escalates_priority_to_critical() {
        // Both the sensitive category and the sensitive rule match here;
        // priority lands on critical either way.
        let c = Classifier::with_defaults()
            .classify(&entry("p4", "old_password_field"), EntryKind::Property);
        assert_eq!(c.priority, Priority::Critical);
        assert!(c.issues.iter().any(|t| t == rules::tags::SENSITIVE_DATA));
    }

    #[test]
    fn sensitive_description_escalates_even_with_clean_name() {
        let mut e = entry("p5", "contact_details");
        e.description = Some("holds the credit card number".to_string());
        let c = Classifier::with_defaults().classify(&e, EntryKind::Property);
        assert_eq!(c.priority, Priority::Critical);
        assert!(c.is_flagged());
    }

    #[test]
    fn clean_uncategorized_entry_is_not_flagged() {
        let c = Classifier::with_defaults()
            .classify(&entry("p6", "checkout_step"), EntryKind::Property);
        assert_eq!(c.category, categories::UNCATEGORIZED);
        assert_eq!(c.priority, Priority::Low);
        assert!(c.issues.is_empty());
        assert!(!c.is_flagged());
    }

    #[test]
    fn essential_timestamp_with_issues_stays_exempt() {
        // An essential-matching name must never be flagged, whatever else
        // matched.
        let c = Classifier::with_defaults()
            .classify(&entry("p7", "originalTimestamp"), EntryKind::Property);
        assert_eq!(c.priority, Priority::Essential);
        assert!(!c.is_flagged());
    }
}
