//! Category assignment for catalog entries.
//!
//! An ordered table of (category, patterns) records; the first category with
//! any pattern substring-matching the lowercased name wins. Categories carry
//! the recommended action and remediation priority. Essential categories
//! protect platform-critical fields from ever becoming deletion candidates.

use serde::{Deserialize, Serialize};

/// Remediation urgency. `Essential` means "exempt from removal".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Important,
    Useful,
    Medium,
    Low,
    Essential,
}

/// Recommended action for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Keep,
    RemoveUrgent,
    RemoveRecommended,
    RemoveOptional,
    Evaluate,
    EvaluateBusiness,
    ManualReview,
}

/// One category record: name, matching patterns, and what to do about it.
#[derive(Debug, Clone)]
pub struct Category {
    pub name: &'static str,
    pub description: &'static str,
    pub patterns: &'static [&'static str],
    pub action: Action,
    pub priority: Priority,
}

pub const UNCATEGORIZED: &str = "uncategorized";

/// Ordered category table. Order matters: first match wins.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
    fallback: Category,
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            fallback: Category {
                name: UNCATEGORIZED,
                description: "No category pattern matched",
                patterns: &[],
                action: Action::ManualReview,
                priority: Priority::Low,
            },
        }
    }

    /// The built-in governance table.
    pub fn builtin() -> Self {
        Self::new(vec![
            Category {
                name: "essential_tracking",
                description: "Identifiers the platform needs to function",
                patterns: &["messageid", "rudderid", "userid", "anonymousid", "channel"],
                action: Action::Keep,
                priority: Priority::Essential,
            },
            Category {
                name: "essential_timestamps",
                description: "Timestamps required for temporal analysis",
                patterns: &["sentat", "originaltimestamp", "receivedat", "timestamp"],
                action: Action::Keep,
                priority: Priority::Essential,
            },
            Category {
                name: "sensitive_data",
                description: "Personal data that must not be tracked (LGPD/GDPR)",
                patterns: &[
                    "email",
                    "phone",
                    "cpf",
                    "cnpj",
                    "document",
                    "password",
                    "ssn",
                    "social_security",
                    "credit_card",
                ],
                action: Action::RemoveUrgent,
                priority: Priority::Critical,
            },
            Category {
                name: "address_data",
                description: "Address and postal data",
                patterns: &[
                    "cep", "address", "street", "city", "state", "country", "zipcode", "postal",
                    "zip",
                ],
                action: Action::RemoveRecommended,
                priority: Priority::High,
            },
            Category {
                name: "location_data",
                description: "GPS coordinates and precise location",
                patterns: &[
                    "latitude",
                    "longitude",
                    "location",
                    "geolocation",
                    "coordinates",
                ],
                action: Action::RemoveRecommended,
                priority: Priority::High,
            },
            Category {
                name: "deprecated",
                description: "Old or deprecated fields",
                patterns: &["old_", "legacy_", "deprecated", "_old", "_legacy", "unused_"],
                action: Action::RemoveRecommended,
                priority: Priority::High,
            },
            Category {
                name: "debug_data",
                description: "Debug and development leftovers",
                patterns: &["debug", "test", "staging", "temp", "tmp", "dev"],
                action: Action::RemoveOptional,
                priority: Priority::Medium,
            },
            Category {
                name: "internal_ids",
                description: "Internal identifiers with no analytics value",
                patterns: &["internal_", "system_", "db_", "row_id", "fingerprint"],
                action: Action::RemoveOptional,
                priority: Priority::Medium,
            },
            Category {
                name: "context_data",
                description: "Device, app, and locale context",
                patterns: &["context."],
                action: Action::Evaluate,
                priority: Priority::Useful,
            },
            Category {
                name: "integration_data",
                description: "Destination-specific payload",
                patterns: &[
                    "integrations.",
                    "facebook",
                    "google",
                    "amplitude",
                    "mixpanel",
                ],
                action: Action::Evaluate,
                priority: Priority::Useful,
            },
            Category {
                name: "error_data",
                description: "Errors, exceptions, and stack traces",
                patterns: &["error", "exception", "stack", "trace"],
                action: Action::RemoveOptional,
                priority: Priority::Medium,
            },
            Category {
                name: "business_data",
                description: "Business payload worth a product review",
                patterns: &[
                    "properties.",
                    "traits.",
                    "revenue",
                    "price",
                    "product",
                    "order",
                ],
                action: Action::EvaluateBusiness,
                priority: Priority::Important,
            },
        ])
    }

    /// Assign a category to a name. First match wins; no match falls back to
    /// `uncategorized` (low priority, manual review).
    pub fn assign(&self, name: &str) -> &Category {
        let lower = name.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.patterns.iter().any(|p| lower.contains(p)))
            .unwrap_or(&self.fallback)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_is_essential() {
        let table = CategoryTable::builtin();
        let cat = table.assign("userId");
        assert_eq!(cat.name, "essential_tracking");
        assert_eq!(cat.priority, Priority::Essential);
    }

    #[test]
    fn zip_code_is_address_data() {
        let table = CategoryTable::builtin();
        let cat = table.assign("zip_code");
        assert_eq!(cat.name, "address_data");
        assert_eq!(cat.priority, Priority::High);
        assert_eq!(cat.action, Action::RemoveRecommended);
    }

    #[test]
    fn old_prefix_wins_over_debug_pattern() {
        // "old_debug_flag" matches both deprecated and debug_data; the
        // earlier category in the table wins.
        let table = CategoryTable::builtin();
        let cat = table.assign("old_debug_flag");
        assert_eq!(cat.name, "deprecated");
        assert_eq!(cat.priority, Priority::High);
    }

    #[test]
    fn password_is_critical_sensitive_data() {
        let table = CategoryTable::builtin();
        let cat = table.assign("user_password_hash");
        assert_eq!(cat.name, "sensitive_data");
        assert_eq!(cat.priority, Priority::Critical);
        assert_eq!(cat.action, Action::RemoveUrgent);
    }

    #[test]
    fn unknown_name_falls_back_to_uncategorized() {
        let table = CategoryTable::builtin();
        let cat = table.assign("quantum_flux");
        assert_eq!(cat.name, UNCATEGORIZED);
        assert_eq!(cat.priority, Priority::Low);
        assert_eq!(cat.action, Action::ManualReview);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let table = CategoryTable::builtin();
        assert_eq!(table.assign("ZipCode").name, "address_data");
        assert_eq!(table.assign("SentAt").name, "essential_timestamps");
    }
}
