//! Aggregation of classified entries into a governance report.
//!
//! Single pass over the classified set; group keys keep first-seen order so
//! two runs over the same catalog serialize identically. The report is built
//! once and never mutated; display truncation applies to the stderr summary
//! only, the persisted JSON carries the full lists.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::classify::{Action, Classification, Priority};

/// Cap on example rows per group in the human-readable summary.
pub const EXAMPLE_CAP: usize = 5;

/// One entry together with its verdict, as persisted in the flagged dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEntry {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub classification: Classification,
}

/// Ordered key/count pair. A `Vec` of these preserves first-seen order,
/// which a map would not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_entries: usize,
    pub total_flagged: usize,
    pub issues: Vec<GroupCount>,
    pub categories: Vec<GroupCount>,
    pub priorities: Vec<GroupCount>,
    /// Display names shared by more than one catalog entry. Id dedup in the
    /// fetcher does not catch these: the entries are distinct, the names
    /// collide.
    pub duplicate_names: Vec<GroupCount>,
}

/// Compact row used inside recommendation buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRef {
    pub id: String,
    pub name: String,
    pub category: String,
    pub priority: Priority,
}

/// Per-category breakdown with the entries that landed in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    pub name: String,
    pub action: Action,
    pub priority: Priority,
    pub entries: Vec<EntryRef>,
}

/// Remediation buckets, keyed by the category's recommended action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub immediate_action: Vec<EntryRef>,
    pub high_priority: Vec<EntryRef>,
    pub medium_priority: Vec<EntryRef>,
    pub review_needed: Vec<EntryRef>,
    pub keep_essential: Vec<EntryRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub timestamp: String,
    pub summary: ReportSummary,
    pub categories: Vec<CategoryDetail>,
    pub recommendations: Recommendations,
    pub flagged: Vec<ClassifiedEntry>,
}

/// Build the report in one pass. `classified` must hold every entry of the
/// run (flagged or not), in fetch order.
pub fn aggregate(classified: &[ClassifiedEntry]) -> Report {
    let mut issues: Vec<GroupCount> = Vec::new();
    let mut category_counts: Vec<GroupCount> = Vec::new();
    let mut priorities: Vec<GroupCount> = Vec::new();
    let mut name_counts: Vec<GroupCount> = Vec::new();
    let mut categories: Vec<CategoryDetail> = Vec::new();
    let mut recommendations = Recommendations::default();
    let mut flagged: Vec<ClassifiedEntry> = Vec::new();

    for item in classified {
        let c = &item.classification;

        bump(&mut category_counts, c.category.as_str());
        bump(&mut priorities, priority_key(c.priority));
        bump(&mut name_counts, item.entry.name.as_str());

        if c.is_flagged() {
            for tag in &c.issues {
                bump(&mut issues, tag);
            }
            flagged.push(item.clone());
        }

        let entry_ref = EntryRef {
            id: item.entry.id.clone(),
            name: item.entry.name.clone(),
            category: c.category.clone(),
            priority: c.priority,
        };

        // Category details keep first-seen order; the action and priority
        // come from the first entry that opened the category.
        match categories.iter_mut().find(|d| d.name == c.category) {
            Some(detail) => detail.entries.push(entry_ref.clone()),
            None => categories.push(CategoryDetail {
                name: c.category.clone(),
                action: c.action,
                priority: c.priority,
                entries: vec![entry_ref.clone()],
            }),
        }

        // A critical entry always lands in the compliance bucket, even when
        // its category's action is milder (sensitive description on an
        // otherwise uncategorized name).
        if c.priority == Priority::Critical {
            recommendations.immediate_action.push(entry_ref);
        } else {
            match c.action {
                Action::RemoveUrgent => recommendations.immediate_action.push(entry_ref),
                Action::RemoveRecommended => recommendations.high_priority.push(entry_ref),
                Action::RemoveOptional => recommendations.medium_priority.push(entry_ref),
                Action::Evaluate | Action::EvaluateBusiness | Action::ManualReview => {
                    recommendations.review_needed.push(entry_ref)
                }
                Action::Keep => recommendations.keep_essential.push(entry_ref),
            }
        }
    }

    let duplicate_names: Vec<GroupCount> = name_counts
        .into_iter()
        .filter(|g| g.count > 1)
        .collect();

    Report {
        timestamp: Utc::now().to_rfc3339(),
        summary: ReportSummary {
            total_entries: classified.len(),
            total_flagged: flagged.len(),
            issues,
            categories: category_counts,
            priorities,
            duplicate_names,
        },
        categories,
        recommendations,
        flagged,
    }
}

fn bump(groups: &mut Vec<GroupCount>, key: &str) {
    if let Some(group) = groups.iter_mut().find(|g| g.key == key) {
        group.count += 1;
    } else {
        groups.push(GroupCount {
            key: key.to_string(),
            count: 1,
        });
    }
}

fn priority_key(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "critical",
        Priority::High => "high",
        Priority::Important => "important",
        Priority::Useful => "useful",
        Priority::Medium => "medium",
        Priority::Low => "low",
        Priority::Essential => "essential",
    }
}

impl Report {
    /// Print the human-readable summary to stderr, truncating example rows
    /// per group. The persisted report keeps everything.
    pub fn log_summary(&self) {
        log_status!(
            "report",
            "{} entries, {} flagged",
            self.summary.total_entries,
            self.summary.total_flagged
        );

        for group in &self.summary.issues {
            log_status!("report", "  issue {}: {}", group.key, group.count);
        }
        for group in &self.summary.categories {
            log_status!("report", "  category {}: {}", group.key, group.count);
        }
        for group in &self.summary.duplicate_names {
            log_status!(
                "report",
                "  duplicate name '{}': {} entries",
                group.key,
                group.count
            );
        }

        let buckets: [(&str, &Vec<EntryRef>); 4] = [
            ("remove urgently", &self.recommendations.immediate_action),
            ("remove recommended", &self.recommendations.high_priority),
            ("remove optional", &self.recommendations.medium_priority),
            ("review", &self.recommendations.review_needed),
        ];
        for (label, rows) in buckets {
            if rows.is_empty() {
                continue;
            }
            log_status!("report", "{}: {} entries", label, rows.len());
            for row in rows.iter().take(EXAMPLE_CAP) {
                log_status!("report", "  - {} ({})", row.name, row.id);
            }
            if rows.len() > EXAMPLE_CAP {
                log_status!("report", "  ... and {} more", rows.len() - EXAMPLE_CAP);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntryKind;
    use crate::classify::Classifier;

    fn classify_all(names: &[(&str, &str)]) -> Vec<ClassifiedEntry> {
        let classifier = Classifier::with_defaults();
        names
            .iter()
            .map(|(id, name)| {
                let entry = CatalogEntry {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: None,
                    data_type: None,
                    event_type: None,
                    created_at: None,
                };
                let classification = classifier.classify(&entry, EntryKind::Property);
                ClassifiedEntry {
                    entry,
                    classification,
                }
            })
            .collect()
    }

    #[test]
    fn scenario_report_counts_flagged_entries() {
        let classified = classify_all(&[
            ("p1", "zip_code"),
            ("p2", "userId"),
            ("p3", "old_debug_flag"),
        ]);
        let report = aggregate(&classified);

        assert_eq!(report.summary.total_entries, 3);
        assert_eq!(report.summary.total_flagged, 2);
        let flagged_ids: Vec<&str> =
            report.flagged.iter().map(|f| f.entry.id.as_str()).collect();
        assert_eq!(flagged_ids, vec!["p1", "p3"]);
        // userId lands in the keep bucket, the two flagged in high priority
        assert_eq!(report.recommendations.keep_essential.len(), 1);
        assert_eq!(report.recommendations.high_priority.len(), 2);
    }

    #[test]
    fn group_keys_keep_first_seen_order() {
        let classified = classify_all(&[
            ("p1", "old_flag"),
            ("p2", "zip_code"),
            ("p3", "legacy_field"),
        ]);
        let report = aggregate(&classified);

        let keys: Vec<&str> = report
            .summary
            .categories
            .iter()
            .map(|g| g.key.as_str())
            .collect();
        assert_eq!(keys, vec!["deprecated", "address_data"]);
        assert_eq!(report.summary.categories[0].count, 2);

        // Detail section mirrors the counts
        assert_eq!(report.categories.len(), 2);
        assert_eq!(report.categories[0].name, "deprecated");
        assert_eq!(report.categories[0].entries.len(), 2);
        assert_eq!(report.categories[0].entries[0].id, "p1");
    }

    #[test]
    fn report_round_trips_through_json() {
        let classified = classify_all(&[
            ("p1", "zip_code"),
            ("p2", "userId"),
            ("p3", "old_debug_flag"),
            ("p4", "user_email"),
        ]);
        let report = aggregate(&classified);

        let json = serde_json::to_string_pretty(&report).unwrap();
        let reloaded: Report = serde_json::from_str(&json).unwrap();

        assert_eq!(reloaded, report);
        assert_eq!(reloaded.summary.issues, report.summary.issues);
        assert_eq!(reloaded.summary.categories, report.summary.categories);
    }

    #[test]
    fn essential_entries_never_reach_flagged_list() {
        let classified = classify_all(&[("p1", "userId"), ("p2", "anonymousId")]);
        let report = aggregate(&classified);

        assert_eq!(report.summary.total_flagged, 0);
        assert!(report.flagged.is_empty());
        assert_eq!(report.recommendations.keep_essential.len(), 2);
    }

    #[test]
    fn shared_display_names_are_reported() {
        // Distinct ids, one colliding name: id dedup in the fetcher lets
        // both through, the summary must still surface the collision.
        let classified = classify_all(&[
            ("e1", "checkout_step"),
            ("e2", "checkout_step"),
            ("e3", "cart_total"),
        ]);
        let report = aggregate(&classified);

        assert_eq!(
            report.summary.duplicate_names,
            vec![GroupCount {
                key: "checkout_step".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn unique_names_produce_no_duplicate_groups() {
        let classified = classify_all(&[("p1", "zip_code"), ("p2", "userId")]);
        let report = aggregate(&classified);
        assert!(report.summary.duplicate_names.is_empty());
    }

    #[test]
    fn critical_entry_reaches_immediate_action_whatever_its_category() {
        // Clean uncategorized name, sensitive description: priority is
        // escalated to critical while the category action stays manual
        // review. The compliance bucket must still pick it up.
        let classifier = Classifier::with_defaults();
        let entry = CatalogEntry {
            id: "p1".to_string(),
            name: "contact_details".to_string(),
            description: Some("holds the credit card number".to_string()),
            data_type: None,
            event_type: None,
            created_at: None,
        };
        let classification = classifier.classify(&entry, EntryKind::Property);
        assert_eq!(classification.category, "uncategorized");

        let report = aggregate(&[ClassifiedEntry {
            entry,
            classification,
        }]);

        assert_eq!(report.recommendations.immediate_action.len(), 1);
        assert!(report.recommendations.review_needed.is_empty());
    }

    #[test]
    fn sensitive_entry_lands_in_immediate_action() {
        let classified = classify_all(&[("p1", "customer_email")]);
        let report = aggregate(&classified);

        assert_eq!(report.recommendations.immediate_action.len(), 1);
        assert_eq!(
            report.summary.priorities,
            vec![GroupCount {
                key: "critical".to_string(),
                count: 1
            }]
        );
    }
}
