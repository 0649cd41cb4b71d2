//! Issue detection rules.
//!
//! An ordered rule table evaluated against the lowercased entry name (the
//! sensitive-data rules also scan the description). Multi-label: every
//! matching rule contributes its tag, so one entry can carry several issues.

use regex::Regex;

use crate::catalog::EntryKind;

/// Issue tags, one short code per detected violation.
pub mod tags {
    pub const MISSING_SEPARATOR: &str = "MISSING_SEPARATOR";
    pub const STRAY_SEPARATOR: &str = "STRAY_SEPARATOR";
    pub const TOO_SHORT: &str = "TOO_SHORT";
    pub const TOO_LONG: &str = "TOO_LONG";
    pub const NUMERIC_ONLY: &str = "NUMERIC_ONLY";
    pub const NO_MEANING: &str = "NO_MEANING";
    pub const GENERIC_NAME: &str = "GENERIC_NAME";
    pub const ZIP_CODE: &str = "ZIP_CODE";
    pub const SENSITIVE_DATA: &str = "SENSITIVE_DATA";
    pub const DEBUG_TEMP: &str = "DEBUG_TEMP";
    pub const SPECIAL_CHARS: &str = "SPECIAL_CHARS";
    pub const HAS_SPACES: &str = "HAS_SPACES";
    pub const MIXED_CASE: &str = "MIXED_CASE";
}

/// Misspelling substring mapped to its issue tag.
#[derive(Debug, Clone)]
pub struct TypoRule {
    pub misspelling: &'static str,
    pub tag: &'static str,
}

const TYPO_RULES: &[TypoRule] = &[
    TypoRule { misspelling: "adress", tag: "ADDRESS_TYPO" },
    TypoRule { misspelling: "recieve", tag: "RECEIVE_TYPO" },
    TypoRule { misspelling: "seperate", tag: "SEPARATE_TYPO" },
    TypoRule { misspelling: "occured", tag: "OCCURRED_TYPO" },
    TypoRule { misspelling: "sucessful", tag: "SUCCESSFUL_TYPO" },
    TypoRule { misspelling: "lenght", tag: "LENGTH_TYPO" },
    TypoRule { misspelling: "widht", tag: "WIDTH_TYPO" },
    TypoRule { misspelling: "heigth", tag: "HEIGHT_TYPO" },
    TypoRule { misspelling: "colum", tag: "COLUMN_TYPO" },
    TypoRule { misspelling: "tabel", tag: "TABLE_TYPO" },
];

const GENERIC_NAMES: &[&str] = &[
    "success", "done", "click", "ok", "yes", "no", "true", "false", "event", "data",
];

const SENSITIVE_PATTERNS: &[&str] = &[
    r"password",
    r"ssn",
    r"social.*security",
    r"credit.*card",
    r"bank.*account",
    r"routing.*number",
    r"email",
    r"phone",
    r"cpf",
    r"cnpj",
];

const LIFECYCLE_PATTERNS: &[&str] = &[
    r"test_", r"debug_", r"temp_", r"tmp_", r"old_", r"legacy_", r"deprecated", r"_test$",
    r"_debug$", r"_temp$", r"_tmp$", r"_old$",
];

/// The ordered rule table. Built once at startup and passed by reference
/// into the classifier; tests construct their own.
#[derive(Debug)]
pub struct RuleSet {
    generic_names: Vec<&'static str>,
    typos: Vec<TypoRule>,
    zip: Regex,
    sensitive: Vec<Regex>,
    lifecycle: Vec<Regex>,
    special_chars: Regex,
}

impl RuleSet {
    pub fn builtin() -> Self {
        Self {
            generic_names: GENERIC_NAMES.to_vec(),
            typos: TYPO_RULES.to_vec(),
            zip: Regex::new(r"zip.*code|postal.*code|cep|zipcode").expect("valid zip pattern"),
            sensitive: SENSITIVE_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("valid sensitive pattern"))
                .collect(),
            lifecycle: LIFECYCLE_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("valid lifecycle pattern"))
                .collect(),
            special_chars: Regex::new(r"[^\w\s\-_.|]").expect("valid special-chars pattern"),
        }
    }

    /// Minimum descriptive length per entry kind.
    pub fn min_len(kind: EntryKind) -> usize {
        match kind {
            EntryKind::Event => 6,
            EntryKind::Property => 3,
        }
    }

    /// Length ceiling per entry kind.
    pub fn max_len(kind: EntryKind) -> usize {
        match kind {
            EntryKind::Event => 50,
            EntryKind::Property => 80,
        }
    }

    /// Evaluate all rules. Returns the matched issue tags in rule order,
    /// duplicate-free. Empty result means the name passed every rule.
    pub fn evaluate(&self, name: &str, description: Option<&str>, kind: EntryKind) -> Vec<String> {
        let mut issues: Vec<String> = Vec::new();
        let push = |issues: &mut Vec<String>, tag: &str| {
            if !issues.iter().any(|t| t == tag) {
                issues.push(tag.to_string());
            }
        };

        // Empty name only trips the length rule; nothing else applies.
        if name.is_empty() {
            push(&mut issues, tags::TOO_SHORT);
            return issues;
        }

        let lower = name.to_lowercase();
        let char_count = name.chars().count();

        // Structural format
        match kind {
            EntryKind::Event => {
                if !name.contains('|') {
                    push(&mut issues, tags::MISSING_SEPARATOR);
                }
            }
            EntryKind::Property => {
                if name.contains('|') {
                    push(&mut issues, tags::STRAY_SEPARATOR);
                }
            }
        }
        if char_count < Self::min_len(kind) {
            push(&mut issues, tags::TOO_SHORT);
        }
        if name.chars().all(|c| c.is_ascii_digit()) {
            push(&mut issues, tags::NUMERIC_ONLY);
        }
        if char_count <= 2 && name.chars().all(|c| c.is_ascii_alphabetic()) {
            push(&mut issues, tags::NO_MEANING);
        }

        // Generic-name blocklist (exact, case-insensitive)
        if self.generic_names.contains(&lower.as_str()) {
            push(&mut issues, tags::GENERIC_NAME);
        }

        // Typo dictionary
        for typo in &self.typos {
            if lower.contains(typo.misspelling) {
                push(&mut issues, typo.tag);
            }
        }

        // Zip/postal detection
        if self.zip.is_match(&lower) {
            push(&mut issues, tags::ZIP_CODE);
        }

        // Sensitive data: name or description
        let description_lower = description.map(|d| d.to_lowercase());
        let sensitive_hit = self.sensitive.iter().any(|re| {
            re.is_match(&lower)
                || description_lower
                    .as_deref()
                    .map(|d| re.is_match(d))
                    .unwrap_or(false)
        });
        if sensitive_hit {
            push(&mut issues, tags::SENSITIVE_DATA);
        }

        // Deprecated/debug lifecycle markers
        if self.lifecycle.iter().any(|re| re.is_match(&lower)) {
            push(&mut issues, tags::DEBUG_TEMP);
        }

        // Character hygiene
        if self.special_chars.is_match(name) {
            push(&mut issues, tags::SPECIAL_CHARS);
        }
        if name.contains(' ') && kind == EntryKind::Property {
            push(&mut issues, tags::HAS_SPACES);
        }
        let has_letters = name.chars().any(|c| c.is_alphabetic());
        if has_letters && name != lower && name != name.to_uppercase() {
            push(&mut issues, tags::MIXED_CASE);
        }

        // Length ceiling
        if char_count > Self::max_len(kind) {
            push(&mut issues, tags::TOO_LONG);
        }

        issues
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}
