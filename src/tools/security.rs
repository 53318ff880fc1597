//! Configuration-driven statement policy.
//!
//! Two checks, both plain string matching:
//! - an allow-list of leading SQL verbs for the query path
//! - a deny-list of table names for the schema-describe path
//!
//! Neither check parses SQL. Table names embedded in free-form statement text are
//! not inspected.

use serde::Deserialize;

/// Verbs allowed when the settings carry no `Security` section.
pub const DEFAULT_ALLOWED_COMMANDS: &[&str] = &["SELECT"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityPolicy {
    #[serde(default)]
    pub allowed_commands: Vec<String>,
    #[serde(default)]
    pub restricted_tables: Vec<String>,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            allowed_commands: DEFAULT_ALLOWED_COMMANDS
                .iter()
                .map(|verb| verb.to_string())
                .collect(),
            restricted_tables: Vec::new(),
        }
    }
}

impl SecurityPolicy {
    pub fn new(
        allowed_commands: impl IntoIterator<Item = impl Into<String>>,
        restricted_tables: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            allowed_commands: allowed_commands.into_iter().map(Into::into).collect(),
            restricted_tables: restricted_tables.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the statement's leading token is an allowed verb.
    ///
    /// The trimmed text must start with an allowed entry (case-insensitive) and the
    /// match must end on a word boundary, so `SELECT` admits `select *` and
    /// `SELECT\n1` but not `SELECTX`. Blank entries never match.
    pub fn is_command_allowed(&self, sql: &str) -> bool {
        let text = sql.trim_start();
        if text.trim_end().is_empty() {
            return false;
        }
        self.allowed_commands
            .iter()
            .map(|verb| verb.trim())
            .filter(|verb| !verb.is_empty())
            .any(|verb| starts_with_word(text, verb))
    }

    /// Exact case-insensitive match against the restricted table list. Case folding
    /// covers non-ASCII letters too.
    pub fn is_table_restricted(&self, table_name: &str) -> bool {
        let name = table_name.trim().to_lowercase();
        self.restricted_tables
            .iter()
            .any(|restricted| restricted.trim().to_lowercase() == name)
    }
}

fn starts_with_word(text: &str, word: &str) -> bool {
    let Some(head) = text.get(..word.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(word) {
        return false;
    }
    match text[word.len()..].chars().next() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '_'),
    }
}

/// Whether the statement is a read that belongs on the query path.
pub fn is_select_statement(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("SELECT"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(allowed: &[&str]) -> SecurityPolicy {
        SecurityPolicy::new(allowed.iter().copied(), Vec::<String>::new())
    }

    #[test]
    fn test_default_allows_select_only() {
        let policy = SecurityPolicy::default();
        assert!(policy.is_command_allowed("SELECT 1"));
        assert!(!policy.is_command_allowed("DELETE FROM users"));
        assert!(policy.restricted_tables.is_empty());
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let policy = policy(&["SELECT"]);
        assert!(policy.is_command_allowed("select * from users"));
        assert!(policy.is_command_allowed("  \n\tSeLeCt id FROM t"));
        assert!(policy.is_command_allowed("SELECT"));
        assert!(policy.is_command_allowed("SELECT*FROM t"));
    }

    #[test]
    fn test_requires_word_boundary() {
        let policy = policy(&["SELECT"]);
        assert!(!policy.is_command_allowed("SELECTX FROM t"));
        assert!(!policy.is_command_allowed("SELECT_ALL"));
    }

    #[test]
    fn test_multiple_verbs() {
        let policy = policy(&["SELECT", "WITH", "PRAGMA"]);
        assert!(policy.is_command_allowed("WITH x AS (SELECT 1) SELECT * FROM x"));
        assert!(policy.is_command_allowed("pragma table_info(users)"));
        assert!(!policy.is_command_allowed("UPDATE users SET a = 1"));
    }

    #[test]
    fn test_empty_inputs_blocked() {
        let policy = policy(&["SELECT", ""]);
        assert!(!policy.is_command_allowed(""));
        assert!(!policy.is_command_allowed("   "));
        assert!(!policy.is_command_allowed("(SELECT 1)"));
    }

    #[test]
    fn test_empty_allow_list_blocks_everything() {
        let policy = policy(&[]);
        assert!(!policy.is_command_allowed("SELECT 1"));
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let policy = policy(&["SELECT"]);
        assert!(!policy.is_command_allowed("sélect 1"));
        assert!(!policy.is_command_allowed("日本語"));
    }

    #[test]
    fn test_restricted_tables_exact_case_insensitive() {
        let policy = SecurityPolicy::new(["SELECT"], ["admin_settings", "Secrets"]);
        assert!(policy.is_table_restricted("Admin_Settings"));
        assert!(policy.is_table_restricted("ADMIN_SETTINGS"));
        assert!(policy.is_table_restricted("secrets"));
        assert!(!policy.is_table_restricted("admin_settings_archive"));
        assert!(!policy.is_table_restricted("users"));
    }

    #[test]
    fn test_is_select_statement() {
        assert!(is_select_statement("SELECT 1"));
        assert!(is_select_statement("   select * from t"));
        assert!(is_select_statement("\n\tSeLeCt"));
        assert!(!is_select_statement("INSERT INTO t VALUES (1)"));
        assert!(!is_select_statement("SEL"));
        assert!(!is_select_statement(""));
    }

    #[test]
    fn test_deserialize_pascal_case() {
        let policy: SecurityPolicy = serde_json::from_str(
            r#"{"AllowedCommands": ["SELECT", "WITH"], "RestrictedTables": ["users"]}"#,
        )
        .unwrap();
        assert_eq!(policy.allowed_commands, vec!["SELECT", "WITH"]);
        assert!(policy.is_table_restricted("USERS"));
    }

    #[test]
    fn test_restricted_table_folds_non_ascii_case() {
        let policy = SecurityPolicy::new(["SELECT"], ["Ärger", "Straße_Log"]);
        assert!(policy.is_table_restricted("ärger"));
        assert!(policy.is_table_restricted("ÄRGER"));
        assert!(policy.is_table_restricted("straße_log"));
        assert!(!policy.is_table_restricted("arger"));
    }
}
