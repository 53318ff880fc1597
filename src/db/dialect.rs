//! Provider-specific SQL fragments.
//!
//! Each provider maps to a fixed pair of catalog queries: one listing base tables
//! alphabetically and one describing a table's columns. The describe fragment
//! references the table through the named parameter `@table_name`, which the
//! parameter binder rewrites into the engine's placeholder syntax.

use crate::db::params::{BindSyntax, PlaceholderStyle};
use crate::models::Provider;

/// Name of the parameter carrying the table name in [`Dialect::describe_table`].
pub const TABLE_NAME_PARAM: &str = "table_name";

/// SQL fragments for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Lists base table names ordered alphabetically (single `table_name` column)
    pub list_tables: &'static str,
    /// Returns `column_name`, `data_type`, `is_nullable`, `column_default`
    pub describe_table: &'static str,
    pub placeholders: PlaceholderStyle,
    /// String literals treat `\` as an escape character
    pub backslash_escapes: bool,
}

impl Dialect {
    /// Lexical rules for binding named parameters on this engine.
    pub fn bind_syntax(&self) -> BindSyntax {
        let syntax = BindSyntax::new(self.placeholders);
        if self.backslash_escapes {
            syntax.with_backslash_escapes()
        } else {
            syntax
        }
    }
}

mod queries {
    pub mod sqlite {
        pub const LIST_TABLES: &str = r#"
            SELECT name AS table_name
            FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#;

        pub const DESCRIBE_TABLE: &str = r#"
            SELECT
                name AS column_name,
                type AS data_type,
                CASE WHEN "notnull" = 0 THEN 'YES' ELSE 'NO' END AS is_nullable,
                dflt_value AS column_default
            FROM pragma_table_info(@table_name)
            ORDER BY cid
            "#;
    }

    pub mod sqlserver {
        pub const LIST_TABLES: &str = r#"
            SELECT TABLE_NAME AS table_name
            FROM INFORMATION_SCHEMA.TABLES
            WHERE TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
            "#;

        pub const DESCRIBE_TABLE: &str = r#"
            SELECT
                COLUMN_NAME AS column_name,
                DATA_TYPE AS data_type,
                IS_NULLABLE AS is_nullable,
                COLUMN_DEFAULT AS column_default
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_NAME = @table_name
            ORDER BY ORDINAL_POSITION
            "#;
    }

    pub mod postgres {
        pub const LIST_TABLES: &str = r#"
            SELECT table_name::text AS table_name
            FROM information_schema.tables
            WHERE table_schema = 'public' AND table_type = 'BASE TABLE'
            ORDER BY table_name
            "#;

        pub const DESCRIBE_TABLE: &str = r#"
            SELECT
                column_name::text AS column_name,
                data_type::text AS data_type,
                is_nullable::text AS is_nullable,
                column_default::text AS column_default
            FROM information_schema.columns
            WHERE table_schema = 'public' AND table_name = @table_name
            ORDER BY ordinal_position
            "#;
    }

    pub mod mysql {
        pub const LIST_TABLES: &str = r#"
            SELECT CAST(TABLE_NAME AS CHAR) AS table_name
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
            "#;

        pub const DESCRIBE_TABLE: &str = r#"
            SELECT
                CAST(COLUMN_NAME AS CHAR) AS column_name,
                CAST(DATA_TYPE AS CHAR) AS data_type,
                CAST(IS_NULLABLE AS CHAR) AS is_nullable,
                CAST(COLUMN_DEFAULT AS CHAR) AS column_default
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = @table_name
            ORDER BY ORDINAL_POSITION
            "#;
    }
}

impl Provider {
    /// Select the SQL fragments for this provider. Total: every provider has one.
    pub fn dialect(&self) -> Dialect {
        match self {
            Provider::SQLite => Dialect {
                list_tables: queries::sqlite::LIST_TABLES,
                describe_table: queries::sqlite::DESCRIBE_TABLE,
                placeholders: PlaceholderStyle::QuestionMark,
                backslash_escapes: false,
            },
            Provider::SqlServer => Dialect {
                list_tables: queries::sqlserver::LIST_TABLES,
                describe_table: queries::sqlserver::DESCRIBE_TABLE,
                placeholders: PlaceholderStyle::AtP,
                backslash_escapes: false,
            },
            Provider::PostgreSQL => Dialect {
                list_tables: queries::postgres::LIST_TABLES,
                describe_table: queries::postgres::DESCRIBE_TABLE,
                placeholders: PlaceholderStyle::Dollar,
                backslash_escapes: false,
            },
            Provider::MySQL => Dialect {
                list_tables: queries::mysql::LIST_TABLES,
                describe_table: queries::mysql::DESCRIBE_TABLE,
                placeholders: PlaceholderStyle::QuestionMark,
                backslash_escapes: true,
            },
        }
    }
}

/// Resolve a provider name straight to its fragments (unknown names use SQLite).
pub fn dialect_for(provider_name: &str) -> Dialect {
    Provider::from_name(provider_name).dialect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::params::bind_named;
    use crate::models::{NamedParam, QueryParam};

    #[test]
    fn test_each_provider_has_distinct_fragments() {
        let all = [
            Provider::SQLite,
            Provider::SqlServer,
            Provider::PostgreSQL,
            Provider::MySQL,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.dialect().list_tables, b.dialect().list_tables);
                assert_ne!(a.dialect().describe_table, b.dialect().describe_table);
            }
        }
    }

    #[test]
    fn test_describe_fragments_reference_table_param() {
        for provider in [
            Provider::SQLite,
            Provider::SqlServer,
            Provider::PostgreSQL,
            Provider::MySQL,
        ] {
            let sql = provider.dialect().describe_table;
            assert!(
                sql.contains(&format!("@{}", TABLE_NAME_PARAM)),
                "{} describe fragment must bind the table name",
                provider
            );
        }
    }

    #[test]
    fn test_list_fragments_are_ordered() {
        for provider in [
            Provider::SQLite,
            Provider::SqlServer,
            Provider::PostgreSQL,
            Provider::MySQL,
        ] {
            assert!(provider.dialect().list_tables.contains("ORDER BY"));
        }
    }

    #[test]
    fn test_only_mysql_uses_backslash_escapes() {
        assert!(Provider::MySQL.dialect().bind_syntax().backslash_escapes);
        for provider in [Provider::SQLite, Provider::SqlServer, Provider::PostgreSQL] {
            assert!(!provider.dialect().bind_syntax().backslash_escapes);
        }
        assert_eq!(
            Provider::PostgreSQL.dialect().bind_syntax().placeholders,
            PlaceholderStyle::Dollar
        );
    }

    #[test]
    fn test_mysql_binding_skips_backslash_escaped_literal() {
        let params = [NamedParam::new("v", 1i64)];
        let bound = bind_named(
            r"SELECT 'it\'s @v' WHERE x = @v",
            &params,
            Provider::MySQL.dialect().bind_syntax(),
        );
        assert_eq!(bound.sql, r"SELECT 'it\'s @v' WHERE x = ?");
        assert_eq!(bound.values, vec![QueryParam::Int(1)]);
    }

    #[test]
    fn test_sqlite_uses_pragma() {
        assert!(dialect_for("sqlite").describe_table.contains("pragma_table_info"));
        assert!(dialect_for("SQLite").list_tables.contains("sqlite_master"));
    }

    #[test]
    fn test_unknown_provider_falls_back_to_sqlite() {
        assert_eq!(dialect_for("db2"), Provider::SQLite.dialect());
        assert_eq!(dialect_for(""), Provider::SQLite.dialect());
    }

    #[test]
    fn test_information_schema_for_server_engines() {
        assert!(dialect_for("SqlServer").describe_table.contains("INFORMATION_SCHEMA"));
        assert!(dialect_for("postgresql").describe_table.contains("information_schema"));
        assert!(dialect_for("MySQL").describe_table.contains("information_schema"));
    }
}
