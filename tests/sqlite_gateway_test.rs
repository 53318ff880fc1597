//! End-to-end gateway tests against an in-memory SQLite database.

mod common;

use common::{memory_database, seeded_database};
use serde_json::json;
use sql_gateway_mcp::db::Backend;
use sql_gateway_mcp::models::{ConnectionState, OutcomeKind};
use sql_gateway_mcp::tools::format::rows_to_json;
use sql_gateway_mcp::tools::query::{NO_RESULTS, QUERY_SUCCESS_PREFIX};
use sql_gateway_mcp::tools::{
    BackupInput, BackupToolHandler, ConnectionToolHandler, GatewaySettings, NonQueryInput,
    QueryInput, QueryToolHandler, SchemaInput, SchemaToolHandler, SecurityPolicy,
    WriteToolHandler,
};
use std::sync::Arc;

fn settings() -> Arc<GatewaySettings> {
    Arc::new(
        GatewaySettings::default()
            .with_security(SecurityPolicy::new(["SELECT"], ["Admin_Settings"])),
    )
}

fn query_body(message: &str) -> serde_json::Value {
    let body = message
        .strip_prefix(QUERY_SUCCESS_PREFIX)
        .unwrap_or_else(|| panic!("unexpected message: {}", message));
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_select_returns_rows_with_nulls() {
    let database = seeded_database().await;
    let handler = QueryToolHandler::new(database, settings());

    let outcome = handler
        .execute_query(QueryInput {
            query: "SELECT id, name, email FROM users ORDER BY id".to_string(),
            parameters: None,
        })
        .await;

    assert_eq!(
        query_body(outcome.message()),
        json!([
            {"id": 1, "name": "alice", "email": "alice@example.com"},
            {"id": 2, "name": "bob", "email": null},
            {"id": 3, "name": "carol", "email": "carol@example.com"}
        ])
    );
}

#[tokio::test]
async fn test_select_with_named_parameters() {
    let database = seeded_database().await;
    let handler = QueryToolHandler::new(database, settings());

    let outcome = handler
        .execute_query(QueryInput {
            query: "SELECT name FROM users WHERE id = @id OR name = :name ORDER BY id".to_string(),
            parameters: Some(r#"{"id": 1, "name": "carol"}"#.to_string()),
        })
        .await;

    assert_eq!(
        query_body(outcome.message()),
        json!([{"name": "alice"}, {"name": "carol"}])
    );
}

#[tokio::test]
async fn test_select_without_matches_reports_no_results() {
    let database = seeded_database().await;
    let handler = QueryToolHandler::new(database, settings());

    let outcome = handler
        .execute_query(QueryInput {
            query: "SELECT * FROM users WHERE id = @id".to_string(),
            parameters: Some(r#"{"id": 99}"#.to_string()),
        })
        .await;

    assert_eq!(outcome.message(), NO_RESULTS);
}

#[tokio::test]
async fn test_truncation_against_real_rows() {
    let database = seeded_database().await;
    let settings = Arc::new(GatewaySettings::default().with_query_execution_limit(2));
    let handler = QueryToolHandler::new(database, settings);

    let result = handler
        .run("SELECT * FROM users ORDER BY id", None)
        .await
        .unwrap();

    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.total_rows, 3);
    assert_eq!(result.rows[1]["name"], json!("bob"));
}

#[tokio::test]
async fn test_non_query_mutations_are_visible_to_queries() {
    let database = seeded_database().await;
    let writer = WriteToolHandler::new(database.clone());
    let reader = QueryToolHandler::new(database, settings());

    let outcome = writer
        .execute_non_query(NonQueryInput {
            command: "INSERT INTO users (id, name) VALUES (@id, @name)".to_string(),
            parameters: Some(r#"{"id": 4, "name": "dave"}"#.to_string()),
        })
        .await;
    assert_eq!(
        outcome.message(),
        "Command executed successfully. Rows affected: 1"
    );

    let outcome = writer
        .execute_non_query(NonQueryInput {
            command: "UPDATE users SET active = 0 WHERE id > 1".to_string(),
            parameters: None,
        })
        .await;
    assert_eq!(
        outcome.message(),
        "Command executed successfully. Rows affected: 3"
    );

    let outcome = reader
        .execute_query(QueryInput {
            query: "SELECT COUNT(*) AS inactive FROM users WHERE active = 0".to_string(),
            parameters: None,
        })
        .await;
    assert_eq!(query_body(outcome.message()), json!([{"inactive": 3}]));
}

#[tokio::test]
async fn test_ddl_reports_zero_rows() {
    let database = memory_database().await;
    let writer = WriteToolHandler::new(database);

    let outcome = writer
        .execute_non_query(NonQueryInput {
            command: "CREATE TABLE audit (id INTEGER PRIMARY KEY, note TEXT)".to_string(),
            parameters: None,
        })
        .await;

    assert_eq!(
        outcome.message(),
        "Command executed successfully. Rows affected: 0"
    );
}

#[tokio::test]
async fn test_invalid_command_fails() {
    let database = seeded_database().await;
    let writer = WriteToolHandler::new(database);

    let outcome = writer
        .execute_non_query(NonQueryInput {
            command: "INSERT INTO ghosts VALUES (1)".to_string(),
            parameters: None,
        })
        .await;

    assert_eq!(outcome.kind(), OutcomeKind::Failed);
    assert!(outcome.message().starts_with("Command failed: "));
}

#[tokio::test]
async fn test_list_tables_alphabetically() {
    let database = seeded_database().await;
    let handler = SchemaToolHandler::new(database, settings());

    let outcome = handler.get_table_schema(SchemaInput::default()).await;

    assert_eq!(outcome.message(), "Available tables:\nAdmin_Settings\nusers");
}

#[tokio::test]
async fn test_list_tables_on_empty_database() {
    let database = memory_database().await;
    let handler = SchemaToolHandler::new(database, settings());

    let outcome = handler
        .get_table_schema(SchemaInput {
            table_name: "   ".to_string(),
        })
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.message(), "Available tables:\n");
}

#[tokio::test]
async fn test_describe_table_columns() {
    let database = seeded_database().await;
    let handler = SchemaToolHandler::new(database, settings());

    let outcome = handler
        .get_table_schema(SchemaInput {
            table_name: "users".to_string(),
        })
        .await;

    let body = outcome
        .message()
        .strip_prefix("Schema for table 'users':\n")
        .unwrap();
    let columns: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        columns,
        json!([
            {"column_name": "id", "data_type": "INTEGER", "is_nullable": "YES", "column_default": null},
            {"column_name": "name", "data_type": "TEXT", "is_nullable": "NO", "column_default": null},
            {"column_name": "email", "data_type": "TEXT", "is_nullable": "YES", "column_default": null},
            {"column_name": "active", "data_type": "INTEGER", "is_nullable": "YES", "column_default": "1"}
        ])
    );
}

#[tokio::test]
async fn test_describe_restricted_table_is_denied() {
    let database = seeded_database().await;
    let handler = SchemaToolHandler::new(database, settings());

    let outcome = handler
        .get_table_schema(SchemaInput {
            table_name: "admin_settings".to_string(),
        })
        .await;

    assert_eq!(outcome.kind(), OutcomeKind::Denied);
    assert_eq!(outcome.message(), "Access denied: Table is restricted.");
}

#[tokio::test]
async fn test_backup_matches_query_output() {
    let database = seeded_database().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    let path_text = path.to_string_lossy().into_owned();

    std::fs::write(&path, "stale contents").unwrap();

    let handler = BackupToolHandler::new(database.clone());
    let outcome = handler
        .backup_table(BackupInput {
            table_name: "users".to_string(),
            backup_path: path_text.clone(),
        })
        .await;

    assert_eq!(
        outcome.message(),
        format!("Table 'users' backed up successfully to '{}'", path_text)
    );

    let expected = rows_to_json(
        &database
            .fetch_rows("SELECT * FROM users", &[], None)
            .await
            .unwrap(),
    )
    .unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
}

#[tokio::test]
async fn test_backup_of_empty_table_writes_empty_array() {
    let database = memory_database().await;
    database
        .execute("CREATE TABLE empty_t (id INTEGER)", &[], None)
        .await
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");

    let handler = BackupToolHandler::new(database);
    let outcome = handler
        .backup_table(BackupInput {
            table_name: "empty_t".to_string(),
            backup_path: path.to_string_lossy().into_owned(),
        })
        .await;

    assert!(outcome.is_success());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
}

#[tokio::test]
async fn test_connection_info_for_memory_database() {
    let database = memory_database().await;
    let handler = ConnectionToolHandler::new(database, settings());

    let outcome = handler.get_connection_info();
    let body = outcome
        .message()
        .strip_prefix("Connection info:\n")
        .unwrap();
    let info: serde_json::Value = serde_json::from_str(body).unwrap();

    assert_eq!(info["Database"], json!("main"));
    assert_eq!(info["ConnectionString"], json!(":memory:"));
    assert_eq!(info["State"], json!("Open"));
    assert_eq!(info["ConnectionTimeout"], json!(5));
    assert_eq!(info["Provider"], json!("SQLite"));
}

#[tokio::test]
async fn test_closed_connection_fails_calls_and_reports_state() {
    let database = seeded_database().await;
    database.close().await;

    let reader = QueryToolHandler::new(database.clone(), settings());
    let outcome = reader
        .execute_query(QueryInput {
            query: "SELECT * FROM users".to_string(),
            parameters: None,
        })
        .await;
    assert_eq!(outcome.kind(), OutcomeKind::Failed);
    assert!(outcome.message().starts_with("Query failed: "));

    assert_eq!(database.state(), ConnectionState::Closed);
    let info = ConnectionToolHandler::new(database, settings()).get_connection_info();
    assert!(info.message().contains("\"State\": \"Closed\""));
}
