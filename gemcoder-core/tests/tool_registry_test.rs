use anyhow::Result;
use gemcoder_core::tools::{ToolInvocation, ToolName, ToolRegistry};
use serde_json::{Map, Value, json};
use std::fs;
use tempfile::TempDir;

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn unknown_names_are_absent_not_errors() {
    let registry = ToolRegistry::new(".".into());
    assert!(registry.lookup("rm_rf").is_none());
    assert!(registry.lookup("").is_none());
    assert_eq!(
        registry.lookup("delete_file").map(|d| d.name()),
        Some(ToolName::DeleteFile)
    );
}

#[test]
fn describe_all_matches_catalog() {
    let registry = ToolRegistry::new(".".into());
    let declarations = registry.describe_all();
    let catalog = registry.catalog();
    assert_eq!(declarations.len(), 6);
    for (declaration, (name, description)) in declarations.iter().zip(catalog) {
        assert_eq!(declaration.name, name);
        assert_eq!(declaration.description, description);
    }
    let run_command = &declarations[0];
    assert_eq!(run_command.name, "run_command");
    assert!(run_command.parameters["properties"]["working_directory"].is_object());
}

#[tokio::test]
async fn relative_paths_resolve_against_the_workspace() -> Result<()> {
    let dir = TempDir::new()?;
    let registry = ToolRegistry::new(dir.path().to_path_buf());

    let outcome = registry
        .execute_call("create_directory", &args(json!({"path": "app/src"})))
        .await;
    assert!(outcome.success);
    assert!(dir.path().join("app/src").is_dir());

    let outcome = registry
        .execute_call(
            "create_file",
            &args(json!({"path": "app/src/main.rs", "content": "fn main() {}"})),
        )
        .await;
    assert!(outcome.success);

    let invocation =
        ToolInvocation::parse(ToolName::ReadFile, &args(json!({"path": "app/src/main.rs"})))?;
    let outcome = registry.execute(&invocation).await;
    assert_eq!(outcome.output.as_deref(), Some("fn main() {}"));
    Ok(())
}

#[tokio::test]
async fn update_and_delete_report_missing_files_as_failures() -> Result<()> {
    let dir = TempDir::new()?;
    let registry = ToolRegistry::new(dir.path().to_path_buf());

    let outcome = registry
        .execute_call("update_file", &args(json!({"path": "nope.txt", "content": "x"})))
        .await;
    assert!(!outcome.success);
    assert!(!dir.path().join("nope.txt").exists());

    let outcome = registry
        .execute_call("delete_file", &args(json!({"path": "nope.txt"})))
        .await;
    assert!(!outcome.success);
    assert!(outcome.error.is_some());

    fs::write(dir.path().join("real.txt"), "old")?;
    let outcome = registry
        .execute_call("update_file", &args(json!({"path": "real.txt", "content": "new"})))
        .await;
    assert!(outcome.success);
    assert_eq!(fs::read_to_string(dir.path().join("real.txt"))?, "new");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn command_working_directory_replaces_cd_chaining() -> Result<()> {
    let dir = TempDir::new()?;
    let registry = ToolRegistry::new(dir.path().to_path_buf());
    registry
        .execute_call("create_directory", &args(json!({"path": "proj"})))
        .await;

    let outcome = registry
        .execute_call(
            "run_command",
            &args(json!({"command": "pwd", "working_directory": "proj"})),
        )
        .await;
    assert!(outcome.success);
    assert!(outcome.output.unwrap_or_default().trim_end().ends_with("proj"));

    let outcome = registry
        .execute_call("run_command", &args(json!({"command": "exit 2"})))
        .await;
    assert!(!outcome.success);
    Ok(())
}
