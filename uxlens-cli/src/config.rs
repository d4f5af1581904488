//! Loading of JSON input documents and the scoring policy.

use std::path::Path;

use log::{debug, info};
use serde::de::DeserializeOwned;
use uxlens_core::ScoringPolicy;

use crate::CliResult;

/// Read and deserialize a JSON document.
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let document = serde_json::from_str(&contents)
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))?;
    debug!("loaded {}", path.display());
    Ok(document)
}

/// Load the scoring policy, falling back to the default tables.
pub(crate) async fn load_policy(path: Option<&Path>) -> CliResult<ScoringPolicy> {
    match path {
        Some(path) => {
            let policy = read_json(path).await?;
            info!("using scoring policy from {}", path.display());
            Ok(policy)
        }
        None => Ok(ScoringPolicy::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::{load_policy, read_json};
    use crate::tests::unique_dir_name;
    use uxlens_core::{ScoringPolicy, SeverityWeights};

    #[tokio::test]
    async fn load_policy_defaults_without_path() {
        let policy = load_policy(None).await.expect("policy");
        assert_eq!(policy, ScoringPolicy::default());
    }

    #[tokio::test]
    async fn load_policy_merges_partial_document() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let path = root.join("policy.json");
        std::fs::write(
            &path,
            r#"{"ux":{"critical":30,"high":20,"medium":10,"low":5}}"#,
        )
        .expect("write policy");

        let policy = load_policy(Some(&path)).await.expect("policy");
        assert_eq!(policy.ux.critical, 30);
        assert_eq!(policy.accessibility, SeverityWeights::ACCESSIBILITY);

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn read_json_reports_path_on_failure() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let path = root.join("broken.json");
        std::fs::write(&path, "{not json").expect("write file");

        let err = read_json::<ScoringPolicy>(&path)
            .await
            .expect_err("parse failure");
        assert!(err.to_string().contains("broken.json"));

        let missing = root.join("missing.json");
        let err = read_json::<ScoringPolicy>(&missing)
            .await
            .expect_err("read failure");
        assert!(err.to_string().starts_with("failed to read"));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }
}
