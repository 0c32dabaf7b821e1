//! Transcript export to a plain text file
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial release

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::core::error::UserId;

/// Write the trimmed transcript to `{dir}/{user_id}.txt`, creating `dir` if needed
pub async fn export_transcript(dir: &Path, user_id: UserId, history: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create transcript directory {}", dir.display()))?;

    let path = dir.join(format!("{user_id}.txt"));
    tokio::fs::write(&path, history.trim())
        .await
        .with_context(|| format!("Failed to write transcript {}", path.display()))?;

    debug!("Exported transcript for user {user_id} to {}", path.display());
    Ok(path)
}

/// Remove an exported file once delivered. Failure is only logged.
pub async fn discard_transcript(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove transcript {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_export_writes_trimmed_history() {
        let dir = std::env::temp_dir().join(format!("duckbot-export-{}", Uuid::new_v4()));
        let path = export_transcript(&dir, 77, "\nP\nHuman: hi\nAI: hello\n")
            .await
            .unwrap();

        assert_eq!(path, dir.join("77.txt"));
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, "P\nHuman: hi\nAI: hello");

        discard_transcript(&path).await;
        assert!(!path.exists());
        tokio::fs::remove_dir(&dir).await.unwrap();
    }
}
