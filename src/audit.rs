use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

/// Append-only JSON Lines file recording every normalized listing and every
/// finished search.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> AuditLog {
        AuditLog {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append<T: Serialize + ?Sized>(&self, content: &T) -> Result<()> {
        let mut line = serde_json::to_vec(content).context("Failed to serialize audit record")?;
        line.push(b'\n');

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open audit log {}", self.path.display()))?;

        file.write_all(&line)
            .await
            .with_context(|| format!("Failed to write audit log {}", self.path.display()))?;
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn appends_one_json_document_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("audit.txt"));

        log.append(&json!({"address": "1 Main St"})).await.unwrap();
        log.append(&json!({"highestRank": 0})).await.unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let records: Vec<Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records, vec![json!({"address": "1 Main St"}), json!({"highestRank": 0})]);
    }

    #[tokio::test]
    async fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("missing").join("audit.txt"));

        assert!(log.append(&json!({})).await.is_err());
    }
}
