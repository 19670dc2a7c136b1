// FICHIER : backend/src/utils/fs.rs

use crate::utils::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

// --- RE-EXPORTS (Isolation de la couche OS) ---
pub use std::path::{Path, PathBuf};

// --- LECTURE & ASYNC I/O ---
pub use tempfile::{tempdir, TempDir};
pub use tokio::fs::{DirEntry, File, ReadDir};
pub use tokio::io::AsyncWriteExt;

/// Crée récursivement un répertoire.
pub async fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let p = path.as_ref();
    fs::create_dir_all(p).await.map_err(|e| {
        AppError::Config(format!(
            "Impossible de créer le répertoire {:?} : {}",
            p, e
        ))
    })
}

/// S'assure qu'un répertoire existe (alias sémantique).
pub async fn ensure_dir(path: &Path) -> Result<()> {
    create_dir_all(path).await
}

pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

pub async fn read_to_string(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path).await?)
}

pub async fn remove_file(path: &Path) -> Result<()> {
    Ok(fs::remove_file(path).await?)
}

pub async fn remove_dir_all(path: &Path) -> Result<()> {
    Ok(fs::remove_dir_all(path).await?)
}

pub async fn read_dir(path: &Path) -> Result<ReadDir> {
    Ok(fs::read_dir(path).await?)
}

/// Lit et désérialise un fichier JSON.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).await?;
    crate::utils::json::parse(&content)
}

/// Écriture atomique : fichier temporaire voisin puis rename.
/// Le rename est atomique sur un même système de fichiers : un lecteur
/// concurrent voit soit l'ancien contenu, soit le nouveau, jamais un mélange.
pub async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !exists(parent).await {
            create_dir_all(parent).await?;
        }
    }

    let tmp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&tmp_path).await?;
    file.write_all(content).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp_path, path).await?;
    Ok(())
}

/// Sérialise puis écrit un JSON de manière atomique (pretty).
pub async fn write_json_atomic<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = crate::utils::json::stringify_pretty(data)?;
    write_atomic(path, content.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_atomic_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("doc.json");

        write_json_atomic(&path, &json!({ "ok": true })).await.unwrap();

        // Le fichier temporaire ne doit pas survivre
        assert!(!exists(&path.with_extension("tmp")).await);

        let doc: serde_json::Value = read_json(&path).await.unwrap();
        assert_eq!(doc["ok"], true);
    }

    #[tokio::test]
    async fn test_read_json_missing_file() {
        let dir = tempdir().unwrap();
        let res: Result<serde_json::Value> = read_json(&dir.path().join("absent.json")).await;
        assert!(res.is_err());
    }
}
