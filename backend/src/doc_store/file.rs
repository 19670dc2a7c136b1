// FICHIER : backend/src/doc_store/file.rs

//! Implémentation fichier du magasin : un document = un fichier JSON
//! sous {data_root}/collections/{collection}/{id}.json.
//! Écritures atomiques, cache LRU en lecture ponctuelle.

use crate::utils::async_trait;
use crate::utils::prelude::*;
use crate::utils::{fs, AnyResult};
use std::path::PathBuf;

use super::cache::Cache;
use super::compare;
use super::{DocumentStore, FieldFilter, SortSpec, StoreConfig, StoredDoc};

#[derive(Debug, Clone)]
pub struct FileStore {
    pub config: StoreConfig,
    cache: Cache<String, Value>,
}

impl FileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_cache_capacity(config, 1000)
    }

    pub fn with_cache_capacity(config: StoreConfig, capacity: usize) -> Self {
        Self {
            config,
            cache: Cache::new(capacity, None),
        }
    }

    fn doc_path(&self, collection: &str, id: &str) -> PathBuf {
        self.config
            .collection_path(collection)
            .join(format!("{}.json", id))
    }

    fn cache_key(collection: &str, id: &str) -> String {
        format!("{}/{}", collection, id)
    }

    /// Scan complet d'une collection (répertoire). Une collection absente
    /// est une collection vide, pas une erreur.
    async fn load_all(&self, collection: &str) -> AnyResult<Vec<StoredDoc>> {
        let root = self.config.collection_path(collection);
        if !fs::exists(&root).await {
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();
        let mut entries = fs::read_dir(&root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let fields: Value = fs::read_json(&path).await?;
            docs.push(StoredDoc::new(stem, fields));
        }
        Ok(docs)
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn get(&self, collection: &str, id: &str) -> AnyResult<Option<StoredDoc>> {
        let key = Self::cache_key(collection, id);

        // 1. Vérification du cache
        if let Some(fields) = self.cache.get(&key) {
            return Ok(Some(StoredDoc::new(id, fields)));
        }

        // 2. Lecture disque
        let path = self.doc_path(collection, id);
        if !fs::exists(&path).await {
            return Ok(None);
        }
        let fields: Value = fs::read_json(&path).await?;

        // 3. Mise en cache
        self.cache.put(key, fields.clone());
        Ok(Some(StoredDoc::new(id, fields)))
    }

    async fn find(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        order: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> AnyResult<Vec<StoredDoc>> {
        debug!(collection, nb_filtres = filters.len(), "FileStore: scan");
        let docs = self.load_all(collection).await?;
        Ok(compare::apply_query(docs, filters, order, limit))
    }

    async fn add(&self, collection: &str, fields: &Value) -> AnyResult<String> {
        let id = Uuid::new_v4().to_string();
        self.set(collection, &id, fields).await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: &Value) -> AnyResult<()> {
        let path = self.doc_path(collection, id);
        fs::write_json_atomic(&path, fields).await?;
        self.cache.put(Self::cache_key(collection, id), fields.clone());
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AnyResult<()> {
        let path = self.doc_path(collection, id);
        if fs::exists(&path).await {
            fs::remove_file(&path).await?;
        }
        self.cache.remove(&Self::cache_key(collection, id));
        Ok(())
    }
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc_store::SortDirection;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, FileStore) {
        let dir = tempdir().unwrap();
        let store = FileStore::new(StoreConfig::new(dir.path().to_path_buf()));
        (dir, store)
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let (_dir, store) = setup();

        store
            .set("properties", "p1", &json!({ "title": "Casa en Gurabo" }))
            .await
            .unwrap();

        let doc = store.get("properties", "p1").await.unwrap().unwrap();
        assert_eq!(doc.id, "p1");
        assert_eq!(doc.fields["title"], "Casa en Gurabo");

        // Lecture d'un absent
        let ghost = store.get("properties", "ghost").await.unwrap();
        assert!(ghost.is_none());
    }

    #[tokio::test]
    async fn test_add_generates_id() {
        let (_dir, store) = setup();

        let id = store
            .add("properties", &json!({ "title": "Apartamento" }))
            .await
            .unwrap();
        assert!(!id.is_empty());

        let doc = store.get("properties", &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["title"], "Apartamento");
    }

    #[tokio::test]
    async fn test_find_filters_and_sorts() {
        let (_dir, store) = setup();

        store
            .set("properties", "a", &json!({ "status": "disponible", "price": 100 }))
            .await
            .unwrap();
        store
            .set("properties", "b", &json!({ "status": "vendido", "price": 300 }))
            .await
            .unwrap();
        store
            .set("properties", "c", &json!({ "status": "disponible", "price": 200 }))
            .await
            .unwrap();

        let docs = store
            .find(
                "properties",
                &[FieldFilter::eq("status", json!("disponible"))],
                Some(&SortSpec::new("price", SortDirection::Desc)),
                None,
            )
            .await
            .unwrap();

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_find_missing_collection_is_empty() {
        let (_dir, store) = setup();
        let docs = store.find("nada", &[], None, None).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_doc_and_cache() {
        let (_dir, store) = setup();

        store.set("c", "1", &json!({ "v": 1 })).await.unwrap();
        // Chauffe le cache
        store.get("c", "1").await.unwrap();

        store.delete("c", "1").await.unwrap();
        assert!(store.get("c", "1").await.unwrap().is_none());

        // Suppression idempotente
        store.delete("c", "1").await.unwrap();
    }
}
