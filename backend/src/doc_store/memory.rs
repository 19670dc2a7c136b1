// FICHIER : backend/src/doc_store/memory.rs

//! Magasin en mémoire : le double de test injectable partout où un
//! `Arc<dyn DocumentStore>` est attendu. Ordre d'itération déterministe
//! (BTreeMap par identifiant) et panne simulable pour tester le contrat
//! "erreur en valeur" de la couche compat.

use crate::utils::async_trait;
use crate::utils::prelude::*;
use crate::utils::{AnyResult, BTreeMap, Mutex};

use super::compare;
use super::{DocumentStore, FieldFilter, SortSpec, StoredDoc};

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, BTreeMap<String, Value>>>,
    // Message de panne simulée : si présent, toute opération échoue avec.
    failure: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toute opération ultérieure échouera avec ce message (simulation
    /// d'une coupure réseau ou d'un refus de permission du magasin).
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Lève la panne simulée.
    pub fn heal(&self) {
        *self.failure.lock().unwrap() = None;
    }

    fn check_failure(&self) -> AnyResult<()> {
        if let Some(msg) = self.failure.lock().unwrap().as_ref() {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(())
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> AnyResult<Option<StoredDoc>> {
        self.check_failure()?;
        let guard = self.collections.lock().unwrap();
        Ok(guard
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|fields| StoredDoc::new(id, fields.clone())))
    }

    async fn find(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        order: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> AnyResult<Vec<StoredDoc>> {
        self.check_failure()?;
        let docs: Vec<StoredDoc> = {
            let guard = self.collections.lock().unwrap();
            guard
                .get(collection)
                .map(|c| {
                    c.iter()
                        .map(|(id, fields)| StoredDoc::new(id.clone(), fields.clone()))
                        .collect()
                })
                .unwrap_or_default()
        };
        Ok(compare::apply_query(docs, filters, order, limit))
    }

    async fn add(&self, collection: &str, fields: &Value) -> AnyResult<String> {
        self.check_failure()?;
        let id = Uuid::new_v4().to_string();
        let mut guard = self.collections.lock().unwrap();
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields.clone());
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: &Value) -> AnyResult<()> {
        self.check_failure()?;
        let mut guard = self.collections.lock().unwrap();
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields.clone());
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AnyResult<()> {
        self.check_failure()?;
        let mut guard = self.collections.lock().unwrap();
        if let Some(c) = guard.get_mut(collection) {
            c.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_crud() {
        let store = MemoryStore::new();

        store.set("items", "1", &json!({ "v": "A" })).await.unwrap();
        let id = store.add("items", &json!({ "v": "B" })).await.unwrap();

        assert_eq!(store.len("items"), 2);
        assert_eq!(
            store.get("items", "1").await.unwrap().unwrap().fields["v"],
            "A"
        );

        store.delete("items", &id).await.unwrap();
        assert!(store.get("items", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_is_deterministic() {
        let store = MemoryStore::new();
        store.set("c", "b", &json!({ "n": 2 })).await.unwrap();
        store.set("c", "a", &json!({ "n": 1 })).await.unwrap();
        store.set("c", "c", &json!({ "n": 3 })).await.unwrap();

        // Sans tri demandé : ordre des identifiants (BTreeMap)
        let docs = store.find("c", &[], None, None).await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let store = MemoryStore::new();
        store.set("c", "1", &json!({})).await.unwrap();

        store.fail_with("connexion refusée");
        assert!(store.get("c", "1").await.is_err());
        assert!(store.find("c", &[], None, None).await.is_err());

        store.heal();
        assert!(store.get("c", "1").await.is_ok());
    }
}
