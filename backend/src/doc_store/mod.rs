// FICHIER : backend/src/doc_store/mod.rs

//! Magasin de documents : la couche de persistance derrière l'adaptateur.
//!
//! Le contrat est volontairement celui d'un SDK de base documentaire gérée :
//! get/find/add/set/delete par collection, identifiant possédé par le
//! magasin, horodatages dans un encodage natif opaque. Les poignées sont
//! construites explicitement et injectées (`Arc<dyn DocumentStore>`),
//! aucun singleton de module.

pub mod cache;
pub mod compare;
pub mod file;
pub mod memory;

use crate::utils::async_trait;
use crate::utils::prelude::*;
use crate::utils::AnyResult;
use std::path::PathBuf;

pub use file::FileStore;
pub use memory::MemoryStore;

// --- CONFIGURATION ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    pub data_root: PathBuf,
}

impl StoreConfig {
    pub fn new(data_root: PathBuf) -> Self {
        Self { data_root }
    }

    /// Chemin physique d'une collection : {data_root}/collections/{nom}
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_root.join("collections").join(collection)
    }
}

// --- TYPES D'ÉCHANGE ---

/// Un document tel que stocké : l'identifiant vit HORS de la carte de
/// champs, comme dans le SDK du magasin géré. C'est la normalisation
/// (couche compat) qui le réinjecte dans l'enregistrement rendu à l'appelant.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDoc {
    pub id: String,
    pub fields: Value,
}

impl StoredDoc {
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Filtre d'égalité sur un champ. Le champ réservé `id` vise
/// l'identifiant du document lui-même.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

// --- HORODATAGE NATIF ---

/// Encodage natif de l'instant courant, tel que le magasin le représente
/// sur le fil : `{"_seconds": i64, "_nanoseconds": u32}`.
/// La couche compat le convertit en ISO-8601 à chaque lecture.
pub fn native_now() -> Value {
    let now = Utc::now();
    json!({
        "_seconds": now.timestamp(),
        "_nanoseconds": now.timestamp_subsec_nanos(),
    })
}

// --- LE CONTRAT DU MAGASIN ---

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lecture ponctuelle par identifiant. `None` si absent.
    async fn get(&self, collection: &str, id: &str) -> AnyResult<Option<StoredDoc>>;

    /// Lecture filtrée : conjonction d'égalités, une clé de tri au plus,
    /// troncature en tête. Le magasin ne sait PAS sauter `offset`
    /// documents : c'est la couche compat qui émule le `range`.
    async fn find(
        &self,
        collection: &str,
        filters: &[FieldFilter],
        order: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> AnyResult<Vec<StoredDoc>>;

    /// Création : le magasin génère et possède l'identifiant.
    async fn add(&self, collection: &str, fields: &Value) -> AnyResult<String>;

    /// Écriture complète du document `id` (création si absent).
    async fn set(&self, collection: &str, id: &str, fields: &Value) -> AnyResult<()>;

    /// Suppression immédiate, sans corbeille.
    async fn delete(&self, collection: &str, id: &str) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_now_shape() {
        let ts = native_now();
        assert!(ts["_seconds"].is_i64());
        assert!(ts["_nanoseconds"].is_u64());
    }

    #[test]
    fn test_collection_path_layout() {
        let cfg = StoreConfig::new(PathBuf::from("/tmp/formas"));
        assert_eq!(
            cfg.collection_path("properties"),
            PathBuf::from("/tmp/formas/collections/properties")
        );
    }
}
