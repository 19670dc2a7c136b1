// FICHIER : backend/src/compat/mod.rs

//! Surface de compatibilité "query builder" au-dessus du magasin de
//! documents : `from(table).select().eq().order().limit()/range()/single()`
//! plus insert/update/delete. Une spécification typée, un seul exécuteur,
//! deux contextes de privilège (service et session).
//!
//! Contrat central : AUCUNE erreur du magasin ne s'échappe en `Err` : tout
//! terminal résout en une valeur `{data, count?, error}` que l'appelant
//! inspecte (l'erreur d'abord, la donnée ensuite).

pub mod builder;
pub mod client;
pub mod executor;
pub mod normalize;
pub mod policy;
pub mod query;
pub mod write;

use crate::auth::UserIdentity;
use crate::doc_store::DocumentStore;
use crate::utils::prelude::*;
use crate::utils::Arc;

pub use builder::{OrderOptions, SelectOptions};
pub use client::{AuthResponse, CompatClient};
pub use policy::{AccessPolicy, OpenPolicy, SiteAccessPolicy};
pub use query::{QuerySpec, Terminal, MAX_RANGE_END};

// --- ERREUR EN VALEUR ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Résolution par égalité sans aucun document correspondant.
    pub fn not_found() -> Self {
        Self::new("Document not found")
    }

    /// Mutation visée par un champ non identifiant qui correspond à
    /// plusieurs documents.
    pub fn ambiguous(field: &str) -> Self {
        Self::new(format!(
            "Ambiguous match: more than one document matches '{}'",
            field
        ))
    }

    /// Refus de la politique d'accès, avec le message du SDK du magasin.
    pub fn permission_denied() -> Self {
        Self::new("Missing or insufficient permissions")
    }
}

// --- FORMES DE RÉPONSE ---

/// Réponse des terminaux liste (`limit`, `range`, lecture intégrale).
/// Même en erreur, `data` reste une liste (vide) : l'appelant doit
/// vérifier `error` en premier, pas déduire le succès de la forme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowsResponse {
    pub data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    pub error: Option<ErrorBody>,
}

impl RowsResponse {
    pub fn ok(data: Vec<Value>, count: Option<u64>) -> Self {
        Self {
            data,
            count,
            error: None,
        }
    }

    pub fn failed(error: ErrorBody) -> Self {
        Self {
            data: Vec::new(),
            count: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Réponse des terminaux à ligne unique (`single`) et des écritures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowResponse {
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    pub error: Option<ErrorBody>,
}

impl RowResponse {
    pub fn ok(data: Value, count: Option<u64>) -> Self {
        Self {
            data: Some(data),
            count,
            error: None,
        }
    }

    /// Zéro correspondance : data nulle + erreur "not found" en valeur.
    pub fn not_found(count: Option<u64>) -> Self {
        Self {
            data: None,
            count,
            error: Some(ErrorBody::not_found()),
        }
    }

    pub fn failed(error: ErrorBody) -> Self {
        Self {
            data: None,
            count: None,
            error: Some(error),
        }
    }

    /// Réponse d'une suppression réussie : ni donnée, ni erreur.
    pub fn deleted() -> Self {
        Self {
            data: None,
            count: None,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

// --- CONTEXTE D'EXÉCUTION ---

/// Contexte porté par chaque chaîne : poignée du magasin, politique
/// d'accès et identité éventuelle. Construit par requête (rien de partagé
/// entre deux requêtes au-delà du magasin lui-même).
#[derive(Clone)]
pub struct QueryContext {
    pub store: Arc<dyn DocumentStore>,
    pub policy: Arc<dyn AccessPolicy>,
    pub user: Option<UserIdentity>,
    /// Variante service : la politique d'accès ne s'applique pas.
    pub privileged: bool,
}

impl QueryContext {
    pub fn can_read(&self, table: &str) -> bool {
        self.privileged || self.policy.allows_read(table, self.user.as_ref())
    }

    pub fn can_insert(&self, table: &str) -> bool {
        self.privileged || self.policy.allows_insert(table, self.user.as_ref())
    }

    pub fn can_mutate(&self, table: &str) -> bool {
        self.privileged || self.policy.allows_mutate(table, self.user.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_bodies() {
        assert_eq!(ErrorBody::not_found().message, "Document not found");
        assert!(ErrorBody::ambiguous("status").message.contains("'status'"));
        assert_eq!(
            ErrorBody::permission_denied().message,
            "Missing or insufficient permissions"
        );
    }

    #[test]
    fn test_rows_response_failed_keeps_empty_list() {
        // Contrat "l'erreur d'abord" : data reste une liste vide, pas null
        let resp = RowsResponse::failed(ErrorBody::new("boom"));
        assert!(resp.data.is_empty());
        assert!(!resp.is_ok());

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["data"].is_array());
        assert_eq!(json["error"]["message"], "boom");
        // count absent du JSON quand il n'est pas demandé
        assert!(json.get("count").is_none());
    }

    #[test]
    fn test_row_response_shapes() {
        let ok = RowResponse::ok(json!({ "id": "1" }), None);
        assert!(ok.is_ok());

        let nf = RowResponse::not_found(Some(0));
        assert!(nf.data.is_none());
        assert_eq!(nf.count, Some(0));
        assert_eq!(nf.error.unwrap().message, "Document not found");

        let del = RowResponse::deleted();
        assert!(del.is_ok());
        assert!(del.data.is_none());
    }
}
