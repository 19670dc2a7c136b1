// FICHIER : backend/src/auth/mod.rs

//! Contexte d'authentification : collaborateur consommé, pas possédé.
//!
//! L'adaptateur ne vérifie rien cryptographiquement : il fait confiance au
//! `SessionVerifier` injecté (oui/non + identité). En production ce trait
//! enveloppe le fournisseur d'identité géré ; en développement et en tests
//! le `StaticSessionVerifier` tient un registre explicite de sessions.

use crate::utils::async_trait;
use crate::utils::prelude::*;
use crate::utils::{HashMap, Mutex};
use chrono::{DateTime, Duration};

// --- IDENTITÉ ---

/// Identité vérifiée de l'utilisateur courant.
/// `claims` transporte le reste du payload du fournisseur, opaque pour nous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub claims: serde_json::Map<String, Value>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, email: Option<&str>) -> Self {
        Self {
            id: id.into(),
            email: email.map(String::from),
            claims: serde_json::Map::new(),
        }
    }
}

// --- ERREURS ---

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    MissingSession,

    #[error("Invalid session cookie: {0}")]
    InvalidSession(String),

    #[error("Session expired")]
    Expired,
}

// --- LE CONTRAT DU VÉRIFICATEUR ---

#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Vérifie un cookie de session signé et renvoie l'identité qu'il porte.
    async fn verify(&self, session_cookie: &str) -> std::result::Result<UserIdentity, AuthError>;
}

// --- REGISTRE STATIQUE (développement & tests) ---

struct SessionEntry {
    identity: UserIdentity,
    expires_at: DateTime<Utc>,
}

/// Registre jeton → identité avec expiration. L'émission des jetons reste
/// hors périmètre : on enregistre ici ce que le fournisseur a déjà émis.
#[derive(Default)]
pub struct StaticSessionVerifier {
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl StaticSessionVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre une session valide pour `ttl_secs` secondes.
    pub fn register(&self, token: impl Into<String>, identity: UserIdentity, ttl_secs: i64) {
        let entry = SessionEntry {
            identity,
            expires_at: Utc::now() + Duration::seconds(ttl_secs),
        };
        self.sessions.lock().unwrap().insert(token.into(), entry);
    }

    pub fn revoke(&self, token: &str) {
        self.sessions.lock().unwrap().remove(token);
    }
}

#[async_trait]
impl SessionVerifier for StaticSessionVerifier {
    async fn verify(&self, session_cookie: &str) -> std::result::Result<UserIdentity, AuthError> {
        let guard = self.sessions.lock().unwrap();
        match guard.get(session_cookie) {
            Some(entry) if entry.expires_at > Utc::now() => Ok(entry.identity.clone()),
            Some(_) => Err(AuthError::Expired),
            None => Err(AuthError::InvalidSession("unknown session".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_known_session() {
        let verifier = StaticSessionVerifier::new();
        verifier.register(
            "tok-1",
            UserIdentity::new("u-1", Some("admin@grupoformas.do")),
            60,
        );

        let identity = verifier.verify("tok-1").await.unwrap();
        assert_eq!(identity.id, "u-1");
        assert_eq!(identity.email.as_deref(), Some("admin@grupoformas.do"));
    }

    #[tokio::test]
    async fn test_verify_unknown_and_expired() {
        let verifier = StaticSessionVerifier::new();

        // Inconnu
        let err = verifier.verify("fantome").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidSession(_)));

        // Expiré (TTL négatif : déjà mort à l'enregistrement)
        verifier.register("vieux", UserIdentity::new("u-2", None), -1);
        let err = verifier.verify("vieux").await.unwrap_err();
        assert_eq!(err, AuthError::Expired);
    }

    #[tokio::test]
    async fn test_revoke() {
        let verifier = StaticSessionVerifier::new();
        verifier.register("tok", UserIdentity::new("u", None), 60);
        verifier.revoke("tok");
        assert!(verifier.verify("tok").await.is_err());
    }
}
