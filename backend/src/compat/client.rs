// FICHIER : backend/src/compat/client.rs

//! Les deux variantes de déploiement de l'adaptateur, même contrat chaîné :
//!
//! - `service` (privilégiée) : accès sans restriction, pages serveur,
//!   tâches d'administration, CLI.
//! - `session` (utilisateur final) : porte l'identité vérifiée du cookie
//!   de session et subit la politique d'accès du magasin.
//!
//! Un client se construit PAR REQUÊTE : aucun état partagé entre deux
//! requêtes au-delà de la poignée du magasin elle-même.

use crate::auth::{SessionVerifier, UserIdentity};
use crate::doc_store::DocumentStore;
use crate::utils::prelude::*;
use crate::utils::Arc;

use super::builder::TableRef;
use super::policy::{AccessPolicy, OpenPolicy};
use super::{ErrorBody, QueryContext};

pub struct CompatClient {
    ctx: QueryContext,
}

impl CompatClient {
    /// Variante A : contexte service, privilégié.
    pub fn service(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            ctx: QueryContext {
                store,
                policy: Arc::new(OpenPolicy),
                user: None,
                privileged: true,
            },
        }
    }

    /// Variante B : contexte session, soumis à la politique d'accès.
    /// `user` est `None` pour un visiteur anonyme.
    pub fn session(
        store: Arc<dyn DocumentStore>,
        policy: Arc<dyn AccessPolicy>,
        user: Option<UserIdentity>,
    ) -> Self {
        Self {
            ctx: QueryContext {
                store,
                policy,
                user,
                privileged: false,
            },
        }
    }

    /// Construit la variante session depuis un cookie brut : le
    /// vérificateur injecté décide, un cookie invalide donne simplement
    /// un client anonyme (comportement historique des pages publiques).
    pub async fn session_from_cookie(
        store: Arc<dyn DocumentStore>,
        policy: Arc<dyn AccessPolicy>,
        verifier: &dyn SessionVerifier,
        cookie: Option<&str>,
    ) -> Self {
        let user = match cookie {
            Some(raw) => match verifier.verify(raw).await {
                Ok(identity) => {
                    debug!(uid = %identity.id, "Cookie de session vérifié");
                    Some(identity)
                }
                Err(e) => {
                    warn!(erreur = %e, "Vérification du cookie de session échouée");
                    None
                }
            },
            None => None,
        };
        Self::session(store, policy, user)
    }

    /// Point d'entrée de la grammaire chaînée.
    pub fn from(&self, table: &str) -> TableRef {
        TableRef::new(self.ctx.clone(), table)
    }

    /// Contexte d'authentification de la surface compat.
    pub fn auth(&self) -> AuthContext<'_> {
        AuthContext { client: self }
    }

    pub fn current_user(&self) -> Option<&UserIdentity> {
        self.ctx.user.as_ref()
    }
}

// --- SURFACE AUTH ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthData {
    pub user: Option<UserIdentity>,
}

/// Forme `{data: {user}, error}` du `auth.getUser()` historique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub data: AuthData,
    pub error: Option<ErrorBody>,
}

pub struct AuthContext<'a> {
    client: &'a CompatClient,
}

impl AuthContext<'_> {
    /// `get_user()` : identité du contexte courant.
    /// La variante service n'est liée à aucun utilisateur et répond
    /// "Not implemented".
    pub async fn get_user(&self) -> AuthResponse {
        if self.client.ctx.privileged {
            return AuthResponse {
                data: AuthData { user: None },
                error: Some(ErrorBody::new("Not implemented")),
            };
        }

        match &self.client.ctx.user {
            Some(identity) => AuthResponse {
                data: AuthData {
                    user: Some(identity.clone()),
                },
                error: None,
            },
            None => AuthResponse {
                data: AuthData { user: None },
                error: Some(ErrorBody::new("Not authenticated")),
            },
        }
    }
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================
