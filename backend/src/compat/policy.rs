// FICHIER : backend/src/compat/policy.rs

//! Politique d'accès côté magasin, appliquée UNIQUEMENT au contexte
//! session (variante utilisateur final). Le contexte service est
//! privilégié et passe outre. Les refus remontent en valeur d'erreur via
//! le canal StoreFailure, jamais en panique.

use crate::auth::UserIdentity;

pub trait AccessPolicy: Send + Sync {
    fn allows_read(&self, collection: &str, user: Option<&UserIdentity>) -> bool;
    fn allows_insert(&self, collection: &str, user: Option<&UserIdentity>) -> bool;
    fn allows_mutate(&self, collection: &str, user: Option<&UserIdentity>) -> bool;
}

/// Politique du site : le catalogue et les réglages se lisent sans
/// session ; le formulaire de contact écrit sans session ; tout le reste
/// exige un utilisateur vérifié.
#[derive(Debug, Default, Clone)]
pub struct SiteAccessPolicy;

const PUBLIC_READ: [&str; 2] = ["properties", "site_settings"];
const PUBLIC_INSERT: [&str; 2] = ["property_inquiries", "inquiry_interactions"];

impl AccessPolicy for SiteAccessPolicy {
    fn allows_read(&self, collection: &str, user: Option<&UserIdentity>) -> bool {
        user.is_some() || PUBLIC_READ.contains(&collection)
    }

    fn allows_insert(&self, collection: &str, user: Option<&UserIdentity>) -> bool {
        user.is_some() || PUBLIC_INSERT.contains(&collection)
    }

    fn allows_mutate(&self, collection: &str, user: Option<&UserIdentity>) -> bool {
        user.is_some()
    }
}

/// Politique ouverte : tout est permis. Contexte privilégié et tests.
#[derive(Debug, Default, Clone)]
pub struct OpenPolicy;

impl AccessPolicy for OpenPolicy {
    fn allows_read(&self, _collection: &str, _user: Option<&UserIdentity>) -> bool {
        true
    }
    fn allows_insert(&self, _collection: &str, _user: Option<&UserIdentity>) -> bool {
        true
    }
    fn allows_mutate(&self, _collection: &str, _user: Option<&UserIdentity>) -> bool {
        true
    }
}
