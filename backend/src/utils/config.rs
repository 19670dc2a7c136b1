// FICHIER : backend/src/utils/config.rs

use crate::utils::{env, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Constantes Système (Single Source of Truth)
pub const SESSION_COOKIE: &str = "session";

/// Configuration globale de l'application.
///
/// Construite explicitement via `from_env()` puis passée aux composants
/// (pas de singleton global : les tests fabriquent la leur).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Racine des données du magasin de documents
    pub data_root: PathBuf,

    /// Adresse d'écoute du serveur HTTP
    pub bind_addr: String,

    /// Répertoire des fichiers de logs
    pub log_dir: PathBuf,

    /// Capacité du cache LRU de lecture
    pub cache_capacity: usize,

    /// Durée de vie d'une session (secondes). 5 jours par défaut,
    /// comme le cookie de session historique du site.
    pub session_ttl_secs: i64,
}

impl AppConfig {
    /// Construit la configuration depuis l'environnement.
    /// Toutes les clés ont une valeur par défaut raisonnable : seul
    /// `FORMAS_DATA_ROOT` mérite d'être fixé en production.
    pub fn from_env() -> Result<Self> {
        let data_root = PathBuf::from(env::get_or("FORMAS_DATA_ROOT", "./data"));
        let log_dir = match env::get_optional("FORMAS_LOG_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => data_root.join("_system").join("logs"),
        };

        let cache_capacity = match env::get_optional("FORMAS_CACHE_CAPACITY") {
            Some(_) => env::get_parsed("FORMAS_CACHE_CAPACITY")?,
            None => 1000,
        };

        let session_ttl_secs = match env::get_optional("FORMAS_SESSION_TTL") {
            Some(_) => env::get_parsed("FORMAS_SESSION_TTL")?,
            None => 60 * 60 * 24 * 5,
        };

        Ok(Self {
            data_root,
            bind_addr: env::get_or("FORMAS_BIND_ADDR", "127.0.0.1:3001"),
            log_dir,
            cache_capacity,
            session_ttl_secs,
        })
    }

    /// Configuration de test : racine jetable, valeurs minimales.
    pub fn for_tests(data_root: PathBuf) -> Self {
        Self {
            log_dir: data_root.join("logs"),
            data_root,
            bind_addr: "127.0.0.1:0".to_string(),
            cache_capacity: 100,
            session_ttl_secs: 60,
        }
    }
}
