// FICHIER : backend/src/utils/env.rs

use crate::utils::{AppError, Result};
use std::env;
use std::str::FromStr;

/// Récupère une variable d'environnement (Requis).
/// Renvoie une erreur explicite si la clé est manquante.
pub fn get(key: &str) -> Result<String> {
    env::var(key)
        .map_err(|_| AppError::Config(format!("Variable d'environnement manquante : {}", key)))
}

/// Récupère une variable d'environnement (Optionnel).
/// Renvoie `None` si la clé est manquante.
pub fn get_optional(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Récupère une variable d'environnement avec valeur par défaut.
pub fn get_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Récupère et parse une variable (ex: booléen, entier).
/// Utile pour DEBUG=true ou PORT=8080.
pub fn get_parsed<T: FromStr>(key: &str) -> Result<T> {
    let val = get(key)?;
    val.parse::<T>()
        .map_err(|_| AppError::Config(format!("Impossible de parser la variable : {}", key)))
}

/// Indique si une feature flag est active (ex: "true", "1", "yes").
pub fn is_enabled(key: &str) -> bool {
    matches!(
        get_optional(key).as_deref(),
        Some("true") | Some("1") | Some("yes") | Some("on")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_fallback() {
        let val = get_or("FORMAS_TEST_ABSENT_KEY", "defaut");
        assert_eq!(val, "defaut");
    }

    #[test]
    fn test_get_parsed() {
        std::env::set_var("FORMAS_TEST_PORT", "8080");
        let port: u16 = get_parsed("FORMAS_TEST_PORT").unwrap();
        assert_eq!(port, 8080);

        std::env::set_var("FORMAS_TEST_PORT_BAD", "pas-un-port");
        let bad: Result<u16> = get_parsed("FORMAS_TEST_PORT_BAD");
        assert!(bad.is_err());
    }

    #[test]
    fn test_is_enabled_variants() {
        std::env::set_var("FORMAS_TEST_FLAG", "yes");
        assert!(is_enabled("FORMAS_TEST_FLAG"));

        std::env::set_var("FORMAS_TEST_FLAG", "off");
        assert!(!is_enabled("FORMAS_TEST_FLAG"));

        assert!(!is_enabled("FORMAS_TEST_FLAG_ABSENT"));
    }
}
