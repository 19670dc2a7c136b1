// FICHIER : backend/src/domain/settings.rs

//! Réglages du site : entrées clé/valeur rangées par catégorie
//! (general, contact, seo, social). La clé est unique par convention :
//! le dépôt passe par la résolution « égalité sur champ non identifiant »
//! de l'adaptateur, qui refuse les doublons au lieu d'en écraser un au
//! hasard.

use crate::compat::{CompatClient, OrderOptions};
use crate::utils::prelude::*;

use super::model::{SettingCategory, SiteSetting};
use super::{expect_row, expect_rows};

pub const COLLECTION: &str = "site_settings";

/// Nombre de propriétés mises en avant sur la page d'accueil, à défaut
/// du réglage `featured_properties_limit`.
pub const DEFAULT_FEATURED_LIMIT: usize = 6;

/// Tous les réglages, par clé.
pub async fn all(client: &CompatClient) -> Result<Vec<SiteSetting>> {
    let resp = client
        .from(COLLECTION)
        .select(None, None)
        .order("key", OrderOptions::ascending())
        .all()
        .await;
    expect_rows(resp)?
        .into_iter()
        .map(|r| Ok(serde_json::from_value(r)?))
        .collect()
}

/// Lecture d'un réglage par clé. `None` si la clé n'existe pas encore.
pub async fn get(client: &CompatClient, key: &str) -> Result<Option<SiteSetting>> {
    let resp = client
        .from(COLLECTION)
        .select(None, None)
        .eq("key", json!(key))
        .single()
        .await;

    match (resp.data, resp.error) {
        (Some(row), None) => Ok(Some(serde_json::from_value(row)?)),
        (_, Some(e)) if e.message == "Document not found" => Ok(None),
        (_, Some(e)) => Err(AppError::Store(e.message)),
        (None, None) => Ok(None),
    }
}

/// Écrit un réglage : mise à jour si la clé existe, création sinon.
/// La mise à jour cible la clé (champ non identifiant) : deux documents
/// portant la même clé font échouer l'appel en `Ambiguous match`.
pub async fn set(
    client: &CompatClient,
    key: &str,
    value: Value,
    category: SettingCategory,
) -> Result<SiteSetting> {
    let existing = get(client, key).await?;

    let resp = match existing {
        Some(_) => {
            client
                .from(COLLECTION)
                .update(json!({ "value": value, "category": category }))
                .eq("key", json!(key))
                .await
        }
        None => {
            client
                .from(COLLECTION)
                .insert(json!({ "key": key, "value": value, "category": category }))
                .select()
                .single()
                .await
        }
    };

    let row = expect_row(resp, &format!("réglage {}", key))?;
    Ok(serde_json::from_value(row)?)
}

/// Limite « destacadas » de la page d'accueil.
pub async fn featured_limit(client: &CompatClient) -> Result<usize> {
    let limit = get(client, "featured_properties_limit")
        .await?
        .and_then(|s| s.value.as_u64())
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_FEATURED_LIMIT);
    Ok(limit)
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================
