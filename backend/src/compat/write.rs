// FICHIER : backend/src/compat/write.rs

//! Les écritures de l'adaptateur : insert (unitaire et par lot), update
//! (fusion superficielle) et delete. L'adaptateur (pas l'appelant)
//! horodate `created_at`/`updated_at` à l'écriture, dans l'encodage natif
//! du magasin ; la normalisation les rend en ISO-8601 à la relecture.
//!
//! La résolution lecture-puis-écriture d'update/delete n'est PAS atomique :
//! entre les deux, la cible peut changer ou disparaître (dernier écrivain
//! gagnant, sans jeton de concurrence).

use crate::doc_store::{native_now, DocumentStore, FieldFilter};
use crate::utils::prelude::*;
use serde_json::Map;

use super::normalize;
use super::{ErrorBody, QueryContext, RowResponse, RowsResponse};

/// Copie un payload en éliminant tout champ `id` : l'identifiant
/// appartient au magasin, jamais à l'appelant.
fn strip_id(obj: &Map<String, Value>) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| k.as_str() != "id")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Insertion d'un document : horodatage, délégation de l'identifiant au
/// magasin, relecture immédiate puis normalisation.
async fn insert_one(
    ctx: &QueryContext,
    table: &str,
    payload: &Value,
) -> std::result::Result<Value, ErrorBody> {
    let Some(obj) = payload.as_object() else {
        return Err(ErrorBody::new("Insert payload must be a JSON object"));
    };

    let mut fields = strip_id(obj);
    // Un seul instant pour les deux horodatages : à la création,
    // created_at == updated_at par construction.
    let now = native_now();
    fields.insert("created_at".to_string(), now.clone());
    fields.insert("updated_at".to_string(), now);

    let id = ctx
        .store
        .add(table, &Value::Object(fields))
        .await
        .map_err(|e| ErrorBody::new(e.to_string()))?;

    read_back(ctx, table, &id).await
}

/// Relecture post-écriture, comme le SDK historique.
async fn read_back(
    ctx: &QueryContext,
    table: &str,
    id: &str,
) -> std::result::Result<Value, ErrorBody> {
    match ctx.store.get(table, id).await {
        Ok(Some(doc)) => Ok(normalize::normalize(&doc)),
        Ok(None) => Err(ErrorBody::not_found()),
        Err(e) => Err(ErrorBody::new(e.to_string())),
    }
}

/// Résout la cible d'une mutation par une égalité unique.
///
/// `id` est le chemin direct ; tout autre champ déclenche une sonde de
/// 2 documents : zéro → NotFound, deux → AmbiguousMatch. Les mutations
/// ambiguës sont refusées plutôt que d'affecter silencieusement le
/// premier résultat rendu par le magasin.
async fn resolve_target(
    ctx: &QueryContext,
    table: &str,
    field: &str,
    value: &Value,
) -> std::result::Result<String, ErrorBody> {
    if field == "id" {
        return match value.as_str() {
            Some(id) => Ok(id.to_string()),
            None => Err(ErrorBody::new("Identifier match requires a string value")),
        };
    }

    let probe = ctx
        .store
        .find(
            table,
            &[FieldFilter::eq(field, value.clone())],
            None,
            Some(2),
        )
        .await
        .map_err(|e| ErrorBody::new(e.to_string()))?;

    let mut hits = probe.into_iter();
    match (hits.next(), hits.next()) {
        (None, _) => Err(ErrorBody::not_found()),
        (Some(only), None) => Ok(only.id),
        (Some(_), Some(_)) => Err(ErrorBody::ambiguous(field)),
    }
}

/// `insert(record).select().single()` : insertion unitaire.
pub async fn execute_insert(ctx: &QueryContext, table: &str, payload: Value) -> RowResponse {
    if !ctx.can_insert(table) {
        return RowResponse::failed(ErrorBody::permission_denied());
    }

    match insert_one(ctx, table, &payload).await {
        Ok(record) => {
            debug!(table, id = %record["id"], "Document inséré");
            RowResponse::ok(record, None)
        }
        Err(e) => {
            warn!(table, erreur = %e.message, "Insertion échouée");
            RowResponse::failed(e)
        }
    }
}

/// Insertion par lot : un résultat par élément, dans l'ordre du lot.
/// Un lot vide est une erreur de validation. En cas d'échec en cours de
/// lot, `data` contient les enregistrements déjà insérés (écriture
/// partielle visible, pas de transaction côté magasin).
pub async fn execute_insert_many(
    ctx: &QueryContext,
    table: &str,
    payloads: Vec<Value>,
) -> RowsResponse {
    if !ctx.can_insert(table) {
        return RowsResponse::failed(ErrorBody::permission_denied());
    }
    if payloads.is_empty() {
        return RowsResponse::failed(ErrorBody::new("Batch insert requires at least one record"));
    }

    let mut inserted = Vec::with_capacity(payloads.len());
    for payload in &payloads {
        match insert_one(ctx, table, payload).await {
            Ok(record) => inserted.push(record),
            Err(e) => {
                warn!(table, inseres = inserted.len(), erreur = %e.message, "Lot interrompu");
                let count = Some(inserted.len() as u64);
                return RowsResponse {
                    data: inserted,
                    count,
                    error: Some(e),
                };
            }
        }
    }

    let count = Some(inserted.len() as u64);
    RowsResponse::ok(inserted, count)
}

/// `update(patch).eq(field, value)` : fusion superficielle du patch sur
/// les champs existants, `updated_at` re-horodaté, résultat normalisé.
pub async fn execute_update(
    ctx: &QueryContext,
    table: &str,
    patch: Value,
    field: &str,
    value: Value,
) -> RowResponse {
    if !ctx.can_mutate(table) {
        return RowResponse::failed(ErrorBody::permission_denied());
    }
    let Some(patch_obj) = patch.as_object() else {
        return RowResponse::failed(ErrorBody::new("Update patch must be a JSON object"));
    };

    let id = match resolve_target(ctx, table, field, &value).await {
        Ok(id) => id,
        Err(e) => return RowResponse::failed(e),
    };

    // Lecture de l'existant (la cible peut avoir disparu depuis la résolution)
    let existing = match ctx.store.get(table, &id).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return RowResponse::failed(ErrorBody::not_found()),
        Err(e) => return RowResponse::failed(ErrorBody::new(e.to_string())),
    };

    // Fusion superficielle : chaque clé du patch écrase la clé de premier
    // niveau correspondante, le reste est conservé tel quel.
    let mut fields = existing.fields.as_object().cloned().unwrap_or_default();
    for (k, v) in strip_id(patch_obj) {
        fields.insert(k, v);
    }
    fields.insert("updated_at".to_string(), native_now());

    if let Err(e) = ctx.store.set(table, &id, &Value::Object(fields)).await {
        warn!(table, id = %id, erreur = %e, "Écriture échouée");
        return RowResponse::failed(ErrorBody::new(e.to_string()));
    }

    match read_back(ctx, table, &id).await {
        Ok(record) => RowResponse::ok(record, None),
        Err(e) => RowResponse::failed(e),
    }
}

/// `delete().eq(field, value)` : résolution identique à update, puis
/// suppression immédiate. Pas de cascade : les documents dépendants
/// (interactions d'une consultation supprimée) deviennent orphelins.
pub async fn execute_delete(
    ctx: &QueryContext,
    table: &str,
    field: &str,
    value: Value,
) -> RowResponse {
    if !ctx.can_mutate(table) {
        return RowResponse::failed(ErrorBody::permission_denied());
    }

    let id = match resolve_target(ctx, table, field, &value).await {
        Ok(id) => id,
        Err(e) => return RowResponse::failed(e),
    };

    // La résolution par `id` ne passe pas par le magasin : on vérifie
    // l'existence pour honorer la taxonomie NotFound.
    match ctx.store.get(table, &id).await {
        Ok(Some(_)) => {}
        Ok(None) => return RowResponse::failed(ErrorBody::not_found()),
        Err(e) => return RowResponse::failed(ErrorBody::new(e.to_string())),
    }

    match ctx.store.delete(table, &id).await {
        Ok(()) => {
            debug!(table, id = %id, "Document supprimé");
            RowResponse::deleted()
        }
        Err(e) => {
            warn!(table, id = %id, erreur = %e, "Suppression échouée");
            RowResponse::failed(ErrorBody::new(e.to_string()))
        }
    }
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================
