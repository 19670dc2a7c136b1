// FICHIER : backend/src/compat/executor.rs

//! L'exécuteur unique des lectures : consomme une `QuerySpec` contre le
//! magasin injecté et enveloppe TOUTE défaillance dans la valeur de
//! réponse. Chaque terminal coûte au moins un aller-retour magasin et
//! suspend l'appelant jusqu'à résolution : aucun regroupement d'appels.

use crate::doc_store::{compare, DocumentStore, StoredDoc};
use crate::utils::prelude::*;
use crate::utils::AnyResult;

use super::normalize;
use super::query::{QuerySpec, Terminal};
use super::{ErrorBody, QueryContext, RowResponse, RowsResponse};

/// Lecture brute selon la spécification.
///
/// Chemin rapide : un filtre d'égalité sur `id` devient une lecture
/// ponctuelle, les filtres restants s'appliquent ensuite en mémoire.
async fn fetch(ctx: &QueryContext, spec: &QuerySpec) -> AnyResult<Vec<StoredDoc>> {
    if let Some(id_filter) = spec.filters.iter().find(|f| f.field == "id") {
        if let Some(id) = id_filter.value.as_str() {
            let docs = match ctx.store.get(&spec.table, id).await? {
                Some(doc) if compare::matches_filters(&doc, &spec.filters) => vec![doc],
                _ => Vec::new(),
            };
            return Ok(docs);
        }
    }

    ctx.store
        .find(
            &spec.table,
            &spec.filters,
            spec.order.as_ref(),
            spec.fetch_limit(),
        )
        .await
}

/// Découpe `[start, end]` d'un lot lu depuis la tête de l'ordre.
///
/// Si le lot s'arrête avant `start`, la tranche est vide ; avant
/// `end + 1`, elle est courte. C'est la limitation documentée de
/// l'émulation d'offset sur un magasin à curseur.
pub(crate) fn slice_range(records: Vec<Value>, start: usize, end: usize) -> Vec<Value> {
    records
        .into_iter()
        .skip(start)
        .take(end - start + 1)
        .collect()
}

/// Terminaux liste : `limit(n)`, `range(start, end)` et la lecture
/// intégrale. Résout toujours : jamais de `panic!`, jamais d'`Err`.
pub async fn execute_rows(ctx: &QueryContext, spec: QuerySpec) -> RowsResponse {
    if let Err(msg) = spec.validate() {
        return RowsResponse::failed(ErrorBody::new(msg));
    }
    if !ctx.can_read(&spec.table) {
        return RowsResponse::failed(ErrorBody::permission_denied());
    }

    match fetch(ctx, &spec).await {
        Ok(docs) => {
            // Le count est la taille du lot lu, pas une requête séparée.
            // Sous `range`, c'est donc une borne basse du total réel.
            let fetched = docs.len() as u64;
            let records = normalize::normalize_all(&docs);

            let (data, count) = match spec.terminal {
                Terminal::Range { start, end } => {
                    (slice_range(records, start, end), Some(fetched))
                }
                _ => (records, spec.count_exact.then_some(fetched)),
            };

            RowsResponse {
                data,
                count,
                error: None,
            }
        }
        Err(e) => {
            warn!(table = %spec.table, erreur = %e, "Lecture magasin échouée");
            RowsResponse::failed(ErrorBody::new(e.to_string()))
        }
    }
}

/// Terminal `single()` : un enregistrement ou l'erreur "not found" en
/// valeur. Zéro correspondance n'est PAS une exception.
pub async fn execute_single(ctx: &QueryContext, spec: QuerySpec) -> RowResponse {
    if !ctx.can_read(&spec.table) {
        return RowResponse::failed(ErrorBody::permission_denied());
    }

    match fetch(ctx, &spec).await {
        Ok(docs) => match docs.first() {
            Some(doc) => RowResponse::ok(
                normalize::normalize(doc),
                spec.count_exact.then_some(1),
            ),
            None => RowResponse::not_found(spec.count_exact.then_some(0)),
        },
        Err(e) => {
            warn!(table = %spec.table, erreur = %e, "Lecture magasin échouée");
            RowResponse::failed(ErrorBody::new(e.to_string()))
        }
    }
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================
