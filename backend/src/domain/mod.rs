// FICHIER : backend/src/domain/mod.rs

//! Couche métier : les enregistrements typés du site (propriétés,
//! consultations, réglages) et leurs dépôts au-dessus de la surface
//! compat. Le schéma est une convention d'appelant : l'adaptateur ne
//! l'impose pas, c'est ici qu'il vit.

pub mod inquiries;
pub mod model;
pub mod properties;
pub mod settings;

use crate::compat::{RowResponse, RowsResponse};
use crate::utils::prelude::*;

/// Déballe une réponse liste : erreur magasin → `AppError::Store`.
pub(crate) fn expect_rows(resp: RowsResponse) -> Result<Vec<Value>> {
    match resp.error {
        Some(e) => Err(AppError::Store(e.message)),
        None => Ok(resp.data),
    }
}

/// Déballe une réponse unitaire : "Document not found" devient un
/// `AppError::NotFound` porteur de contexte, le reste une erreur magasin.
pub(crate) fn expect_row(resp: RowResponse, what: &str) -> Result<Value> {
    match (resp.data, resp.error) {
        (Some(v), None) => Ok(v),
        (_, Some(e)) if e.message == "Document not found" => {
            Err(AppError::NotFound(what.to_string()))
        }
        (_, Some(e)) => Err(AppError::Store(e.message)),
        (None, None) => Err(AppError::Store("réponse sans donnée".to_string())),
    }
}
