// FICHIER : backend/src/api/handlers.rs

//! Les handlers HTTP : extraction du cookie de session, construction du
//! client compat par requête, et les formes JSON historiques du site
//! (messages en espagnol, `{error}` simple, meilleur effort en lecture).

use crate::auth::UserIdentity;
use crate::compat::CompatClient;
use crate::domain::inquiries::{self, SubmitMeta};
use crate::domain::model::{
    InquiryStatus, NewInquiry, NewProperty, PropertyPatch, SettingCategory,
};
use crate::domain::{properties, settings};
use crate::utils::context::SESSION_COOKIE;
use crate::utils::prelude::*;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::SharedState;

// --- OUTILS DE REQUÊTE ---

/// Extrait le cookie de session de l'en-tête `Cookie`.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Identité portée par la requête, si le cookie se vérifie.
async fn request_user(state: &SharedState, headers: &HeaderMap) -> Option<UserIdentity> {
    let cookie = session_cookie(headers)?;
    state.verifier.verify(&cookie).await.ok()
}

/// Variante session (B) : le chemin public, soumis à la politique d'accès.
async fn session_client(state: &SharedState, headers: &HeaderMap) -> CompatClient {
    CompatClient::session(
        state.store.clone(),
        state.policy.clone(),
        request_user(state, headers).await,
    )
}

/// Variante service (A) : les handlers d'administration, après contrôle
/// explicite de la session : l'architecture historique des routes.
fn service_client(state: &SharedState) -> CompatClient {
    CompatClient::service(state.store.clone())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "No autorizado. Por favor, inicia sesión." })),
    )
        .into_response()
}

/// Convertit une erreur applicative en réponse HTTP.
fn error_response(err: AppError) -> Response {
    let status = match &err {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Auth(_) => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match &err {
        // Les erreurs internes ne fuient pas leur détail vers le client
        AppError::Store(_) | AppError::System(_) | AppError::Io(_) => {
            error!(erreur = %err, "Erreur interne");
            "Error interno del servidor".to_string()
        }
        other => other.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
}

// --- SANTÉ ---

pub async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

// --- SITE PUBLIC ---

/// `POST /api/contact` : soumission publique du formulaire, chemin
/// session anonyme (la politique du magasin autorise cette insertion).
pub async fn submit_contact(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<NewInquiry>,
) -> Response {
    let client = session_client(&state, &headers).await;
    let meta = SubmitMeta {
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        ip_address: headers
            .get("x-forwarded-for")
            .or_else(|| headers.get("x-real-ip"))
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    };

    match inquiries::submit_contact(&client, body, meta).await {
        Ok(inquiry) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Consulta enviada exitosamente",
                "inquiry_id": inquiry.id,
            })),
        )
            .into_response(),
        Err(e @ AppError::Validation(_)) => error_response(e),
        Err(e) => {
            error!(erreur = %e, "Échec d'enregistrement de la consultation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Error al procesar la consulta. Intenta nuevamente." })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPropertiesParams {
    pub status: Option<String>,
    pub operation_type: Option<String>,
    pub limit: Option<usize>,
}

/// `GET /api/properties` : listing public. Meilleur effort : une panne de
/// lecture rend une liste vide plutôt qu'une page d'erreur.
pub async fn list_properties(
    State(state): State<SharedState>,
    Query(params): Query<ListPropertiesParams>,
) -> Response {
    let client = service_client(&state);
    let limit = params.limit.unwrap_or(50);

    let mut query = client
        .from(properties::COLLECTION)
        .select(None, None)
        .eq(
            "status",
            json!(params.status.as_deref().unwrap_or("disponible")),
        );
    if let Some(op) = &params.operation_type {
        query = query.eq("operation_type", json!(op));
    }
    let resp = query
        .order("created_at", Default::default())
        .limit(limit)
        .await;

    if let Some(e) = &resp.error {
        warn!(erreur = %e.message, "Listing propriétés en échec, liste vide rendue");
    }
    Json(json!({ "data": resp.data })).into_response()
}

/// `GET /api/properties/{id}` : fiche publique.
pub async fn get_property(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let client = service_client(&state);
    match properties::get(&client, &id).await {
        Ok(p) => Json(json!({ "data": p })).into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /api/properties` : création (console, session requise).
pub async fn create_property(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<NewProperty>,
) -> Response {
    let Some(user) = request_user(&state, &headers).await else {
        return unauthorized();
    };

    let client = service_client(&state);
    match properties::create(&client, body, &user.id).await {
        Ok(p) => (
            StatusCode::CREATED,
            Json(json!({ "data": p, "message": "Propiedad creada exitosamente" })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// `PUT /api/properties/{id}` : mise à jour partielle (console).
pub async fn update_property(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<PropertyPatch>,
) -> Response {
    if request_user(&state, &headers).await.is_none() {
        return unauthorized();
    }

    let client = service_client(&state);
    match properties::update(&client, &id, patch).await {
        Ok(p) => Json(json!({ "data": p })).into_response(),
        Err(e) => error_response(e),
    }
}

/// `DELETE /api/properties/{id}` : suppression (console).
pub async fn delete_property(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if request_user(&state, &headers).await.is_none() {
        return unauthorized();
    }

    let client = service_client(&state);
    match properties::delete(&client, &id).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /api/properties/stats` : tableau de bord (console).
pub async fn property_stats(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Response {
    if request_user(&state, &headers).await.is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "No autorizado" })),
        )
            .into_response();
    }

    let client = service_client(&state);
    match properties::stats(&client).await {
        Ok(stats) => Json(json!(stats)).into_response(),
        Err(e) => error_response(e),
    }
}

// --- CONSOLE : CONSULTATIONS ---

#[derive(Debug, Deserialize)]
pub struct ListInquiriesParams {
    pub status: Option<InquiryStatus>,
    pub limit: Option<usize>,
}

/// `GET /api/inquiries` : liste filtrable (console).
pub async fn list_inquiries(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<ListInquiriesParams>,
) -> Response {
    if request_user(&state, &headers).await.is_none() {
        return unauthorized();
    }

    let client = service_client(&state);
    match inquiries::list(&client, params.status, params.limit.unwrap_or(100)).await {
        Ok(list) => Json(json!({ "data": list })).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /api/inquiries/{id}` : fiche + historique d'interactions.
pub async fn get_inquiry(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if request_user(&state, &headers).await.is_none() {
        return unauthorized();
    }

    let client = service_client(&state);
    match inquiries::get_with_interactions(&client, &id).await {
        Ok((inquiry, interactions)) => Json(json!({
            "data": { "inquiry": inquiry, "interactions": interactions }
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetStatusBody {
    pub status: InquiryStatus,
}

/// `PATCH /api/inquiries/{id}/status` : changement d'état tracé.
pub async fn set_inquiry_status(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<SetStatusBody>,
) -> Response {
    if request_user(&state, &headers).await.is_none() {
        return unauthorized();
    }

    let client = service_client(&state);
    match inquiries::set_status(&client, &id, body.status).await {
        Ok(inquiry) => Json(json!({ "data": inquiry })).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /api/inquiries/stats` : tableau de bord (console).
pub async fn inquiry_stats(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Response {
    if request_user(&state, &headers).await.is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "No autorizado" })),
        )
            .into_response();
    }

    let client = service_client(&state);
    match inquiries::stats(&client).await {
        Ok(stats) => Json(json!(stats)).into_response(),
        Err(e) => error_response(e),
    }
}

// --- RÉGLAGES ---

/// `GET /api/settings` : lecture publique (le site en a besoin au rendu).
pub async fn list_settings(State(state): State<SharedState>) -> Response {
    let client = service_client(&state);
    match settings::all(&client).await {
        Ok(list) => Json(json!({ "data": list })).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct PutSettingBody {
    pub key: String,
    pub value: Value,
    pub category: SettingCategory,
}

/// `PUT /api/settings` : écriture (console).
pub async fn put_setting(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<PutSettingBody>,
) -> Response {
    if request_user(&state, &headers).await.is_none() {
        return unauthorized();
    }

    let client = service_client(&state);
    match settings::set(&client, &body.key, body.value, body.category).await {
        Ok(setting) => Json(json!({ "data": setting })).into_response(),
        Err(e) => error_response(e),
    }
}

// --- SESSION ---

/// `GET /api/auth/session` : identité du porteur du cookie, forme
/// `{data: {user}, error}` de la surface compat.
pub async fn whoami(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let client = session_client(&state, &headers).await;
    let resp = client.auth().get_user().await;
    Json(json!(resp)).into_response()
}

/// `DELETE /api/auth/session` : déconnexion : expiration du cookie.
/// L'émission du cookie reste chez le fournisseur d'identité.
pub async fn logout() -> Response {
    let expired = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    (
        [(header::SET_COOKIE, expired)],
        Json(json!({ "success": true })),
    )
        .into_response()
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; session=tok-123; lang=es".parse().unwrap(),
        );
        assert_eq!(session_cookie(&headers).as_deref(), Some("tok-123"));

        let mut no_session = HeaderMap::new();
        no_session.insert(header::COOKIE, "theme=dark".parse().unwrap());
        assert!(session_cookie(&no_session).is_none());

        assert!(session_cookie(&HeaderMap::new()).is_none());
    }
}
