// FICHIER : backend/src/api/mod.rs

//! L'API HTTP du site : routes publiques (catalogue, contact, réglages)
//! et routes de la console d'administration (CRUD, tableaux de bord).
//! Chaque requête construit son propre client compat : l'état partagé se
//! limite à la poignée du magasin, au vérificateur de session et à la
//! configuration.

pub mod handlers;

use crate::auth::SessionVerifier;
use crate::compat::AccessPolicy;
use crate::doc_store::DocumentStore;
use crate::utils::prelude::*;
use crate::utils::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub policy: Arc<dyn AccessPolicy>,
    pub verifier: Arc<dyn SessionVerifier>,
    pub config: AppConfig,
}

pub type SharedState = Arc<AppState>;

/// Construit le routeur complet, composable avec d'autres routes axum.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        // --- SITE PUBLIC ---
        .route("/api/contact", post(handlers::submit_contact))
        .route(
            "/api/properties",
            get(handlers::list_properties).post(handlers::create_property),
        )
        .route("/api/properties/stats", get(handlers::property_stats))
        .route(
            "/api/properties/{id}",
            get(handlers::get_property)
                .put(handlers::update_property)
                .delete(handlers::delete_property),
        )
        // --- CONSOLE D'ADMINISTRATION ---
        .route("/api/inquiries", get(handlers::list_inquiries))
        .route("/api/inquiries/stats", get(handlers::inquiry_stats))
        .route("/api/inquiries/{id}", get(handlers::get_inquiry))
        .route(
            "/api/inquiries/{id}/status",
            axum::routing::patch(handlers::set_inquiry_status),
        )
        .route(
            "/api/settings",
            get(handlers::list_settings).put(handlers::put_setting),
        )
        // --- SESSION ---
        .route(
            "/api/auth/session",
            get(handlers::whoami).delete(handlers::logout),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Sert l'API à l'adresse donnée (ex: "127.0.0.1:3001").
pub async fn serve(state: SharedState, addr: &str) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(adresse = %listener.local_addr()?, "API Formas en écoute");
    axum::serve(listener, app).await
}
