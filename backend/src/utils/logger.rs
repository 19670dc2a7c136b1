// FICHIER : backend/src/utils/logger.rs

use std::path::Path;
use std::sync::Once;
use tracing_appender::rolling;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

// Sécurité pour éviter la double initialisation (crash fréquent en tests)
static INIT: Once = Once::new();

/// Initialise le logging applicatif.
///
/// Deux couches : un fichier journalier JSON (exploitable par les outils)
/// et une console compacte filtrée par `RUST_LOG`.
pub fn init_logging(log_dir: &Path) {
    let log_dir = log_dir.to_path_buf();

    INIT.call_once(move || {
        std::fs::create_dir_all(&log_dir).ok();

        // =========================================================================
        // LAYER 1 : FICHIER (JSON structuré)
        // =========================================================================
        let file_appender = rolling::daily(&log_dir, "formas.log");

        let file_layer = fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        // =========================================================================
        // LAYER 2 : CONSOLE (Pour l'Humain)
        // =========================================================================
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        let console_layer = fmt::layer()
            .compact()
            .with_target(false)
            .with_filter(env_filter);

        // =========================================================================
        // ASSEMBLAGE ET INITIALISATION
        // =========================================================================
        let registry = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer);

        if registry.try_init().is_err() {
            tracing::warn!(
                "⚠️ [Logger] Tentative de ré-initialisation ignorée (Global subscriber déjà actif)."
            );
            return;
        }

        tracing::info!(
            "🚀 Logger initialisé. Logs disponibles dans : {:?}",
            log_dir
        );
    });
}
