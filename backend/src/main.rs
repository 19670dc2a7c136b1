// FICHIER : backend/src/main.rs

use formas::api::{self, AppState};
use formas::auth::{StaticSessionVerifier, UserIdentity};
use formas::compat::SiteAccessPolicy;
use formas::doc_store::{FileStore, StoreConfig};
use formas::user_info;
use formas::utils::{context, env, prelude::*, Arc};

#[tokio::main]
async fn main() -> formas::utils::AnyResult<()> {
    // 1. Initialisation de la Configuration (CRITIQUE)
    let config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ CRITICAL ERROR: Impossible d'initialiser la configuration.");
            eprintln!("   Détails : {}", e);
            std::process::exit(1);
        }
    };

    // 2. Initialisation du Logger
    context::init_logging(&config.log_dir);

    // 3. Câblage explicite du magasin et du vérificateur de session
    let store = Arc::new(FileStore::with_cache_capacity(
        StoreConfig::new(config.data_root.clone()),
        config.cache_capacity,
    ));

    let verifier = Arc::new(StaticSessionVerifier::new());
    // Session d'administration de développement : FORMAS_ADMIN_TOKEN
    // enregistre un jeton déjà émis. En production, le vérificateur
    // enveloppe le fournisseur d'identité géré.
    if let Some(token) = env::get_optional("FORMAS_ADMIN_TOKEN") {
        let admin = UserIdentity::new(
            env::get_or("FORMAS_ADMIN_UID", "admin"),
            Some(&env::get_or("FORMAS_ADMIN_EMAIL", "admin@grupoformas.do")),
        );
        verifier.register(token, admin, config.session_ttl_secs);
        info!("Session d'administration enregistrée depuis l'environnement");
    }

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState {
        store,
        policy: Arc::new(SiteAccessPolicy),
        verifier,
        config,
    });

    user_info!(
        "Formas Server v{} : API sur {}",
        env!("CARGO_PKG_VERSION"),
        bind_addr
    );

    api::serve(state, &bind_addr).await?;
    Ok(())
}
