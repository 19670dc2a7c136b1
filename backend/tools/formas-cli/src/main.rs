// FICHIER : backend/tools/formas-cli/src/main.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// On garde le module local des commandes
mod commands;

use formas::compat::CompatClient;
use formas::doc_store::{FileStore, StoreConfig};
use formas::utils::{prelude::*, Arc};
use formas::{user_error, user_info};

#[derive(Parser)]
#[command(name = "formas-cli")]
#[command(about = "Console d'administration Grupo Formas (catalogue, consultations, réglages)", long_about = None)]
#[command(version)]
struct Cli {
    /// Racine des données du magasin de documents
    #[arg(long, env = "FORMAS_DATA_ROOT", default_value = "./data")]
    data_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Gestion du catalogue immobilier
    Properties(commands::properties::PropertiesArgs),

    /// Suivi des consultations du site
    Inquiries(commands::inquiries::InquiriesArgs),

    /// Réglages du site
    Settings(commands::settings::SettingsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialisation du Logger
    formas::utils::init_logging(&cli.data_root.join("_system").join("logs"));

    user_info!("formas-cli v{}", env!("CARGO_PKG_VERSION"));

    // 2. Câblage du magasin : la console opère en variante service
    let store = Arc::new(FileStore::new(StoreConfig::new(cli.data_root.clone())));
    let client = CompatClient::service(store);

    // 3. Dispatch
    let outcome = match cli.command {
        Commands::Properties(args) => commands::properties::handle(&client, args).await,
        Commands::Inquiries(args) => commands::inquiries::handle(&client, args).await,
        Commands::Settings(args) => commands::settings::handle(&client, args).await,
    };

    if let Err(e) = outcome {
        user_error!("{}", e);
        std::process::exit(1);
    }

    tracing::debug!("Fin de l'exécution du CLI");
    Ok(())
}
