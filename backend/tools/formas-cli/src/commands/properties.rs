// FICHIER : backend/tools/formas-cli/src/commands/properties.rs

use clap::{Args, Subcommand};

// --- IMPORTS FORMAS ---

use formas::compat::{CompatClient, OrderOptions};
use formas::domain::model::{NewProperty, PropertyPatch};
use formas::domain::properties;
use formas::user_success;
use formas::utils::prelude::*;

// --- DÉFINITION DES ARGUMENTS ---

#[derive(Args, Debug, Clone)]
pub struct PropertiesArgs {
    #[command(subcommand)]
    pub command: PropertiesCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PropertiesCommands {
    /// Liste le catalogue (filtrable par statut)
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Affiche une fiche complète
    Show {
        #[arg(long)]
        id: String,
    },

    /// Crée une propriété depuis un payload JSON
    Create {
        #[arg(long)]
        data: String,
        #[arg(long, default_value = "cli")]
        created_by: String,
    },

    /// Mise à jour partielle (Merge) depuis un payload JSON
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        data: String,
    },

    /// Suppression définitive
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Tableau de bord : total / disponibles / vendues
    Stats,
}

// --- HANDLER PRINCIPAL ---

pub async fn handle(client: &CompatClient, args: PropertiesArgs) -> Result<()> {
    match args.command {
        PropertiesCommands::List { status, limit } => {
            let mut query = client.from(properties::COLLECTION).select(None, None);
            if let Some(s) = &status {
                query = query.eq("status", json!(s));
            }
            let resp = query
                .order("created_at", OrderOptions::default())
                .limit(limit)
                .await;
            if let Some(e) = resp.error {
                return Err(AppError::Store(e.message));
            }
            println!("{}", formas::utils::json::stringify_pretty(&resp.data)?);
            user_success!("{} propriété(s)", resp.data.len());
        }

        PropertiesCommands::Show { id } => {
            let property = properties::get(client, &id).await?;
            println!("{}", formas::utils::json::stringify_pretty(&property)?);
        }

        PropertiesCommands::Create { data, created_by } => {
            let payload: NewProperty = formas::utils::json::parse(&data)?;
            let created = properties::create(client, payload, &created_by).await?;
            user_success!("Propriété créée : {}", created.id);
        }

        PropertiesCommands::Update { id, data } => {
            let patch: PropertyPatch = formas::utils::json::parse(&data)?;
            let updated = properties::update(client, &id, patch).await?;
            user_success!("Propriété mise à jour : {}", updated.id);
        }

        PropertiesCommands::Delete { id } => {
            properties::delete(client, &id).await?;
            user_success!("Propriété supprimée : {}", id);
        }

        PropertiesCommands::Stats => {
            let stats = properties::stats(client).await?;
            println!("{}", formas::utils::json::stringify_pretty(&stats)?);
        }
    }
    Ok(())
}

// --- TESTS UNITAIRES ---
