// FICHIER : backend/tools/formas-cli/src/commands/settings.rs

use clap::{Args, Subcommand};

// --- IMPORTS FORMAS ---

use formas::compat::CompatClient;
use formas::domain::model::SettingCategory;
use formas::domain::settings;
use formas::user_success;
use formas::utils::prelude::*;

// --- DÉFINITION DES ARGUMENTS ---

#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommands {
    /// Tous les réglages, triés par clé
    List,

    /// Lit un réglage
    Get {
        #[arg(long)]
        key: String,
    },

    /// Écrit un réglage (création ou mise à jour par clé)
    Set {
        #[arg(long)]
        key: String,
        /// Valeur JSON (ex: '"Grupo Formas"' ou '9')
        #[arg(long)]
        value: String,
        /// general | contact | seo | social
        #[arg(long, default_value = "general")]
        category: String,
    },
}

fn parse_category(raw: &str) -> Result<SettingCategory> {
    serde_json::from_value(json!(raw))
        .map_err(|_| AppError::Validation(format!("Catégorie inconnue : {}", raw)))
}

// --- HANDLER PRINCIPAL ---

pub async fn handle(client: &CompatClient, args: SettingsArgs) -> Result<()> {
    match args.command {
        SettingsCommands::List => {
            let list = settings::all(client).await?;
            println!("{}", formas::utils::json::stringify_pretty(&list)?);
        }

        SettingsCommands::Get { key } => match settings::get(client, &key).await? {
            Some(setting) => {
                println!("{}", formas::utils::json::stringify_pretty(&setting)?)
            }
            None => return Err(AppError::NotFound(format!("réglage {}", key))),
        },

        SettingsCommands::Set {
            key,
            value,
            category,
        } => {
            let value: Value = formas::utils::json::parse(&value)?;
            let category = parse_category(&category)?;
            let setting = settings::set(client, &key, value, category).await?;
            user_success!("Réglage écrit : {} = {}", setting.key, setting.value);
        }
    }
    Ok(())
}

// --- TESTS UNITAIRES ---

#[cfg(test)]
mod tests {
    use super::*;
    use formas::doc_store::MemoryStore;
    use formas::utils::Arc;

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let client = CompatClient::service(Arc::new(MemoryStore::new()));

        handle(
            &client,
            SettingsArgs {
                command: SettingsCommands::Set {
                    key: "site_title".into(),
                    value: "\"Grupo Formas\"".into(),
                    category: "general".into(),
                },
            },
        )
        .await
        .unwrap();

        let setting = settings::get(&client, "site_title").await.unwrap().unwrap();
        assert_eq!(setting.value, json!("Grupo Formas"));
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("social").unwrap(), SettingCategory::Social);
        assert!(parse_category("autre").is_err());
    }
}
