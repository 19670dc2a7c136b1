// FICHIER : backend/tools/formas-cli/src/commands/inquiries.rs

use clap::{Args, Subcommand};

// --- IMPORTS FORMAS ---

use formas::compat::CompatClient;
use formas::domain::inquiries;
use formas::domain::model::{InquiryStatus, InteractionKind};
use formas::user_success;
use formas::utils::prelude::*;

// --- DÉFINITION DES ARGUMENTS ---

#[derive(Args, Debug, Clone)]
pub struct InquiriesArgs {
    #[command(subcommand)]
    pub command: InquiriesCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum InquiriesCommands {
    /// Liste les consultations (filtrable par statut)
    List {
        /// nuevo | en_proceso | completado | cerrado
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Fiche d'une consultation avec son historique
    Show {
        #[arg(long)]
        id: String,
    },

    /// Change l'état (trace une interaction status_change)
    SetStatus {
        #[arg(long)]
        id: String,
        /// nuevo | en_proceso | completado | cerrado
        #[arg(long)]
        status: String,
    },

    /// Ajoute une note de suivi
    AddNote {
        #[arg(long)]
        id: String,
        #[arg(long)]
        description: String,
    },

    /// Tableau de bord : total / nouvelles / en cours
    Stats,
}

/// Les statuts voyagent en snake_case espagnol sur le fil ; on réutilise
/// le décodage serde plutôt qu'une table à la main.
fn parse_status(raw: &str) -> Result<InquiryStatus> {
    serde_json::from_value(json!(raw))
        .map_err(|_| AppError::Validation(format!("Statut inconnu : {}", raw)))
}

// --- HANDLER PRINCIPAL ---

pub async fn handle(client: &CompatClient, args: InquiriesArgs) -> Result<()> {
    match args.command {
        InquiriesCommands::List { status, limit } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let list = inquiries::list(client, status, limit).await?;
            println!("{}", formas::utils::json::stringify_pretty(&list)?);
            user_success!("{} consultation(s)", list.len());
        }

        InquiriesCommands::Show { id } => {
            let (inquiry, interactions) = inquiries::get_with_interactions(client, &id).await?;
            println!(
                "{}",
                formas::utils::json::stringify_pretty(&json!({
                    "inquiry": inquiry,
                    "interactions": interactions,
                }))?
            );
        }

        InquiriesCommands::SetStatus { id, status } => {
            let status = parse_status(&status)?;
            let updated = inquiries::set_status(client, &id, status).await?;
            user_success!("Consultation {} → {:?}", updated.id, updated.status);
        }

        InquiriesCommands::AddNote { id, description } => {
            let interaction = inquiries::add_interaction(
                client,
                &id,
                InteractionKind::Note,
                &description,
                json!({ "source": "cli" }),
            )
            .await?;
            user_success!("Note ajoutée : {}", interaction.id);
        }

        InquiriesCommands::Stats => {
            let stats = inquiries::stats(client).await?;
            println!("{}", formas::utils::json::stringify_pretty(&stats)?);
        }
    }
    Ok(())
}

// --- TESTS UNITAIRES ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_wire_values() {
        assert_eq!(parse_status("nuevo").unwrap(), InquiryStatus::Nuevo);
        assert_eq!(parse_status("en_proceso").unwrap(), InquiryStatus::EnProceso);
        assert!(parse_status("inexistant").is_err());
    }
}
