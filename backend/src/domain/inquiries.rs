// FICHIER : backend/src/domain/inquiries.rs

//! Dépôt des consultations : soumission publique du formulaire de
//! contact, suivi (interactions) et tableau de bord de la console.

use crate::compat::{CompatClient, OrderOptions};
use crate::utils::prelude::*;
use regex::Regex;
use std::sync::OnceLock;

use super::model::{Inquiry, InquiryInteraction, InquiryStats, InquiryStatus, InteractionKind, NewInquiry};
use super::{expect_row, expect_rows};

pub const COLLECTION: &str = "property_inquiries";
pub const INTERACTIONS: &str = "inquiry_interactions";

/// Même vérification de forme que le formulaire côté navigateur.
fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("regex email valide"))
}

/// Métadonnées de la requête entrante, consignées dans l'interaction de
/// suivi quand la consultation vise une propriété précise.
#[derive(Debug, Clone, Default)]
pub struct SubmitMeta {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

fn parse_inquiry(row: Value) -> Result<Inquiry> {
    Ok(serde_json::from_value(row)?)
}

/// Soumission du formulaire de contact (chemin public, sans session).
///
/// Valide, insère la consultation en statut « nuevo », puis (si elle
/// vise une propriété) consigne une interaction de type note. L'échec de
/// cette seconde écriture n'annule pas la consultation (pas de
/// transaction inter-documents côté magasin).
pub async fn submit_contact(
    client: &CompatClient,
    new: NewInquiry,
    meta: SubmitMeta,
) -> Result<Inquiry> {
    if new.name.trim().is_empty()
        || new.email.trim().is_empty()
        || new.phone.trim().is_empty()
        || new.message.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Todos los campos son requeridos".to_string(),
        ));
    }
    let email = new.email.to_lowercase().trim().to_string();
    if !email_regex().is_match(&email) {
        return Err(AppError::Validation(
            "El formato del email no es válido".to_string(),
        ));
    }

    let payload = json!({
        "property_id": new.property_id,
        "name": new.name.trim(),
        "email": email,
        "phone": new.phone.trim(),
        "message": new.message.trim(),
        "status": InquiryStatus::Nuevo,
    });

    let resp = client
        .from(COLLECTION)
        .insert(payload)
        .select()
        .single()
        .await;
    let row = expect_row(resp, "consulta creada")?;
    let inquiry = parse_inquiry(row)?;
    info!(id = %inquiry.id, "Consultation reçue");

    if let Some(property_id) = &new.property_id {
        let interaction = json!({
            "inquiry_id": inquiry.id,
            "type": InteractionKind::Note,
            "description": format!(
                "Consulta recibida desde el sitio web para la propiedad {}",
                property_id
            ),
            "details": {
                "source": "website",
                "property_id": property_id,
                "user_agent": meta.user_agent,
                "ip_address": meta.ip_address,
            },
        });
        let follow_up = client
            .from(INTERACTIONS)
            .insert(interaction)
            .select()
            .single()
            .await;
        if let Some(e) = follow_up.error {
            // Meilleur effort : la consultation est déjà enregistrée
            warn!(inquiry_id = %inquiry.id, erreur = %e.message, "Interaction de suivi perdue");
        }
    }

    Ok(inquiry)
}

/// Liste de la console, filtrable par statut, les plus récentes d'abord.
pub async fn list(
    client: &CompatClient,
    status: Option<InquiryStatus>,
    limit: usize,
) -> Result<Vec<Inquiry>> {
    let mut query = client.from(COLLECTION).select(None, None);
    if let Some(s) = status {
        query = query.eq("status", serde_json::to_value(s)?);
    }
    let resp = query
        .order("created_at", OrderOptions::default())
        .limit(limit)
        .await;
    expect_rows(resp)?.into_iter().map(parse_inquiry).collect()
}

/// Fiche d'une consultation avec son historique d'interactions
/// (chronologique).
pub async fn get_with_interactions(
    client: &CompatClient,
    id: &str,
) -> Result<(Inquiry, Vec<InquiryInteraction>)> {
    let resp = client
        .from(COLLECTION)
        .select(None, None)
        .eq("id", json!(id))
        .single()
        .await;
    let inquiry = parse_inquiry(expect_row(resp, &format!("consulta {}", id))?)?;

    let resp = client
        .from(INTERACTIONS)
        .select(None, None)
        .eq("inquiry_id", json!(id))
        .order("created_at", OrderOptions::ascending())
        .all()
        .await;
    let interactions = expect_rows(resp)?
        .into_iter()
        .map(|r| Ok(serde_json::from_value(r)?))
        .collect::<Result<Vec<InquiryInteraction>>>()?;

    Ok((inquiry, interactions))
}

/// Changement d'état depuis la console, avec trace `status_change` dans
/// l'historique.
pub async fn set_status(
    client: &CompatClient,
    id: &str,
    status: InquiryStatus,
) -> Result<Inquiry> {
    let previous = {
        let resp = client
            .from(COLLECTION)
            .select(None, None)
            .eq("id", json!(id))
            .single()
            .await;
        parse_inquiry(expect_row(resp, &format!("consulta {}", id))?)?
    };

    let resp = client
        .from(COLLECTION)
        .update(json!({ "status": status }))
        .eq("id", json!(id))
        .await;
    let updated = parse_inquiry(expect_row(resp, &format!("consulta {}", id))?)?;

    let trace = json!({
        "inquiry_id": id,
        "type": InteractionKind::StatusChange,
        "description": format!(
            "Estado cambiado de {} a {}",
            serde_json::to_value(previous.status)?.as_str().unwrap_or("?"),
            serde_json::to_value(status)?.as_str().unwrap_or("?"),
        ),
        "details": {},
    });
    let follow_up = client.from(INTERACTIONS).insert(trace).select().single().await;
    if let Some(e) = follow_up.error {
        warn!(inquiry_id = %id, erreur = %e.message, "Trace de changement d'état perdue");
    }

    Ok(updated)
}

/// Ajout manuel d'une interaction (note, appel, réunion…).
pub async fn add_interaction(
    client: &CompatClient,
    inquiry_id: &str,
    kind: InteractionKind,
    description: &str,
    details: Value,
) -> Result<InquiryInteraction> {
    let payload = json!({
        "inquiry_id": inquiry_id,
        "type": kind,
        "description": description,
        "details": details,
    });
    let resp = client
        .from(INTERACTIONS)
        .insert(payload)
        .select()
        .single()
        .await;
    let row = expect_row(resp, "interacción creada")?;
    Ok(serde_json::from_value(row)?)
}

/// Tableau de bord : total / nouvelles / en cours.
pub async fn stats(client: &CompatClient) -> Result<InquiryStats> {
    let resp = client
        .from(COLLECTION)
        .select(Some("status"), None)
        .all()
        .await;
    let rows = expect_rows(resp)?;

    let total = rows.len();
    let new_count = rows.iter().filter(|r| r["status"] == "nuevo").count();
    let pending = rows.iter().filter(|r| r["status"] == "en_proceso").count();

    Ok(InquiryStats {
        total,
        new_count,
        pending,
    })
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::{CompatClient, SiteAccessPolicy};
    use crate::doc_store::MemoryStore;
    use crate::utils::Arc;

    fn service() -> CompatClient {
        CompatClient::service(Arc::new(MemoryStore::new()))
    }

    fn consulta(property_id: Option<&str>) -> NewInquiry {
        NewInquiry {
            property_id: property_id.map(String::from),
            name: "Ana Rodríguez".into(),
            email: "ANA@Example.COM".into(),
            phone: "+1 809 555 0101".into(),
            message: "Quisiera más información".into(),
        }
    }

    #[tokio::test]
    async fn test_submit_contact_without_property() {
        let client = service();
        let inquiry = submit_contact(&client, consulta(None), SubmitMeta::default())
            .await
            .unwrap();

        assert_eq!(inquiry.status, InquiryStatus::Nuevo);
        // Email normalisé en minuscules
        assert_eq!(inquiry.email, "ana@example.com");

        // Pas de propriété visée : aucune interaction créée
        let (_, interactions) = get_with_interactions(&client, &inquiry.id).await.unwrap();
        assert!(interactions.is_empty());
    }

    #[tokio::test]
    async fn test_submit_contact_with_property_records_interaction() {
        let client = service();
        let meta = SubmitMeta {
            user_agent: Some("Mozilla/5.0".into()),
            ip_address: Some("190.80.1.1".into()),
        };
        let inquiry = submit_contact(&client, consulta(Some("prop-7")), meta)
            .await
            .unwrap();

        let (_, interactions) = get_with_interactions(&client, &inquiry.id).await.unwrap();
        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].kind, InteractionKind::Note);
        assert!(interactions[0].description.contains("prop-7"));
        assert_eq!(interactions[0].details["source"], "website");
        assert_eq!(interactions[0].details["user_agent"], "Mozilla/5.0");
    }

    #[tokio::test]
    async fn test_submit_contact_validation() {
        let client = service();

        let mut incomplete = consulta(None);
        incomplete.phone = "  ".into();
        let err = submit_contact(&client, incomplete, SubmitMeta::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Todos los campos son requeridos"));

        let mut bad_email = consulta(None);
        bad_email.email = "pas-un-email".into();
        let err = submit_contact(&client, bad_email, SubmitMeta::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("formato del email"));
    }

    #[tokio::test]
    async fn test_anonymous_session_can_submit_contact() {
        // Le chemin public réel : variante session sans utilisateur
        let store = Arc::new(MemoryStore::new());
        let anon = CompatClient::session(store, Arc::new(SiteAccessPolicy), None);

        let inquiry = submit_contact(&anon, consulta(Some("p-1")), SubmitMeta::default())
            .await
            .unwrap();
        assert_eq!(inquiry.status, InquiryStatus::Nuevo);
    }

    #[tokio::test]
    async fn test_set_status_leaves_trace() {
        let client = service();
        let inquiry = submit_contact(&client, consulta(None), SubmitMeta::default())
            .await
            .unwrap();

        let updated = set_status(&client, &inquiry.id, InquiryStatus::EnProceso)
            .await
            .unwrap();
        assert_eq!(updated.status, InquiryStatus::EnProceso);
        // created_at intact, updated_at re-horodaté par l'adaptateur
        assert_eq!(updated.created_at, inquiry.created_at);

        let (_, interactions) = get_with_interactions(&client, &inquiry.id).await.unwrap();
        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].kind, InteractionKind::StatusChange);
        assert!(interactions[0]
            .description
            .contains("de nuevo a en_proceso"));
    }

    #[tokio::test]
    async fn test_list_by_status_and_stats() {
        let client = service();
        let a = submit_contact(&client, consulta(None), SubmitMeta::default())
            .await
            .unwrap();
        let _b = submit_contact(&client, consulta(None), SubmitMeta::default())
            .await
            .unwrap();
        let c = submit_contact(&client, consulta(None), SubmitMeta::default())
            .await
            .unwrap();

        set_status(&client, &a.id, InquiryStatus::EnProceso).await.unwrap();
        set_status(&client, &c.id, InquiryStatus::Cerrado).await.unwrap();

        let nuevas = list(&client, Some(InquiryStatus::Nuevo), 50).await.unwrap();
        assert_eq!(nuevas.len(), 1);

        let todas = list(&client, None, 50).await.unwrap();
        assert_eq!(todas.len(), 3);

        let stats = stats(&client).await.unwrap();
        assert_eq!(
            stats,
            InquiryStats {
                total: 3,
                new_count: 1,
                pending: 1
            }
        );
    }
}
