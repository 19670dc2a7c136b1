// FICHIER : backend/src/domain/properties.rs

//! Dépôt des propriétés : les lectures du site public et le CRUD de la
//! console d'administration, tous exprimés dans la grammaire chaînée de
//! l'adaptateur.

use crate::compat::{CompatClient, OrderOptions, SelectOptions};
use crate::utils::prelude::*;

use super::model::{NewProperty, Property, PropertyPatch, PropertyStats, PropertyStatus};
use super::{expect_row, expect_rows};

pub const COLLECTION: &str = "properties";

const DEFAULT_CITY: &str = "Santiago";
const DEFAULT_COUNTRY: &str = "República Dominicana";

fn parse_many(rows: Vec<Value>) -> Result<Vec<Property>> {
    rows.into_iter()
        .map(|r| Ok(serde_json::from_value(r)?))
        .collect()
}

/// Vitrine publique : les propriétés disponibles, les plus récentes d'abord.
pub async fn list_available(client: &CompatClient, limit: usize) -> Result<Vec<Property>> {
    let resp = client
        .from(COLLECTION)
        .select(None, None)
        .eq("status", json!("disponible"))
        .order("created_at", OrderOptions::default())
        .limit(limit)
        .await;
    parse_many(expect_rows(resp)?)
}

/// Section « destacadas » de la page d'accueil.
pub async fn list_featured(client: &CompatClient, limit: usize) -> Result<Vec<Property>> {
    let resp = client
        .from(COLLECTION)
        .select(None, None)
        .eq("featured", json!(true))
        .eq("status", json!("disponible"))
        .order("created_at", OrderOptions::default())
        .limit(limit)
        .await;
    parse_many(expect_rows(resp)?)
}

/// Pagination de la console d'administration : tranche [start, end] avec
/// le count du lot lu.
pub async fn list_page(
    client: &CompatClient,
    start: usize,
    end: usize,
) -> Result<(Vec<Property>, u64)> {
    let resp = client
        .from(COLLECTION)
        .select(None, Some(SelectOptions::count_exact()))
        .order("created_at", OrderOptions::default())
        .range(start, end)
        .await;
    let count = resp.count.unwrap_or(0);
    Ok((parse_many(expect_rows(resp)?)?, count))
}

/// Fiche d'une propriété.
pub async fn get(client: &CompatClient, id: &str) -> Result<Property> {
    let resp = client
        .from(COLLECTION)
        .select(None, None)
        .eq("id", json!(id))
        .single()
        .await;
    let row = expect_row(resp, &format!("propiedad {}", id))?;
    Ok(serde_json::from_value(row)?)
}

/// Création depuis le formulaire d'administration. Les défauts du site
/// (ville, pays, statut) s'appliquent ici, pas dans l'adaptateur.
pub async fn create(
    client: &CompatClient,
    new: NewProperty,
    created_by: &str,
) -> Result<Property> {
    new.validate()?;

    let mut payload = serde_json::to_value(&new)?;
    if let Some(obj) = payload.as_object_mut() {
        obj.insert("title".into(), json!(new.title.trim()));
        obj.insert("address".into(), json!(new.address.trim()));
        match new.city.as_deref().map(str::trim) {
            Some(city) if !city.is_empty() => {
                obj.insert("city".into(), json!(city));
            }
            _ => {
                obj.insert("city".into(), json!(DEFAULT_CITY));
            }
        }
        obj.insert("country".into(), json!(DEFAULT_COUNTRY));
        if new.status.is_none() {
            obj.insert("status".into(), json!(PropertyStatus::Disponible));
        }
        obj.insert("created_by".into(), json!(created_by));
    }

    let resp = client
        .from(COLLECTION)
        .insert(payload)
        .select()
        .single()
        .await;
    let row = expect_row(resp, "propiedad creada")?;

    info!(id = %row["id"], "Propriété créée");
    Ok(serde_json::from_value(row)?)
}

/// Mise à jour partielle d'une propriété.
pub async fn update(client: &CompatClient, id: &str, patch: PropertyPatch) -> Result<Property> {
    let resp = client
        .from(COLLECTION)
        .update(serde_json::to_value(&patch)?)
        .eq("id", json!(id))
        .await;
    let row = expect_row(resp, &format!("propiedad {}", id))?;
    Ok(serde_json::from_value(row)?)
}

/// Suppression définitive (pas de corbeille côté site).
pub async fn delete(client: &CompatClient, id: &str) -> Result<()> {
    let resp = client.from(COLLECTION).delete().eq("id", json!(id)).await;
    match resp.error {
        Some(e) if e.message == "Document not found" => {
            Err(AppError::NotFound(format!("propiedad {}", id)))
        }
        Some(e) => Err(AppError::Store(e.message)),
        None => {
            info!(id, "Propriété supprimée");
            Ok(())
        }
    }
}

/// Statistiques du tableau de bord : total / disponibles / vendues,
/// calculées sur la lecture intégrale de la colonne de statut.
pub async fn stats(client: &CompatClient) -> Result<PropertyStats> {
    let resp = client
        .from(COLLECTION)
        .select(Some("status"), None)
        .all()
        .await;
    let rows = expect_rows(resp)?;

    let total = rows.len();
    let available = rows
        .iter()
        .filter(|r| r["status"] == "disponible")
        .count();
    let sold = rows.iter().filter(|r| r["status"] == "vendido").count();

    Ok(PropertyStats {
        total,
        available,
        sold,
    })
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::CompatClient;
    use crate::domain::model::{OperationType, PropertyType};
    use crate::doc_store::MemoryStore;
    use crate::utils::Arc;

    fn client() -> CompatClient {
        CompatClient::service(Arc::new(MemoryStore::new()))
    }

    fn casa(title: &str) -> NewProperty {
        NewProperty {
            title: title.into(),
            description: Some("Amplia casa familiar".into()),
            price: 5_500_000.0,
            property_type: PropertyType::Casa,
            bedrooms: Some(3),
            bathrooms: Some(2),
            area_m2: Some(210.0),
            address: "Calle 5, Gurabo".into(),
            city: None,
            operation_type: OperationType::Venta,
            status: None,
            features: vec!["piscina".into()],
            images: vec![],
            featured: false,
        }
    }

    #[tokio::test]
    async fn test_create_applies_site_defaults() {
        let client = client();
        let created = create(&client, casa("Casa en Gurabo"), "u-admin").await.unwrap();

        assert_eq!(created.city, "Santiago");
        assert_eq!(created.country, "República Dominicana");
        assert_eq!(created.status, PropertyStatus::Disponible);
        assert_eq!(created.created_by.as_deref(), Some("u-admin"));
        assert!(!created.id.is_empty());
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let client = client();
        let mut bad = casa("X");
        bad.title = "  ".into();

        let err = create(&client, bad, "u").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_update_delete_cycle() {
        let client = client();
        let created = create(&client, casa("Casa A"), "u").await.unwrap();

        // Lecture
        let fetched = get(&client, &created.id).await.unwrap();
        assert_eq!(fetched.title, "Casa A");

        // Patch partiel : le prix change, le reste est conservé
        let patch = PropertyPatch {
            price: Some(4_900_000.0),
            status: Some(PropertyStatus::Reservado),
            ..Default::default()
        };
        let updated = update(&client, &created.id, patch).await.unwrap();
        assert_eq!(updated.price, 4_900_000.0);
        assert_eq!(updated.status, PropertyStatus::Reservado);
        assert_eq!(updated.title, "Casa A");
        assert_eq!(updated.created_at, created.created_at);

        // Suppression puis relecture
        delete(&client, &created.id).await.unwrap();
        let err = get(&client, &created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_listings_and_stats() {
        let client = client();
        let a = create(&client, casa("Casa A"), "u").await.unwrap();
        let _b = create(&client, casa("Casa B"), "u").await.unwrap();
        let c = create(&client, casa("Casa C"), "u").await.unwrap();

        // A vendue, C mise en avant
        update(
            &client,
            &a.id,
            PropertyPatch {
                status: Some(PropertyStatus::Vendido),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        update(
            &client,
            &c.id,
            PropertyPatch {
                featured: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let available = list_available(&client, 10).await.unwrap();
        assert_eq!(available.len(), 2);

        let featured = list_featured(&client, 6).await.unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].title, "Casa C");

        let stats = stats(&client).await.unwrap();
        assert_eq!(
            stats,
            PropertyStats {
                total: 3,
                available: 2,
                sold: 1
            }
        );
    }

    #[tokio::test]
    async fn test_admin_pagination() {
        let client = client();
        for i in 0..5 {
            create(&client, casa(&format!("Casa {}", i)), "u").await.unwrap();
        }

        let (page, count) = list_page(&client, 0, 1).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(count, 2);

        let (rest, _) = list_page(&client, 2, 9).await.unwrap();
        assert_eq!(rest.len(), 3);
    }
}
