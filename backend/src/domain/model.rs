// FICHIER : backend/src/domain/model.rs

//! Les enregistrements du site tels qu'ils circulent sur le fil :
//! snake_case, valeurs d'énumération en espagnol (le vocabulaire du
//! back-office), `id`/`created_at`/`updated_at` garantis par l'adaptateur.

use crate::utils::prelude::*;

// --- CATALOGUE IMMOBILIER ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Disponible,
    Reservado,
    Vendido,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Venta,
    Alquiler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Casa,
    Apartamento,
    Local,
    Oficina,
    Terreno,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub property_type: PropertyType,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub area_m2: Option<f64>,
    pub address: String,
    pub city: String,
    pub country: String,
    pub operation_type: OperationType,
    pub status: PropertyStatus,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload de création d'une propriété (formulaire d'administration).
/// Les champs absents reçoivent les défauts du site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub property_type: PropertyType,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub area_m2: Option<f64>,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    pub operation_type: OperationType,
    #[serde(default)]
    pub status: Option<PropertyStatus>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

impl NewProperty {
    /// Validation du formulaire d'administration.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.address.trim().is_empty() {
            return Err(AppError::Validation(
                "Los campos título, precio, tipo de propiedad, dirección y tipo de operación son requeridos"
                    .to_string(),
            ));
        }
        if !(self.price > 0.0) {
            return Err(AppError::Validation(
                "El precio debe ser mayor que cero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Patch partiel d'une propriété : seuls les champs présents écrasent
/// l'existant (fusion superficielle de l'adaptateur).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_m2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<OperationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

/// Statistiques du tableau de bord propriétés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyStats {
    pub total: usize,
    pub available: usize,
    pub sold: usize,
}

// --- CONSULTATIONS (formulaire de contact) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    Nuevo,
    EnProceso,
    Completado,
    Cerrado,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: String,
    #[serde(default)]
    pub property_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub status: InquiryStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInquiry {
    #[serde(default)]
    pub property_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Note,
    EmailSent,
    PhoneCall,
    Meeting,
    StatusChange,
    Response,
}

/// Suivi d'une consultation : notes, appels, changements d'état.
/// `details` reste un JSON libre (source, user-agent, adresse…).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquiryInteraction {
    pub id: String,
    pub inquiry_id: String,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub description: String,
    #[serde(default)]
    pub details: Value,
    pub created_at: String,
    pub updated_at: String,
}

/// Statistiques du tableau de bord consultations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryStats {
    pub total: usize,
    #[serde(rename = "new")]
    pub new_count: usize,
    pub pending: usize,
}

// --- RÉGLAGES DU SITE ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingCategory {
    General,
    Contact,
    Seo,
    Social,
}

/// Un réglage = une entrée clé/valeur rangée par catégorie
/// (site_title, company_email, social_instagram, …).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSetting {
    pub id: String,
    pub key: String,
    pub value: Value,
    pub category: SettingCategory,
    pub created_at: String,
    pub updated_at: String,
}
