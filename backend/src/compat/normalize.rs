// FICHIER : backend/src/compat/normalize.rs

//! Normalisation des documents lus : injection de l'identifiant du magasin
//! sous `id` et coercition des horodatages natifs en chaînes ISO-8601.
//! Idempotente : renormaliser un enregistrement déjà normalisé est un
//! no-op. Les objets d'horodatage natifs ne franchissent JAMAIS cette
//! frontière.

use crate::doc_store::{compare, StoredDoc};
use crate::utils::prelude::*;
use chrono::{SecondsFormat, TimeZone};
use serde_json::Map;

/// Champs horodatés par l'adaptateur à l'écriture.
pub const TIMESTAMP_FIELDS: [&str; 2] = ["created_at", "updated_at"];

/// Coerce une valeur d'horodatage : encodage natif → ISO-8601 (précision
/// milliseconde, suffixe Z). Toute autre forme passe inchangée.
fn coerce_timestamp(v: &Value) -> Value {
    if let Some((secs, nanos)) = compare::native_timestamp(v) {
        if let Some(dt) = Utc.timestamp_opt(secs, nanos).single() {
            return Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }
    v.clone()
}

/// Transforme un document du magasin en enregistrement plat :
/// `{id, ...champs, created_at: iso, updated_at: iso}`.
/// L'identifiant du magasin fait foi : un champ `id` résiduel est écrasé.
pub fn normalize(doc: &StoredDoc) -> Value {
    let mut out = Map::new();
    out.insert("id".to_string(), Value::String(doc.id.clone()));

    if let Some(fields) = doc.fields.as_object() {
        for (k, v) in fields {
            if k == "id" {
                continue;
            }
            if TIMESTAMP_FIELDS.contains(&k.as_str()) {
                out.insert(k.clone(), coerce_timestamp(v));
            } else {
                out.insert(k.clone(), v.clone());
            }
        }
    }

    Value::Object(out)
}

/// Normalise un lot de documents.
pub fn normalize_all(docs: &[StoredDoc]) -> Vec<Value> {
    docs.iter().map(normalize).collect()
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================
