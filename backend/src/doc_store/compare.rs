// FICHIER : backend/src/doc_store/compare.rs

//! Évaluation des filtres et comparaison de valeurs JSON pour le tri.
//! Partagé par les implémentations du magasin (fichier et mémoire).

use crate::utils::Ordering;
use serde_json::Value;

use super::{FieldFilter, SortDirection, SortSpec, StoredDoc};

/// Extrait l'encodage natif d'horodatage `{"_seconds", "_nanoseconds"}`.
pub fn native_timestamp(v: &Value) -> Option<(i64, u32)> {
    let obj = v.as_object()?;
    let secs = obj.get("_seconds")?.as_i64()?;
    let nanos = obj.get("_nanoseconds").and_then(|n| n.as_u64()).unwrap_or(0) as u32;
    Some((secs, nanos))
}

/// Valeur d'un champ au sens du magasin : `id` vise l'identifiant du
/// document, tout autre nom un champ de premier niveau.
pub fn field_value<'a>(doc: &'a StoredDoc, field: &str, id_holder: &'a Value) -> Option<&'a Value> {
    if field == "id" {
        return Some(id_holder);
    }
    doc.fields.get(field)
}

/// Égalité tolérante : les nombres sont comparés en f64 pour ne pas
/// distinguer 1 de 1.0 (les payloads JSON mélangent les deux).
pub fn values_equal(a: Option<&Value>, b: &Value) -> bool {
    match a {
        Some(v1) => {
            if v1 == b {
                return true;
            }
            if let (Some(n1), Some(n2)) = (v1.as_f64(), b.as_f64()) {
                return (n1 - n2).abs() < f64::EPSILON;
            }
            false
        }
        None => b.is_null(),
    }
}

/// Un document satisfait-il la conjonction de filtres d'égalité ?
pub fn matches_filters(doc: &StoredDoc, filters: &[FieldFilter]) -> bool {
    let id_holder = Value::String(doc.id.clone());
    filters
        .iter()
        .all(|f| values_equal(field_value(doc, &f.field, &id_holder), &f.value))
}

/// Comparaison totale de deux valeurs JSON pour le tri.
/// Les horodatages natifs sont comparés comme des instants ; les absents
/// passent avant les présents (donc en fin de liste en ordre descendant).
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(v1), Some(v2)) => {
            if let (Some(t1), Some(t2)) = (native_timestamp(v1), native_timestamp(v2)) {
                return t1.cmp(&t2);
            }
            if let (Some(n1), Some(n2)) = (v1.as_f64(), v2.as_f64()) {
                return n1.partial_cmp(&n2).unwrap_or(Ordering::Equal);
            }
            if let (Some(s1), Some(s2)) = (v1.as_str(), v2.as_str()) {
                return s1.cmp(s2);
            }
            if let (Some(b1), Some(b2)) = (v1.as_bool(), v2.as_bool()) {
                return b1.cmp(&b2);
            }
            Ordering::Equal
        }
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Trie un lot de documents selon la clé demandée.
pub fn sort_docs(docs: &mut [StoredDoc], order: &SortSpec) {
    docs.sort_by(|a, b| {
        let ia = Value::String(a.id.clone());
        let ib = Value::String(b.id.clone());
        let va = field_value(a, &order.field, &ia);
        let vb = field_value(b, &order.field, &ib);
        let cmp = compare_values(va, vb);
        match order.direction {
            SortDirection::Asc => cmp,
            SortDirection::Desc => cmp.reverse(),
        }
    });
}

/// Pipeline commun : filtres, tri, troncature en tête.
pub fn apply_query(
    mut docs: Vec<StoredDoc>,
    filters: &[FieldFilter],
    order: Option<&SortSpec>,
    limit: Option<usize>,
) -> Vec<StoredDoc> {
    if !filters.is_empty() {
        docs.retain(|d| matches_filters(d, filters));
    }
    if let Some(sort) = order {
        sort_docs(&mut docs, sort);
    }
    if let Some(n) = limit {
        docs.truncate(n);
    }
    docs
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc_store::native_now;
    use serde_json::json;

    fn doc(id: &str, fields: Value) -> StoredDoc {
        StoredDoc::new(id, fields)
    }

    #[test]
    fn test_values_equal_numeric_tolerance() {
        let v = json!(1.0);
        assert!(values_equal(Some(&json!(1)), &v));
        assert!(!values_equal(Some(&json!(2)), &v));
        assert!(values_equal(None, &Value::Null));
    }

    #[test]
    fn test_matches_filters_conjunction() {
        let d = doc("x", json!({ "a": 1, "b": 1 }));
        let both = vec![
            FieldFilter::eq("a", json!(1)),
            FieldFilter::eq("b", json!(1)),
        ];
        let half = vec![
            FieldFilter::eq("a", json!(1)),
            FieldFilter::eq("b", json!(2)),
        ];
        assert!(matches_filters(&d, &both));
        assert!(!matches_filters(&d, &half));
    }

    #[test]
    fn test_filter_on_document_id() {
        let d = doc("abc-123", json!({ "a": 1 }));
        assert!(matches_filters(&d, &[FieldFilter::eq("id", json!("abc-123"))]));
        assert!(!matches_filters(&d, &[FieldFilter::eq("id", json!("zzz"))]));
    }

    #[test]
    fn test_compare_native_timestamps() {
        let t1 = json!({ "_seconds": 100, "_nanoseconds": 0 });
        let t2 = json!({ "_seconds": 100, "_nanoseconds": 5 });
        let t3 = json!({ "_seconds": 200, "_nanoseconds": 0 });

        assert_eq!(compare_values(Some(&t1), Some(&t2)), Ordering::Less);
        assert_eq!(compare_values(Some(&t3), Some(&t1)), Ordering::Greater);

        // L'horodatage réel est bien détecté
        assert!(native_timestamp(&native_now()).is_some());
    }

    #[test]
    fn test_sort_desc_by_price() {
        let mut docs = vec![
            doc("1", json!({ "price": 100 })),
            doc("2", json!({ "price": 300 })),
            doc("3", json!({ "price": 200 })),
        ];
        sort_docs(&mut docs, &SortSpec::new("price", SortDirection::Desc));
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_apply_query_pipeline() {
        let docs = vec![
            doc("1", json!({ "status": "disponible", "price": 100 })),
            doc("2", json!({ "status": "vendido", "price": 300 })),
            doc("3", json!({ "status": "disponible", "price": 200 })),
        ];

        let out = apply_query(
            docs,
            &[FieldFilter::eq("status", json!("disponible"))],
            Some(&SortSpec::new("price", SortDirection::Asc)),
            Some(1),
        );

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "1");
    }
}
