// FICHIER : backend/src/compat/builder.rs

//! La surface chaînée : reproduit la grammaire du query builder
//! relationnel (`from(table).select(cols?, opts?).eq().order().limit()`)
//! au-dessus de la spécification typée. Chaque builder est consommé par
//! valeur : une chaîne construit UNE spécification, exécutée une fois par
//! son terminal, jamais réutilisée.

use crate::doc_store::{FieldFilter, SortDirection, SortSpec};
use crate::utils::prelude::*;

use super::executor;
use super::query::{QuerySpec, Terminal};
use super::write;
use super::{QueryContext, RowResponse, RowsResponse};

// --- OPTIONS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMode {
    Exact,
}

/// Options de `select(columns?, options?)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    pub count: Option<CountMode>,
}

impl SelectOptions {
    /// `{ count: "exact" }` : les terminaux rapportent en plus le nombre
    /// d'enregistrements du lot lu.
    pub fn count_exact() -> Self {
        Self {
            count: Some(CountMode::Exact),
        }
    }
}

/// Options de `order(field, options?)`. Direction descendante par défaut,
/// comme la surface historique.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderOptions {
    pub ascending: bool,
}

impl OrderOptions {
    pub fn ascending() -> Self {
        Self { ascending: true }
    }
}

// --- POINT D'ENTRÉE : from(table) ---

pub struct TableRef {
    ctx: QueryContext,
    table: String,
}

impl TableRef {
    pub(crate) fn new(ctx: QueryContext, table: &str) -> Self {
        Self {
            ctx,
            table: table.to_string(),
        }
    }

    /// `columns` est accepté pour compatibilité mais jamais utilisé en
    /// projection : l'adaptateur renvoie toujours l'enregistrement complet.
    pub fn select(self, columns: Option<&str>, options: Option<SelectOptions>) -> SelectBuilder {
        let _ = columns;
        let count_exact = matches!(
            options.and_then(|o| o.count),
            Some(CountMode::Exact)
        );
        SelectBuilder {
            ctx: self.ctx,
            table: self.table,
            filters: Vec::new(),
            order: None,
            count_exact,
        }
    }

    /// Insertion unitaire : se termine par `.select().single()`.
    pub fn insert(self, record: Value) -> InsertBuilder {
        InsertBuilder {
            ctx: self.ctx,
            table: self.table,
            payload: record,
        }
    }

    /// Insertion par lot : un résultat par élément (un lot vide est une
    /// erreur de validation).
    pub async fn insert_many(self, records: Vec<Value>) -> RowsResponse {
        write::execute_insert_many(&self.ctx, &self.table, records).await
    }

    /// Mise à jour partielle : se termine par `.eq(field, value)`.
    pub fn update(self, patch: Value) -> UpdateBuilder {
        UpdateBuilder {
            ctx: self.ctx,
            table: self.table,
            patch,
        }
    }

    /// Suppression : se termine par `.eq(field, value)`.
    pub fn delete(self) -> DeleteBuilder {
        DeleteBuilder {
            ctx: self.ctx,
            table: self.table,
        }
    }
}

// --- LECTURES ---

pub struct SelectBuilder {
    ctx: QueryContext,
    table: String,
    filters: Vec<FieldFilter>,
    order: Option<SortSpec>,
    count_exact: bool,
}

impl SelectBuilder {
    /// Ajoute un filtre d'égalité (conjonction). Deux `.eq()` successifs
    /// sont le chemin classique ; la spécification en accepte davantage.
    pub fn eq(mut self, field: &str, value: Value) -> Self {
        self.filters.push(FieldFilter::eq(field, value));
        self
    }

    /// Fixe LA clé de tri. Un appel ultérieur remplace le précédent.
    pub fn order(mut self, field: &str, options: OrderOptions) -> Self {
        let direction = if options.ascending {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        self.order = Some(SortSpec::new(field, direction));
        self
    }

    fn into_spec(self, terminal: Terminal) -> (QueryContext, QuerySpec) {
        let spec = QuerySpec {
            table: self.table,
            filters: self.filters,
            order: self.order,
            count_exact: self.count_exact,
            terminal,
        };
        (self.ctx, spec)
    }

    /// Terminal : lecture plafonnée à `n` enregistrements.
    pub async fn limit(self, n: usize) -> RowsResponse {
        let (ctx, spec) = self.into_spec(Terminal::Limit(n));
        executor::execute_rows(&ctx, spec).await
    }

    /// Terminal : tranche `[start, end]` de l'ordre courant.
    pub async fn range(self, start: usize, end: usize) -> RowsResponse {
        let (ctx, spec) = self.into_spec(Terminal::Range { start, end });
        executor::execute_rows(&ctx, spec).await
    }

    /// Terminal : un enregistrement ou `Document not found`.
    pub async fn single(self) -> RowResponse {
        let (ctx, spec) = self.into_spec(Terminal::Single);
        executor::execute_single(&ctx, spec).await
    }

    /// Terminal : lecture intégrale (le `await` direct du `select()`
    /// historique, utilisé par les tableaux de bord).
    pub async fn all(self) -> RowsResponse {
        let (ctx, spec) = self.into_spec(Terminal::All);
        executor::execute_rows(&ctx, spec).await
    }
}

// --- ÉCRITURES ---

pub struct InsertBuilder {
    ctx: QueryContext,
    table: String,
    payload: Value,
}

impl InsertBuilder {
    /// Forme historique : l'insertion renvoie l'enregistrement via
    /// `.select().single()`.
    pub fn select(self) -> InsertReturning {
        InsertReturning {
            ctx: self.ctx,
            table: self.table,
            payload: self.payload,
        }
    }
}

pub struct InsertReturning {
    ctx: QueryContext,
    table: String,
    payload: Value,
}

impl InsertReturning {
    pub async fn single(self) -> RowResponse {
        write::execute_insert(&self.ctx, &self.table, self.payload).await
    }
}

pub struct UpdateBuilder {
    ctx: QueryContext,
    table: String,
    patch: Value,
}

impl UpdateBuilder {
    /// Terminal : résout la cible par égalité unique puis fusionne.
    pub async fn eq(self, field: &str, value: Value) -> RowResponse {
        write::execute_update(&self.ctx, &self.table, self.patch, field, value).await
    }
}

pub struct DeleteBuilder {
    ctx: QueryContext,
    table: String,
}

impl DeleteBuilder {
    /// Terminal : résout la cible par égalité unique puis supprime.
    pub async fn eq(self, field: &str, value: Value) -> RowResponse {
        write::execute_delete(&self.ctx, &self.table, field, value).await
    }
}

// ============================================================================
// TESTS UNITAIRES
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::policy::OpenPolicy;
    use crate::doc_store::{DocumentStore, MemoryStore};
    use crate::utils::Arc;

    fn ctx() -> (Arc<MemoryStore>, QueryContext) {
        let store = Arc::new(MemoryStore::new());
        let ctx = QueryContext {
            store: store.clone(),
            policy: Arc::new(OpenPolicy),
            user: None,
            privileged: true,
        };
        (store, ctx)
    }

    fn table(ctx: &QueryContext, name: &str) -> TableRef {
        TableRef::new(ctx.clone(), name)
    }

    #[tokio::test]
    async fn test_full_chain_eq_eq_order_limit() {
        let (store, ctx) = ctx();
        store
            .set("props", "1", &json!({ "city": "Santiago", "op": "venta", "price": 100 }))
            .await
            .unwrap();
        store
            .set("props", "2", &json!({ "city": "Santiago", "op": "venta", "price": 300 }))
            .await
            .unwrap();
        store
            .set("props", "3", &json!({ "city": "Santiago", "op": "alquiler", "price": 200 }))
            .await
            .unwrap();

        let resp = table(&ctx, "props")
            .select(None, Some(SelectOptions::count_exact()))
            .eq("city", json!("Santiago"))
            .eq("op", json!("venta"))
            .order("price", OrderOptions::ascending())
            .limit(10)
            .await;

        assert!(resp.is_ok());
        assert_eq!(resp.count, Some(2));
        let prices: Vec<u64> = resp.data.iter().map(|r| r["price"].as_u64().unwrap()).collect();
        assert_eq!(prices, vec![100, 300]);
    }

    #[tokio::test]
    async fn test_later_order_overwrites_earlier() {
        let (store, ctx) = ctx();
        store.set("c", "1", &json!({ "a": 1, "b": 9 })).await.unwrap();
        store.set("c", "2", &json!({ "a": 2, "b": 1 })).await.unwrap();

        // Le second order() remplace le premier : tri par b ascendant
        let resp = table(&ctx, "c")
            .select(None, None)
            .order("a", OrderOptions::ascending())
            .order("b", OrderOptions::ascending())
            .limit(10)
            .await;

        let ids: Vec<&str> = resp.data.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_order_default_is_descending() {
        let (store, ctx) = ctx();
        store.set("c", "1", &json!({ "n": 1 })).await.unwrap();
        store.set("c", "2", &json!({ "n": 2 })).await.unwrap();

        let resp = table(&ctx, "c")
            .select(None, None)
            .order("n", OrderOptions::default())
            .limit(10)
            .await;

        let ns: Vec<u64> = resp.data.iter().map(|r| r["n"].as_u64().unwrap()).collect();
        assert_eq!(ns, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_select_columns_are_ignored() {
        let (store, ctx) = ctx();
        store
            .set("c", "1", &json!({ "status": "disponible", "title": "Casa" }))
            .await
            .unwrap();

        // On demande "status" : l'enregistrement complet revient quand même
        let resp = table(&ctx, "c").select(Some("status"), None).all().await;
        assert_eq!(resp.data[0]["title"], "Casa");
    }

    #[tokio::test]
    async fn test_insert_select_single_shape() {
        let (_store, ctx) = ctx();

        let resp = table(&ctx, "c")
            .insert(json!({ "title": "Nueva" }))
            .select()
            .single()
            .await;

        let record = resp.data.unwrap();
        assert_eq!(record["title"], "Nueva");
        assert!(record["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_update_and_delete_chains() {
        let (store, ctx) = ctx();
        store.set("c", "1", &json!({ "v": 1 })).await.unwrap();

        let resp = table(&ctx, "c").update(json!({ "v": 2 })).eq("id", json!("1")).await;
        assert_eq!(resp.data.unwrap()["v"], 2);

        let resp = table(&ctx, "c").delete().eq("id", json!("1")).await;
        assert!(resp.is_ok());
        assert_eq!(store.len("c"), 0);
    }

    #[tokio::test]
    async fn test_bare_select_await_reads_everything() {
        let (store, ctx) = ctx();
        for i in 0..12 {
            store
                .set("c", &format!("{:02}", i), &json!({ "n": i }))
                .await
                .unwrap();
        }

        let resp = table(&ctx, "c")
            .select(None, Some(SelectOptions::count_exact()))
            .all()
            .await;
        assert_eq!(resp.data.len(), 12);
        assert_eq!(resp.count, Some(12));
    }
}
