//! Postgres-backed record store
//!
//! Documents live in a single `documents` table as JSONB rows keyed by the
//! document id and a collection name. Filters translate to JSONB operators;
//! `$inc` patches become `jsonb_build_object` merges. Creation order is the
//! `created_at` column.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{
    Condition, Filter, FindOptions, Patch, RecordStore, SortOrder, StoreResult, UpdateOptions,
    UpdateReport,
};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn push_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a Filter) {
        for (field, cond) in filter.conditions() {
            match cond {
                Condition::Eq(value) => {
                    qb.push(" AND doc->(");
                    qb.push_bind(field);
                    qb.push("::text) = ");
                    qb.push_bind(value);
                }
                Condition::Ne(value) => {
                    qb.push(" AND doc->(");
                    qb.push_bind(field);
                    qb.push("::text) IS DISTINCT FROM ");
                    qb.push_bind(value);
                }
                Condition::Contains(needle) => {
                    // The needle is a literal substring, not a pattern.
                    let escaped = needle
                        .replace('\\', "\\\\")
                        .replace('%', "\\%")
                        .replace('_', "\\_");
                    qb.push(" AND doc->>(");
                    qb.push_bind(field);
                    qb.push("::text) ILIKE '%' || ");
                    qb.push_bind(escaped);
                    qb.push(" || '%' ESCAPE '\\'");
                }
            }
        }
    }

    /// Subquery selecting the id of the first matching document.
    fn push_first_match<'a>(
        qb: &mut QueryBuilder<'a, Postgres>,
        collection: &'a str,
        filter: &'a Filter,
    ) {
        qb.push("(SELECT id FROM documents WHERE collection = ");
        qb.push_bind(collection);
        Self::push_filter(qb, filter);
        qb.push(" ORDER BY created_at LIMIT 1)");
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert_one(&self, collection: &str, mut doc: Value) -> StoreResult<String> {
        let id = match doc.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = super::new_document_id();
                if let Some(obj) = doc.as_object_mut() {
                    obj.insert("id".to_string(), Value::String(id.clone()));
                }
                id
            }
        };

        sqlx::query("INSERT INTO documents (id, collection, doc) VALUES ($1, $2, $3)")
            .bind(&id)
            .bind(collection)
            .bind(&doc)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        let mut qb = QueryBuilder::new("SELECT doc FROM documents WHERE collection = ");
        qb.push_bind(collection);
        Self::push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at LIMIT 1");

        let row: Option<(Value,)> = qb.build_query_as().fetch_optional(&self.pool).await?;
        Ok(row.map(|(doc,)| doc))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        opts: &FindOptions,
    ) -> StoreResult<Vec<Value>> {
        let mut qb = QueryBuilder::new("SELECT doc FROM documents WHERE collection = ");
        qb.push_bind(collection);
        Self::push_filter(&mut qb, filter);

        match &opts.sort {
            Some((field, order)) => {
                qb.push(" ORDER BY doc->(");
                qb.push_bind(field);
                qb.push("::text)");
                if *order == SortOrder::Descending {
                    qb.push(" DESC");
                }
                qb.push(", created_at");
            }
            None => {
                qb.push(" ORDER BY created_at");
            }
        }

        if opts.skip > 0 {
            qb.push(" OFFSET ");
            qb.push_bind(opts.skip as i64);
        }
        if let Some(limit) = opts.limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit as i64);
        }

        let rows: Vec<(Value,)> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(doc,)| doc).collect())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Patch,
        opts: &UpdateOptions,
    ) -> StoreResult<UpdateReport> {
        let set_object = Value::Object(patch.set_fields().clone());

        // Self-join against the pre-update row so the report can tell a
        // matched-but-unchanged document from a modified one.
        let mut qb = QueryBuilder::new("UPDATE documents AS d SET doc = ");
        for _ in patch.inc_fields() {
            qb.push("(");
        }
        qb.push("d.doc || ");
        qb.push_bind(&set_object);
        for (field, delta) in patch.inc_fields() {
            qb.push(" || jsonb_build_object(");
            qb.push_bind(field);
            qb.push("::text, COALESCE((d.doc->>(");
            qb.push_bind(field);
            qb.push("::text))::bigint, 0) + ");
            qb.push_bind(delta);
            qb.push("))");
        }
        qb.push(" FROM (SELECT id, doc FROM documents WHERE collection = ");
        qb.push_bind(collection);
        Self::push_filter(&mut qb, filter);
        qb.push(
            " ORDER BY created_at LIMIT 1) AS prev \
             WHERE d.id = prev.id \
             RETURNING d.doc IS DISTINCT FROM prev.doc",
        );

        let row: Option<(bool,)> = qb.build_query_as().fetch_optional(&self.pool).await?;

        if let Some((changed,)) = row {
            return Ok(UpdateReport {
                matched: 1,
                modified: u64::from(changed),
                upserted_id: None,
            });
        }

        if !opts.upsert {
            return Ok(UpdateReport::default());
        }

        // No match: create the document from the filter's equality fields
        // merged with the patch. This is check-then-act, same as the memory
        // backend; concurrent identical upserts can both insert.
        let mut doc = Value::Object(filter.equality_fields());
        patch.apply(&mut doc);
        let id = self.insert_one(collection, doc).await?;

        Ok(UpdateReport {
            matched: 0,
            modified: 0,
            upserted_id: Some(id),
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::new("DELETE FROM documents WHERE id = ");
        Self::push_first_match(&mut qb, collection, filter);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
