//! PostgreSQL content store.
//!
//! Translates [`CollectionQuery`] handles into SQL with SeaQuery. Extra
//! attributes live in a JSONB `attrs` column and are extracted with `->>`;
//! subtree scoping runs through a recursive CTE. Reversed orderings are
//! translated into an ascending window plus an in-process reversal so the
//! reverse-of-ascending contract survives pagination.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use sea_query::{Alias, Asterisk, Expr, ExprTrait, Order, PostgresQueryBuilder, Query,
    SelectStatement, SimpleExpr};
use sqlx::PgPool;
use std::collections::HashMap;

use crate::db;
use crate::models::{ChildRelation, Document, MediaAsset, Page, Record};

use super::{CollectionQuery, ContentStore, FieldFilter, FilterOperator, QueryTarget};

/// Validate a SQL identifier name (table/column names).
/// Allows only `[a-zA-Z_][a-zA-Z0-9_]*` with max 63 chars (PostgreSQL limit).
fn is_safe_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// How a resolved field expression compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldClass {
    Integer,
    Text,
}

/// Content store backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn table(target: QueryTarget) -> &'static str {
        match target {
            QueryTarget::Pages => "page",
            QueryTarget::Media => "media_asset",
            QueryTarget::Documents => "document",
        }
    }

    /// Resolve a field to a raw SQL expression and its comparison class.
    ///
    /// `id` and native columns map to real columns; everything else is a
    /// JSONB text extraction from `attrs`.
    fn field_sql(target: QueryTarget, field: &str) -> Result<(String, FieldClass)> {
        let table = Self::table(target);

        let native: &[(&str, FieldClass)] = match target {
            QueryTarget::Pages | QueryTarget::Documents => &[("title", FieldClass::Text)],
            QueryTarget::Media => &[
                ("title", FieldClass::Text),
                ("width", FieldClass::Integer),
                ("height", FieldClass::Integer),
            ],
        };

        if field == "id" {
            return Ok((format!("{table}.id"), FieldClass::Integer));
        }
        if let Some((name, class)) = native.iter().find(|(name, _)| *name == field) {
            return Ok((format!("{table}.{name}"), *class));
        }

        if !is_safe_identifier(field) {
            bail!("unsafe field name: '{field}'");
        }
        Ok((format!("{table}.attrs->>'{field}'"), FieldClass::Text))
    }

    /// Build a single filter condition.
    fn filter_condition(target: QueryTarget, filter: &FieldFilter) -> Result<SimpleExpr> {
        let (sql, class) = Self::field_sql(target, &filter.field)?;

        let condition = match filter.operator {
            FilterOperator::Equals => match class {
                FieldClass::Integer => match filter.value.as_i64() {
                    Some(rhs) => Expr::cust(sql).eq(rhs),
                    None => Expr::cust("FALSE"),
                },
                FieldClass::Text => Expr::cust(sql).eq(filter.value.as_text()),
            },
            FilterOperator::Contains => Self::text_expr(&sql, class)
                .like(format!(
                    "%{}%",
                    escape_like_wildcards(&filter.value.as_text().to_lowercase())
                )),
            FilterOperator::StartsWith => Self::text_expr(&sql, class).like(format!(
                "{}%",
                escape_like_wildcards(&filter.value.as_text().to_lowercase())
            )),
            FilterOperator::GreaterThan
            | FilterOperator::LessThan
            | FilterOperator::GreaterOrEqual
            | FilterOperator::LessOrEqual => {
                let Some(rhs) = filter.value.as_i64() else {
                    return Ok(Expr::cust("FALSE"));
                };
                let lhs = Self::integer_expr(&sql, class);
                match filter.operator {
                    FilterOperator::GreaterThan => lhs.gt(rhs),
                    FilterOperator::LessThan => lhs.lt(rhs),
                    FilterOperator::GreaterOrEqual => lhs.gte(rhs),
                    FilterOperator::LessOrEqual => lhs.lte(rhs),
                    _ => unreachable!(),
                }
            }
        };

        Ok(condition)
    }

    /// Lowercased text form of a field expression, for pattern matching.
    fn text_expr(sql: &str, class: FieldClass) -> SimpleExpr {
        match class {
            FieldClass::Text => Expr::cust(format!("LOWER({sql})")),
            FieldClass::Integer => Expr::cust(format!("LOWER(CAST({sql} AS TEXT))")),
        }
    }

    /// Integer form of a field expression. Text fields are cast through a
    /// CASE guard so non-integer values drop out instead of erroring.
    fn integer_expr(sql: &str, class: FieldClass) -> SimpleExpr {
        match class {
            FieldClass::Integer => Expr::cust(sql.to_string()),
            FieldClass::Text => Expr::cust(format!(
                "(CASE WHEN {sql} ~ '^-?[0-9]+$' THEN CAST({sql} AS BIGINT) END)"
            )),
        }
    }

    /// Apply scope, filter and ranking membership constraints.
    fn apply_constraints(stmt: &mut SelectStatement, query: &CollectionQuery) -> Result<()> {
        let table = Self::table(query.target);

        if query.target == QueryTarget::Pages {
            if query.visible_only {
                stmt.and_where(Expr::col((Alias::new(table), Alias::new("live"))).eq(true));
                stmt.and_where(
                    Expr::col((Alias::new(table), Alias::new("restricted"))).eq(false),
                );
            }
            if let Some(root) = query.ancestor {
                stmt.and_where(Expr::cust(format!(
                    "{table}.id IN (WITH RECURSIVE subtree AS ( \
                     SELECT id FROM page WHERE id = {root} \
                     UNION ALL \
                     SELECT p.id FROM page p INNER JOIN subtree s ON p.parent_id = s.id \
                     ) SELECT id FROM subtree)"
                )));
            }
            if let Some(page_type) = &query.page_type {
                stmt.and_where(
                    Expr::col((Alias::new(table), Alias::new("type"))).eq(page_type),
                );
            }
            if let Some(parent) = query.parent {
                stmt.and_where(
                    Expr::col((Alias::new(table), Alias::new("parent_id"))).eq(parent),
                );
            }
        }

        for filter in &query.filters {
            stmt.and_where(Self::filter_condition(query.target, filter)?);
        }

        if let Some(ids) = &query.ranked_ids {
            if ids.is_empty() {
                stmt.and_where(Expr::cust("FALSE"));
            } else {
                stmt.and_where(
                    Expr::col((Alias::new(table), Alias::new("id"))).is_in(ids.clone()),
                );
            }
        }

        Ok(())
    }

    /// Apply ordering: rank position when ranked, otherwise the ascending
    /// field sort, defaulting to ascending id. Reversal is handled by the
    /// caller's window translation, never with ORDER BY ... DESC.
    fn apply_order(stmt: &mut SelectStatement, query: &CollectionQuery) -> Result<()> {
        let table = Self::table(query.target);

        if let Some(ids) = &query.ranked_ids {
            let joined = ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            stmt.order_by_expr(
                Expr::cust(format!(
                    "array_position(ARRAY[{joined}]::bigint[], {table}.id)"
                )),
                Order::Asc,
            );
            return Ok(());
        }

        match &query.order {
            Some(order) => {
                let (sql, _) = Self::field_sql(query.target, &order.field)?;
                stmt.order_by_expr(Expr::cust(sql), Order::Asc);
            }
            None => {
                stmt.order_by((Alias::new(table), Alias::new("id")), Order::Asc);
            }
        }
        Ok(())
    }

    /// SELECT with the target's full column set plus all constraints and
    /// ordering applied, no slice yet.
    fn base_select(query: &CollectionQuery) -> Result<SelectStatement> {
        let table = Self::table(query.target);
        let columns: &[&str] = match query.target {
            QueryTarget::Pages => {
                &["id", "type", "title", "parent_id", "live", "restricted", "attrs"]
            }
            QueryTarget::Media => &["id", "title", "width", "height", "file", "attrs"],
            QueryTarget::Documents => &["id", "title", "file", "attrs"],
        };

        let mut stmt = Query::select();
        for column in columns {
            stmt.column((Alias::new(table), Alias::new(*column)));
        }
        stmt.from(Alias::new(table));
        Self::apply_constraints(&mut stmt, query)?;
        Self::apply_order(&mut stmt, query)?;
        Ok(stmt)
    }

    async fn run_select(&self, query: &CollectionQuery, sql: &str) -> Result<Vec<Record>> {
        match query.target {
            QueryTarget::Pages => {
                let rows: Vec<PageRow> = sqlx::query_as(&sql)
                    .fetch_all(&self.pool)
                    .await
                    .context("failed to fetch pages")?;
                let pages = self.attach_children(rows).await?;
                Ok(pages.into_iter().map(Record::Page).collect())
            }
            QueryTarget::Media => {
                let rows: Vec<MediaAsset> = sqlx::query_as(&sql)
                    .fetch_all(&self.pool)
                    .await
                    .context("failed to fetch media assets")?;
                Ok(rows.into_iter().map(Record::Media).collect())
            }
            QueryTarget::Documents => {
                let rows: Vec<Document> = sqlx::query_as(&sql)
                    .fetch_all(&self.pool)
                    .await
                    .context("failed to fetch documents")?;
                Ok(rows.into_iter().map(Record::Document).collect())
            }
        }
    }

    /// Load child relation rows for a batch of pages.
    async fn attach_children(&self, rows: Vec<PageRow>) -> Result<Vec<Page>> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut children: HashMap<i64, Vec<ChildRelation>> = HashMap::new();

        if !ids.is_empty() {
            let child_rows: Vec<ChildRow> = sqlx::query_as(
                "SELECT page_id, relation, kind, data FROM page_child \
                 WHERE page_id = ANY($1) ORDER BY page_id, relation, position",
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .context("failed to fetch page children")?;

            for row in child_rows {
                let relations = children.entry(row.page_id).or_default();
                match relations.iter_mut().find(|r| r.name == row.relation) {
                    Some(relation) => relation.records.push(row.data),
                    None => relations.push(ChildRelation {
                        name: row.relation,
                        kind: row.kind,
                        records: vec![row.data],
                    }),
                }
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let relations = children.remove(&row.id).unwrap_or_default();
                row.into_page(relations)
            })
            .collect())
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn count(&self, query: &CollectionQuery) -> Result<u64> {
        let table = Self::table(query.target);
        let sql = {
            let mut stmt = Query::select();
            stmt.expr(Expr::col(Asterisk).count());
            stmt.from(Alias::new(table));
            Self::apply_constraints(&mut stmt, query)?;
            stmt.to_string(PostgresQueryBuilder)
        };
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .context("failed to count collection")?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn fetch(&self, query: &CollectionQuery) -> Result<Vec<Record>> {
        let reversed =
            query.ranked_ids.is_none() && query.order.as_ref().is_some_and(|o| o.reverse);

        if reversed {
            // A reversed window [offset, offset+limit) over n rows is the
            // ascending window [n-offset-limit, n-offset), read backwards.
            let total = self.count(query).await?;
            let (offset, limit) = match query.slice {
                Some(slice) => (slice.offset, slice.limit),
                None => (0, total),
            };
            let end = total.saturating_sub(offset);
            let start = total.saturating_sub(offset.saturating_add(limit));

            let sql = {
                let mut stmt = Self::base_select(query)?;
                stmt.offset(start);
                stmt.limit(end - start);
                stmt.to_string(PostgresQueryBuilder)
            };
            let mut records = self.run_select(query, &sql).await?;
            records.reverse();
            return Ok(records);
        }

        let sql = {
            let mut stmt = Self::base_select(query)?;
            if let Some(slice) = query.slice {
                stmt.offset(slice.offset);
                stmt.limit(slice.limit);
            }
            stmt.to_string(PostgresQueryBuilder)
        };
        self.run_select(query, &sql).await
    }

    async fn get(&self, query: &CollectionQuery, id: i64) -> Result<Option<Record>> {
        let table = Self::table(query.target);
        let sql = {
            let mut stmt = Self::base_select(query)?;
            stmt.and_where(Expr::col((Alias::new(table), Alias::new("id"))).eq(id));
            stmt.limit(1);
            stmt.to_string(PostgresQueryBuilder)
        };
        Ok(self.run_select(query, &sql).await?.into_iter().next())
    }

    async fn page_exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM page WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("failed to check page existence")?;

        Ok(exists)
    }

    async fn healthy(&self) -> bool {
        db::check_health(&self.pool).await
    }
}

/// Internal row type for pages (children are loaded separately).
#[derive(sqlx::FromRow)]
struct PageRow {
    id: i64,
    #[sqlx(rename = "type")]
    page_type: String,
    title: String,
    parent_id: Option<i64>,
    live: bool,
    restricted: bool,
    attrs: serde_json::Value,
}

impl PageRow {
    fn into_page(self, children: Vec<ChildRelation>) -> Page {
        Page {
            id: self.id,
            page_type: self.page_type,
            title: self.title,
            parent_id: self.parent_id,
            live: self.live,
            restricted: self.restricted,
            attrs: self.attrs,
            children,
        }
    }
}

/// Internal row type for child relation records.
#[derive(sqlx::FromRow)]
struct ChildRow {
    page_id: i64,
    relation: String,
    kind: String,
    data: serde_json::Value,
}
