use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::r2d2::{self, Pool};
use diesel::sql_types::{BigInt, Text, Timestamp};
use diesel::sqlite::Sqlite;
use diesel::{RunQueryDsl, SqliteConnection};
use log::{debug, info};
use std::marker::PhantomData;
use std::sync::Arc;

use super::model::DocumentRow;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use balancer_core::errors::{Error, Result, ValidationError};
use balancer_core::repository::{Aggregate, Filter, RepositoryTrait};

/// Value bound to a `?` placeholder of a generated statement.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Text(String),
    BigInt(i64),
    Timestamp(NaiveDateTime),
}

fn bind_all<'f>(sql: String, values: Vec<BindValue>) -> BoxedSqlQuery<'f, Sqlite, SqlQuery> {
    values
        .into_iter()
        .fold(diesel::sql_query(sql).into_boxed::<Sqlite>(), |query, value| match value {
            BindValue::Text(v) => query.bind::<Text, _>(v),
            BindValue::BigInt(v) => query.bind::<BigInt, _>(v),
            BindValue::Timestamp(v) => query.bind::<Timestamp, _>(v),
        })
}

fn to_sql_count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
fn validate_collection(collection: &str) -> Result<()> {
    let mut chars = collection.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Invalid collection name '{}'",
            collection
        ))))
    }
}

/// Translates a filter into a WHERE clause and its bind values.
fn where_clause<T: Aggregate>(filter: &Filter) -> (String, Vec<BindValue>) {
    match filter {
        Filter::All => ("1 = 1".to_string(), Vec::new()),
        Filter::ById(id) => ("id = ?".to_string(), vec![BindValue::Text(id.clone())]),
        Filter::ByIdAndVersion { id, version } => (
            "id = ? AND version = ?".to_string(),
            vec![BindValue::Text(id.clone()), BindValue::BigInt(*version)],
        ),
        Filter::ByChildId { id, child_id } => (
            format!(
                "id = ? AND EXISTS (SELECT 1 FROM json_each(document, '$.{}') AS child \
                 WHERE json_extract(child.value, '$.id') = ?)",
                T::CHILDREN_FIELD
            ),
            vec![BindValue::Text(id.clone()), BindValue::Text(child_id.clone())],
        ),
    }
}

/// Repository storing each aggregate as one JSON document row.
///
/// Reads go through the pool; every write is a job on the single writer
/// actor, so a versioned `replace` is atomic.
pub struct SqliteDocumentRepository<T: Aggregate> {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
    collection: String,
    _aggregate: PhantomData<fn() -> T>,
}

impl<T: Aggregate> SqliteDocumentRepository<T> {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
        collection: &str,
    ) -> Result<Self> {
        validate_collection(collection)?;
        Ok(Self {
            pool,
            writer,
            collection: collection.to_string(),
            _aggregate: PhantomData,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Creates the collection table when it is not managed by a migration.
    pub async fn ensure_collection(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT NOT NULL PRIMARY KEY,
                version BIGINT NOT NULL,
                document TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );",
            self.collection
        );
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                conn.batch_execute(&sql).into_core()
            })
            .await?;
        info!("Collection {} is ready", self.collection);
        Ok(())
    }

    fn load_rows(&self, filter: &Filter, page: Option<(usize, usize)>) -> Result<Vec<T>> {
        let (clause, mut values) = where_clause::<T>(filter);
        let mut sql = format!(
            "SELECT id, version, document FROM {} WHERE {} ORDER BY rowid",
            self.collection, clause
        );
        if let Some((skip, take)) = page {
            sql.push_str(" LIMIT ? OFFSET ?");
            values.push(BindValue::BigInt(to_sql_count(take)));
            values.push(BindValue::BigInt(to_sql_count(skip)));
        }

        let mut conn = get_connection(&self.pool)?;
        let rows = bind_all(sql, values)
            .load::<DocumentRow>(&mut conn)
            .map_err(StorageError::from)?;
        rows.iter().map(|row| row.decode()).collect()
    }
}

#[async_trait]
impl<T: Aggregate> RepositoryTrait<T> for SqliteDocumentRepository<T> {
    fn get_all(&self, filter: &Filter) -> Result<Vec<T>> {
        self.load_rows(filter, None)
    }

    fn get_all_skip_take(&self, filter: &Filter, skip: usize, take: usize) -> Result<Vec<T>> {
        self.load_rows(filter, Some((skip, take)))
    }

    fn get_first(&self, filter: &Filter) -> Result<Option<T>> {
        Ok(self.load_rows(filter, Some((0, 1)))?.into_iter().next())
    }

    async fn insert(&self, entity: T) -> Result<T> {
        let row = DocumentRow::encode(&entity)?;
        let sql = format!(
            "INSERT INTO {} (id, version, document) VALUES (?, ?, ?)",
            self.collection
        );
        let values = vec![
            BindValue::Text(row.id),
            BindValue::BigInt(row.version),
            BindValue::Text(row.document),
        ];

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                bind_all(sql, values).execute(conn).into_core()
            })
            .await?;
        debug!("Inserted document {} into {}", entity.id(), self.collection);
        Ok(entity)
    }

    async fn replace(&self, filter: &Filter, entity: T) -> Result<usize> {
        let row = DocumentRow::encode(&entity)?;
        let (clause, clause_values) = where_clause::<T>(filter);
        let sql = format!(
            "UPDATE {table} SET id = ?, version = ?, document = ?, updated_at = ? \
             WHERE rowid IN (SELECT rowid FROM {table} WHERE {clause} ORDER BY rowid LIMIT 1)",
            table = self.collection,
            clause = clause
        );
        let mut values = vec![
            BindValue::Text(row.id),
            BindValue::BigInt(row.version),
            BindValue::Text(row.document),
            BindValue::Timestamp(Utc::now().naive_utc()),
        ];
        values.extend(clause_values);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                bind_all(sql, values).execute(conn).into_core()
            })
            .await
    }

    async fn delete_all(&self, filter: &Filter) -> Result<usize> {
        let (clause, values) = where_clause::<T>(filter);
        let sql = format!("DELETE FROM {} WHERE {}", self.collection, clause);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                bind_all(sql, values).execute(conn).into_core()
            })
            .await
    }
}
