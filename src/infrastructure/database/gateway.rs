//! Parameterized statement helpers shared by the SeaORM repositories.
//!
//! Every statement is built with bound values; no caller-supplied text is
//! ever spliced into SQL. The helpers are generic over `ConnectionTrait`, so
//! they run the same against the pool or inside a `DatabaseTransaction`.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Value,
};

use crate::domain::{DomainError, DomainResult};

/// Wrap a `DbErr` with the table and operation it came from.
///
/// Connection and pool-acquisition failures become `StorageUnavailable`,
/// everything else `QueryFailed`.
pub fn storage_error(
    table: &'static str,
    operation: &'static str,
) -> impl FnOnce(DbErr) -> DomainError {
    move |e| match e {
        e @ (DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => {
            DomainError::StorageUnavailable(format!("{} {}: {}", operation, table, e))
        }
        other => DomainError::QueryFailed {
            table,
            operation,
            message: other.to_string(),
        },
    }
}

/// `SELECT * FROM <table> WHERE <column> = $1`
pub async fn select_where<E, C, V>(
    db: &C,
    table: &'static str,
    column: E::Column,
    value: V,
) -> DomainResult<Vec<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
    V: Into<Value>,
{
    E::find()
        .filter(column.eq(value))
        .all(db)
        .await
        .map_err(storage_error(table, "select"))
}

/// Like [`select_where`] but for lookups on a unique column.
pub async fn select_one_where<E, C, V>(
    db: &C,
    table: &'static str,
    column: E::Column,
    value: V,
) -> DomainResult<Option<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
    V: Into<Value>,
{
    E::find()
        .filter(column.eq(value))
        .one(db)
        .await
        .map_err(storage_error(table, "select"))
}

/// `UPDATE <table> SET <column> = $1 WHERE <filter>`, returning rows affected.
pub async fn update_column<E, C, V>(
    db: &C,
    table: &'static str,
    column: E::Column,
    value: V,
    filter: Condition,
) -> DomainResult<u64>
where
    E: EntityTrait,
    C: ConnectionTrait,
    V: Into<Value>,
{
    let value: Value = value.into();
    let result = E::update_many()
        .col_expr(column, Expr::value(value))
        .filter(filter)
        .exec(db)
        .await
        .map_err(storage_error(table, "update"))?;
    Ok(result.rows_affected)
}

/// `DELETE FROM <table> WHERE <column> = $1`, returning rows affected.
pub async fn delete_where<E, C, V>(
    db: &C,
    table: &'static str,
    column: E::Column,
    value: V,
) -> DomainResult<u64>
where
    E: EntityTrait,
    C: ConnectionTrait,
    V: Into<Value>,
{
    let result = E::delete_many()
        .filter(column.eq(value))
        .exec(db)
        .await
        .map_err(storage_error(table, "delete"))?;
    Ok(result.rows_affected)
}
