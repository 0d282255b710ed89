//! Relational access layer.
//!
//! The domain stores speak hand-written parameterized SQL. Everything goes
//! through [`executer`], which validates that the number of `?` placeholders
//! matches the number of supplied values before the driver sees the query, so
//! a miscounted parameter list fails loudly instead of silently.

use std::future::Future;
use std::pin::Pin;

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, ExecResult, FromQueryResult,
    QueryResult, Statement, TransactionError, TransactionTrait, Value,
};

use crate::errors::InternalError;

/// Upper bound on page size; larger requests are clamped, not rejected.
pub const LIMITE_MAX: u64 = 100;

fn compte_placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

fn verifier_parametres(sql: &str, valeurs: &[Value]) -> Result<(), InternalError> {
    let attendu = compte_placeholders(sql);
    if attendu != valeurs.len() {
        return Err(InternalError::ParameterMismatch {
            attendu,
            recu: valeurs.len(),
        });
    }
    Ok(())
}

/// Run a parameterized SELECT and return the raw rows.
pub async fn executer<C: ConnectionTrait>(
    conn: &C,
    sql: &str,
    valeurs: Vec<Value>,
) -> Result<Vec<QueryResult>, InternalError> {
    verifier_parametres(sql, &valeurs)?;
    let stmt = Statement::from_sql_and_values(conn.get_database_backend(), sql, valeurs);
    conn.query_all(stmt)
        .await
        .map_err(|e| InternalError::database("executer", e))
}

/// Run a parameterized INSERT/UPDATE/DELETE.
pub async fn executer_maj<C: ConnectionTrait>(
    conn: &C,
    sql: &str,
    valeurs: Vec<Value>,
) -> Result<ExecResult, InternalError> {
    verifier_parametres(sql, &valeurs)?;
    let stmt = Statement::from_sql_and_values(conn.get_database_backend(), sql, valeurs);
    conn.execute(stmt)
        .await
        .map_err(|e| InternalError::database("executer_maj", e))
}

/// Clamp raw pagination input to `page >= 1` and `1 <= limite <= 100`.
///
/// Returns `(page, limite, offset)`; callers never see a negative offset or
/// an unbounded page size.
pub fn borner_pagination(page: i64, limite: i64) -> (u64, u64, u64) {
    let page = page.max(1) as u64;
    let limite = limite.clamp(1, LIMITE_MAX as i64) as u64;
    let offset = (page - 1) * limite;
    (page, limite, offset)
}

/// Run a SELECT with a LIMIT/OFFSET clause appended from clamped pagination.
pub async fn executer_pagine<C: ConnectionTrait>(
    conn: &C,
    sql: &str,
    mut valeurs: Vec<Value>,
    page: i64,
    limite: i64,
) -> Result<Vec<QueryResult>, InternalError> {
    let (_, limite, offset) = borner_pagination(page, limite);
    let sql_pagine = format!("{sql} LIMIT ? OFFSET ?");
    valeurs.push((limite as i64).into());
    valeurs.push((offset as i64).into());
    executer(conn, &sql_pagine, valeurs).await
}

/// Number of pages needed for `total` rows at `limite` rows per page.
pub fn total_pages(total: u64, limite: u64) -> u64 {
    if limite == 0 {
        return 0;
    }
    total.div_ceil(limite)
}

/// Run `body` inside a transaction: commit on success, rollback on any error.
pub async fn executer_transaction<T, F>(
    db: &DatabaseConnection,
    body: F,
) -> Result<T, InternalError>
where
    T: Send,
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, InternalError>> + Send + 'c>>
        + Send,
{
    db.transaction(body).await.map_err(|e| match e {
        TransactionError::Connection(source) => InternalError::database("transaction", source),
        TransactionError::Transaction(err) => err,
    })
}

/// Map raw rows into `FromQueryResult` models.
pub fn en_modeles<T: FromQueryResult>(
    rows: Vec<QueryResult>,
    operation: &str,
) -> Result<Vec<T>, InternalError> {
    rows.iter()
        .map(|row| T::from_query_result(row, "").map_err(|e| InternalError::database(operation, e)))
        .collect()
}

/// Map the first raw row, if any.
pub fn en_modele_optionnel<T: FromQueryResult>(
    rows: Vec<QueryResult>,
    operation: &str,
) -> Result<Option<T>, InternalError> {
    match rows.first() {
        Some(row) => T::from_query_result(row, "")
            .map(Some)
            .map_err(|e| InternalError::database(operation, e)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Database;

    #[test]
    fn compte_les_placeholders() {
        assert_eq!(compte_placeholders("SELECT 1"), 0);
        assert_eq!(compte_placeholders("SELECT * FROM t WHERE a = ? AND b = ?"), 2);
    }

    #[test]
    fn borne_la_page_et_la_limite() {
        assert_eq!(borner_pagination(0, 10), (1, 10, 0));
        assert_eq!(borner_pagination(-3, 10), (1, 10, 0));
        assert_eq!(borner_pagination(2, 10), (2, 10, 10));
        assert_eq!(borner_pagination(1, 0), (1, 1, 0));
        assert_eq!(borner_pagination(1, -5), (1, 1, 0));
        assert_eq!(borner_pagination(1, 500), (1, 100, 0));
    }

    #[test]
    fn calcule_le_nombre_de_pages() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[tokio::test]
    async fn refuse_un_nombre_de_parametres_incorrect() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        let err = executer(&db, "SELECT ? AS a, ? AS b", vec!["seul".into()])
            .await
            .unwrap_err();
        match err {
            InternalError::ParameterMismatch { attendu, recu } => {
                assert_eq!(attendu, 2);
                assert_eq!(recu, 1);
            }
            autre => panic!("unexpected error: {autre:?}"),
        }
    }

    #[tokio::test]
    async fn execute_avec_parametres() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        let rows = executer(&db, "SELECT ? AS valeur", vec!["ok".into()])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        let valeur: String = rows[0].try_get("", "valeur").unwrap();
        assert_eq!(valeur, "ok");
    }
}
