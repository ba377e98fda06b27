// src/common/db_utils.rs

use crate::common::error::AppError;

// SQLSTATEs que indicam falha transitória (o chamador pode repetir a operação):
// serialização, deadlock, shutdown do servidor e excesso de conexões.
// A classe "08" inteira (exceções de conexão) também entra.
const TRANSIENT_SQLSTATES: &[&str] = &["40001", "40P01", "57P01", "57P02", "57P03", "53300"];

/// `bigint out of range`: o `quantity + delta` estourou o i64 no Postgres.
pub(crate) const NUMERIC_OUT_OF_RANGE: &str = "22003";

pub(crate) fn is_transient(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| code.starts_with("08") || TRANSIENT_SQLSTATES.contains(&code.as_ref()))
            .unwrap_or(false),
        _ => false,
    }
}

pub(crate) fn sqlstate(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Classificação genérica. Os repositórios tratam antes as violações de
/// constraint que conhecem (unicidade, check, FK), pois lá existe contexto.
pub(crate) fn classify_store_error(e: sqlx::Error) -> AppError {
    if is_transient(&e) {
        tracing::warn!("Falha transitória no armazenamento: {}", e);
        return AppError::StoreUnavailable(e.to_string());
    }
    AppError::DatabaseError(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_and_io_failures_are_retryable() {
        assert!(matches!(
            classify_store_error(sqlx::Error::PoolTimedOut),
            AppError::StoreUnavailable(_)
        ));
        assert!(matches!(
            classify_store_error(sqlx::Error::PoolClosed),
            AppError::StoreUnavailable(_)
        ));

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        assert!(matches!(
            classify_store_error(sqlx::Error::Io(io)),
            AppError::StoreUnavailable(_)
        ));
    }

    #[test]
    fn other_failures_are_not_retryable() {
        assert!(!is_transient(&sqlx::Error::RowNotFound));
        assert!(matches!(
            classify_store_error(sqlx::Error::RowNotFound),
            AppError::DatabaseError(_)
        ));
        assert_eq!(sqlstate(&sqlx::Error::RowNotFound), None);
    }
}
