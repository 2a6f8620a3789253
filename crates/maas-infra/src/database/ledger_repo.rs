//! SQL ledger store on SeaORM (SQLite or PostgreSQL).

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, Set};

use maas_core::domain::{ClientLedgerEntry, DebitOutcome};
use maas_core::ports::{LedgerError, LedgerStore};

use super::connections::{self, DatabaseConfig};
use super::entity::token_balance::{self, Entity as TokenBalance};

/// Ledger persisted in the `token_balances` table.
///
/// Credits are a single `INSERT .. ON CONFLICT DO UPDATE` and debits a single
/// conditional `UPDATE .. WHERE balance > 0`. The database applies each one
/// atomically, so no read-then-write window exists.
pub struct SqlLedgerStore {
    db: DbConn,
}

impl SqlLedgerStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Open a pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, LedgerError> {
        let db = connections::connect(config).await.map_err(storage_fault)?;
        Ok(Self::new(db))
    }

    pub fn connection(&self) -> &DbConn {
        &self.db
    }
}

/// Map a SeaORM error onto the ledger taxonomy.
fn storage_fault(err: DbErr) -> LedgerError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => LedgerError::Connection(err.to_string()),
        _ => LedgerError::Query(err.to_string()),
    }
}

#[async_trait]
impl LedgerStore for SqlLedgerStore {
    async fn get_balance(&self, client_id: &str) -> Result<i64, LedgerError> {
        let row = TokenBalance::find_by_id(client_id.to_string())
            .one(&self.db)
            .await
            .map_err(storage_fault)?;

        Ok(row.map(|model| model.balance).unwrap_or(0))
    }

    async fn credit(&self, client_id: &str, amount: i64) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let now: DateTimeWithTimeZone = Utc::now().into();
        let entry = token_balance::ActiveModel {
            client_id: Set(client_id.to_string()),
            balance: Set(amount),
            created_at: Set(now),
            updated_at: Set(now),
        };

        TokenBalance::insert(entry)
            .on_conflict(
                OnConflict::column(token_balance::Column::ClientId)
                    .value(
                        token_balance::Column::Balance,
                        Expr::col((TokenBalance, token_balance::Column::Balance)).add(amount),
                    )
                    .value(token_balance::Column::UpdatedAt, Expr::value(now))
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(storage_fault)?;

        tracing::debug!(client_id, amount, "Ledger credited");
        Ok(())
    }

    async fn try_debit_one(&self, client_id: &str) -> Result<DebitOutcome, LedgerError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let result = TokenBalance::update_many()
            .col_expr(
                token_balance::Column::Balance,
                Expr::col(token_balance::Column::Balance).sub(1),
            )
            .col_expr(token_balance::Column::UpdatedAt, Expr::value(now))
            .filter(token_balance::Column::ClientId.eq(client_id))
            .filter(token_balance::Column::Balance.gt(0))
            .exec(&self.db)
            .await
            .map_err(storage_fault)?;

        // Zero rows: no entry, or nothing left to take.
        if result.rows_affected == 1 {
            Ok(DebitOutcome::Admitted)
        } else {
            Ok(DebitOutcome::Rejected)
        }
    }

    async fn entry(&self, client_id: &str) -> Result<Option<ClientLedgerEntry>, LedgerError> {
        let row = TokenBalance::find_by_id(client_id.to_string())
            .one(&self.db)
            .await
            .map_err(storage_fault)?;

        Ok(row.map(Into::into))
    }
}
