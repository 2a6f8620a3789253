//! Token balance entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "token_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub client_id: String,
    pub balance: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to the domain ledger entry.
impl From<Model> for maas_core::domain::ClientLedgerEntry {
    fn from(model: Model) -> Self {
        Self {
            client_id: model.client_id,
            balance: model.balance,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
