//! Schema migrations for the ledger database.

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_token_balances;
mod m20240101_000002_create_memes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_token_balances::Migration),
            Box::new(m20240101_000002_create_memes::Migration),
        ]
    }
}
