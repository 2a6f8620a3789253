//! SeaORM entities.

pub mod token_balance;
