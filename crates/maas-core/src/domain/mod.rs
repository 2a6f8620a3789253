//! Domain entities - the core business objects.

mod ledger;

mod meme;

pub use ledger::{ClientBalance, ClientLedgerEntry, DebitOutcome};
pub use meme::Meme;
