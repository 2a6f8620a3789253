//! Account operations - top-ups and balance queries.
//!
//! These are not metered. Callers still pass them through the account
//! admission pipeline so they count against the global rate limit.

use crate::domain::ClientBalance;
use crate::error::DomainError;
use crate::ports::LedgerStore;

/// Credit `amount` tokens to `client_id`, creating the entry if needed.
pub async fn top_up(
    ledger: &dyn LedgerStore,
    client_id: &str,
    amount: i64,
) -> Result<(), DomainError> {
    let client_id = client_id.trim();
    if client_id.is_empty() {
        return Err(DomainError::Validation("client_id is required".to_string()));
    }
    if amount <= 0 {
        return Err(DomainError::Validation(
            "amount must be a positive integer".to_string(),
        ));
    }

    ledger.credit(client_id, amount).await?;
    Ok(())
}

/// Read a client's balance. Unknown clients have a balance of zero.
pub async fn query_balance(
    ledger: &dyn LedgerStore,
    client_id: &str,
) -> Result<ClientBalance, DomainError> {
    let client_id = client_id.trim();
    if client_id.is_empty() {
        return Err(DomainError::Unauthorized);
    }

    let balance = ledger.get_balance(client_id).await?;
    Ok(ClientBalance {
        client_id: client_id.to_string(),
        balance,
    })
}
