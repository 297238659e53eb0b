//! Handlers for the events emitted by the Payer contract.
//!
//! Each handler runs once per event, reads the account's `Debt`, updates it
//! and appends a `DebtChange`. Delivery order and atomicity of the writes
//! made by one invocation are provided by the caller.

use crate::{
    schema::{Debt, DebtChange},
    IndexerResult,
};
use payer_indexer_plugin::{
    types::{BigInt, Event, PaidBackDebt, RegisteredDebt, Sign},
    Entity, EntityStore,
};
use tracing::{debug, error};

pub const HANDLE_REGISTERED_DEBT: &str = "handleRegisteredDebt";
pub const HANDLE_PAID_BACK_DEBT: &str = "handlePaidBackDebt";

/// Add the registered amount to the account's debt, creating the debt on
/// first sight, and record the change.
pub async fn handle_registered_debt<S: EntityStore>(
    event: &Event<RegisteredDebt>,
    store: &mut S,
) -> IndexerResult<()> {
    let params = &event.params;
    let amount = BigInt::from(params.amount.clone());

    let mut debt = Debt::load(store, &params.account.to_hex())
        .await?
        .unwrap_or_else(|| Debt::new(params.account));

    debt.amount += &amount;
    debt.save(store).await?;

    DebtChange {
        id: event.id(),
        address: params.account,
        amount,
        block_timestamp: event.block.timestamp,
    }
    .save(store)
    .await?;

    Ok(())
}

/// Subtract the repaid amount from the account's debt and record the change.
///
/// A repayment for an account with no registered debt is logged and
/// dropped: nothing is written and no error is returned.
pub async fn handle_paid_back_debt<S: EntityStore>(
    event: &Event<PaidBackDebt>,
    store: &mut S,
) -> IndexerResult<()> {
    let params = &event.params;

    let mut debt = match Debt::load(store, &params.account.to_hex()).await? {
        Some(debt) => debt,
        None => {
            error!(
                account = %params.account,
                tx_hash = %event.transaction.hash,
                "[handlePaidBackDebt] Debt #{} not found. Hash: {}",
                params.account,
                event.transaction.hash,
            );
            return Ok(());
        }
    };

    let amount = BigInt::from(params.amount.clone());
    debt.amount -= &amount;

    if debt.amount.sign() == Sign::Minus {
        debug!(account = %params.account, amount = %debt.amount, "Debt balance is negative.");
    }

    // The contract's own view of the balance is informational only.
    if debt.amount != BigInt::from(params.remaining_debt.clone()) {
        debug!(
            account = %params.account,
            derived = %debt.amount,
            remaining_debt = %params.remaining_debt,
            "Derived debt differs from the contract's remaining debt."
        );
    }

    debt.save(store).await?;

    DebtChange {
        id: event.id(),
        address: params.account,
        amount: -amount,
        block_timestamp: event.block.timestamp,
    }
    .save(store)
    .await?;

    Ok(())
}
