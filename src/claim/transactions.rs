//! Per-transaction validation and item grants.

use crate::claim::messages;
use crate::host::{GameHost, Player};
use crate::protocol::models::Transaction;

/// What happened to a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
    /// The list contained `null`.
    Null,

    /// Amount was below 1.
    InvalidAmount(i32),

    /// `product_id_string` is not a valid item identifier.
    InvalidItemId(String),

    /// Item was given to the player.
    Granted {
        /// Item identifier.
        item_id: u16,
        /// Units given, narrowed to a byte.
        amount: u8,
        /// Product display name.
        product_name: String,
    },
}

impl TransactionOutcome {
    /// Whether an item was given.
    pub fn is_granted(&self) -> bool {
        matches!(self, TransactionOutcome::Granted { .. })
    }
}

/// Validate and grant each transaction in response order.
///
/// Every entry is reported to the player on its own; a bad entry never stops
/// the ones after it.
pub fn process_transactions<H: GameHost + ?Sized>(
    host: &H,
    player: &Player,
    transactions: &[Option<Transaction>],
) -> Vec<TransactionOutcome> {
    transactions
        .iter()
        .map(|entry| {
            let outcome = process_one(host, player, entry.as_ref());
            tracing::debug!(player = %player.id, ?outcome, "processed transaction");
            outcome
        })
        .collect()
}

fn process_one<H: GameHost + ?Sized>(
    host: &H,
    player: &Player,
    transaction: Option<&Transaction>,
) -> TransactionOutcome {
    let Some(tx) = transaction else {
        host.send_message(player, messages::NULL_TRANSACTION);
        return TransactionOutcome::Null;
    };

    if tx.product_amount < 1 {
        host.send_message(
            player,
            &format!("Invalid product amount: {}", tx.product_amount),
        );
        return TransactionOutcome::InvalidAmount(tx.product_amount);
    }

    let Some(item_id) = tx.item_id() else {
        let raw = tx.product_id_string.clone().unwrap_or_default();
        host.send_message(player, &format!("Invalid item ID: {}", raw));
        return TransactionOutcome::InvalidItemId(raw);
    };

    // Grants carry a single byte; larger amounts wrap.
    let amount = tx.product_amount as u8;
    if i32::from(amount) != tx.product_amount {
        tracing::warn!(
            player = %player.id,
            requested = tx.product_amount,
            granted = amount,
            "product amount narrowed to a single byte"
        );
    }

    host.give_item(player, item_id, amount);
    host.send_message(
        player,
        &format!(
            "Gave {} {} to {}.",
            tx.product_amount,
            tx.display_name(),
            player.display_name
        ),
    );

    TransactionOutcome::Granted {
        item_id,
        amount,
        product_name: tx.display_name().to_string(),
    }
}
