//! Response interpretation for a finished claim request.

use crate::claim::messages;
use crate::claim::transactions::{process_transactions, TransactionOutcome};
use crate::client::http::ClaimResponse;
use crate::host::{GameHost, Player};
use crate::protocol::models::parse_transactions;
use crate::TeamGamesError;

/// Final result of one claim, as seen by the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The request never produced a usable HTTP response.
    TransportFailed,

    /// Status was not 200 or the body was empty.
    Offline,

    /// Body was malformed, `null` or an empty list.
    ProcessingError,

    /// The API put a batch message on the first element.
    ServerMessage(String),

    /// Transactions were processed one by one.
    Processed(Vec<TransactionOutcome>),
}

impl ClaimOutcome {
    /// Number of items granted by this claim.
    pub fn granted_count(&self) -> usize {
        match self {
            ClaimOutcome::Processed(outcomes) => {
                outcomes.iter().filter(|o| o.is_granted()).count()
            }
            _ => 0,
        }
    }
}

/// Interpret a status code and body from the store API.
///
/// A non-empty `message` on the first element is treated as a batch-level
/// status: it is shown to the player and nothing is granted.
pub fn handle_response<H: GameHost + ?Sized>(
    host: &H,
    player: &Player,
    status: u16,
    body: &str,
) -> ClaimOutcome {
    if body.is_empty() || status != 200 {
        let shown = if body.is_empty() { "No response" } else { body };
        tracing::warn!(
            player = %player.display_name,
            code = status,
            body = shown,
            "failed to fetch transactions"
        );
        host.send_message(player, messages::OFFLINE);
        return ClaimOutcome::Offline;
    }

    let transactions = match parse_transactions(body) {
        Ok(Some(transactions)) if !transactions.is_empty() => transactions,
        Ok(_) => {
            tracing::warn!(player = %player.display_name, "no transactions found in the response");
            host.send_message(player, messages::PROCESSING_ERROR);
            return ClaimOutcome::ProcessingError;
        }
        Err(e) => {
            tracing::error!(player = %player.display_name, error = %e, "error parsing JSON response");
            host.send_message(player, messages::PROCESSING_ERROR);
            return ClaimOutcome::ProcessingError;
        }
    };

    if let Some(message) = transactions[0].as_ref().and_then(|t| t.batch_message()) {
        host.send_message(player, message);
        return ClaimOutcome::ServerMessage(message.to_string());
    }

    ClaimOutcome::Processed(process_transactions(host, player, &transactions))
}

/// Finish a claim from the transport result.
///
/// Transport failures get a generic message and never reach the interpreter.
pub fn handle_completion<H: GameHost + ?Sized>(
    host: &H,
    player: &Player,
    result: Result<ClaimResponse, TeamGamesError>,
) -> ClaimOutcome {
    match result {
        Ok(response) => handle_response(host, player, response.status, &response.body),
        Err(e) => {
            tracing::warn!(player = %player.display_name, error = %e, "claim request failed");
            host.send_message(player, messages::TRANSPORT_ERROR);
            ClaimOutcome::TransportFailed
        }
    }
}
