//! Claim request and transaction response structs.

use crate::TeamGamesError;
use serde::{Deserialize, Serialize};

/// Body of a claim request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    /// Host identifier of the claiming player.
    #[serde(rename = "playerName")]
    pub player_name: String,
}

impl ClaimRequest {
    /// Create a request for the given player identifier.
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_name: player_id.into(),
        }
    }

    /// Serialize to the JSON body sent to the API.
    pub fn to_json(&self) -> Result<String, TeamGamesError> {
        serde_json::to_string(self)
            .map_err(|e| TeamGamesError::ProtocolError(format!("Failed to serialize: {}", e)))
    }
}

/// Build the claim payload `{"playerName": "<id>"}`.
pub fn build_claim_payload(player_id: &str) -> Result<String, TeamGamesError> {
    ClaimRequest::new(player_id).to_json()
}

/// One purchased product returned by the API.
///
/// Every field is optional on the wire. A missing `product_amount` reads as 0
/// and therefore fails validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Player the purchase belongs to.
    #[serde(default)]
    pub player_name: Option<String>,

    /// Item identifier as a decimal string.
    #[serde(default)]
    pub product_id_string: Option<String>,

    /// Number of units to grant.
    #[serde(default)]
    pub product_amount: i32,

    /// Display name of the product.
    #[serde(default)]
    pub product_name: Option<String>,

    /// Batch-level status or error text. Only meaningful on the first element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Transaction {
    /// Parse `product_id_string` as an item identifier.
    pub fn item_id(&self) -> Option<u16> {
        self.product_id_string
            .as_deref()
            .and_then(|s| s.trim().parse::<u16>().ok())
    }

    /// Product name for display, empty when absent.
    pub fn display_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or_default()
    }

    /// Non-empty batch message, if any.
    pub fn batch_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Parse a response body into transactions.
///
/// A JSON `null` body yields `Ok(None)`. Null array elements are kept as
/// `None` so they can be reported individually.
pub fn parse_transactions(body: &str) -> Result<Option<Vec<Option<Transaction>>>, TeamGamesError> {
    serde_json::from_str(body).map_err(|e| {
        TeamGamesError::ProtocolError(format!("Failed to parse transaction list: {}", e))
    })
}
