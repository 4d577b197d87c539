//! Turning API responses into in-game effects.
//!
//! [`response`] decides whether a response is usable at all;
//! [`transactions`] validates and grants each purchased item.

pub mod response;
pub mod transactions;

pub use response::{handle_completion, handle_response, ClaimOutcome};
pub use transactions::{process_transactions, TransactionOutcome};

/// Player-facing text.
pub mod messages {
    /// Sent as soon as a claim is issued.
    pub const PROCESSING: &str = "Processing your claim...";

    /// Non-200 status or empty body.
    pub const OFFLINE: &str = "API Services are currently offline. Please check back shortly.";

    /// Unreadable or empty transaction list.
    pub const PROCESSING_ERROR: &str =
        "An error occurred while processing your request. Please try again later.";

    /// Connection or HTTP protocol failure.
    pub const TRANSPORT_ERROR: &str = "An error occurred while processing your request.";

    /// Null element in the transaction list.
    pub const NULL_TRANSACTION: &str = "Encountered a null transaction object.";
}
