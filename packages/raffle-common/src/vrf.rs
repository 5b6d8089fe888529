use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Event, Uint256};

/// Attribute key under which a coordinator reports the id of a new request.
pub const REQUEST_ID_ATTRIBUTE: &str = "request_id";

/// Messages a VRF coordinator accepts from a consumer contract.
#[cw_serde]
pub enum CoordinatorExecuteMsg {
    /// Ask for `num_words` random values. The coordinator answers
    /// asynchronously with `ConsumerExecuteMsg::FulfillRandomWords`.
    RequestRandomWords {
        /// Gas lane, hex-encoded 32 bytes
        key_hash: String,
        sub_id: u64,
        request_confirmations: u16,
        callback_gas_limit: u32,
        num_words: u32,
    },
}

/// Callback a coordinator delivers to the consumer that issued a request.
#[cw_serde]
pub enum ConsumerExecuteMsg {
    FulfillRandomWords { request_id: u64, random_word: Uint256 },
}

/// Extract the request id a coordinator emitted while handling
/// `RequestRandomWords`.
///
/// Events of the sub-call are scanned in order and the first attribute named
/// `request_id` that parses as `u64` wins.
pub fn find_request_id(events: &[Event]) -> Option<u64> {
    events
        .iter()
        .flat_map(|event| event.attributes.iter())
        .filter(|attr| attr.key == REQUEST_ID_ATTRIBUTE)
        .find_map(|attr| attr.value.parse::<u64>().ok())
}
