pub mod types;
pub mod vrf;

pub use types::RaffleStatus;
pub use vrf::{find_request_id, ConsumerExecuteMsg, CoordinatorExecuteMsg, REQUEST_ID_ATTRIBUTE};
