//! Domain types - addresses, units and query records

mod address;
mod types;
pub mod units;

pub use address::Address;
pub use types::{BalanceQueryResult, ChainStatus, HistoryEntry};
pub use units::{parse_block_number, parse_quantity, tara_to_wei, wei_to_tara, QuantityError};
