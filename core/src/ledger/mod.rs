pub mod canonical;
pub mod event;
pub mod log;

pub use event::{Actor, LedgerEvent, ZERO_HASH_64};
pub use log::{verify_chain, LedgerLog};
