//! Record Gateway Implementations

pub mod table;

pub use table::{TableGateway, item_to_record, record_to_item};
