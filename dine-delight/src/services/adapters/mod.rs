pub mod table_adapter;

pub use table_adapter::{Table, TableAdapter};
