pub mod batch_store;
pub mod sheet;
