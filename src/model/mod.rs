pub mod attendance;
pub mod cell;
pub mod column;
pub mod summary;
