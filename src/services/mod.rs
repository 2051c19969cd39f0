pub mod period;
pub mod summary;
