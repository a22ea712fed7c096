// Shared helpers

pub mod constants;
pub mod format;
pub mod notify;
pub mod query;
pub mod storage;

