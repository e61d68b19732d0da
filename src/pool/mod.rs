mod dispatch;
pub mod types;

pub use types::BackendPool;
