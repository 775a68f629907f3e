pub mod errors;
pub mod keys;
pub mod types;

pub use errors::{AgentError, StoreError};
pub use types::{Rect, Registry, WindowId, WindowRecord};
