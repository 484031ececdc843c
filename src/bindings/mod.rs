pub mod categories;
pub mod cities;
pub mod consent_signal;
pub mod core;
pub mod jobs;
pub mod storage;

pub use categories::*;
pub use cities::*;
pub use consent_signal::*;
pub use jobs::*;
pub use storage::*;
