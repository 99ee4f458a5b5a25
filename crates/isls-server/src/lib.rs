mod documents;
mod error;
pub mod logging;
mod session;

pub use crate::documents::Document;
pub use crate::documents::Store;
pub use crate::error::ValidationFailure;
pub use crate::session::BatchReport;
pub use crate::session::DocumentDiagnostics;
pub use crate::session::EngineState;
pub use crate::session::Session;
