//! Federation use cases

pub mod ingest;
pub mod module_manager;
pub mod queries;
pub mod version_manager;

pub use ingest::{IngestApplication, IngestVersionUseCase};
pub use module_manager::ModuleManager;
pub use queries::FederationQueries;
pub use version_manager::VersionManager;
