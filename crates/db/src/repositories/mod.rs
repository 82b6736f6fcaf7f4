//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod device_token_repo;
pub mod inventory_scan_repo;
pub mod preference_repo;
pub mod send_log_repo;
pub mod template_repo;

pub use device_token_repo::DeviceTokenRepo;
pub use inventory_scan_repo::InventoryScanRepo;
pub use preference_repo::PreferenceRepo;
pub use send_log_repo::SendLogRepo;
pub use template_repo::TemplateRepo;
