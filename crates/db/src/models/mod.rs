//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts/patches where the table is written

pub mod device_token;
pub mod inventory;
pub mod preference;
pub mod send_log;
pub mod template;
