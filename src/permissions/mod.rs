// permissions module

pub mod permission_manager;
pub mod types;
pub use permission_manager::PermissionManager;
pub use types::policy::Permission;
