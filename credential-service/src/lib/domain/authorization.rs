pub mod models;

pub use models::AccessRight;
pub use models::PermissionSet;
pub use models::Privilege;
pub use models::Role;
