//! User domain values.
//!
//! Users are issued by an external identity service; only the role is
//! modelled here.

pub mod role;

pub use role::UserRole;
