//! IAM operations module.

pub mod policy;
pub mod roles;
