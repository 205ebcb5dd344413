//! AWS client plumbing shared by the IAM and EC2 modules.

pub mod client;
pub mod sts;
