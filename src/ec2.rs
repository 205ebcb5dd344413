//! EC2 operations module.

pub mod instances;
pub mod regions;
