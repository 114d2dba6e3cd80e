//! DTO modules that bridge services with templates.

pub mod catalog;
pub mod customers;
pub mod listing;
pub mod orders;
pub mod statistics;
