pub mod catalog;
pub mod directory;
pub mod integration;
pub mod policy;
