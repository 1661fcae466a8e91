//! Command implementations

pub mod common;
pub mod ls;
pub mod run;
pub mod validate;
