//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: drops expired values from the in-memory store at a fixed
//!   interval, the way a remote key/value service expires keys on its own

mod purge;

pub use purge::spawn_purge_task;
