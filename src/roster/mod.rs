//! Student roster domain: records, remote client, and the optimistic
//! cache controller.

pub mod client;
pub mod controller;
pub mod types;
