//! Registers with a webhook provisioning endpoint, picks a question from the
//! registration number, and submits the matching SQL answer.
//!
//! The flow lives in [`runner::Runner`]; everything it talks to sits behind
//! a trait so tests can swap in scripted implementations.

pub mod answer;
pub mod client;
pub mod config;
pub mod consts;
pub mod error;
pub mod question;
pub mod runner;
pub mod store;
