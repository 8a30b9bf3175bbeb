#![doc = "division-bot-core: core logic library for division-bot."]

//! This crate contains the division feed normalisation, the unpublished-division
//! loader, the tally engine and the report builder for division-bot.
//! Network clients (Parliament APIs, Tumblr) are not included here; they
//! implement the traits in [`contract`] from the binary crate.
//!
//! # Usage
//! Add this as a dependency for all shared sync, tally and report code.

pub mod bill;
pub mod chamber;
pub mod commons;
pub mod contract;
pub mod cursor;
pub mod html;
pub mod loader;
pub mod lords;
pub mod report;
pub mod synchronise;
pub mod tally;

pub use chamber::Chamber;
pub use contract::{BallotCaster, ClientError, Division};
