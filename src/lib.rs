//! slack-send: send data to Slack from a GitHub Actions job
//!
//! A library for resolving a workflow step's inputs into a JSON payload and
//! delivering it either through a Slack API method or to a webhook URL.

pub mod config;
pub mod content;
pub mod delivery;
pub mod runner;
pub mod send;
pub mod time;
