/*
 * kafkopm - keeps the runtime state of KafkaClusters aligned with their
 * declared state
 */

pub mod apply;
pub mod brokerconfig;
pub mod config;
pub mod errors;
pub mod ingress;
pub mod labels;
pub mod manager;
pub mod membership;

pub use errors::Error;
