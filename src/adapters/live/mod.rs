//! Live adapters for real external interactions.

pub mod command;
pub mod filesystem;
pub mod forge;
pub mod git;
pub mod llm;
pub mod notifier;
