#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod autosave;
pub mod cli;
pub mod draft;
pub mod model;
pub mod remote;
pub mod tui;
