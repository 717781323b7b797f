//! Spec Builder - Specification Authoring Engine
//!
//! This crate assembles structured specification documents from named section
//! templates, validates them against a rule set and exports them to Markdown,
//! JSON and HTML.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
