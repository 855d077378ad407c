//! Spec layer: the JSON job description and its conversion into a
//! `JobConfig`.
//!
//! This module is intentionally separate from validation and rendering.
//! It owns the serde-facing raw shapes only; everything past
//! `JobSpec::into_config` is typed.

pub mod job;

pub use job::JobSpec;
