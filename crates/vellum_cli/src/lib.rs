//! File-backed collaborators and command plumbing for the `vellum` binary.

pub mod posts;
pub mod widgets;
