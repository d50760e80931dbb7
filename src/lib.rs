//! Clinic Intake - guided IT support ticket intake for medical clinics
//!
//! The library holds the wizard model (steps, form, transcript), the
//! keyword classifier and webhook submission; `main.rs` adds the terminal
//! UI and subcommands on top.

pub mod app;
pub mod classifier;
pub mod config;
pub mod logging;
pub mod session;
pub mod steps;
pub mod submission;
pub mod templates;
pub mod types;
pub mod ui;
pub mod webhook;
