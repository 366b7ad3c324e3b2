pub mod action;
pub mod config;
pub mod core;
mod platform;

#[cfg(target_os = "macos")]
pub use platform::macos::{check_accessibility, run_app};
