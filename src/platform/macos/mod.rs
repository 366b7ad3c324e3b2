mod accessibility;
mod app;
mod desktop;
mod keyboard;
mod monitor;
mod objc2_wrapper;
mod picker;
mod running_application;
mod window_list;

pub use app::{check_accessibility, run_app};
