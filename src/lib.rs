// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod best;
pub mod config;
pub mod engine;
pub mod evaluator;
pub mod logging;
pub mod runtime;
pub mod samples;
pub mod session;
pub mod surface;
pub mod timer;
pub mod ui;
pub mod view;
