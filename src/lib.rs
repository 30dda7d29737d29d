// Module tree shared by the binary and the integration tests in tests/.
pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod logging;
pub mod store;
pub mod ui;
