pub mod app;
pub mod tray;
