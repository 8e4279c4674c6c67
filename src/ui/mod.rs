mod app;
pub mod modal;
pub mod views;

pub use app::App;
