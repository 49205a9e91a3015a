pub mod app;
pub mod duration;

pub use app::AppConfig;
