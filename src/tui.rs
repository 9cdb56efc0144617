//! Terminal host: runs a tour over the demo dashboard.

mod app;
mod page;
mod render;

pub use app::run;
pub use page::DemoPage;
