//! Contract between the runtime loop and the application.

mod app;
mod ctx;
mod host;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
pub use host::AppHost;
