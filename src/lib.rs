// ============================================================================
// CLASSROOM CLIENT - session, navigation and data sync for the browser
// ============================================================================
// - Models: wire types shared with the backend
// - Services: HTTP gateway + persistence/timer ports
// - State: Rc<RefCell> stores, navigation state machine
// - ViewModels: teacher/student dashboards
// - Views: serialisable render snapshots
// ============================================================================

pub mod models;
pub mod services;
pub mod state;
pub mod viewmodels;
pub mod views;
pub mod utils;
pub mod config;
pub mod app;

#[cfg(target_arch = "wasm32")]
mod web;

pub use app::App;
pub use config::{AppConfig, CONFIG};
