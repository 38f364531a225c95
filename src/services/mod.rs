pub mod http;
pub mod api_client;
pub mod auth_service;
pub mod storage;
pub mod timer;
#[cfg(target_arch = "wasm32")]
pub mod gloo_transport;

pub use http::{ApiRequest, ApiResponse, FormPart, HttpTransport, Method, RequestBody, TransportResult};
pub use api_client::{ApiClient, ApiError, ApiResult};
pub use storage::{KeyValueStore, MemoryStore};
pub use timer::{ManualScheduler, Scheduler, TimerHandle};
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStore;
#[cfg(target_arch = "wasm32")]
pub use timer::GlooScheduler;
#[cfg(target_arch = "wasm32")]
pub use gloo_transport::GlooTransport;
