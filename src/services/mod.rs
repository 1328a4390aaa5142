pub mod auth_service;
pub mod csv_export;
pub mod deadline_watcher;
pub mod download;
pub mod error;
pub mod fetch_agent;
pub mod http;

pub use auth_service::{sign_in, sign_out};
pub use deadline_watcher::{DeadlineWatcher, GlooScheduler, TickScheduler};
pub use download::{BrowserFileSink, FileSink};
pub use error::{ApiError, ApiErrorKind, FetchResult};
pub use fetch_agent::FetchAgent;
pub use http::{GlooTransport, HttpRequest, HttpResponse, HttpTransport, Method};
