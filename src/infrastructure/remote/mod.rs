pub mod catalog;
pub mod download;
pub mod http_client;
pub mod models;
pub mod platform;

pub use catalog::AdoptiumClient;
pub use download::{DownloadOptions, Downloader, ProgressThrottle};
pub use http_client::HttpClient;
pub use models::*;
pub use platform::*;
