//! HTTP value types consumed and produced by the decorator

pub mod date;
pub mod request;
pub mod response;

pub use request::HttpRequest;
pub use response::{Body, HttpResponse};
