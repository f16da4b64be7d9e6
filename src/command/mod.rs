//! Command dispatch pipeline
//!
//! Turns a raw command line into bus instructions:
//! line -> Registry lookup -> Resolver -> (Publish | Expand -> dispatch again) -> Publisher

pub mod dispatcher;
pub mod publisher;

pub use dispatcher::Dispatcher;
pub use publisher::{OutputFormat, Publisher, WriterPublisher};
