pub mod endpoint;

pub use endpoint::{Endpoint, EndpointPatch, EndpointRow, EndpointView, Lifecycle};
