//! HTTP implementation of the identity gateway.

mod dto;
mod http_identity;

pub use http_identity::HttpIdentityGateway;
