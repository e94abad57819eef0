//! Thin wrappers over the backend endpoints.
//!
//! Trip/map lookups are public and hang off [`PublicClient`](crate::client::PublicClient);
//! diary, graph, file, and messaging calls need a signed-in user and hang off
//! [`AuthenticatedHttpClient`](crate::client::AuthenticatedHttpClient). Every wrapper returns
//! the raw [`ApiResponse`](crate::http::ApiResponse); decode it with
//! [`ApiResponse::json`](crate::http::ApiResponse::json) into whatever shape the caller needs.

pub mod diary;
pub mod file;
pub mod graph;
pub mod map;
pub mod message;
