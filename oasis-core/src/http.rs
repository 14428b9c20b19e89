//! HTTP re-exports.
//!
//! Downstream crates reach axum through this module so the runtime stays the
//! sole owner of the axum dependency.

pub use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
pub use axum::{serve, Extension, Json, Router};

pub mod body {
    pub use axum::body::{Body, Bytes};
}

pub mod extract {
    pub use axum::extract::{Path, Query, Request, State};
}

pub mod middleware {
    pub use axum::middleware::{from_fn, from_fn_with_state, Next};
}

pub mod response {
    pub use axum::response::{Html, IntoResponse, Redirect, Response};
}

pub mod routing {
    pub use axum::routing::{any, delete, get, patch, post, put, MethodRouter};
}
