//! Request extractors whose rejections render as [`ApiError`].

use axum::{Json, extract::FromRequest};

use crate::error::ApiError;

/// A JSON body. Malformed or mistyped bodies become a 400 with an
/// `{"error": ...}` body instead of axum's plain-text 4xx.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
