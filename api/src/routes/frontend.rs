//! Static frontend.
//!
//! `/` serves the index file; any other path that no API route claims is
//! looked up under the static root. Dotfiles and the service-account key are
//! never served, even when they live inside the static root.

use std::{convert::Infallible, path::PathBuf, sync::Arc};

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tracing::warn;
use util::config;

use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct FrontendFiles {
    root: PathBuf,
    index_file: String,
    hidden: Vec<String>,
}

impl FrontendFiles {
    pub fn new(root: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index_file: index_file.into(),
            hidden: Vec::new(),
        }
    }

    /// Never serve a file with this name, in any directory.
    pub fn hide(mut self, file_name: impl Into<String>) -> Self {
        self.hidden.push(file_name.into());
        self
    }

    /// Static root and index from config, with the credential file hidden.
    pub fn from_config() -> Self {
        let files = Self::new(config::static_root(), config::index_file());
        let credentials = PathBuf::from(config::credentials_path());

        match credentials.file_name().and_then(|n| n.to_str()) {
            Some(name) => files.hide(name),
            None => files,
        }
    }

    pub fn router(self) -> Router<AppState> {
        let index = ServeFile::new(self.root.join(&self.index_file));
        let files = Arc::new(self);

        Router::new()
            .route_service("/", index)
            .fallback(move |req: Request| async move { files.serve(req).await })
    }

    fn is_hidden(&self, path: &str) -> bool {
        let decoded = percent_decode_str(path).decode_utf8_lossy();
        decoded
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .any(|segment| segment.starts_with('.') || self.hidden.iter().any(|h| h == segment))
    }

    async fn serve(&self, req: Request) -> Response {
        if self.is_hidden(req.uri().path()) {
            warn!(path = %req.uri().path(), "Refused to serve hidden file");
            return StatusCode::NOT_FOUND.into_response();
        }

        let result: Result<_, Infallible> = ServeDir::new(&self.root).oneshot(req).await;
        match result {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        }
    }
}
