//! HTTP surface: `POST /draw`, `GET /healthz`, and the static page.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Router};
use kfit::kmeans::{ExecutionTier, KMeansConfig};
use kfit::plot::PlotSpec;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

pub fn router(config: Config) -> Router {
    let www_dir = config.www_dir.clone();
    let limit = config.max_upload_bytes;
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/draw", post(draw))
        .route("/healthz", get(healthz))
        .fallback_service(ServeDir::new(www_dir))
        .layer(DefaultBodyLimit::max(limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Raw form fields of a draw request, before validation.
#[derive(Debug, Default)]
pub struct DrawFields {
    csv: Option<Vec<u8>>,
    title: Option<String>,
    width: Option<String>,
    height: Option<String>,
    padding: Option<String>,
    clusters: Option<String>,
}

/// A validated draw request.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawJob {
    pub csv: Vec<u8>,
    /// 0 draws the points only.
    pub clusters: usize,
    pub spec: PlotSpec,
}

fn parse_field(name: &str, value: Option<String>, default: usize) -> Result<usize> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| Error::BadRequest(format!("{name} must be a non-negative integer"))),
    }
}

impl DrawFields {
    pub fn set(&mut self, name: &str, value: Vec<u8>) {
        let text = || String::from_utf8_lossy(&value).into_owned();
        match name {
            "csv" => self.csv = Some(value),
            "title" => self.title = Some(text()),
            "width" => self.width = Some(text()),
            "height" => self.height = Some(text()),
            "padding" => self.padding = Some(text()),
            "clusters" => self.clusters = Some(text()),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    pub fn into_job(self) -> Result<DrawJob> {
        let csv = self
            .csv
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::BadRequest("missing csv field".to_string()))?;

        let defaults = PlotSpec::default();
        let spec = PlotSpec {
            width: parse_field("width", self.width, defaults.width)?,
            height: parse_field("height", self.height, defaults.height)?,
            padding: parse_field("padding", self.padding, defaults.padding)?,
            title: self
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or(defaults.title),
        };

        Ok(DrawJob {
            csv,
            clusters: parse_field("clusters", self.clusters, 0)?,
            spec,
        })
    }
}

impl DrawJob {
    pub fn render(&self, tier: ExecutionTier) -> kfit::Result<String> {
        if self.clusters == 0 {
            return kfit::draw(&self.csv, &self.spec);
        }
        let cfg = KMeansConfig::with_k(self.clusters).with_tier(tier);
        kfit::fit_draw_with(&self.csv, &cfg, &self.spec)
    }
}

fn too_large_or(status: StatusCode, limit: usize, body: String) -> Error {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge { limit }
    } else {
        Error::BadRequest(body)
    }
}

fn multipart_error(e: MultipartError, limit: usize) -> Error {
    too_large_or(e.status(), limit, e.body_text())
}

async fn read_fields(state: &AppState, req: Request) -> Result<DrawFields> {
    let limit = state.config.max_upload_bytes;
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let mut fields = DrawFields::default();
    if is_multipart {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| too_large_or(e.status(), limit, e.body_text()))?;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, limit))?
        {
            let name = field.name().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, limit))?;
            fields.set(&name, bytes.to_vec());
        }
    } else {
        let Form(map) = Form::<HashMap<String, String>>::from_request(req, state)
            .await
            .map_err(|e| too_large_or(e.status(), limit, e.body_text()))?;
        for (name, value) in map {
            fields.set(&name, value.into_bytes());
        }
    }
    Ok(fields)
}

async fn draw(State(state): State<AppState>, req: Request) -> Result<impl IntoResponse> {
    let job = read_fields(&state, req).await?.into_job()?;
    tracing::info!(
        bytes = job.csv.len(),
        clusters = job.clusters,
        width = job.spec.width,
        height = job.spec.height,
        "draw"
    );

    let tier = if state.config.parallel {
        ExecutionTier::Parallel
    } else {
        ExecutionTier::Scalar
    };
    let svg = tokio::task::spawn_blocking(move || job.render(tier))
        .await
        .map_err(|e| Error::Internal {
            message: e.to_string(),
        })??;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
