//! HTTP service for saving and viewing snippets.

use crate::config::Config;
use crate::error::{CodebinError, Result};
use crate::models::{Mode, SaveResponse, Snippet, Theme};
use crate::store::SharedStore;
use bytes::BufMut;
use chrono::Utc;
use futures::TryStreamExt;
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use tracing::{error, info};
use uuid::Uuid;
use warp::http::header::{HeaderValue, CONTENT_TYPE};
use warp::http::{Response, StatusCode};
use warp::multipart::{FormData, Part};
use warp::Filter;

/// Upper bound on the whole multipart body.
pub const MULTIPART_FORM_MAX_BYTES: u64 = 1 << 20;

/// Build the API routes: `POST /api/save` and `GET /api/view/<id>`.
pub fn routes(
    store: SharedStore,
    retention_secs: i64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // CORS for development
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Content-Type"])
        .allow_methods(vec!["GET", "POST"]);

    let save_store = store.clone();
    let save = warp::path!("api" / "save")
        .and(warp::post())
        .and(warp::multipart::form().max_length(MULTIPART_FORM_MAX_BYTES))
        .and_then(move |form: FormData| {
            let store = save_store.clone();
            async move { save_snippet(form, store, retention_secs).await }
        });

    let view = warp::path!("api" / "view" / String)
        .and(warp::get())
        .and_then(move |id: String| {
            let store = store.clone();
            async move { view_snippet(id, store).await }
        });

    save.or(view).with(cors)
}

/// Start the server and block until ctrl-c.
pub async fn start_server(config: Config, store: SharedStore) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| {
            CodebinError::InvalidConfig(format!(
                "cannot listen on {}:{}",
                config.host, config.port
            ))
        })?;

    let api = routes(store, config.retention_secs);
    let server = warp::serve(api).try_bind_with_graceful_shutdown(addr, async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, stopping server");
    });

    match server {
        Ok((addr, serving)) => {
            info!(address = %addr, "server listening");
            serving.await;
            Ok(())
        }
        Err(e) => Err(CodebinError::Other(format!(
            "Failed to bind to {}: {}",
            addr, e
        ))),
    }
}

async fn save_snippet(
    form: FormData,
    store: SharedStore,
    retention_secs: i64,
) -> std::result::Result<Response<String>, Infallible> {
    let fields = match collect_form_fields(form).await {
        Ok(fields) => fields,
        Err(e) => {
            error!(error = %e, "save: error when parsing form");
            return Ok(text_response(
                StatusCode::BAD_REQUEST,
                "Got malformed form data",
            ));
        }
    };

    let snippet = match build_snippet(&fields, retention_secs) {
        Ok(snippet) => snippet,
        Err(e) => {
            error!(error = %e, "save: failed to create snippet");
            return Ok(text_response(fault_status(&e), &e.to_string()));
        }
    };
    info!(snippet_id = %snippet.id, "save: snippet created");

    if let Err(e) = store.save(&snippet) {
        error!(snippet_id = %snippet.id, error = %e, "save: failed to store snippet data");
        return Ok(text_response(StatusCode::INTERNAL_SERVER_ERROR, ""));
    }
    info!(snippet_id = %snippet.id, "save: snippet saved to storage");

    // Respond with the snippet id so the client can view what it saved.
    let resp = SaveResponse {
        snippet_id: snippet.id,
    };
    match serde_json::to_string(&resp) {
        Ok(body) => Ok(json_response(body)),
        Err(e) => {
            error!(error = %e, "save: failed to serialize response");
            Ok(text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate response data",
            ))
        }
    }
}

async fn view_snippet(
    id: String,
    store: SharedStore,
) -> std::result::Result<Response<String>, Infallible> {
    if !is_snippet_id(&id) {
        return Ok(text_response(
            StatusCode::NOT_FOUND,
            &CodebinError::SnippetNotFound(id).to_string(),
        ));
    }

    let snippet = match store.get(&id) {
        Ok(snippet) => snippet,
        Err(e) => {
            error!(snippet_id = %id, error = %e, "view: failed to retrieve snippet data");
            return Ok(text_response(fault_status(&e), &e.to_string()));
        }
    };
    info!(snippet_id = %id, "view: retrieved snippet data");

    match serde_json::to_string(&snippet) {
        Ok(body) => Ok(json_response(body)),
        Err(e) => {
            error!(snippet_id = %id, error = %e, "view: failed to serialize snippet data");
            Ok(text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Got malformed snippet data",
            ))
        }
    }
}

/// Drain every part of the form into name/value pairs.
async fn collect_form_fields(form: FormData) -> Result<HashMap<String, String>> {
    let parts: Vec<Part> = form
        .try_collect()
        .await
        .map_err(|_| CodebinError::MalformedForm)?;

    let mut fields = HashMap::new();
    for part in parts {
        let name = part.name().to_string();
        let data = part
            .stream()
            .try_fold(Vec::new(), |mut acc, buf| {
                acc.put(buf);
                async move { Ok(acc) }
            })
            .await
            .map_err(|_| CodebinError::MalformedForm)?;
        let value = String::from_utf8(data).map_err(|_| CodebinError::MalformedForm)?;
        fields.insert(name, value);
    }
    Ok(fields)
}

/// Validate the submitted fields and mint a snippet from them.
fn build_snippet(fields: &HashMap<String, String>, retention_secs: i64) -> Result<Snippet> {
    let name = fields.get("snippetName").ok_or(CodebinError::MissingField)?;
    let body = fields.get("snippetText").ok_or(CodebinError::MissingField)?;
    let mode = fields.get("mode").ok_or(CodebinError::MissingField)?;

    if body.chars().count() == 0 {
        return Err(CodebinError::EmptyBody);
    }
    let mode = Mode::parse(mode).ok_or_else(|| CodebinError::UnsupportedMode(mode.clone()))?;

    // Dashes are discarded so the id stays a flat 32-hex token.
    let id = Uuid::new_v4().simple().to_string();
    let now = Utc::now();
    let time_created = now.timestamp();
    let name = if name.chars().count() == 0 {
        format!("Snippet created at {}", now.format("%a %b %e %H:%M:%S UTC %Y"))
    } else {
        name.clone()
    };

    Ok(Snippet {
        name,
        body: body.clone(),
        mode,
        theme: Theme::default(),
        time_created,
        time_expired: time_created + retention_secs,
        id,
    })
}

/// Status code a fault maps to, mirroring the client/service split.
fn fault_status(err: &CodebinError) -> StatusCode {
    match err {
        CodebinError::MalformedForm
        | CodebinError::MissingField
        | CodebinError::EmptyBody
        | CodebinError::UnsupportedMode(_) => StatusCode::BAD_REQUEST,
        CodebinError::SnippetNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn is_snippet_id(id: &str) -> bool {
    id.len() == 32 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn text_response(status: StatusCode, message: &str) -> Response<String> {
    let mut resp = Response::new(message.to_string());
    *resp.status_mut() = status;
    resp
}

fn json_response(body: String) -> Response<String> {
    let mut resp = Response::new(body);
    resp.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    resp
}
