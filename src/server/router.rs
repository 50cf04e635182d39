//! Request dispatch
//!
//! Every request goes through [`handle`]: the host picks the revision, a
//! trailing `/` on the path asks for a directory listing, anything else for a
//! raw file. All failures end up as `404` with a message, never `5xx`.

use crate::artifacts::revision::error::ResolveError;
use crate::artifacts::snapshot::error::SnapshotError;
use crate::artifacts::snapshot::file_reader::read_file;
use crate::artifacts::snapshot::tree_reader::list_tree;
use crate::server::error::ListingError;
use crate::server::host::revision_identifier;
use crate::server::mime;
use crate::server::state::ServerContext;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;

pub const NO_REVISION_MESSAGE: &str = "I have no idea what to serve you";

/// Outcome of a request, turned into an HTTP response
#[derive(Debug)]
pub enum Reply {
    /// The host does not name a revision
    NoRevision,
    CommitNotFound(ResolveError),
    DirectoryNotFound(SnapshotError),
    FileNotFound(SnapshotError),
    /// Rendered directory listing
    Listing(String),
    /// The listing template failed after the lookup succeeded
    ListingFailed(ListingError),
    File {
        content: String,
        content_type: Option<&'static str>,
    },
    /// The blocking task serving the request did not complete
    Aborted(String),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::NoRevision => not_found(NO_REVISION_MESSAGE.to_string()),
            Reply::CommitNotFound(err) => not_found(format!("Commit not found: {err}")),
            Reply::DirectoryNotFound(err) => not_found(format!("Directory not found: {err}")),
            Reply::FileNotFound(err) => not_found(format!("File not found: {err}")),
            Reply::Aborted(reason) => not_found(format!("Request aborted: {reason}")),
            Reply::Listing(html) => html_response(html),
            Reply::ListingFailed(err) => html_response(err.to_string()),
            Reply::File {
                content,
                content_type,
            } => {
                let mut response = Response::new(Body::from(content));
                if let Some(content_type) = content_type {
                    response
                        .headers_mut()
                        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
                response
            }
        }
    }
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, message).into_response()
}

fn html_response(body: String) -> Response {
    let mut response = Response::new(Body::from(body));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}

/// Serve `path` from the revision named by `host`
///
/// `path` is the URL path as received, still percent-encoded and including its
/// leading `/`. A trailing `/` asks for a listing. Blocks on filesystem reads.
pub fn handle(context: &ServerContext, host: &str, path: &str) -> Reply {
    let Some(identifier) = revision_identifier(host, context.domain.as_deref()) else {
        tracing::debug!(host, "host names no revision");
        return Reply::NoRevision;
    };

    let revision = match context.resolver.resolve(&context.repository, identifier) {
        Ok(revision) => revision,
        Err(err) => return Reply::CommitNotFound(err),
    };

    let is_directory = path.ends_with('/');
    let decoded = decode_path(path);

    if is_directory {
        let Some(decoded) = decoded else {
            return Reply::DirectoryNotFound(SnapshotError::PathNotFound {
                revision: revision.to_string(),
                path: path.to_string(),
                cause: anyhow::anyhow!("encoded '/' in path"),
            });
        };
        let directory = decoded.trim_matches('/');

        let entries = list_tree(&context.repository, &revision, directory)
            .and_then(|listing| listing.collect::<Result<Vec<_>, _>>());
        let entries = match entries {
            Ok(entries) => entries,
            Err(err) => return Reply::DirectoryNotFound(err),
        };

        match context.listing.render(&decoded, &entries) {
            Ok(html) => Reply::Listing(html),
            Err(err) => {
                tracing::warn!(path = %decoded, error = %err, "listing template failed");
                Reply::ListingFailed(err)
            }
        }
    } else {
        let Some(decoded) = decoded else {
            return Reply::FileNotFound(SnapshotError::FileNotFound {
                revision: revision.to_string(),
                path: path.to_string(),
                cause: anyhow::anyhow!("encoded '/' in path"),
            });
        };
        let file = decoded.strip_prefix('/').unwrap_or(&decoded);

        match read_file(&context.repository, &revision, file) {
            Ok(content) => Reply::File {
                content,
                content_type: mime::guess(file),
            },
            Err(err) => Reply::FileNotFound(err),
        }
    }
}

/// Percent-decode `path` one segment at a time
///
/// Returns `None` when a segment decodes to something containing `/`: a tree
/// entry name never does.
fn decode_path(path: &str) -> Option<String> {
    let mut segments = Vec::new();

    for segment in path.split('/') {
        let segment = percent_decode_str(segment).decode_utf8_lossy();
        if segment.contains('/') {
            return None;
        }
        segments.push(segment.into_owned());
    }

    Some(segments.join("/"))
}

/// axum handler for every method and path
pub async fn serve(State(context): State<ServerContext>, request: Request) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .or_else(|| request.uri().host())
        .unwrap_or_default()
        .to_string();
    let path = request.uri().path().to_string();

    let reply = tokio::task::spawn_blocking(move || handle(&context, &host, &path)).await;

    let reply = reply.unwrap_or_else(|err| {
        tracing::error!(error = %err, "request task failed");
        Reply::Aborted(err.to_string())
    });

    let response = reply.into_response();
    tracing::debug!(status = %response.status(), "request handled");
    response
}
