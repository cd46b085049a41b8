//! Where to send the user after they log in.
//!
//! Only same-origin paths are accepted, and never the log-in page itself.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

fn is_safe_redirect_url(path_and_query: &str) -> bool {
    if !path_and_query.starts_with('/') || path_and_query.starts_with("//") {
        return false;
    }

    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path);

    path != endpoints::LOG_IN_VIEW
}

/// Reduce `raw_url` to its path and query, or `None` if it points to another
/// site or to the log-in page.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    let path_and_query = uri.path_and_query()?.as_str();
    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// HX-Current-URL holds an absolute URL, so only its path and query are kept.
fn normalize_hx_current_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// The log-in page URL with a `redirect_url` query pointing back to `redirect_target`.
pub fn log_in_url_with_redirect(redirect_target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(query) => Some(format!("{}?{}", endpoints::LOG_IN_VIEW, query)),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}");
            None
        }
    }
}

/// The log-in URL for a request that was rejected by the auth guard.
///
/// API requests come from HTMX, so the page the user was looking at is taken
/// from the HX-Current-URL header instead of the request URI.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let redirect_target = if request.uri().path().starts_with("/api") {
        redirect_target_from_hx_request(request)?
    } else {
        let path_and_query = request.uri().path_and_query()?.as_str();
        normalize_redirect_url(path_and_query)?
    };

    log_in_url_with_redirect(&redirect_target)
}

fn redirect_target_from_hx_request(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    else {
        tracing::warn!("Missing HX-Current-URL header for /api request.");
        return None;
    };

    let redirect_url = normalize_hx_current_url(current_url);
    if redirect_url.is_none() {
        tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    redirect_url
}
