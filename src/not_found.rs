//! The 404 page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Route handler for URLs that match no route.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// The 404 page as a response, also used for [crate::Error::NotFound].
pub fn get_404_not_found_response() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "Something's missing.",
        "Sorry, we can't find that page. You'll find lots to explore on the dashboard.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}
