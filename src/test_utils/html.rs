use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

async fn read_body(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&read_body(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&read_body(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The trimmed text of the first element matching `selector`.
#[track_caller]
pub(crate) fn must_get_text(html: &Html, selector: &str) -> String {
    html.select(&Selector::parse(selector).unwrap())
        .next()
        .unwrap_or_else(|| panic!("No element found for selector {selector:?}"))
        .text()
        .collect::<String>()
        .trim()
        .to_owned()
}

/// The number of `tbody tr` rows in the table with the given ID.
pub(crate) fn count_table_rows(html: &Html, table_id: &str) -> usize {
    html.select(&Selector::parse(&format!("#{table_id} tbody tr")).unwrap())
        .count()
}
