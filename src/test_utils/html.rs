use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");
    let text = String::from_utf8_lossy(&body).to_string();

    Html::parse_document(&text)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

pub(crate) fn count_elements(html: &Html, selector: &str) -> usize {
    let selector = Selector::parse(selector).expect("Could not parse selector");
    html.select(&selector).count()
}

/// Assert that the first element matching `selector` contains `expected` in its text.
#[track_caller]
pub(crate) fn assert_element_text(html: &Html, selector: &str, expected: &str) {
    let parsed = Selector::parse(selector).expect("Could not parse selector");
    let text = html
        .select(&parsed)
        .next()
        .unwrap_or_else(|| panic!("No element matches {selector}"))
        .text()
        .collect::<String>();

    assert!(
        text.contains(expected),
        "Expected {selector} to contain {expected:?}, got {text:?}"
    );
}
