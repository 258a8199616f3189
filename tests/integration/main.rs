//! Integration tests for crawling and ingestion
//!
//! These tests use wiremock to serve small websites and run the full
//! seed-to-corpus cycle over real HTTP.

mod crawl_tests;
mod ingest_tests;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An HTML response wrapping `body`
pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

/// Mounts a GET handler for `route` that must be hit exactly `times` times
pub async fn mount(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Serves: / -> /a, /b; /a -> /c
///
/// Every page is fetched exactly once. Extraction reuses the response fetched for
/// links, and only the leaf /c at depth 2 is requested for its content alone.
pub async fn mount_small_site(server: &MockServer) {
    mount(
        server,
        "/",
        html(r#"<p>Welcome to the home page of the test site.</p><a href="/a">A</a><a href="/b">B</a>"#),
        1,
    )
    .await;
    mount(
        server,
        "/a",
        html(r#"<p>Page A talks about apples.</p><a href="/c">C</a>"#),
        1,
    )
    .await;
    mount(server, "/b", html("<p>Page B talks about bananas.</p>"), 1).await;
    mount(server, "/c", html("<p>Page C talks about cherries.</p>"), 1).await;
}
