use crate::{html, mount};
use std::sync::Arc;
use url::Url;
use webquery::config::Config;
use webquery::crawler::{build_sitemap, fetch_links, HttpFetcher, PageFetcher};
use wiremock::{MockServer, ResponseTemplate};

fn fetcher() -> Arc<dyn PageFetcher> {
    Arc::new(HttpFetcher::from_config(&Config::default()).expect("Failed to build HTTP client"))
}

fn base(server: &MockServer) -> Url {
    Url::parse(&server.uri()).expect("Failed to parse base URL")
}

#[tokio::test]
async fn test_link_extraction_skips_mailto() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        html(
            r#"<a href="mailto:team@example.com">Mail</a>
               <a href="page.html">Relative</a>
               <a href="https://other.example.com/x?y=1#z">Absolute</a>"#,
        ),
        1,
    )
    .await;

    let links = fetch_links(fetcher().as_ref(), &base(&server)).await;

    assert!(links.failure.is_none());
    assert_eq!(
        links.hrefs,
        vec!["page.html", "https://other.example.com/x?y=1#z"]
    );
}

#[tokio::test]
async fn test_link_extraction_on_error_page() {
    let server = MockServer::start().await;
    mount(&server, "/", ResponseTemplate::new(503), 1).await;

    let links = fetch_links(fetcher().as_ref(), &base(&server)).await;

    assert!(links.hrefs.is_empty());
    assert!(links.failure.is_some());
}

#[tokio::test]
async fn test_sitemap_over_http() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        html(r#"<a href="/a">A</a><a href="/b">B</a>"#),
        1,
    )
    .await;
    mount(&server, "/a", html(r#"<a href="/c">C</a><a href="/">Home</a>"#), 1).await;
    mount(&server, "/b", html("<p>leaf</p>"), 1).await;

    let seed = base(&server);
    let sitemap = build_sitemap(&Config::default(), fetcher(), &seed).await;

    let expected: Vec<String> = ["/", "/a", "/c", "/b"]
        .iter()
        .map(|p| seed.join(p).unwrap().to_string())
        .collect();
    assert_eq!(sitemap.flatten(), expected);
    assert!(!sitemap.is_truncated());

    let xml = sitemap.to_xml().unwrap();
    assert!(xml.starts_with(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
    for url in &expected {
        assert!(xml.contains(&format!("<loc>{}</loc>", url)));
    }
}

#[tokio::test]
async fn test_sitemap_is_deterministic() {
    let server = MockServer::start().await;
    // Two builds, one link fetch per non-leaf page each; the leaf is never fetched
    mount(
        &server,
        "/",
        html(r#"<a href="/b">B</a><a href="/a">A</a><a href="/b">B again</a>"#),
        2,
    )
    .await;
    mount(&server, "/a", html(r#"<a href="/c">C</a>"#), 2).await;
    mount(&server, "/b", html(r#"<a href="/c">C</a>"#), 2).await;
    mount(&server, "/c", html("<p>leaf</p>"), 0).await;

    let seed = base(&server);
    let config = Config::default();
    let first = build_sitemap(&config, fetcher(), &seed).await;
    let second = build_sitemap(&config, fetcher(), &seed).await;

    assert_eq!(first.flatten(), second.flatten());
    assert_eq!(first.len(), 4);
    assert_eq!(first.root().depth, 2);
}
