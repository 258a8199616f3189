use crate::{html, mount, mount_small_site};
use url::Url;
use webquery::config::Config;
use webquery::corpus::{CorpusBuilder, CorpusCache, CorpusStore, FsCorpusStore};
use webquery::state::{PageFailure, VisitStatus};
use webquery::{IngestStatus, Orchestrator, PageOutcome, WebQueryError};
use wiremock::{MockServer, ResponseTemplate};

fn orchestrator() -> Orchestrator {
    Orchestrator::new(Config::default()).expect("Failed to create orchestrator")
}

#[tokio::test]
async fn test_full_ingest_small_site() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let orchestrator = orchestrator();
    let report = orchestrator.ingest(&server.uri()).await.unwrap();

    assert_eq!(report.status, IngestStatus::Success);
    assert_eq!(report.pages.len(), 4);
    assert_eq!(report.extracted_count(), 4);
    assert!(!report.truncated);

    let corpus = report.corpus();
    for needle in ["home page", "apples", "bananas", "cherries"] {
        assert!(corpus.contains(needle), "corpus is missing '{}'", needle);
    }
    // Sitemap order: /, /a, /c, /b
    let apples = corpus.find("apples").unwrap();
    let cherries = corpus.find("cherries").unwrap();
    let bananas = corpus.find("bananas").unwrap();
    assert!(apples < cherries && cherries < bananas);

    assert_eq!(orchestrator.state().count(VisitStatus::Extracted), 4);
}

#[tokio::test]
async fn test_second_ingest_is_skipped() {
    let server = MockServer::start().await;
    // Expectations cover the first run only; a second run fetching anything fails them
    mount_small_site(&server).await;

    let orchestrator = orchestrator();
    let first = orchestrator.ingest(&server.uri()).await.unwrap();
    assert_eq!(first.status, IngestStatus::Success);

    let second = orchestrator.ingest(&server.uri()).await.unwrap();
    assert_eq!(second.status, IngestStatus::Skipped);
    assert_eq!(second.status.as_str(), "Skipped");
    assert!(second.corpus().is_empty());
}

#[tokio::test]
async fn test_failing_page_makes_partial_run() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        html(r#"<p>The landing page has some real text.</p><a href="/broken">Broken</a>"#),
        1,
    )
    .await;
    // The failed link fetch is not repeated for extraction
    mount(&server, "/broken", ResponseTemplate::new(500), 1).await;

    let orchestrator = orchestrator();
    let report = orchestrator.ingest(&server.uri()).await.unwrap();

    assert_eq!(report.status, IngestStatus::Partial);
    let broken = format!("{}/broken", server.uri());
    assert_eq!(
        report.outcome_for(&broken),
        Some(&PageOutcome::Failed(PageFailure::HttpStatus(500)))
    );
    assert_eq!(
        orchestrator.state().status(&broken),
        Some(VisitStatus::Attempted)
    );
    assert!(report.corpus().contains("landing page"));
}

#[tokio::test]
async fn test_non_html_page_is_not_extracted() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        html(r#"<p>Home page with a download link.</p><a href="/logo.png">Logo</a>"#),
        1,
    )
    .await;
    mount(
        &server,
        "/logo.png",
        ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"),
        1,
    )
    .await;

    let report = orchestrator().ingest(&server.uri()).await.unwrap();

    let logo = format!("{}/logo.png", server.uri());
    assert!(matches!(
        report.outcome_for(&logo),
        Some(PageOutcome::Failed(PageFailure::NotHtml(_)))
    ));
    assert_eq!(report.status, IngestStatus::Partial);
}

#[tokio::test]
async fn test_unreachable_seed_reports_failed() {
    // Nothing listens on a port freed right after binding
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let uri = format!("http://127.0.0.1:{}/", port);
    let report = orchestrator().ingest(&uri).await.unwrap();
    assert_eq!(report.status, IngestStatus::Failed);
    assert_eq!(report.pages.len(), 1);
}

#[tokio::test]
async fn test_invalid_seed_is_an_error() {
    let result = orchestrator().ingest("mailto:someone@example.com").await;
    assert!(matches!(result, Err(WebQueryError::InvalidSeed { .. })));
}

#[tokio::test]
async fn test_corpus_round_trip_through_store_and_cache() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let report = orchestrator().ingest(&server.uri()).await.unwrap();

    let mut builder = CorpusBuilder::new();
    builder.push_text("Answer questions about fruit.");
    builder.push_url_corpus(&report.corpus());
    let corpus = builder.build();
    assert!(corpus.starts_with("Answer questions about fruit.\n"));

    let dir = tempfile::TempDir::new().unwrap();
    let store = FsCorpusStore::new(dir.path());
    store.put("fruit-bot", &corpus).unwrap();

    let mut cache = CorpusCache::new(2);
    let loaded = cache.get_or_load("fruit-bot", &store).unwrap();
    assert_eq!(loaded.as_deref(), Some(corpus.as_str()));
    assert!(cache.contains("fruit-bot"));
}

#[test]
fn test_seed_urls_are_normalized() {
    let seed = webquery::parse_seed("  https://example.com/page?utm_source=x#part ").unwrap();
    assert_eq!(seed, Url::parse("https://example.com/page").unwrap());
}
