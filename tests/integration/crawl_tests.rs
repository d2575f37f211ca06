//! Integration tests for the traversal phase
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end. Two mock servers listen on different
//! ports, which makes them two distinct sites.

use arachnida::config::Config;
use arachnida::crawler::{build_http_client, crawl, Coordinator, CrawlOptions};
use arachnida::output::SilentProgress;
use arachnida::state::PageStore;
use arachnida::{SpiderError, UrlError};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_page_expect(server: &MockServer, route: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(times)
        .mount(server)
        .await;
}

fn stored_urls(pages: &PageStore) -> Vec<String> {
    pages.records().into_iter().map(|record| record.url).collect()
}

async fn run(seed: &str, depth: u32, allow_cross_site: bool) -> PageStore {
    let client = build_http_client(&Config::default()).expect("Failed to build client");
    crawl(
        client,
        seed,
        &CrawlOptions::new(depth, allow_cross_site),
        Arc::new(SilentProgress),
    )
    .await
    .expect("Crawl failed")
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="{}/page1">Page 1</a><a href="page2">Page 2</a>"#,
            base_url
        ),
    )
    .await;
    mount_page(&mock_server, "/page1", "Content 1").await;
    mount_page(&mock_server, "/page2", "Content 2").await;

    let pages = run(&format!("{}/", base_url), 2, false).await;

    assert_eq!(pages.len(), 3);
    assert!(stored_urls(&pages).contains(&format!("{}/", base_url)));
    assert!(stored_urls(&pages).contains(&format!("{}/page1", base_url)));
    assert!(stored_urls(&pages).contains(&format!("{}/page2", base_url)));
}

#[tokio::test]
async fn test_depth_limit_on_linear_chain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // page0 -> page1 -> ... -> page5
    mount_page_expect(&mock_server, "/page0", r#"<a href="page1">next</a>"#, 1).await;
    mount_page_expect(&mock_server, "/page1", r#"<a href="page2">next</a>"#, 1).await;
    for i in 2..=5 {
        mount_page_expect(
            &mock_server,
            &format!("/page{}", i),
            &format!(r#"<a href="page{}">next</a>"#, i + 1),
            0,
        )
        .await;
    }

    let pages = run(&format!("{}/page0", base_url), 2, false).await;

    assert_eq!(
        stored_urls(&pages),
        vec![format!("{}/page0", base_url), format!("{}/page1", base_url)]
    );
}

#[tokio::test]
async fn test_depth_one_fetches_only_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page_expect(
        &mock_server,
        "/",
        r#"<a href="a">A</a><a href="b">B</a>"#,
        1,
    )
    .await;
    mount_page_expect(&mock_server, "/a", "A", 0).await;
    mount_page_expect(&mock_server, "/b", "B", 0).await;

    let client = build_http_client(&Config::default()).unwrap();
    let coordinator = Coordinator::new(
        client,
        &format!("{}/", base_url),
        &CrawlOptions::new(1, false),
        Arc::new(SilentProgress),
    )
    .unwrap();
    let pages = coordinator.run().await;

    assert_eq!(pages.len(), 1);
    // Links are still claimed even though no child task runs
    assert_eq!(coordinator.frontier().size(), 3);
}

#[tokio::test]
async fn test_rooted_and_bare_hrefs_are_distinct_urls() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="about">Bare</a><a href="/about">Rooted</a><a href="//cdn.test/x">Cdn</a>"#,
    )
    .await;

    let client = build_http_client(&Config::default()).unwrap();
    let coordinator = Coordinator::new(
        client,
        &format!("{}/", base_url),
        &CrawlOptions::new(1, false),
        Arc::new(SilentProgress),
    )
    .unwrap();
    coordinator.run().await;

    // Seed, "<root>about", "<root>/about" and "<root>//cdn.test/x"
    assert_eq!(coordinator.frontier().size(), 4);
    assert!(!coordinator.frontier().claim(&format!("{}//about", base_url)));
    assert!(!coordinator.frontier().claim(&format!("{}///cdn.test/x", base_url)));
}

#[tokio::test]
async fn test_scope_containment() {
    let site_a = MockServer::start().await;
    let site_b = MockServer::start().await;

    mount_page(
        &site_a,
        "/",
        &format!(r#"<a href="{}/x">Elsewhere</a><a href="local">Here</a>"#, site_b.uri()),
    )
    .await;
    mount_page(&site_a, "/local", "Local").await;
    mount_page_expect(&site_b, "/x", "Other site", 0).await;

    let pages = run(&format!("{}/", site_a.uri()), 3, false).await;

    assert_eq!(pages.len(), 2);
    let site_a_root = format!("{}/", site_a.uri());
    assert!(stored_urls(&pages).iter().all(|url| url.starts_with(&site_a_root)));
}

#[tokio::test]
async fn test_cross_site_opt_in() {
    let site_a = MockServer::start().await;
    let site_b = MockServer::start().await;

    mount_page(
        &site_a,
        "/",
        &format!(r#"<a href="{}/x">Elsewhere</a>"#, site_b.uri()),
    )
    .await;
    mount_page_expect(&site_b, "/x", "Other site", 1).await;

    let pages = run(&format!("{}/", site_a.uri()), 2, true).await;

    assert!(stored_urls(&pages).contains(&format!("{}/x", site_b.uri())));
    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_cross_site_relative_links_resolve_against_their_page() {
    let site_a = MockServer::start().await;
    let site_b = MockServer::start().await;

    mount_page(
        &site_a,
        "/",
        &format!(r#"<a href="{}/x">Elsewhere</a>"#, site_b.uri()),
    )
    .await;
    mount_page(&site_b, "/x", r#"<a href="y">Next</a>"#).await;
    mount_page_expect(&site_b, "/y", "Deeper", 1).await;

    let pages = run(&format!("{}/", site_a.uri()), 3, true).await;

    assert!(stored_urls(&pages).contains(&format!("{}/y", site_b.uri())));
}

#[tokio::test]
async fn test_relative_link_is_root_relative() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/dir/page.html", r#"<a href="img.html">Img</a>"#).await;
    mount_page_expect(&mock_server, "/img.html", "Root level", 1).await;
    mount_page_expect(&mock_server, "/dir/img.html", "Directory level", 0).await;

    let pages = run(&format!("{}/dir/page.html", base_url), 2, false).await;

    assert!(stored_urls(&pages).contains(&format!("{}/img.html", base_url)));
}

#[tokio::test]
async fn test_partial_failure_isolation() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="l1">L1</a><a href="l2">L2</a>"#).await;
    mount_page(&mock_server, "/l1", r#"<a href="l1/child">Child</a>"#).await;
    mount_page(&mock_server, "/l1/child", "Leaf").await;
    Mock::given(method("GET"))
        .and(path("/l2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pages = run(&format!("{}/", base_url), 3, false).await;

    assert_eq!(
        stored_urls(&pages),
        vec![
            format!("{}/", base_url),
            format!("{}/l1", base_url),
            format!("{}/l1/child", base_url),
        ]
    );
    assert!(!stored_urls(&pages).contains(&format!("{}/l2", base_url)));
}

#[tokio::test]
async fn test_shared_link_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let home = format!(r#"<a href="{}/">Home</a>"#, base_url);

    mount_page(
        &mock_server,
        "/",
        r#"<a href="a">A</a><a href="b">B</a><a href="c">C</a><a href="shared">S</a>"#,
    )
    .await;
    for name in ["a", "b", "c"] {
        mount_page_expect(
            &mock_server,
            &format!("/{}", name),
            &format!(
                r#"<a href="shared">S</a><a href="a">A</a><a href="b">B</a><a href="c">C</a>{}"#,
                home
            ),
            1,
        )
        .await;
    }
    mount_page_expect(&mock_server, "/shared", &home, 1).await;

    let pages = run(&format!("{}/", base_url), 4, false).await;

    assert_eq!(pages.len(), 5);
}

#[tokio::test]
async fn test_seed_not_refetched_through_self_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page_expect(
        &mock_server,
        "/",
        &format!(r#"<a href="{}/">Home</a><a href="">Empty</a>"#, base_url),
        1,
    )
    .await;

    let pages = run(&format!("{}/", base_url), 5, false).await;

    assert_eq!(pages.len(), 1);
}

#[tokio::test]
async fn test_single_fetch_permit_still_completes_tree() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="a">A</a><a href="b">B</a>"#).await;
    mount_page(&mock_server, "/a", r#"<a href="a1">A1</a><a href="a2">A2</a>"#).await;
    mount_page(&mock_server, "/b", r#"<a href="b1">B1</a>"#).await;
    for leaf in ["/a1", "/a2", "/b1"] {
        mount_page(&mock_server, leaf, "Leaf").await;
    }

    let client = build_http_client(&Config::default()).unwrap();
    let options = CrawlOptions::new(3, false).with_max_concurrent_fetches(1);
    let pages = crawl(
        client,
        &format!("{}/", base_url),
        &options,
        Arc::new(SilentProgress),
    )
    .await
    .unwrap();

    assert_eq!(pages.len(), 6);
}

#[tokio::test]
async fn test_invalid_seed_fails_without_network() {
    let client = build_http_client(&Config::default()).unwrap();
    let result = crawl(
        client,
        "www.example.com",
        &CrawlOptions::new(2, false),
        Arc::new(SilentProgress),
    )
    .await;

    assert!(matches!(
        result,
        Err(SpiderError::Url(UrlError::MissingScheme(_)))
    ));
}

#[tokio::test]
async fn test_page_content_is_stored() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Home</title></head>
            <body><a href="next">Next</a><img src="cat.png"></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let pages = run(&format!("{}/", base_url), 1, false).await;
    let records = pages.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, format!("{}/", base_url));
    let content = &records[0].content;

    assert_eq!(content.title, Some("Home".to_string()));
    assert_eq!(content.links, vec!["next"]);
    assert_eq!(content.images, vec!["cat.png"]);
}
