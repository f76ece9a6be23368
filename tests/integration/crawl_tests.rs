//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the store and the static
//! renderer to serve chapter pages, and exercise the full
//! listing -> metadata -> chapters cycle end to end.

use std::sync::Arc;
use tadu_crawler::config::{Config, RendererKind};
use tadu_crawler::crawler::Coordinator;
use tadu_crawler::TaduError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration pointing every endpoint at the mock server
fn create_test_config(base_url: &str, uploads_root: &str) -> Config {
    let mut config = Config::default();
    config.site.origin = base_url.to_string();
    config.site.listing_url_template = format!("{}/store/98-a-0-15-a-20-p-{{page}}-909", base_url);
    config.http.max_attempts = 2;
    config.http.backoff_secs = 0;
    config.browser.renderer = RendererKind::Static;
    config.browser.politeness_delay_ms = 0;
    config.assets.uploads_root = uploads_root.to_string();
    config
}

fn coordinator(server: &MockServer, uploads: &TempDir) -> Coordinator {
    let config = create_test_config(&server.uri(), uploads.path().to_str().unwrap());
    Coordinator::new(Arc::new(config)).expect("Failed to create coordinator")
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn chapter_page(title: &str, paragraphs: &[&str], next: Option<&str>) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{}</p>", p)).collect();
    let next = next
        .map(|href| format!(r#"<a id="paging_right" href="{}">下一章</a>"#, href))
        .unwrap_or_default();
    format!(
        r#"<html><body><h4>塔读文学</h4><h4>{}</h4><div id="partContent">{}</div>{}</body></html>"#,
        title, body, next
    )
}

/// Listing page 1 links to books 5, 12 and 5 again
async fn mount_listing(server: &MockServer) {
    mount_html(
        server,
        "/store/98-a-0-15-a-20-p-1-909",
        r#"<html><body>
            <a class="bookImg" href="/book/5/"><img src="/c/5.jpg"></a>
            <a class="bookImg" href="/book/12/"><img src="/c/12.jpg"></a>
            <a class="bookNm" href="/book/99/">Not a cover link</a>
            <a class="bookImg" href="/book/5/"><img src="/c/5.jpg"></a>
        </body></html>"#
            .to_string(),
    )
    .await;
}

/// Book 12: every field present, two chapters
async fn mount_book_12(server: &MockServer) {
    mount_html(
        server,
        "/book/12/",
        r#"<html><head><meta property="og:image" content="https://media3.tadu.com/og/12.jpg"></head><body>
            <a class="bkNm" data-name=" 长夜 ">长夜</a>
            <span class="author">王五</span>
            <img data-src="/covers/12.png" src="/static/loading.gif">
            <p class="intro">第一行<br>第二行</p>
            <div class="sortList"><a>玄幻</a><a>东方玄幻</a></div>
        </body></html>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/covers/12.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"cover-12".to_vec()))
        .mount(server)
        .await;

    mount_html(
        server,
        "/book/12/1/",
        chapter_page("第一章", &["甲", "  ", "乙"], Some("/book/12/2/")),
    )
    .await;
    mount_html(server, "/book/12/2/", chapter_page("第二章", &["丙"], None)).await;
}

/// Book 5: no author, no genres, cover only via the social preview
async fn mount_book_5(server: &MockServer) {
    mount_html(
        server,
        "/book/5/",
        format!(
            r#"<html><head><meta property="og:image" content="{}/og/5.jpg"></head><body>
            <a class="bkNm" data-name="短篇">短篇</a>
            <img data-src="//media3.tadu.com/">
            <p class="intro">简介</p>
        </body></html>"#,
            server.uri()
        ),
    )
    .await;

    // The preview image is gone; the record keeps its URL without a local copy
    Mock::given(method("GET"))
        .and(path("/og/5.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    mount_html(
        server,
        "/book/5/1/",
        chapter_page("序章", &["开始"], Some("/book/5/2/")),
    )
    .await;
    mount_html(
        server,
        "/book/5/2/",
        chapter_page("第一章", &["继续"], Some("/book/5/3/")),
    )
    .await;
    mount_html(server, "/book/5/3/", chapter_page("第二章", &["结束"], None)).await;
}

#[tokio::test]
async fn test_full_crawl_single_page() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    mount_book_12(&server).await;
    mount_book_5(&server).await;

    let uploads = TempDir::new().unwrap();
    let result = coordinator(&server, &uploads)
        .crawl_page(1, 5)
        .await
        .expect("Crawl failed");

    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);

    // Lexical order: "12" before "5", duplicate collapsed
    let ids: Vec<_> = result.books.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["12", "5"]);

    let book_12 = &result.books[0];
    assert_eq!(book_12.title, "长夜");
    assert_eq!(book_12.author, "王五");
    assert_eq!(book_12.description, "第一行\n第二行");
    assert_eq!(book_12.genres, vec!["玄幻".to_string(), "东方玄幻".to_string()]);
    assert_eq!(book_12.source_url, format!("{}/book/12/", server.uri()));
    assert_eq!(book_12.cover_image_url, format!("{}/covers/12.png", server.uri()));
    assert!(book_12.cover_image_local_path.ends_with("/12.png"));
    assert_eq!(std::fs::read(&book_12.cover_image_local_path).unwrap(), b"cover-12");

    // Chain of two, budget five: stopped by the missing next link
    assert_eq!(book_12.chapters.len(), 2);
    assert_eq!(book_12.chapters[0].title, "第一章");
    assert_eq!(book_12.chapters[0].content, "甲\n乙");
    assert_eq!(
        book_12.chapters[0].source_url,
        format!("{}/book/12/1/?isfirstpart=true", server.uri())
    );
    assert_eq!(book_12.chapters[1].title, "第二章");
    assert_eq!(book_12.chapters[1].source_url, format!("{}/book/12/2/", server.uri()));

    let book_5 = &result.books[1];
    assert_eq!(book_5.author, "");
    assert!(book_5.genres.is_empty());
    assert_eq!(book_5.title, "短篇");
    assert_eq!(book_5.description, "简介");
    assert_eq!(book_5.cover_image_url, format!("{}/og/5.jpg", server.uri()));
    assert_eq!(book_5.cover_image_local_path, "");
    assert_eq!(book_5.chapters.len(), 3);
}

#[tokio::test]
async fn test_chapter_budget_limits_run() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    mount_book_12(&server).await;
    mount_book_5(&server).await;

    let uploads = TempDir::new().unwrap();
    let result = coordinator(&server, &uploads)
        .crawl_page(1, 1)
        .await
        .expect("Crawl failed");

    for book in &result.books {
        assert_eq!(book.chapters.len(), 1, "book {} exceeded its budget", book.id);
    }
}

#[tokio::test]
async fn test_failed_book_does_not_block_others() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    mount_book_12(&server).await;

    // Book 5's first chapter never renders its content region
    mount_html(
        &server,
        "/book/5/",
        r#"<a class="bkNm" data-name="Broken"></a>"#.to_string(),
    )
    .await;
    mount_html(&server, "/book/5/1/", "<html><body>loading</body></html>".to_string()).await;

    let uploads = TempDir::new().unwrap();
    let result = coordinator(&server, &uploads)
        .crawl_page(1, 5)
        .await
        .expect("Crawl failed");

    assert_eq!(result.books.len(), 1);
    assert_eq!(result.books[0].id, "12");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].id, "5");
    assert!(result.errors[0].error.contains("#partContent"));
}

#[tokio::test]
async fn test_unreachable_landing_page_recorded_as_error() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    mount_book_5(&server).await;

    Mock::given(method("GET"))
        .and(path("/book/12/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let uploads = TempDir::new().unwrap();
    let result = coordinator(&server, &uploads)
        .crawl_page(1, 5)
        .await
        .expect("Crawl failed");

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].id, "12");
    assert!(result.errors[0].error.contains("after 2 attempts"));
    assert_eq!(result.books.len(), 1);
    assert_eq!(result.books[0].id, "5");
}

#[tokio::test]
async fn test_empty_listing_page() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/store/98-a-0-15-a-20-p-7-909",
        "<html><body><p>No books</p></body></html>".to_string(),
    )
    .await;

    let uploads = TempDir::new().unwrap();
    let result = coordinator(&server, &uploads).crawl_page(7, 5).await;

    assert!(matches!(result, Err(TaduError::NoBooksFound { page: 7 })));
}

#[tokio::test]
async fn test_unreachable_listing_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let uploads = TempDir::new().unwrap();
    let result = coordinator(&server, &uploads).crawl_page(1, 5).await;

    assert!(matches!(
        result,
        Err(TaduError::FetchExhausted { attempts: 2, .. })
    ));
}
