//! Integration tests for the export pipeline
//!
//! These tests use wiremock to serve a miniature copy of the bookstore and
//! check the full discover → paginate → extract → write cycle end-to-end.

use book_scraper::config::{Config, OutputLayout};
use book_scraper::crawler::{collect_catalogue, Coordinator, ExportRequest, Fetcher};
use book_scraper::product::PRODUCT_FIELDS;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATEGORY_PATH: &str = "/catalogue/category/books/mystery_3";

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.root_url = format!("{}/", server.uri());
    config.site.catalogue_base = format!("{}/catalogue/", server.uri());
    config.crawler.max_concurrent_requests = 4;
    config.output.directory = output_dir.to_path_buf();
    config
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Listing page with product cards `first..first + count` and an optional next link
fn catalogue_page(name: &str, first: usize, count: usize, next: Option<&str>) -> String {
    let mut html = format!(
        r#"<html><body><div class="page-header action"><h1>{}</h1></div><ol class="row">"#,
        name
    );
    for i in first..first + count {
        html.push_str(&format!(
            r#"<li><article class="product_pod">
                <div class="image_container"><a href="../../../book-{i}_{i}/index.html"><img src="x.jpg"></a></div>
                <h3><a href="../../../book-{i}_{i}/index.html">Book {i}</a></h3>
            </article></li>"#
        ));
    }
    html.push_str("</ol>");
    if let Some(next) = next {
        html.push_str(&format!(
            r#"<ul class="pager"><li class="next"><a href="{}">next</a></li></ul>"#,
            next
        ));
    }
    html.push_str("</body></html>");
    html
}

/// Product detail page for book `i`
fn product_page(i: usize, category: &str) -> String {
    format!(
        r#"<html><body>
        <ul class="breadcrumb">
          <li><a href="../../index.html">Home</a></li>
          <li><a href="../category/books_1/index.html">Books</a></li>
          <li><a href="../category/books/mystery_3/index.html">{category}</a></li>
          <li class="active">Book {i}</li>
        </ul>
        <div class="carousel-inner"><div class="item active">
          <img src="../../media/cover-{i}.jpg" alt="Book {i}" />
        </div></div>
        <h1>Book {i}</h1>
        <div id="product_description" class="sub-header"><h2>Product Description</h2></div>
        <p>Description of book {i}.</p>
        <table class="table table-striped">
          <tr><th>UPC</th><td>upc{i:04}</td></tr>
          <tr><th>Product Type</th><td>Books</td></tr>
          <tr><th>Price (excl. tax)</th><td>£{i}.50</td></tr>
          <tr><th>Price (incl. tax)</th><td>£{i}.50</td></tr>
          <tr><th>Availability</th><td>In stock ({i} available)</td></tr>
          <tr><th>Number of reviews</th><td>{i}</td></tr>
        </table>
        </body></html>"#
    )
}

/// Product page missing its details table
fn broken_product_page(i: usize) -> String {
    format!(r#"<html><body><h1>Book {i}</h1><p>No details here.</p></body></html>"#)
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn page_path(page: usize) -> String {
    if page == 1 {
        format!("{}/index.html", CATEGORY_PATH)
    } else {
        format!("{}/page-{}.html", CATEGORY_PATH, page)
    }
}

/// Mounts a catalogue of `pages` listing pages with `per_page` products each
async fn mount_catalogue(server: &MockServer, name: &str, pages: usize, per_page: usize) {
    for page in 1..=pages {
        let next = (page < pages).then(|| format!("page-{}.html", page + 1));
        Mock::given(method("GET"))
            .and(path(page_path(page)))
            .respond_with(html(catalogue_page(
                name,
                (page - 1) * per_page + 1,
                per_page,
                next.as_deref(),
            )))
            .expect(1)
            .mount(server)
            .await;
    }
}

async fn mount_product(server: &MockServer, i: usize, category: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/catalogue/book-{i}_{i}/index.html")))
        .respond_with(html(product_page(i, category)))
        .mount(server)
        .await;
}

async fn mount_images(server: &MockServer) {
    Mock::given(method("GET"))
        .and(wiremock::matchers::path_regex(r"^/media/cover-\d+\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFFu8, 0xD8, 0xFF, 0xD9]))
        .mount(server)
        .await;
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open CSV");
    let header = reader
        .headers()
        .expect("Failed to read header")
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("Bad row").iter().map(String::from).collect())
        .collect();
    (header, rows)
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| entries.map(|e| e.unwrap().path()).collect())
        .unwrap_or_default()
}

async fn assert_pagination(pages: usize, per_page: usize) {
    let server = MockServer::start().await;
    mount_catalogue(&server, "Mystery", pages, per_page).await;

    let config = create_test_config(&server, Path::new("."));
    let fetcher = Fetcher::new(&config).expect("Failed to build fetcher");
    let first = Url::parse(&format!("{}{}", server.uri(), page_path(1))).unwrap();
    let base = Url::parse(&config.site.catalogue_base).unwrap();

    let catalogue = collect_catalogue(&fetcher, &first, &base)
        .await
        .expect("Pagination failed");

    assert_eq!(catalogue.name, "Mystery");
    assert_eq!(catalogue.product_links.len(), pages * per_page);
    let unique: HashSet<_> = catalogue.product_links.iter().collect();
    assert_eq!(unique.len(), pages * per_page, "Duplicate product links");
    assert_eq!(
        catalogue.product_links[0].as_str(),
        format!("{}/catalogue/book-1_1/index.html", server.uri())
    );
    // Each listing page is requested exactly once; verified when server drops
}

#[tokio::test]
async fn test_pagination_single_page() {
    assert_pagination(1, 7).await;
}

#[tokio::test]
async fn test_pagination_two_pages() {
    assert_pagination(2, 20).await;
}

#[tokio::test]
async fn test_pagination_five_pages() {
    assert_pagination(5, 3).await;
}

#[tokio::test]
async fn test_pagination_loop_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(page_path(1)))
        .respond_with(html(catalogue_page("Loop", 1, 2, Some("page-2.html"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(page_path(2)))
        .respond_with(html(catalogue_page("Loop", 3, 2, Some("index.html"))))
        .mount(&server)
        .await;

    let config = create_test_config(&server, Path::new("."));
    let fetcher = Fetcher::new(&config).unwrap();
    let first = Url::parse(&format!("{}{}", server.uri(), page_path(1))).unwrap();
    let base = Url::parse(&config.site.catalogue_base).unwrap();

    let err = collect_catalogue(&fetcher, &first, &base).await.unwrap_err();
    assert_eq!(err.kind(), "parse");
}

#[tokio::test]
async fn test_catalogue_export_end_to_end() {
    let server = MockServer::start().await;
    mount_catalogue(&server, "Mystery", 3, 20).await;
    for i in 1..=60 {
        mount_product(&server, i, "Mystery").await;
    }
    mount_images(&server).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&server, output.path());
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let summary = coordinator
        .run(&ExportRequest::Catalogue(format!(
            "{}{}",
            server.uri(),
            page_path(1)
        )))
        .await
        .expect("Export failed");

    assert_eq!(summary.products_exported, 60);
    assert_eq!(summary.catalogues_exported, 1);
    assert_eq!(summary.images_saved, 60);
    assert_eq!(summary.failure_count(), 0);
    assert_eq!(summary.csv_files.len(), 1);

    let csv_path = &summary.csv_files[0];
    let file_name = csv_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.contains("Mystery"), "{}", file_name);
    assert!(file_name.contains(&today()), "{}", file_name);
    assert_eq!(csv_path.parent().unwrap(), output.path().join("Mystery"));

    let (header, rows) = read_csv(csv_path);
    assert_eq!(header, PRODUCT_FIELDS.to_vec());
    assert_eq!(rows.len(), 60);

    // Rows keep listing order even with concurrent extraction
    assert_eq!(rows[0][2], "Book 1");
    assert_eq!(rows[59][2], "Book 60");
    assert_eq!(rows[41][1], "upc0042");
    assert_eq!(rows[41][3], "42.50");
    assert_eq!(rows[41][5], "42");
    assert_eq!(rows[41][6], "Description of book 42.");
    assert_eq!(rows[41][7], "Mystery");
    assert_eq!(rows[41][9], format!("{}/media/cover-42.jpg", server.uri()));

    let images = files_in(&output.path().join("Mystery").join("images"));
    assert_eq!(images.len(), 60);
}

#[tokio::test]
async fn test_broken_product_is_skipped() {
    let server = MockServer::start().await;
    mount_catalogue(&server, "Mystery", 1, 3).await;
    mount_product(&server, 1, "Mystery").await;
    Mock::given(method("GET"))
        .and(path("/catalogue/book-2_2/index.html"))
        .respond_with(html(broken_product_page(2)))
        .mount(&server)
        .await;
    mount_product(&server, 3, "Mystery").await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&server, output.path());
    config.crawler.download_images = false;
    let coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator
        .export_catalogue(&format!("{}{}", server.uri(), page_path(1)))
        .await
        .expect("Batch should survive one bad product");

    assert_eq!(summary.products_exported, 2);
    assert_eq!(summary.product_failures.len(), 1);
    assert_eq!(summary.product_failures[0].kind, "extract");
    assert!(summary.product_failures[0].url.ends_with("/book-2_2/index.html"));

    let (_, rows) = read_csv(&summary.csv_files[0]);
    let titles: Vec<&str> = rows.iter().map(|r| r[2].as_str()).collect();
    assert_eq!(titles, vec!["Book 1", "Book 3"]);
}

#[tokio::test]
async fn test_missing_product_page_is_skipped() {
    let server = MockServer::start().await;
    mount_catalogue(&server, "Mystery", 1, 2).await;
    mount_product(&server, 1, "Mystery").await;
    // book-2 is not mounted and answers 404

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&server, output.path());
    config.crawler.download_images = false;
    let coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator
        .export_catalogue(&format!("{}{}", server.uri(), page_path(1)))
        .await
        .unwrap();

    assert_eq!(summary.products_exported, 1);
    assert_eq!(summary.product_failures[0].kind, "fetch");
}

#[tokio::test]
async fn test_image_failure_does_not_abort_export() {
    let server = MockServer::start().await;
    mount_catalogue(&server, "Mystery", 1, 2).await;
    mount_product(&server, 1, "Mystery").await;
    mount_product(&server, 2, "Mystery").await;
    Mock::given(method("GET"))
        .and(path("/media/cover-1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&server)
        .await;
    // cover-2.jpg answers 404

    let output = TempDir::new().unwrap();
    let config = create_test_config(&server, output.path());
    let coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator
        .export_catalogue(&format!("{}{}", server.uri(), page_path(1)))
        .await
        .unwrap();

    assert_eq!(summary.products_exported, 2);
    assert_eq!(summary.images_saved, 1);
    assert_eq!(summary.image_failures.len(), 1);
    assert_eq!(summary.image_failures[0].kind, "download");
    assert_eq!(
        files_in(&output.path().join("Mystery").join("images")).len(),
        1
    );
}

#[tokio::test]
async fn test_product_requests_respect_concurrency_limit() {
    const PRODUCTS: usize = 8;
    const LIMIT: u32 = 2;
    let delay = Duration::from_millis(200);

    let server = MockServer::start().await;
    mount_catalogue(&server, "Mystery", 1, PRODUCTS).await;
    for i in 1..=PRODUCTS {
        Mock::given(method("GET"))
            .and(path(format!("/catalogue/book-{i}_{i}/index.html")))
            .respond_with(html(product_page(i, "Mystery")).set_delay(delay))
            .expect(1)
            .mount(&server)
            .await;
    }

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&server, output.path());
    config.crawler.max_concurrent_requests = LIMIT;
    config.crawler.download_images = false;
    let coordinator = Coordinator::new(config).unwrap();

    let started = Instant::now();
    let summary = coordinator
        .export_catalogue(&format!("{}{}", server.uri(), page_path(1)))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary.products_exported, PRODUCTS as u64);
    // Eight delayed responses, two at a time, take at least four delays
    let waves = (PRODUCTS as u32).div_ceil(LIMIT);
    assert!(
        elapsed >= delay * waves,
        "{} products finished in {:?} with at most {} in flight",
        PRODUCTS,
        elapsed,
        LIMIT
    );
}

#[tokio::test]
async fn test_catalogue_listing_failure_aborts() {
    let server = MockServer::start().await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&server, output.path());
    let coordinator = Coordinator::new(config).unwrap();

    let err = coordinator
        .export_catalogue(&format!("{}{}", server.uri(), page_path(1)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "fetch");
    assert!(files_in(output.path()).is_empty());
}

#[tokio::test]
async fn test_single_product_export() {
    let server = MockServer::start().await;
    mount_product(&server, 7, "Mystery").await;
    mount_images(&server).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&server, output.path());
    let coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator
        .run(&ExportRequest::Product(format!(
            "{}/catalogue/book-7_7/index.html",
            server.uri()
        )))
        .await
        .expect("Product export failed");

    assert_eq!(summary.products_exported, 1);
    assert_eq!(summary.images_saved, 1);

    let folder = output.path().join("book-7_details");
    let expected_csv = folder.join(format!("book-7_details_{}.csv", today()));
    assert_eq!(summary.csv_files, vec![expected_csv.clone()]);

    let (_, rows) = read_csv(&expected_csv);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][2], "Book 7");

    let images = files_in(&folder.join("images"));
    assert_eq!(images.len(), 1);
    let image_name = images[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(image_name.starts_with(&format!("book-7_{}_", today())));
    assert!(image_name.ends_with(".jpg"));
}

#[tokio::test]
async fn test_single_product_extract_error_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalogue/book-9_9/index.html"))
        .respond_with(html(broken_product_page(9)))
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&server, output.path());
    let coordinator = Coordinator::new(config).unwrap();

    let err = coordinator
        .export_product(&format!("{}/catalogue/book-9_9/index.html", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "extract");
}

#[tokio::test]
async fn test_flat_layout_catalogue_export() {
    let server = MockServer::start().await;
    mount_catalogue(&server, "Mystery", 1, 2).await;
    mount_product(&server, 1, "Mystery").await;
    mount_product(&server, 2, "Mystery").await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&server, output.path());
    config.output.layout = OutputLayout::Flat;
    config.crawler.download_images = false;
    let coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator
        .export_catalogue(&format!("{}{}", server.uri(), page_path(1)))
        .await
        .unwrap();

    let expected = output
        .path()
        .join(format!("Mystery_catalogue_infos_{}.csv", today()));
    assert_eq!(summary.csv_files, vec![expected.clone()]);
    assert!(expected.exists());
}

#[tokio::test]
async fn test_site_export_skips_all_books_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><div class="side_categories"><ul>
              <li><a href="catalogue/category/books_1/index.html">Books</a>
                <ul>
                  <li><a href="catalogue/category/books/mystery_3/index.html">Mystery</a></li>
                  <li><a href="catalogue/category/books/poetry_23/index.html">Poetry</a></li>
                </ul>
              </li>
            </ul></div></body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    // The all-books listing must never be walked
    Mock::given(method("GET"))
        .and(path("/catalogue/category/books_1/index.html"))
        .respond_with(html(catalogue_page("Books", 1, 3, None)))
        .expect(0)
        .mount(&server)
        .await;

    mount_catalogue(&server, "Mystery", 1, 2).await;
    Mock::given(method("GET"))
        .and(path("/catalogue/category/books/poetry_23/index.html"))
        .respond_with(html(catalogue_page("Poetry", 3, 1, None)))
        .expect(1)
        .mount(&server)
        .await;
    mount_product(&server, 1, "Mystery").await;
    mount_product(&server, 2, "Mystery").await;
    mount_product(&server, 3, "Poetry").await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&server, output.path());
    config.crawler.download_images = false;
    let coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator
        .run(&ExportRequest::Site)
        .await
        .expect("Site export failed");

    assert_eq!(summary.catalogues_exported, 2);
    assert_eq!(summary.products_exported, 3);
    // Two catalogue files plus the combined site file
    assert_eq!(summary.csv_files.len(), 3);
    assert!(output.path().join("Mystery").is_dir());
    assert!(output.path().join("Poetry").is_dir());

    let combined = summary.csv_files.last().unwrap();
    assert_eq!(combined.parent().unwrap(), output.path());
    let (_, rows) = read_csv(combined);
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_site_export_continues_after_catalogue_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<div class="side_categories">
              <a href="catalogue/category/books_1/index.html">Books</a>
              <a href="catalogue/category/books/gone_9/index.html">Gone</a>
              <a href="catalogue/category/books/mystery_3/index.html">Mystery</a>
            </div>"#
                .to_string(),
        ))
        .mount(&server)
        .await;
    mount_catalogue(&server, "Mystery", 1, 1).await;
    mount_product(&server, 1, "Mystery").await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&server, output.path());
    config.crawler.download_images = false;
    config.output.combined_site_csv = false;
    let coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator.export_site().await.unwrap();

    assert_eq!(summary.catalogues_exported, 1);
    assert_eq!(summary.catalogue_failures.len(), 1);
    assert_eq!(summary.catalogue_failures[0].kind, "fetch");
    assert_eq!(summary.csv_files.len(), 1);
}

#[tokio::test]
async fn test_site_without_navigation_exports_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<html><body>Under maintenance</body></html>".to_string()))
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&server, output.path());
    let coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator.export_site().await.unwrap();
    assert!(summary.is_empty());
    assert!(summary.csv_files.is_empty());
}
