//! Integration tests for the crawl pipeline
//!
//! These tests use wiremock to serve a small mock listing site and run all
//! five stages end-to-end against it.

use lianjia_harvest::config::{load_config, Config};
use lianjia_harvest::output::UTF8_BOM;
use lianjia_harvest::{HarvestError, Pipeline};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEED_PAGE: &str = include_str!("../fixtures/seed.html");
const AREA_PAGE: &str = include_str!("../fixtures/area.html");
const HOUSE_PAGE: &str = include_str!("../fixtures/house.html");

/// Writes a configuration for the mock site and loads it back
fn create_test_config(dir: &TempDir, base_url: &str, extra: &str) -> Config {
    let csv_path = dir.path().join("output").join("output.csv");
    let toml = format!(
        r#"
[site]
base-url = "{base_url}"
seed-path = "/ershoufang/"
listing-path = "/ershoufang/"
allowed-domains = ["127.0.0.1"]

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[output]
csv-path = "{csv_path}"

[frontier.area]
capacity = 20
workers = 1
delay-ms = 0

[frontier.sub-area]
capacity = 300
workers = 3
delay-ms = 0

[frontier.page]
capacity = 5000
workers = 3
delay-ms = 0

[frontier.detail]
capacity = 100000
workers = 3
delay-ms = 0

{extra}
"#,
        base_url = base_url,
        csv_path = csv_path.display(),
        extra = extra,
    );

    let config_path = dir.path().join("lianjia.toml");
    std::fs::write(&config_path, toml).expect("Failed to write config");
    load_config(&config_path).expect("Failed to load config")
}

fn pagination(total_page: u32) -> String {
    format!(
        r#"<html><body>
        <div class="page-box house-lst-page-box" page-data='{{"totalPage":{},"curPage":1}}'></div>
        </body></html>"#,
        total_page
    )
}

fn listing_page(base_url: &str, ids: &[&str]) -> String {
    let items: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<li class="clear"><a class="noresultRecommend img" href="{}/ershoufang/{}.html">房源</a></li>"#,
                base_url, id
            )
        })
        .collect();

    format!(
        r#"<html><body>
        <div class="content"><div class="leftContent">
            <ul class="sellListContent">
                {}
                <li><a href="{}/ershoufang/promo.html">推广</a></li>
            </ul>
        </div></div>
        </body></html>"#,
        items, base_url
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
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

/// One area, two distinct sub-areas (one linked twice), three listing pages
/// and four distinct listings, one of which is gone (404)
async fn mount_site(server: &MockServer) {
    let base_url = server.uri();

    mount_page(server, "/ershoufang/", SEED_PAGE.to_string()).await;
    mount_page(server, "/ershoufang/dongcheng/", AREA_PAGE.to_string()).await;
    mount_page(server, "/ershoufang/andingmen/", pagination(2)).await;
    mount_page(server, "/ershoufang/chongwenmen/", pagination(1)).await;

    mount_page(
        server,
        "/ershoufang/andingmen/pg1/",
        listing_page(&base_url, &["101111350001", "101111350002"]),
    )
    .await;
    mount_page(
        server,
        "/ershoufang/andingmen/pg2/",
        listing_page(&base_url, &["101111350003", "101111350001"]),
    )
    .await;
    mount_page(
        server,
        "/ershoufang/chongwenmen/pg1/",
        listing_page(&base_url, &["101111350004"]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/ershoufang/10111135000[123]\.html$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOUSE_PAGE))
        .mount(server)
        .await;
}

fn read_output(config: &Config) -> (Vec<u8>, Vec<csv::StringRecord>) {
    let bytes = std::fs::read(Path::new(&config.output.csv_path)).expect("Output missing");
    let rows = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(&bytes[UTF8_BOM.len()..])
        .records()
        .collect::<Result<Vec<_>, _>>()
        .expect("Malformed CSV");
    (bytes, rows)
}

#[tokio::test]
async fn test_full_crawl_of_mock_site() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &server.uri(), "");

    let pipeline = Pipeline::new(config.clone()).expect("Failed to create pipeline");
    let summary = pipeline.run().await.expect("Crawl failed");

    assert_eq!(summary.areas, 1);
    assert_eq!(summary.sub_areas, 2, "duplicate sub-area href is queued once");
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.details, 4, "duplicate listing is queued once");
    assert_eq!(summary.houses, 3);
    assert_eq!(summary.failed_fetches, 1, "the 404 listing is dropped");
    assert_eq!(summary.dropped, 0);

    drop(pipeline);
    let (bytes, rows) = read_output(&config);

    assert!(bytes.starts_with(UTF8_BOM));
    assert_eq!(rows.len(), 4, "header plus one row per listing");
    assert!(rows.iter().all(|row| row.len() == 31));
    assert_eq!(&rows[0][0], "编号");
    assert_eq!(&rows[0][30], "房本备件");

    let mut ids: Vec<u64> = rows[1..].iter().map(|r| r[0].parse().unwrap()).collect();
    ids.sort();
    assert_eq!(ids, vec![0, 1, 2]);

    let row = &rows[1];
    assert_eq!(&row[1], "满五唯一 南北通透 近地铁");
    assert!(row[2].ends_with(".html"));
    assert_eq!(&row[3], "650.00");
    assert_eq!(&row[4], "万");
    assert_eq!(&row[5], "54167.00");
    assert_eq!(&row[6], "元/平米");
    assert_eq!(&row[7], "安德里北街");
    assert_eq!(&row[8], "东城");
    assert_eq!(&row[9], "安定门");
    assert_eq!(&row[10], "二至三环");
    assert_eq!(&row[11], "2室1厅1厨1卫");
    assert_eq!(&row[13], "120.50");
    assert_eq!(&row[15], "0.00");
    assert_eq!(&row[17], "南 北");
    assert_eq!(&row[23], "2023-05-01");
    assert_eq!(&row[29], "无抵押");
    assert_eq!(&row[30], "已上传房本照片");
}

#[tokio::test]
async fn test_duplicate_listings_refetched_when_dedup_disabled() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &server.uri(), "[crawl]\ndedup-listings = false\n");

    let pipeline = Pipeline::new(config.clone()).unwrap();
    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.details, 5);
    assert_eq!(summary.houses, 4);

    drop(pipeline);
    let (_, rows) = read_output(&config);
    assert_eq!(rows.len(), 5);
}

#[tokio::test]
async fn test_full_detail_frontier_drops_are_counted() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, &server.uri(), "");
    config.frontier.detail.capacity = 2;

    let pipeline = Pipeline::new(config).unwrap();
    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.details, 2);
    assert_eq!(summary.dropped, 2);
    assert_eq!(summary.details + summary.dropped, 4);
}

#[tokio::test]
async fn test_disallowed_site_makes_no_requests() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, &server.uri(), "");
    config.site.allowed_domains = vec!["lianjia.com".to_string()];

    let pipeline = Pipeline::new(config.clone()).unwrap();
    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.areas, 0);
    assert_eq!(summary.houses, 0);
    assert!(server.received_requests().await.unwrap().is_empty());

    drop(pipeline);
    let (_, rows) = read_output(&config);
    assert_eq!(rows.len(), 1, "only the header is written");
}

#[tokio::test]
async fn test_unopenable_output_is_fatal_before_crawling() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, &server.uri(), "");
    // A directory cannot be opened as the output file
    config.output.csv_path = dir.path().display().to_string();

    let result = Pipeline::new(config);
    assert!(matches!(result, Err(HarvestError::Io(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}
