//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test the full crawl cycle
//! end-to-end, plus an in-memory site for graph properties that must hold in both
//! execution modes.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use hive_crawl::config::{Config, CrawlMode, CrawlerConfig, OutputConfig, PoolConfig};
use hive_crawl::crawler::{
    crawl, crawl_seed, crawl_seed_serial, CrawlContext, CrawlLimits, HtmlExtractor, PageSource,
    SupervisorContext,
};
use hive_crawl::output::{OutputError, OutputResult, ReportSink};
use hive_crawl::{CrawlError, FinishedReport, Scope};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A site held in memory, keyed by absolute URL
#[derive(Default)]
struct MemorySite {
    pages: HashMap<String, String>,
}

impl MemorySite {
    fn page(mut self, url: &str, links: &[&str]) -> Self {
        let body: String = links
            .iter()
            .map(|l| format!(r#"<a href="{}">link</a>"#, l))
            .collect();
        self.pages
            .insert(url.to_string(), format!("<html><body><h1>{}</h1>{}</body></html>", url, body));
        self
    }
}

#[async_trait]
impl PageSource for MemorySite {
    async fn fetch(&self, url: &str) -> Option<String> {
        tokio::task::yield_now().await;
        self.pages.get(url).cloned()
    }
}

/// Keeps every persisted report in memory
#[derive(Default)]
struct MemorySink {
    reports: Mutex<Vec<FinishedReport>>,
}

impl MemorySink {
    fn reports(&self) -> Vec<FinishedReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl ReportSink for MemorySink {
    fn persist(&self, report: &FinishedReport, _: DateTime<Local>) -> OutputResult<String> {
        let mut reports = self.reports.lock().unwrap();
        reports.push(report.clone());
        Ok(format!("report_{}", reports.len()))
    }
}

/// Refuses to persist one seed's report and keeps the rest in memory
struct ReadOnlyFor {
    seed: &'static str,
    inner: MemorySink,
}

impl ReportSink for ReadOnlyFor {
    fn persist(&self, report: &FinishedReport, started: DateTime<Local>) -> OutputResult<String> {
        if report.seed == self.seed {
            return Err(OutputError::Write {
                path: "results/map.txt".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.inner.persist(report, started)
    }
}

/// Panics while fetching one URL, taking its fetcher task down with it
struct CrashingSite {
    site: MemorySite,
    crash_on: &'static str,
}

#[async_trait]
impl PageSource for CrashingSite {
    async fn fetch(&self, url: &str) -> Option<String> {
        if url == self.crash_on {
            panic!("fetcher crashed on {}", url);
        }
        self.site.fetch(url).await
    }
}

fn three_sites() -> MemorySite {
    MemorySite::default()
        .page("http://a.test/", &["/1"])
        .page("http://a.test/1", &[])
        .page("http://b.test/", &[])
        .page("http://c.test/", &[])
}

/// A tangle of pages under `http://a.test/` plus links leaving the scope
fn tangled_site() -> MemorySite {
    let mut site = MemorySite::default().page(
        "http://a.test/",
        &["/s0", "/s1", "/s2", "http://other.test/y", "mailto:x@a.test"],
    );
    for i in 0..3 {
        let children: Vec<String> = (0..4).map(|j| format!("/s{}/p{}", i, j)).collect();
        let mut links: Vec<&str> = children.iter().map(String::as_str).collect();
        links.push("/");
        site = site.page(&format!("http://a.test/s{}", i), &links);
        for j in 0..4 {
            site = site.page(
                &format!("http://a.test/s{}/p{}", i, j),
                &[
                    format!("/s{}", (i + 1) % 3).as_str(),
                    "#top",
                    // in scope by prefix, but the site has no such page
                    "http://a.test.example/z",
                ],
            );
        }
    }
    site
}

/// Root page linking to `count` leaf pages
fn wide_site(count: usize) -> MemorySite {
    let leaves: Vec<String> = (0..count).map(|i| format!("/leaf{}", i)).collect();
    let links: Vec<&str> = leaves.iter().map(String::as_str).collect();
    let mut site = MemorySite::default().page("http://a.test/", &links);
    for leaf in &leaves {
        site = site.page(&format!("http://a.test{}", leaf), &[]);
    }
    site
}

fn test_config(seeds: &[&str], mode: CrawlMode, n: usize, m: usize) -> Config {
    Config {
        seeds: seeds.iter().map(|s| s.to_string()).collect(),
        crawler: CrawlerConfig {
            mode,
            ..CrawlerConfig::default()
        },
        pool: PoolConfig {
            supervisors: n,
            fetchers_per_supervisor: m,
            workers: None,
        },
        ..Config::default()
    }
}

fn memory_context(site: MemorySite, sink: Arc<MemorySink>) -> CrawlContext {
    CrawlContext::new(Arc::new(site), Arc::new(HtmlExtractor), sink)
}

fn vertex_set(report: &FinishedReport) -> HashSet<String> {
    report.vertex_urls().into_iter().map(String::from).collect()
}

#[tokio::test]
async fn test_serial_and_distributed_visit_same_vertices() {
    let serial_sink = Arc::new(MemorySink::default());
    let config = test_config(&["http://a.test/"], CrawlMode::Serial, 1, 1);
    crawl(&config, memory_context(tangled_site(), serial_sink.clone()))
        .await
        .unwrap();
    let expected = vertex_set(&serial_sink.reports()[0]);
    assert_eq!(expected.len(), 16);

    for (n, m) in [(1, 1), (1, 4), (2, 3), (3, 2)] {
        let sink = Arc::new(MemorySink::default());
        let config = test_config(&["http://a.test/"], CrawlMode::Distributed, n, m);
        crawl(&config, memory_context(tangled_site(), sink.clone()))
            .await
            .unwrap();

        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(vertex_set(&reports[0]), expected, "N={}, M={}", n, m);
    }
}

#[tokio::test]
async fn test_report_has_unique_vertices_and_scoped_edges() {
    let sink = Arc::new(MemorySink::default());
    let config = test_config(&["http://a.test/"], CrawlMode::Distributed, 2, 4);
    crawl(&config, memory_context(tangled_site(), sink.clone()))
        .await
        .unwrap();

    let report = &sink.reports()[0];
    let vertices = report.vertex_urls();
    let unique: HashSet<_> = vertices.iter().collect();
    assert_eq!(unique.len(), vertices.len());

    let scope = Scope::for_seed("http://a.test/");
    let edges = report.edges();
    assert!(!edges.is_empty());
    for (source, target) in edges {
        assert!(scope.contains(target), "edge target {} out of scope", target);
        assert!(unique.contains(&source));
        assert!(unique.contains(&target));
    }
}

#[tokio::test]
async fn test_out_of_scope_links_are_never_visited() {
    let site = MemorySite::default()
        .page("http://a.test/", &["http://a.test/x", "http://other.test/y"])
        .page("http://a.test/x", &[])
        .page("http://other.test/y", &[]);
    let sink = Arc::new(MemorySink::default());
    let config = test_config(&["http://a.test/"], CrawlMode::Distributed, 1, 2);

    crawl(&config, memory_context(site, sink.clone())).await.unwrap();

    let report = &sink.reports()[0];
    assert_eq!(report.vertex_urls(), vec!["http://a.test/", "http://a.test/x"]);
    assert_eq!(report.edges(), vec![("http://a.test/", "http://a.test/x")]);
    assert!(!report.map.contains("other.test"));
}

#[tokio::test]
async fn test_same_seed_twice_yields_two_reports() {
    let tmp = TempDir::new().unwrap();
    let mut config = test_config(
        &["http://a.test/", "http://a.test/"],
        CrawlMode::Distributed,
        2,
        2,
    );
    config.output = OutputConfig {
        results_dir: tmp.path().display().to_string(),
        summary_path: None,
    };
    let sink = Arc::new(hive_crawl::output::FsReportSink::new(tmp.path()));
    let ctx = CrawlContext::new(Arc::new(tangled_site()), Arc::new(HtmlExtractor), sink);

    let report = crawl(&config, ctx).await.unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(report.failures(), 0);
    let dirs: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(dirs.len(), 2);
    assert_eq!(report.entries_for("http://a.test/").count(), 2);
}

#[tokio::test]
async fn test_zero_seeds_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let results = tmp.path().join("results");

    for mode in [CrawlMode::Serial, CrawlMode::Distributed] {
        let config = test_config(&[], mode, 3, 2);
        let sink = Arc::new(hive_crawl::output::FsReportSink::new(&results));
        let ctx = CrawlContext::new(Arc::new(tangled_site()), Arc::new(HtmlExtractor), sink);

        let report = crawl(&config, ctx).await.unwrap();

        assert!(report.is_empty());
        assert_eq!(report.to_html(), "<h2>No URLs to process</h2>");
        assert!(!results.exists());
    }
}

#[tokio::test]
async fn test_invalid_topology_is_rejected_before_crawling() {
    let sink = Arc::new(MemorySink::default());
    let config = test_config(&["http://a.test/"], CrawlMode::Distributed, 0, 2);

    let result = crawl(&config, memory_context(tangled_site(), sink.clone())).await;

    assert!(matches!(result, Err(CrawlError::Config(_))));
    assert!(sink.reports().is_empty());
}

#[tokio::test]
async fn test_many_seeds_across_supervisors() {
    let site = MemorySite::default()
        .page("http://a.test/", &["/1"])
        .page("http://a.test/1", &[])
        .page("http://b.test/", &[])
        .page("http://c.test/docs/", &["/docs/2", "/blog/3"])
        .page("http://c.test/docs/2", &[])
        .page("http://c.test/blog/3", &[]);
    let sink = Arc::new(MemorySink::default());
    let config = test_config(
        &["http://a.test/", "http://b.test/", "http://c.test/docs/", "http://down.test/"],
        CrawlMode::Distributed,
        3,
        2,
    );

    let summary = crawl(&config, memory_context(site, sink.clone())).await.unwrap();
    assert_eq!(summary.len(), 4);

    let by_seed: HashMap<String, FinishedReport> = sink
        .reports()
        .into_iter()
        .map(|r| (r.seed.clone(), r))
        .collect();
    assert_eq!(by_seed["http://a.test/"].vertices, 2);
    assert_eq!(by_seed["http://b.test/"].vertices, 1);
    assert_eq!(
        by_seed["http://c.test/docs/"].vertex_urls(),
        vec!["http://c.test/docs/", "http://c.test/docs/2"]
    );
    assert_eq!(by_seed["http://down.test/"].vertices, 0);
}

#[tokio::test]
async fn test_found_urls_capped_at_one_hundred() {
    let site = wide_site(150);
    let ctx = memory_context(site, Arc::new(MemorySink::default()));
    let limits = CrawlLimits {
        max_processed_pages: 1,
        ..CrawlLimits::default()
    };

    let report = crawl_seed_serial("http://a.test/", limits, &ctx).await;

    assert_eq!(report.vertices, 1);
    assert!(report.content.contains("LINKS 150"));

    let limits = CrawlLimits {
        max_processed_pages: 1000,
        ..CrawlLimits::default()
    };
    let report = crawl_seed_serial("http://a.test/", limits, &ctx).await;
    assert_eq!(report.vertices, 101);
    assert_eq!(report.edges().len(), 100);
}

#[tokio::test]
async fn test_processed_cap_drains_in_flight_results() {
    let fetchers = 4;
    let ctx = SupervisorContext {
        source: Arc::new(wide_site(300)),
        extractor: Arc::new(HtmlExtractor),
        limits: CrawlLimits {
            max_found_urls: 300,
            ..CrawlLimits::default()
        },
        fetchers,
    };

    let report = crawl_seed("http://a.test/", &ctx).await.unwrap();

    assert!(report.pages_crawled >= 100);
    assert!(report.pages_crawled < 100 + fetchers);
    assert_eq!(report.vertices, report.pages_crawled);
}

#[tokio::test]
async fn test_report_vertices_capped_at_one_thousand() {
    let limits = CrawlLimits {
        max_processed_pages: 2000,
        max_found_urls: 2000,
        ..CrawlLimits::default()
    };

    let serial_ctx = memory_context(wide_site(1000), Arc::new(MemorySink::default()));
    let serial = crawl_seed_serial("http://a.test/", limits, &serial_ctx).await;
    assert_eq!(serial.pages_crawled, 1001);
    assert_eq!(serial.vertices, 1000);
    assert_eq!(serial.vertex_urls().len(), 1000);

    let ctx = SupervisorContext {
        source: Arc::new(wide_site(1000)),
        extractor: Arc::new(HtmlExtractor),
        limits,
        fetchers: 8,
    };
    let distributed = crawl_seed("http://a.test/", &ctx).await.unwrap();
    assert_eq!(distributed.pages_crawled, 1001);
    assert_eq!(distributed.vertices, 1000);
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Mock index page with links
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    r#"<html><head><title>Home</title></head><body>
                    <h1>Welcome <em>home</em></h1>
                    <img src="/logo.png">
                    <a href="{}/page1">Page 1</a>
                    <a href="/page2">Page 2</a>
                    <a href="/missing">Missing</a>
                    <a href="https://elsewhere.test/">Elsewhere</a>
                    <form action="/search"></form>
                    </body></html>"#,
                    base_url
                ))
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><h2>One</h2><a href="/">Back</a></body></html>"#),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let tmp = TempDir::new().unwrap();
    let seed = format!("{}/", base_url);
    let mut config = test_config(&[seed.as_str()], CrawlMode::Distributed, 1, 2);
    config.output.results_dir = tmp.path().join("results").display().to_string();

    let ctx = CrawlContext::from_config(&config).unwrap();
    let summary = crawl(&config, ctx).await.unwrap();

    assert_eq!(summary.len(), 1);
    let entry = &summary.entries[0];
    let dir_name = entry.directory.clone().expect("report should be saved");
    assert!(summary.to_html().contains("Processed URL:"));

    let dir = tmp.path().join("results").join(&dir_name);
    let map = std::fs::read_to_string(dir.join("map.txt")).unwrap();
    let content = std::fs::read_to_string(dir.join("content.txt")).unwrap();
    let log = std::fs::read_to_string(dir.join("log.txt")).unwrap();

    // the 404 page is processed but never reported
    let vertices: HashSet<&str> = map.lines().take(3).collect();
    assert!(vertices.contains(seed.as_str()));
    assert!(vertices.contains(format!("{}/page1", base_url).as_str()));
    assert!(vertices.contains(format!("{}/page2", base_url).as_str()));
    assert!(!map.contains("/missing"));
    assert!(!map.contains("elsewhere.test"));
    assert!(map.contains(&format!("{} {}/page1", seed, base_url)));
    assert!(map.contains(&format!("{}/page1 {}", base_url, seed)));

    assert!(content.contains(&format!("{}\nIMAGES 1\nLINKS 4\nFORMS 1\n- Welcome home\n", seed)));
    assert!(content.contains("-- One"));

    assert!(log.ends_with("OK\n"));
}

#[tokio::test]
async fn test_write_failure_is_summarized_and_run_continues() {
    let seeds = ["http://a.test/", "http://b.test/", "http://c.test/"];

    for mode in [CrawlMode::Serial, CrawlMode::Distributed] {
        let sink = Arc::new(ReadOnlyFor {
            seed: "http://b.test/",
            inner: MemorySink::default(),
        });
        let ctx =
            CrawlContext::new(Arc::new(three_sites()), Arc::new(HtmlExtractor), sink.clone());
        let config = test_config(&seeds, mode, 2, 2);

        let summary = crawl(&config, ctx).await.unwrap();

        assert_eq!(summary.len(), 3);
        assert_eq!(summary.failures(), 1);
        let saved: HashSet<String> = sink.inner.reports().into_iter().map(|r| r.seed).collect();
        assert_eq!(
            saved,
            HashSet::from(["http://a.test/".to_string(), "http://c.test/".to_string()])
        );

        let html = summary.to_html();
        assert!(html.contains("<li>Failed URL: http://b.test/ - failed to save results:"));
        assert_eq!(html.matches("Processed URL:").count(), 2);
    }
}

#[tokio::test]
async fn test_crashed_seed_is_reported_as_failed() {
    let site = CrashingSite {
        site: three_sites(),
        crash_on: "http://a.test/1",
    };
    let sink = Arc::new(MemorySink::default());
    let ctx = CrawlContext::new(Arc::new(site), Arc::new(HtmlExtractor), sink.clone());
    // a single supervisor must keep serving the seeds queued after the crash
    let config = test_config(
        &["http://a.test/", "http://b.test/", "http://c.test/"],
        CrawlMode::Distributed,
        1,
        2,
    );

    let summary = crawl(&config, ctx).await.unwrap();

    assert_eq!(summary.len(), 3);
    assert_eq!(summary.failures(), 1);
    let failed: Vec<_> = summary.entries.iter().filter(|e| !e.is_saved()).collect();
    assert_eq!(failed[0].seed, "http://a.test/");

    let mut saved: Vec<String> = sink.reports().into_iter().map(|r| r.seed).collect();
    saved.sort();
    assert_eq!(saved, vec!["http://b.test/", "http://c.test/"]);
    assert!(summary.to_html().contains("<li>Failed URL: http://a.test/ - "));
}
