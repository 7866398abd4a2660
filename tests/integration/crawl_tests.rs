//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small catalog and run the full crawl
//! cycle end-to-end: seeds, listing, detail pages and both review branches.

use game_crawler::config::{CatalogConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use game_crawler::crawler::{process_document, Coordinator};
use game_crawler::output::{MemorySink, GAMES_FILE, REVIEWS_FILE};
use game_crawler::storage::{RunStatus, SqliteStorage, Storage};
use game_crawler::{CrawlMode, EntryKind, FrontierEntry, GameRecord, Record, ReviewRecord, ReviewType};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = include_str!("../fixtures/listing.html");
const DETAIL_FULL: &str = include_str!("../fixtures/detail_full.html");
const DETAIL_NO_USER_REVIEWS: &str = include_str!("../fixtures/detail_no_user_reviews.html");
const DETAIL_BARE: &str = include_str!("../fixtures/detail_bare.html");
const CRITIC_REVIEWS: &str = include_str!("../fixtures/critic_reviews.html");
const CRITIC_REVIEWS_PAGE2: &str = include_str!("../fixtures/critic_reviews_page2.html");
const CRITIC_REVIEWS_MINIMAL: &str = include_str!("../fixtures/critic_reviews_minimal.html");
const USER_REVIEWS: &str = include_str!("../fixtures/user_reviews.html");

/// Creates a test configuration pointed at the mock server
fn create_test_config(server_uri: &str, db_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_pages_open: 4,
            minimum_time_on_page: 0,
            max_retries: 0,
            retry_delay: 0,
            request_timeout: 5,
            respect_robots: false,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        catalog: CatalogConfig {
            base_url: format!("{}/browse/games/title/", server_uri),
            platforms: vec!["ps4".to_string()],
            allowed_domains: vec!["127.0.0.1".to_string()],
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
            jsonl_dir: None,
            error_log: None,
        },
    }
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html"))
        .mount(server)
        .await;
}

/// Serves the catalog; every other seed letter falls through to 404
async fn mount_catalog(server: &MockServer) {
    mount_html(server, "/browse/games/title/ps4/", LISTING).await;
    mount_html(server, "/game/ps4/alpha-strike", DETAIL_FULL).await;
    mount_html(server, "/game/ps4/beta-quest", DETAIL_NO_USER_REVIEWS).await;
    mount_html(server, "/game/ps4/gamma-run", DETAIL_BARE).await;
    mount_html(server, "/game/ps4/alpha-strike/critic-reviews", CRITIC_REVIEWS).await;
    mount_html(server, "/game/ps4/alpha-strike/critic-reviews/2", CRITIC_REVIEWS_PAGE2).await;
    mount_html(server, "/game/ps4/alpha-strike/user-reviews", USER_REVIEWS).await;
    mount_html(server, "/game/ps4/beta-quest/critic-reviews", CRITIC_REVIEWS_MINIMAL).await;
}

async fn crawl_with_memory_sink(config: Config, mode: CrawlMode) -> Vec<Record> {
    let sink = MemorySink::new();
    let records = sink.handle();

    let mut coordinator = Coordinator::with_sinks(config, mode, vec![Box::new(sink)]).unwrap();
    assert_eq!(coordinator.seed().unwrap(), 27);
    let report = coordinator.run().await.unwrap();
    assert!(!report.cancelled);

    take_records(&records)
}

fn take_records(records: &Arc<Mutex<Vec<Record>>>) -> Vec<Record> {
    std::mem::take(&mut *records.lock().unwrap())
}

fn games(records: &[Record]) -> Vec<&GameRecord> {
    let mut games: Vec<&GameRecord> = records
        .iter()
        .filter_map(|r| match r {
            Record::Game(game) => Some(game),
            _ => None,
        })
        .collect();
    games.sort_by(|a, b| a.title_safe.cmp(&b.title_safe));
    games
}

fn reviews<'a>(records: &'a [Record], slug: &str, review_type: ReviewType) -> Vec<&'a ReviewRecord> {
    records
        .iter()
        .filter_map(|r| match r {
            Record::Review(review) => Some(review),
            _ => None,
        })
        .filter(|r| r.title_safe == slug && r.reviewer_type == review_type)
        .collect()
}

#[test]
fn test_listing_without_pagination_yields_only_details() {
    let page_url = Url::parse("http://www.example.com/browse/games/title/ps4/").unwrap();
    let entry = FrontierEntry::listing(page_url.clone());

    let outcome = process_document(&entry, &page_url, LISTING, CrawlMode::Full);

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.entries.len(), 3);
    assert!(outcome.entries.iter().all(|e| e.kind() == EntryKind::Detail));
    let paths: Vec<&str> = outcome.entries.iter().map(|e| e.url().path()).collect();
    assert_eq!(
        paths,
        vec!["/game/ps4/alpha-strike", "/game/ps4/beta-quest", "/game/ps4/gamma-run"]
    );
}

#[test]
fn test_detail_without_user_link_follows_critic_only() {
    let page_url = Url::parse("http://www.example.com/game/ps4/beta-quest").unwrap();
    let entry = FrontierEntry::detail(page_url.clone());

    let outcome = process_document(&entry, &page_url, DETAIL_NO_USER_REVIEWS, CrawlMode::Full);

    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.entries[0].review_type(), Some(ReviewType::Critic));
    assert_eq!(outcome.entries[0].context().unwrap().game_slug, "beta-quest");
}

#[tokio::test]
async fn test_full_crawl_emits_games_and_reviews() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("unused.db");
    let config = create_test_config(&server.uri(), db_path.to_str().unwrap());

    let records = crawl_with_memory_sink(config, CrawlMode::Full).await;

    let games = games(&records);
    assert_eq!(games.len(), 3);

    let alpha = games[0];
    assert_eq!(alpha.title, "Alpha Strike");
    assert_eq!(alpha.title_safe, "alpha-strike");
    assert_eq!(alpha.platform, "ps4");
    assert_eq!(alpha.publisher, "Northwind|Southwind");
    assert_eq!(alpha.developer, "Studio One|Studio Two");
    assert_eq!(alpha.release_date, "Mar 3, 2017");
    assert_eq!(alpha.score_metacritic, "84");
    assert_eq!(alpha.score_users, "8.2");
    assert_eq!(alpha.summary, "A tactical shooter set in Zurich.");
    assert_eq!(alpha.rating, "T");
    assert_eq!(alpha.genres, "Action|Tactical");

    let gamma = games[2];
    assert_eq!(gamma.title, "Gamma Run");
    assert_eq!(gamma.score_metacritic, "tbd");
    assert_eq!(gamma.score_users, "tbd");
    assert_eq!(gamma.publisher, "");

    // Critic reviews span two pages; the second page's source has no anchor
    let alpha_critic = reviews(&records, "alpha-strike", ReviewType::Critic);
    let mut critics: Vec<&str> = alpha_critic.iter().map(|r| r.reviewer.as_str()).collect();
    critics.sort();
    assert_eq!(critics, vec!["", "The Daily Gamer"]);

    let alpha_user = reviews(&records, "alpha-strike", ReviewType::User);
    assert_eq!(alpha_user.len(), 2);
    assert_eq!(alpha_user[0].reviewer, "kai");
    assert_eq!(alpha_user[0].review, "Loved it. Would play again.");
    assert_eq!(alpha_user[1].review, "Too hard.");
    assert!(alpha_user.iter().all(|r| r.review_url.is_empty()));

    assert!(reviews(&records, "beta-quest", ReviewType::User).is_empty());

    let beta_critic = reviews(&records, "beta-quest", ReviewType::Critic);
    assert_eq!(beta_critic.len(), 1);
    let review = beta_critic[0];
    assert_eq!(review.score, "80");
    assert_eq!(review.review_date, "Jan 1, 2020");
    assert_eq!(review.reviewer, "Jane Doe");
    assert_eq!(review.review, "Great game.");
    assert_eq!(review.review_url, "");
    assert_eq!(review.title, "Beta Quest");
    assert_eq!(review.platform, "ps4");

    assert!(reviews(&records, "gamma-run", ReviewType::Critic).is_empty());
}

#[tokio::test]
async fn test_game_info_mode_skips_reviews() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("unused.db");
    let config = create_test_config(&server.uri(), db_path.to_str().unwrap());

    let records = crawl_with_memory_sink(config, CrawlMode::GameInfo).await;

    assert_eq!(games(&records).len(), 3);
    assert!(records.iter().all(|r| matches!(r, Record::Game(_))));
}

#[tokio::test]
async fn test_game_reviews_mode_skips_games() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("unused.db");
    let config = create_test_config(&server.uri(), db_path.to_str().unwrap());

    let records = crawl_with_memory_sink(config, CrawlMode::GameReviews).await;

    assert!(games(&records).is_empty());
    assert_eq!(records.len(), 5);
}

#[tokio::test]
async fn test_robots_disallow_skips_pages() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "User-agent: *\nDisallow: /game/ps4/beta-quest\n",
        ))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("unused.db");
    let mut config = create_test_config(&server.uri(), db_path.to_str().unwrap());
    config.crawler.respect_robots = true;

    let sink = MemorySink::new();
    let handle = sink.handle();
    let mut coordinator =
        Coordinator::with_sinks(config, CrawlMode::Full, vec![Box::new(sink)]).unwrap();
    coordinator.seed().unwrap();
    let report = coordinator.run().await.unwrap();
    let records = take_records(&handle);

    let slugs: Vec<&str> = games(&records).iter().map(|g| g.title_safe.as_str()).collect();
    assert_eq!(slugs, vec!["alpha-strike", "gamma-run"]);
    assert!(reviews(&records, "beta-quest", ReviewType::Critic).is_empty());
    assert_eq!(report.pages_disallowed, 1);
}

#[tokio::test]
async fn test_crawl_persists_run_records_and_failures() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("games.db");
    let jsonl_dir = temp_dir.path().join("out");
    let mut config = create_test_config(&server.uri(), db_path.to_str().unwrap());
    config.output.jsonl_dir = Some(jsonl_dir.to_str().unwrap().to_string());

    let mut coordinator = Coordinator::new(config, "test-hash", CrawlMode::Full).unwrap();
    coordinator.seed().unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.games, 3);
    assert_eq!(report.reviews, 5);
    // The 26 letter seeds are not served
    assert_eq!(report.pages_failed, 26);

    let storage = SqliteStorage::new(&db_path).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.mode, "full");
    assert_eq!(run.config_hash, "test-hash");
    assert!(run.finished_at.is_some());

    assert_eq!(storage.count_games().unwrap(), 3);
    assert_eq!(storage.count_reviews(ReviewType::Critic).unwrap(), 3);
    assert_eq!(storage.count_reviews(ReviewType::User).unwrap(), 2);
    assert_eq!(storage.count_failures(run.id).unwrap(), 26);

    let games_jsonl = std::fs::read_to_string(jsonl_dir.join(GAMES_FILE)).unwrap();
    assert_eq!(games_jsonl.lines().count(), 3);
    let reviews_jsonl = std::fs::read_to_string(jsonl_dir.join(REVIEWS_FILE)).unwrap();
    assert_eq!(reviews_jsonl.lines().count(), 5);
}

#[tokio::test]
async fn test_recrawl_is_idempotent_in_storage() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("games.db");

    for _ in 0..2 {
        let config = create_test_config(&server.uri(), db_path.to_str().unwrap());
        let mut coordinator = Coordinator::new(config, "test-hash", CrawlMode::Full).unwrap();
        coordinator.seed().unwrap();
        coordinator.run().await.unwrap();
    }

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_games().unwrap(), 3);
    assert_eq!(storage.count_reviews(ReviewType::Critic).unwrap(), 3);
    assert_eq!(storage.count_reviews(ReviewType::User).unwrap(), 2);
}

#[tokio::test]
async fn test_cancel_drains_in_flight_pages() {
    let server = MockServer::start().await;
    for (route, body) in [
        ("/game/ps4/alpha-strike", DETAIL_FULL),
        ("/game/ps4/beta-quest", DETAIL_NO_USER_REVIEWS),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(body.as_bytes().to_vec(), "text/html")
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;
    }

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("unused.db");
    let mut config = create_test_config(&server.uri(), db_path.to_str().unwrap());
    config.crawler.max_concurrent_pages_open = 1;

    let sink = MemorySink::new();
    let handle = sink.handle();
    let mut coordinator =
        Coordinator::with_sinks(config, CrawlMode::GameInfo, vec![Box::new(sink)]).unwrap();
    let detail = |slug: &str| {
        FrontierEntry::detail(Url::parse(&format!("{}/game/ps4/{}", server.uri(), slug)).unwrap())
    };
    assert_eq!(coordinator.enqueue(vec![detail("alpha-strike"), detail("beta-quest")]), 2);

    let token = coordinator.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    let report = coordinator.run().await.unwrap();

    // The page in flight at cancellation still completes and emits its record
    assert!(report.cancelled);
    assert_eq!(report.pages_fetched, 1);
    let records = take_records(&handle);
    let slugs: Vec<&str> = games(&records).iter().map(|g| g.title_safe.as_str()).collect();
    assert_eq!(slugs, vec!["alpha-strike"]);

    // Nothing new is scheduled after cancellation
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/game/ps4/beta-quest"));
}
