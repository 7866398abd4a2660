//! robots.txt handling
//!
//! robots.txt is fetched once per host at the start of the host's first
//! request. Any failure to obtain it results in an allow-all policy.

mod parser;

pub use parser::RobotsPolicy;

use reqwest::Client;
use url::Url;

/// Fetches and parses `robots.txt` for the origin of `url`
///
/// | Response | Policy |
/// |----------|--------|
/// | 2xx | parsed body |
/// | 4xx | allow all |
/// | 5xx, network error | allow all, logged |
pub async fn fetch_robots(client: &Client, url: &Url, agent: &str) -> RobotsPolicy {
    let robots_url = match url.join("/robots.txt") {
        Ok(robots_url) => robots_url,
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Cannot build robots.txt URL");
            return RobotsPolicy::allow_all(agent);
        }
    };

    let response = match client.get(robots_url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(url = %robots_url, error = %e, "robots.txt unreachable, allowing all");
            return RobotsPolicy::allow_all(agent);
        }
    };

    let status = response.status();
    if !status.is_success() {
        if status.is_server_error() {
            tracing::warn!(url = %robots_url, status = status.as_u16(), "robots.txt server error, allowing all");
        } else {
            tracing::debug!(url = %robots_url, status = status.as_u16(), "No robots.txt");
        }
        return RobotsPolicy::allow_all(agent);
    }

    match response.text().await {
        Ok(body) => {
            tracing::debug!(url = %robots_url, bytes = body.len(), "Fetched robots.txt");
            RobotsPolicy::parse(&body, agent)
        }
        Err(e) => {
            tracing::warn!(url = %robots_url, error = %e, "Failed to read robots.txt, allowing all");
            RobotsPolicy::allow_all(agent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_robots_parses_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"))
            .mount(&server)
            .await;

        let page = Url::parse(&format!("{}/game/pc/doom", server.uri())).unwrap();
        let policy = fetch_robots(&Client::new(), &page, "GameCrawler").await;

        assert!(policy.allows(&page));
        assert!(!policy.allows(&page.join("/private/x").unwrap()));
    }

    #[tokio::test]
    async fn test_missing_robots_allows_all() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let page = Url::parse(&format!("{}/private/x", server.uri())).unwrap();
        let policy = fetch_robots(&Client::new(), &page, "GameCrawler").await;
        assert!(policy.allows(&page));
    }
}
