//! robots.txt policy for one host

use robotstxt::DefaultMatcher;
use std::time::Duration;
use url::Url;

/// The robots.txt rules that apply to this crawler on one host
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    /// Raw robots.txt body; `None` allows everything
    body: Option<String>,

    /// Product token matched against `User-agent` lines
    agent: String,
}

impl RobotsPolicy {
    pub fn parse(body: &str, agent: &str) -> Self {
        Self {
            body: Some(body.to_string()),
            agent: agent.to_string(),
        }
    }

    /// A policy that allows every URL, used when robots.txt is unavailable
    pub fn allow_all(agent: &str) -> Self {
        Self {
            body: None,
            agent: agent.to_string(),
        }
    }

    pub fn allows(&self, url: &Url) -> bool {
        match self.body.as_deref() {
            None | Some("") => true,
            Some(body) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(body, &self.agent, url.as_str())
            }
        }
    }

    /// `Crawl-delay` of the group that applies to this agent
    ///
    /// A group naming the agent wins over the `*` group.
    pub fn crawl_delay(&self) -> Option<Duration> {
        let body = self.body.as_deref()?;
        let agent = self.agent.to_lowercase();

        let mut group: Vec<String> = Vec::new();
        let mut in_rules = false;
        let mut specific = None;
        let mut wildcard = None;

        for line in body.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_lowercase().as_str() {
                "user-agent" => {
                    if in_rules {
                        group.clear();
                        in_rules = false;
                    }
                    group.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    in_rules = true;
                    let Ok(seconds) = value.parse::<f64>() else {
                        continue;
                    };
                    if seconds < 0.0 || !seconds.is_finite() {
                        continue;
                    }
                    let delay = Duration::from_secs_f64(seconds);
                    if group.iter().any(|ua| ua != "*" && agent.contains(ua.as_str())) {
                        specific = Some(delay);
                    } else if group.iter().any(|ua| ua == "*") {
                        wildcard = Some(delay);
                    }
                }
                _ => in_rules = true,
            }
        }

        specific.or(wildcard)
    }
}
