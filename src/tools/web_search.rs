use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::config::HarvestConfig;
use super::errors::{ScoutError, ScoutResult};
use crate::api_models::Entity;

/// Links into the search provider's own properties.
///
/// Matched with `starts_with`, so any TLD of a listed stem is excluded.
pub const BLOCKED_PREFIXES: &[&str] = &[
    "https://www.google.",
    "https://google.",
    "https://webcache.googleusercontent.",
    "http://webcache.googleusercontent.",
    "https://policies.google.",
    "https://support.google.",
    "https://maps.google.",
    "https://translate.google.com",
];

lazy_static::lazy_static! {
    static ref ANCHOR_SELECTOR: Selector =
        Selector::parse("a[href]").expect("anchor selector parses");
}

/// Anything that can turn a name/address pair into a list of candidate links
#[async_trait]
pub trait LinkSource: Send + Sync {
    async fn search_links(&self, name: &str, address: &str) -> ScoutResult<Vec<String>>;
}

/// `"{name} {address}"`, trimmed so an empty field adds nothing.
pub fn build_query(name: &str, address: &str) -> String {
    format!("{} {}", name, address).trim().to_string()
}

pub fn is_blocked(url: &str) -> bool {
    BLOCKED_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// Drop search-provider links, keeping everything else in page order.
pub fn filter_blocked(links: Vec<String>) -> Vec<String> {
    links.into_iter().filter(|url| !is_blocked(url)).collect()
}

/// Every `<a href>` on the page as an absolute http(s) URL.
///
/// Absolute hrefs are kept exactly as written; only relative ones are
/// resolved against `base`. Duplicates are kept.
pub fn extract_absolute_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let links = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| absolute_link(href.trim(), base))
        .collect();
    links
}

fn absolute_link(href: &str, base: &Url) -> Option<String> {
    match Url::parse(href) {
        Ok(url) if is_web_scheme(&url) => Some(href.to_string()),
        Ok(_) => None,
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .join(href)
            .ok()
            .filter(is_web_scheme)
            .map(|url| url.to_string()),
        Err(_) => None,
    }
}

fn is_web_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Run the three lookups for one entity and pool the results.
///
/// Name-only, address-only, then combined. Each query finishes before the
/// next one starts.
pub async fn harvest_entity(source: &dyn LinkSource, entity: &Entity) -> ScoutResult<Vec<String>> {
    let mut links = source.search_links(&entity.name, "").await?;
    links.extend(source.search_links("", &entity.address).await?);
    links.extend(source.search_links(&entity.name, &entity.address).await?);
    Ok(links)
}

/// Search-engine backed link harvester
pub struct SearchHarvester {
    client: Client,
    config: Arc<HarvestConfig>,
}

impl SearchHarvester {
    pub fn new(config: HarvestConfig) -> ScoutResult<Self> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ScoutError::invalid_config("http client", e.to_string()))?;

        // Fail at startup rather than on the first entity.
        Url::parse(&config.search_url)
            .map_err(|e| ScoutError::invalid_config("search_url", e.to_string()))?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Search endpoint with the query form-encoded into `q`.
    pub fn query_url(&self, query: &str) -> ScoutResult<Url> {
        Url::parse_with_params(&self.config.search_url, &[("q", query)])
            .map_err(|e| ScoutError::invalid_config("search_url", e.to_string()))
    }

    async fn fetch_links(&self, query: &str) -> ScoutResult<Vec<String>> {
        let url = self.query_url(query)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScoutError::network(url.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::http_status(url.to_string(), status));
        }

        let base = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| ScoutError::network(url.to_string(), e))?;

        Ok(extract_absolute_links(&html, &base))
    }
}

#[async_trait]
impl LinkSource for SearchHarvester {
    async fn search_links(&self, name: &str, address: &str) -> ScoutResult<Vec<String>> {
        let query = build_query(name, address);
        let links = filter_blocked(self.fetch_links(&query).await?);
        log::debug!("{} candidate links for query {:?}", links.len(), query);
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn query_skips_empty_fields() {
        assert_eq!(build_query("Acme Corp", ""), "Acme Corp");
        assert_eq!(build_query("", "123 Main St"), "123 Main St");
        assert_eq!(build_query("Acme Corp", "123 Main St"), "Acme Corp 123 Main St");
        assert_eq!(build_query("", ""), "");
    }

    #[test]
    fn query_is_form_encoded() {
        let harvester = SearchHarvester::new(HarvestConfig::default()).unwrap();
        let url = harvester.query_url("Acme & Co 5th Ave").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.google.com/search?q=Acme+%26+Co+5th+Ave"
        );
    }

    #[test]
    fn bad_search_url_fails_up_front() {
        let config = HarvestConfig {
            search_url: "not a url".to_string(),
            ..HarvestConfig::default()
        };
        assert!(matches!(
            SearchHarvester::new(config),
            Err(ScoutError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn blocked_prefixes_are_removed_and_the_rest_kept_verbatim() {
        let links = vec![
            "https://www.google.com/search?q=acme".to_string(),
            "https://acme.com/about".to_string(),
            "https://maps.google.de/place".to_string(),
            "http://webcache.googleusercontent.com/search?q=cache".to_string(),
            "https://acme.com/about".to_string(),
            "https://translate.google.com/translate?u=x".to_string(),
            "http://www.google.com/keep-plain-http".to_string(),
            "https://googleblog.example/".to_string(),
        ];
        let kept = filter_blocked(links.clone());

        for url in &kept {
            assert!(!BLOCKED_PREFIXES.iter().any(|p| url.starts_with(p)));
        }
        assert_eq!(
            kept,
            vec![
                "https://acme.com/about".to_string(),
                "https://acme.com/about".to_string(),
                "http://www.google.com/keep-plain-http".to_string(),
                "https://googleblog.example/".to_string(),
            ]
        );
    }

    #[test]
    fn links_are_made_absolute_in_page_order() {
        let base = Url::parse("https://www.google.com/search?q=acme").unwrap();
        let html = r#"
            <html><body>
              <a href="/url?q=https://acme.com/">redirect</a>
              <a href="https://acme.com/about">about</a>
              <a href="mailto:info@acme.com">mail</a>
              <a href="javascript:void(0)">js</a>
              <a>no href</a>
              <a href="https://acme.com/about">again</a>
            </body></html>
        "#;

        let links = extract_absolute_links(html, &base);
        assert_eq!(
            links,
            vec![
                "https://www.google.com/url?q=https://acme.com/".to_string(),
                "https://acme.com/about".to_string(),
                "https://acme.com/about".to_string(),
            ]
        );
    }

    #[test]
    fn absolute_links_keep_their_original_spelling() {
        let base = Url::parse("https://www.google.com/search?q=zurich").unwrap();
        let html = r#"
            <a href="https://zürich-versicherung.ch/de">Zürich</a>
            <a href="https://Acme.COM">Acme</a>
            <a href=" //cdn.example.org/a.js ">cdn</a>
        "#;

        let links = extract_absolute_links(html, &base);
        assert_eq!(
            links,
            vec![
                "https://zürich-versicherung.ch/de".to_string(),
                "https://Acme.COM".to_string(),
                "https://cdn.example.org/a.js".to_string(),
            ]
        );
        assert_eq!(
            crate::tools::select_best_url("Zürich Versicherung", &links),
            "https://zürich-versicherung.ch/"
        );
    }

    struct RecordingSource {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LinkSource for RecordingSource {
        async fn search_links(&self, name: &str, address: &str) -> ScoutResult<Vec<String>> {
            let query = build_query(name, address);
            self.queries.lock().unwrap().push(query.clone());
            Ok(vec![format!("https://{}.example/", query.len())])
        }
    }

    #[test]
    fn entity_harvest_runs_three_queries_in_order() {
        let source = RecordingSource {
            queries: Mutex::new(Vec::new()),
        };
        let entity = Entity::new("Acme Corp", "123 Main St");

        let links = tokio_test::block_on(harvest_entity(&source, &entity)).unwrap();

        assert_eq!(
            *source.queries.lock().unwrap(),
            vec!["Acme Corp", "123 Main St", "Acme Corp 123 Main St"]
        );
        assert_eq!(
            links,
            vec![
                "https://9.example/".to_string(),
                "https://11.example/".to_string(),
                "https://21.example/".to_string(),
            ]
        );
    }

    /// Serve `responses` one connection at a time; hand back the request lines.
    async fn serve(responses: Vec<String>) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut request_lines = Vec::new();
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                let request = String::from_utf8_lossy(&buf).to_string();
                request_lines.push(request.lines().next().unwrap_or_default().to_string());
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            request_lines
        });

        (format!("http://{}/search", addr), handle)
    }

    /// Talks to the loopback server directly, whatever proxy the environment sets.
    fn local_harvester(search_url: &str) -> SearchHarvester {
        SearchHarvester {
            client: Client::builder()
                .no_proxy()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap(),
            config: Arc::new(HarvestConfig {
                search_url: search_url.to_string(),
                ..HarvestConfig::default()
            }),
        }
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    #[tokio::test]
    async fn harvester_fetches_and_filters_a_result_page() {
        let body = r#"<a href="https://www.google.com/preferences">prefs</a>
                      <a href="https://acme.com/contact">Acme</a>
                      <a href="/local">local</a>"#;
        let (search_url, server) = serve(vec![http_response("200 OK", body)]).await;

        let harvester = local_harvester(&search_url);

        let links = harvester.search_links("Acme Corp", "").await.unwrap();
        let requests = server.await.unwrap();

        assert_eq!(requests, vec!["GET /search?q=Acme+Corp HTTP/1.1".to_string()]);
        let origin = search_url.trim_end_matches("/search");
        assert_eq!(
            links,
            vec![
                "https://acme.com/contact".to_string(),
                format!("{}/local", origin),
            ]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (search_url, server) =
            serve(vec![http_response("503 Service Unavailable", "")]).await;

        let harvester = local_harvester(&search_url);

        let err = harvester.search_links("Acme", "").await.unwrap_err();
        server.await.unwrap();
        assert!(matches!(err, ScoutError::HttpStatus { status: 503, .. }));
    }
}
