use crate::error::{FetchError, GatewayError};
use http::StatusCode;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// HTTP client for the content API. Every call carries an explicit time
/// budget; the in-flight request is cancelled once it elapses. Failures are
/// returned as typed values and never thrown past this boundary.
pub struct ContentApi {
    client: reqwest::Client,
    base: Url,
    fallback_base: Option<Url>,
}

impl ContentApi {
    pub fn new(api_base: &str, fallback_api_base: Option<&str>) -> Result<Self, GatewayError> {
        Ok(ContentApi {
            client: reqwest::Client::new(),
            base: parse_base(api_base)?,
            fallback_base: fallback_api_base.map(parse_base).transpose()?,
        })
    }

    /// Resolves `path` against the configured base and appends the query
    /// pairs. Also used as the cache key for cached endpoints.
    pub fn url(&self, path: &str, query: &[(String, String)]) -> Url {
        resolve(&self.base, path, query)
    }

    /// Same as [`url`](Self::url) against the secondary base, when one is
    /// configured.
    pub fn fallback_url(&self, path: &str, query: &[(String, String)]) -> Option<Url> {
        self.fallback_base
            .as_ref()
            .map(|base| resolve(base, path, query))
    }

    /// Resolves `{prefix}{slug}/`, percent-encoding the slug as a single
    /// path segment.
    pub fn slug_url(&self, prefix: &str, slug: &str) -> Url {
        let mut url = self.url(prefix, &[]);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(slug).push("");
        }
        url
    }

    pub async fn get_json(&self, url: Url, timeout: Duration) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        response.json::<Value>().await.map_err(|err| {
            if err.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Decode(err.to_string())
            }
        })
    }

    /// Forwards a JSON body and reports only the response status; the
    /// contact endpoint is fire-and-forget about the response payload.
    pub async fn post_json(
        &self,
        url: &str,
        body: String,
        timeout: Duration,
    ) -> Result<StatusCode, FetchError> {
        let response = self
            .client
            .post(url)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(request_error)?;

        Ok(response.status())
    }
}

fn request_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err)
    }
}

// A trailing slash on the base keeps Url::join from replacing its last path
// segment when bases like https://host/cms are configured.
fn parse_base(base: &str) -> Result<Url, url::ParseError> {
    if base.ends_with('/') {
        Url::parse(base)
    } else {
        Url::parse(&format!("{base}/"))
    }
}

fn resolve(base: &Url, path: &str, query: &[(String, String)]) -> Url {
    let mut url = match base.join(path.trim_start_matches('/')) {
        Ok(joined) => joined,
        Err(_) => base.clone(),
    };
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> ContentApi {
        ContentApi::new("http://localhost:8000", Some("https://standby.example.com")).unwrap()
    }

    #[test]
    fn url_joins_path_and_query() {
        let url = api().url(
            "/api/categories/all/",
            &[("type".to_string(), "state guides".to_string())],
        );
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/categories/all/?type=state+guides"
        );
    }

    #[test]
    fn url_without_query_has_no_question_mark() {
        let url = api().url("/api/homepage/", &[]);
        assert_eq!(url.as_str(), "http://localhost:8000/api/homepage/");
    }

    #[test]
    fn base_with_subpath_is_preserved() {
        let api = ContentApi::new("https://host.example.com/cms", None).unwrap();
        let url = api.url("/api/main-pages/", &[]);
        assert_eq!(url.as_str(), "https://host.example.com/cms/api/main-pages/");
    }

    #[test]
    fn slug_url_percent_encodes_and_keeps_trailing_slash() {
        let url = api().slug_url("/api/blogs/", "saving on auto/home");
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/blogs/saving%20on%20auto%2Fhome/"
        );
    }

    #[test]
    fn fallback_url_uses_secondary_base() {
        let url = api()
            .fallback_url("/api/quotes/", &[("zip".to_string(), "90210".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "https://standby.example.com/api/quotes/?zip=90210");

        let api = ContentApi::new("http://localhost:8000", None).unwrap();
        assert!(api.fallback_url("/api/quotes/", &[]).is_none());
    }
}
