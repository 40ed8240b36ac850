use axum::http::Uri;
use url::Url;

// Base for parsing request URLs that arrive without a scheme or host. Only
// the query string is read back out, so the origin itself never matters.
const LOCAL_ORIGIN: &str = "http://localhost:3000";

/// Query parameters recovered from an inbound request.
///
/// A request may hand us pre-parsed pairs or only a raw URL, and the raw URL
/// may be absolute or relative. Extraction never fails: unparseable input
/// yields an empty set.
#[derive(Debug, Clone)]
pub enum RequestQuery {
    Parsed(Vec<(String, String)>),
    RawUrl(String),
}

impl RequestQuery {
    pub fn from_uri(uri: &Uri) -> Self {
        RequestQuery::RawUrl(uri.to_string())
    }

    pub fn pairs(&self) -> Vec<(String, String)> {
        match self {
            RequestQuery::Parsed(pairs) => pairs.clone(),
            RequestQuery::RawUrl(raw) => parse_raw(raw),
        }
    }

    /// First value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<String> {
        self.pairs()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

fn parse_raw(raw: &str) -> Vec<(String, String)> {
    let url = match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(_) => Url::parse(LOCAL_ORIGIN)
            .ok()
            .and_then(|origin| origin.join(raw).ok()),
    };

    match url {
        Some(url) => url.query_pairs().into_owned().collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url() {
        let query = RequestQuery::RawUrl("http://example.com/api/quotes?zip=90210".into());
        assert_eq!(query.get("zip").as_deref(), Some("90210"));
    }

    #[test]
    fn relative_url() {
        let query = RequestQuery::RawUrl("/api/blogs?page=2&page_size=5".into());
        assert_eq!(
            query.pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn unparseable_url_yields_empty_set() {
        let query = RequestQuery::RawUrl("http://[broken".into());
        assert!(query.pairs().is_empty());
        assert_eq!(query.get("zip"), None);
    }

    #[test]
    fn no_query_string() {
        let query = RequestQuery::RawUrl("/api/homepage".into());
        assert!(query.pairs().is_empty());
    }

    #[test]
    fn pre_parsed_pairs_used_directly() {
        let query = RequestQuery::Parsed(vec![("type".into(), "state".into())]);
        assert_eq!(query.get("type").as_deref(), Some("state"));
    }

    #[test]
    fn from_axum_uri() {
        let uri: Uri = "/api/categories?type=city".parse().unwrap();
        let query = RequestQuery::from_uri(&uri);
        assert_eq!(query.get("type").as_deref(), Some("city"));
    }
}
