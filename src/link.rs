use std::fmt;

use thiserror::Error;
use url::{Position, Url};

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("The URL could not be parsed: {0}")]
    Parse(#[from] url::ParseError),
    #[error("The URL has an unsupported scheme `{0}`. (Only `http` and `https` are supported.)")]
    UnsupportedScheme(String),
    #[error("The URL does not have a hostname.")]
    MissingHostname,
    #[error("Could not build the final URL: {0}")]
    Unrenderable(url::ParseError),
}

/// A single `name[=value]` pair from a query string.
///
/// `name` and `value` are percent-decoded for matching. `raw` keeps the text
/// exactly as it appeared so that surviving parameters are written back
/// without being re-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    raw: String,
    name: String,
    value: Option<String>,
}

impl QueryParam {
    fn from_raw(raw: &str) -> Self {
        let (name, value) = match raw.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (raw, None),
        };

        Self {
            raw: raw.to_string(),
            name: percent_decode(name),
            value: value.map(percent_decode),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

fn percent_decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

/// An absolute URL as it flows through the pipeline.
///
/// Wraps [`Url`] and remembers whether the input had no path at all, so
/// `http://example.com` is rendered back without the `/` that `Url`
/// normalizes in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    url: Url,
    bare: bool,
}

impl Link {
    /// Parses any absolute URL, whatever its scheme. Revealed redirect
    /// destinations go through here, so they are not limited to `http`/`https`.
    pub fn parse(input: &str) -> Result<Self, LinkError> {
        let url = Url::parse(input)?;
        Ok(Self {
            url,
            bare: has_empty_path(input),
        })
    }

    /// Parses user input, accepting only `http`/`https` URLs with a host.
    pub fn parse_web(input: &str) -> Result<Self, LinkError> {
        let link = Self::parse(input)?;

        if !matches!(link.scheme(), "http" | "https") {
            return Err(LinkError::UnsupportedScheme(link.scheme().to_string()));
        }

        if link.host().map_or(true, str::is_empty) {
            return Err(LinkError::MissingHostname);
        }

        Ok(link)
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    pub fn host_is(&self, domain: &str) -> bool {
        self.host() == Some(domain)
    }

    /// True when the host is `domain` itself or one of its subdomains.
    pub fn host_within(&self, domain: &str) -> bool {
        self.host().is_some_and(|host| {
            host == domain
                || host
                    .strip_suffix(domain)
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Non-empty path segments, still percent-encoded.
    pub fn segments(&self) -> Vec<&str> {
        self.url
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments().get(index).copied()
    }

    pub fn has_query(&self) -> bool {
        self.url.query().is_some()
    }

    /// Query parameters in their original order. Names may repeat; empty
    /// pieces from `&&` or a trailing `&` are skipped.
    pub fn query(&self) -> Vec<QueryParam> {
        match self.url.query() {
            Some(query) => query
                .split('&')
                .filter(|raw| !raw.is_empty())
                .map(QueryParam::from_raw)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Decoded value of the first parameter called `name`.
    pub fn query_value(&self, name: &str) -> Option<String> {
        self.query()
            .into_iter()
            .find(|param| param.name() == name)
            .and_then(|param| param.value)
    }

    /// Returns a copy of this link with its query replaced by `params`.
    /// An empty list removes the query component altogether.
    pub fn with_query(&self, params: &[QueryParam]) -> Link {
        let mut url = self.url.clone();

        if params.is_empty() {
            url.set_query(None);
        } else {
            let query = params
                .iter()
                .map(QueryParam::raw)
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query));
        }

        Link {
            url,
            bare: self.bare,
        }
    }

    /// Canonical string form, checked to still parse as a URL.
    pub fn render(&self) -> Result<String, LinkError> {
        let rendered = self.to_string();
        Url::parse(&rendered).map_err(LinkError::Unrenderable)?;
        Ok(rendered)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bare && self.url.path() == "/" {
            write!(
                f,
                "{}{}",
                &self.url[..Position::BeforePath],
                &self.url[Position::AfterPath..]
            )
        } else {
            f.write_str(self.url.as_str())
        }
    }
}

fn has_empty_path(input: &str) -> bool {
    let Some((_, rest)) = input.trim().split_once("://") else {
        return false;
    };

    match rest.find(|c: char| matches!(c, '/' | '\\' | '?' | '#')) {
        Some(end) => !matches!(rest.as_bytes()[end], b'/' | b'\\'),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_round_trips_without_slash() {
        let link = Link::parse("http://example.com").unwrap();
        assert_eq!(link.to_string(), "http://example.com");

        let link = Link::parse("http://example.com?a=1").unwrap();
        assert_eq!(link.to_string(), "http://example.com?a=1");
    }

    #[test]
    fn test_explicit_root_path_is_kept() {
        let link = Link::parse("https://example.com/").unwrap();
        assert_eq!(link.to_string(), "https://example.com/");
    }

    #[test]
    fn test_query_keeps_order_duplicates_and_bare_names() {
        let link = Link::parse("https://example.com/p?a=1&flag&a=2&b=").unwrap();
        let query = link.query();

        let names: Vec<&str> = query.iter().map(QueryParam::name).collect();
        assert_eq!(names, ["a", "flag", "a", "b"]);
        assert_eq!(query[1].value(), None);
        assert_eq!(query[3].value(), Some(""));
        assert_eq!(link.query_value("a").as_deref(), Some("1"));
    }

    #[test]
    fn test_query_values_are_percent_decoded() {
        let link = Link::parse("https://x.test/?url=http%3A%2F%2Fexample.com").unwrap();
        assert_eq!(link.query_value("url").as_deref(), Some("http://example.com"));
    }

    #[test]
    fn test_with_query_preserves_raw_encoding() {
        let link = Link::parse("https://example.com/p?next=a%2Fb&drop=1").unwrap();
        let kept: Vec<QueryParam> = link
            .query()
            .into_iter()
            .filter(|param| param.name() != "drop")
            .collect();

        assert_eq!(link.with_query(&kept).to_string(), "https://example.com/p?next=a%2Fb");
        assert_eq!(link.with_query(&[]).to_string(), "https://example.com/p");
    }

    #[test]
    fn test_segments_skip_empty_parts() {
        let link = Link::parse("https://e.customeriomail.com/e/c/blob/id/").unwrap();
        assert_eq!(link.segments(), ["e", "c", "blob", "id"]);
        assert_eq!(link.segment(2), Some("blob"));
        assert_eq!(link.segment(9), None);
    }

    #[test]
    fn test_host_within_respects_label_boundary() {
        let link = Link::parse("https://www.google.com/url").unwrap();
        assert!(link.host_within("google.com"));
        assert!(!link.host_is("google.com"));

        let link = Link::parse("https://notgoogle.com/url").unwrap();
        assert!(!link.host_within("google.com"));
    }

    #[test]
    fn test_query_skips_empty_pieces() {
        let link = Link::parse("https://example.com/p?&a=1&&b=2&").unwrap();
        let names: Vec<String> = link.query().iter().map(|param| param.name().to_string()).collect();
        assert_eq!(names, ["a", "b"]);

        assert!(Link::parse("https://example.com/p?&&").unwrap().query().is_empty());
    }

    #[test]
    fn test_parse_web_rejects_other_schemes() {
        assert!(matches!(
            Link::parse_web("ftp://example.com"),
            Err(LinkError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
        assert!(matches!(Link::parse_web("not a url"), Err(LinkError::Parse(_))));
        assert!(Link::parse_web("https://example.com/page").is_ok());
    }
}
