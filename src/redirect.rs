use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::decode::{self, DecodeError};
use crate::link::{Link, LinkError};

#[derive(Debug, Error)]
pub enum ReversalError {
    #[error("query parameter `{0}` is missing")]
    MissingParam(&'static str),
    #[error("path segment {0} is missing")]
    MissingSegment(usize),
    #[error("destination URL is empty")]
    EmptyDestination,
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("destination is not a valid URL: {0}")]
    InvalidDestination(#[from] LinkError),
}

/// Recognizes one redirector's URL shape and recovers the destination it
/// wraps.
pub trait Reverser: Send + Sync {
    fn name(&self) -> &'static str;

    /// Shape check only. Must not fail on odd input.
    fn applies(&self, link: &Link) -> bool;

    fn destination(&self, link: &Link) -> Result<String, ReversalError>;
}

/// Unwraps redirector URLs using the first [`Reverser`] whose shape matches.
pub struct RedirectEngine {
    reversers: Vec<Box<dyn Reverser>>,
}

impl Default for RedirectEngine {
    fn default() -> Self {
        Self::with_reversers(vec![
            Box::new(OutlookSafelinks),
            Box::new(GoogleRedirect),
            Box::new(Mandrill),
            Box::new(CustomerIo),
            Box::new(AcluLink),
        ])
    }
}

impl RedirectEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reversers(reversers: Vec<Box<dyn Reverser>>) -> Self {
        Self { reversers }
    }

    /// Picks the reverser for `link`, if any. Registry order decides ties.
    pub fn find(&self, link: &Link) -> Option<&dyn Reverser> {
        self.reversers
            .iter()
            .map(|reverser| reverser.as_ref())
            .find(|reverser| reverser.applies(link))
    }

    /// Returns the unwrapped destination, or a copy of `link` when no
    /// reverser applies or the one that does fails to decode.
    #[tracing::instrument(level = "debug", skip(self, link), fields(link = %link))]
    pub fn try_reverse(&self, link: &Link) -> Link {
        let Some(reverser) = self.find(link) else {
            info!("No reverser for URL");
            return link.clone();
        };

        info!(reverser = reverser.name(), "Identified URL to reverse");

        match reverse_with(reverser, link) {
            Ok(destination) => {
                debug!(destination = %destination, "Reversed URL");
                destination
            }
            Err(e) => {
                warn!(reverser = reverser.name(), error = %e, "Could not reverse URL");
                link.clone()
            }
        }
    }
}

fn reverse_with(reverser: &dyn Reverser, link: &Link) -> Result<Link, ReversalError> {
    let destination = reverser.destination(link)?;
    if destination.is_empty() {
        return Err(ReversalError::EmptyDestination);
    }
    Ok(Link::parse(&destination)?)
}

fn required_param(link: &Link, name: &'static str) -> Result<String, ReversalError> {
    link.query_value(name).ok_or(ReversalError::MissingParam(name))
}

fn required_segment(link: &Link, index: usize) -> Result<&str, ReversalError> {
    link.segment(index).ok_or(ReversalError::MissingSegment(index))
}

/// Outlook Safe Links: `https://<dc>.safelinks.protection.outlook.com/?url=<destination>&...`
pub struct OutlookSafelinks;

impl OutlookSafelinks {
    const DOMAIN: &'static str = "safelinks.protection.outlook.com";
    const PARAM: &'static str = "url";
}

impl Reverser for OutlookSafelinks {
    fn name(&self) -> &'static str {
        "outlook-safelinks"
    }

    fn applies(&self, link: &Link) -> bool {
        link.host_within(Self::DOMAIN)
            && link
                .query_value(Self::PARAM)
                .is_some_and(|url| !url.is_empty())
    }

    fn destination(&self, link: &Link) -> Result<String, ReversalError> {
        required_param(link, Self::PARAM)
    }
}

/// Google redirects: `https://www.google.com/url?q=<destination>&...`
pub struct GoogleRedirect;

impl GoogleRedirect {
    const DOMAIN: &'static str = "google.com";
    const PATH: &'static str = "/url";
    const PARAM: &'static str = "q";
}

impl Reverser for GoogleRedirect {
    fn name(&self) -> &'static str {
        "google-redirect"
    }

    fn applies(&self, link: &Link) -> bool {
        link.host_within(Self::DOMAIN) && link.path() == Self::PATH
    }

    fn destination(&self, link: &Link) -> Result<String, ReversalError> {
        required_param(link, Self::PARAM)
    }
}

/// Mandrill click tracking:
/// `https://mandrillapp.com/track/click/<id>/<host>?p=<base64url JSON>`
///
/// The blob decodes to `{"p": "<JSON string>"}` and that inner string is
/// itself a JSON object carrying `url`.
pub struct Mandrill;

impl Mandrill {
    const DOMAIN: &'static str = "mandrillapp.com";
    const PATH_PREFIX: &'static str = "/track/click";
    const PARAM: &'static str = "p";
}

#[derive(Deserialize)]
struct MandrillEnvelope {
    p: String,
}

#[derive(Deserialize)]
struct MandrillPayload {
    url: String,
}

impl Reverser for Mandrill {
    fn name(&self) -> &'static str {
        "mandrill"
    }

    fn applies(&self, link: &Link) -> bool {
        link.host_within(Self::DOMAIN) && link.path().starts_with(Self::PATH_PREFIX)
    }

    fn destination(&self, link: &Link) -> Result<String, ReversalError> {
        let blob = decode::base64url(&required_param(link, Self::PARAM)?)?;
        let envelope: MandrillEnvelope = decode::json(&blob)?;
        let payload: MandrillPayload = decode::json(envelope.p.as_bytes())?;
        Ok(payload.url)
    }
}

/// Customer.io click tracking: `https://e.customeriomail.com/e/c/<base64url JSON>/<id>`
/// where the JSON carries the destination in `href`.
pub struct CustomerIo;

impl CustomerIo {
    const DOMAIN: &'static str = "customeriomail.com";
    const PATH_PREFIX: &'static str = "/e/c";
    const BLOB_SEGMENT: usize = 2;
}

#[derive(Deserialize)]
struct CustomerIoBlob {
    href: String,
}

impl Reverser for CustomerIo {
    fn name(&self) -> &'static str {
        "customer-io"
    }

    fn applies(&self, link: &Link) -> bool {
        link.host_within(Self::DOMAIN) && link.path().starts_with(Self::PATH_PREFIX)
    }

    fn destination(&self, link: &Link) -> Result<String, ReversalError> {
        let blob = decode::base64url(required_segment(link, Self::BLOB_SEGMENT)?)?;
        let blob: CustomerIoBlob = decode::json(&blob)?;
        Ok(blob.href)
    }
}

/// ACLU email links: `https://link.aclu.org/click/<id>/<base64url destination>/<id>`
pub struct AcluLink;

impl AcluLink {
    const HOST: &'static str = "link.aclu.org";
    const SEGMENTS: usize = 4;
    const DESTINATION_SEGMENT: usize = 2;
}

impl Reverser for AcluLink {
    fn name(&self) -> &'static str {
        "aclu-link"
    }

    fn applies(&self, link: &Link) -> bool {
        link.host_is(Self::HOST) && link.segments().len() == Self::SEGMENTS
    }

    fn destination(&self, link: &Link) -> Result<String, ReversalError> {
        let bytes = decode::base64url(required_segment(link, Self::DESTINATION_SEGMENT)?)?;
        Ok(decode::utf8(bytes)?)
    }
}
