use tracing::{debug, info};

use crate::link::{Link, QueryParam};

/// Decides whether a query parameter is a known tracker. Rules are
/// independent of one another; a parameter goes if any rule claims it.
pub trait ParamRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_tracking(&self, param: &QueryParam, link: &Link) -> bool;
}

/// `utm_*` campaign tags, on every host.
pub struct GoogleAnalytics;

impl ParamRule for GoogleAnalytics {
    fn name(&self) -> &'static str {
        "google-analytics"
    }

    fn is_tracking(&self, param: &QueryParam, _link: &Link) -> bool {
        param.name().starts_with("utm_")
    }
}

/// Mailing attribution tags added to links into aclu.org.
pub struct Aclu;

impl Aclu {
    const DOMAIN: &'static str = "aclu.org";
    const NAMES: [&'static str; 8] = [
        "initms_aff",
        "initms_chan",
        "initms",
        "af",
        "gs",
        "ms_aff",
        "ms_chan",
        "ms",
    ];
}

impl ParamRule for Aclu {
    fn name(&self) -> &'static str {
        "aclu"
    }

    fn is_tracking(&self, param: &QueryParam, link: &Link) -> bool {
        link.host_within(Self::DOMAIN) && Self::NAMES.contains(&param.name())
    }
}

/// The share-source `s` parameter on twitter.com. Only scoped to that host
/// since `s` means something else almost everywhere.
pub struct Twitter;

impl ParamRule for Twitter {
    fn name(&self) -> &'static str {
        "twitter"
    }

    fn is_tracking(&self, param: &QueryParam, link: &Link) -> bool {
        link.host_is("twitter.com") && param.name() == "s"
    }
}

pub struct ParamRemover {
    rules: Vec<Box<dyn ParamRule>>,
}

impl Default for ParamRemover {
    fn default() -> Self {
        Self::with_rules(vec![Box::new(GoogleAnalytics), Box::new(Aclu), Box::new(Twitter)])
    }
}

impl ParamRemover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Box<dyn ParamRule>>) -> Self {
        Self { rules }
    }

    fn is_tracking(&self, param: &QueryParam, link: &Link) -> bool {
        self.rules.iter().any(|rule| {
            let matched = rule.is_tracking(param, link);
            debug!(param = param.name(), rule = rule.name(), matched, "Checked query parameter");
            matched
        })
    }

    /// Drops every tracking parameter from `link`. A query left with no
    /// parameters is removed entirely rather than kept as a bare `?`.
    #[tracing::instrument(level = "debug", skip(self, link), fields(link = %link))]
    pub fn strip(&self, link: &Link) -> Link {
        if !link.has_query() {
            info!("URL has no query parameters");
            return link.clone();
        }

        let kept: Vec<QueryParam> = link
            .query()
            .into_iter()
            .filter(|param| !self.is_tracking(param, link))
            .collect();

        link.with_query(&kept)
    }
}
