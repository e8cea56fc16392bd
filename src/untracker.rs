use crate::link::Link;
use crate::logging::Timer;
use crate::params::ParamRemover;
use crate::redirect::RedirectEngine;

/// Unwraps a redirector, then strips tracking parameters from whatever URL
/// that reveals. One reversal pass only: a destination that is itself a
/// wrapped link comes back still wrapped.
#[derive(Default)]
pub struct Untracker {
    redirects: RedirectEngine,
    params: ParamRemover,
}

impl Untracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(redirects: RedirectEngine, params: ParamRemover) -> Self {
        Self { redirects, params }
    }

    pub fn untrack(&self, link: &Link) -> Link {
        let _timer = Timer::new("untrack");
        let reversed = self.redirects.try_reverse(link);
        self.params.strip(&reversed)
    }
}
