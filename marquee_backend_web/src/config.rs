// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page configuration from `data-*` attributes.
//!
//! ```html
//! <div id="movies-container"
//!      data-readiness-timeout-ms="5000"
//!      data-notice-dismiss-ms="4000"
//!      data-api-base="/media/api"></div>
//! ```

use alloc::borrow::Cow;
use alloc::string::String;

use marquee_core::config::PageConfig;
use web_sys::HtmlElement;

/// Reads overrides from `element`'s dataset on top of [`PageConfig::web`].
#[must_use]
pub fn config_from_element(element: &HtmlElement) -> PageConfig {
    let dataset = element.dataset();
    overlay_config(PageConfig::web(), |key| dataset.get(key))
}

/// Applies the overrides `lookup` returns, keyed by dataset name
/// (`readinessTimeoutMs`, `noticeDismissMs`, `apiBase`).
///
/// Values that do not parse are ignored.
#[must_use]
pub fn overlay_config(mut config: PageConfig, lookup: impl Fn(&str) -> Option<String>) -> PageConfig {
    let millis = |key: &str| lookup(key).and_then(|value| value.trim().parse::<u32>().ok());

    if let Some(ms) = millis("readinessTimeoutMs") {
        config.readiness_timeout_ms = ms;
    }
    if let Some(ms) = millis("noticeDismissMs") {
        config.notice_dismiss_ms = ms;
    }
    if let Some(base) = lookup("apiBase") {
        let base = base.trim().trim_end_matches('/');
        if !base.is_empty() {
            config.api_base = Cow::Owned(base.into());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| String::from(*v))
        }
    }

    #[test]
    fn no_attributes_keeps_defaults() {
        assert_eq!(overlay_config(PageConfig::web(), lookup(&[])), PageConfig::web());
    }

    #[test]
    fn overrides_apply() {
        let config = overlay_config(
            PageConfig::web(),
            lookup(&[
                ("readinessTimeoutMs", "5000"),
                ("noticeDismissMs", " 4000 "),
                ("apiBase", "/media/api/"),
            ]),
        );
        assert_eq!(config.readiness_timeout_ms, 5_000);
        assert_eq!(config.notice_dismiss_ms, 4_000);
        assert_eq!(config.movies_url(), "/media/api/movies");
    }

    #[test]
    fn bad_values_are_ignored() {
        let config = overlay_config(
            PageConfig::web(),
            lookup(&[("readinessTimeoutMs", "soon"), ("apiBase", "  ")]),
        );
        assert_eq!(config.readiness_timeout_ms, 3_000);
        assert_eq!(config.api_base, "/api");
    }
}
