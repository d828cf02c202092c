use crate::config::{Condition, Config, Route};

/// Selects a profile name for a URL from an ordered list of routes
///
/// Matching is case-insensitive on both sides and compares raw strings:
/// no scheme, host, slash or percent-encoding normalization is applied.
pub struct Router<'a> {
    config: &'a Config,
}

impl<'a> Router<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Profile name for the URL: the first matching route, else the default profile
    pub fn route(&self, url: &str) -> &'a str {
        match self.matching_route(url) {
            Some((_, route)) => &route.profile,
            None => &self.config.default_profile,
        }
    }

    /// The first matching route and its position, if any
    pub fn matching_route(&self, url: &str) -> Option<(usize, &'a Route)> {
        let url = url.to_lowercase();
        self.config
            .routes
            .iter()
            .enumerate()
            .find(|(_, route)| Self::matches(route, &url))
    }

    fn matches(route: &Route, url_lower: &str) -> bool {
        let pattern = route.pattern.to_lowercase();
        match route.condition {
            Condition::Contains => url_lower.contains(&pattern),
            Condition::Exact => url_lower == pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(routes: Vec<Route>) -> Config {
        Config {
            browser: "/Apps/X.app".to_string(),
            default_profile: "Default".to_string(),
            routes,
        }
    }

    #[test]
    fn test_contains_route_matches() {
        let config = config(vec![Route::contains("github.com", "Work")]);
        let router = Router::new(&config);
        assert_eq!(router.route("https://github.com/org/repo"), "Work");
    }

    #[test]
    fn test_unmatched_url_uses_default() {
        let config = config(vec![Route::contains("github.com", "Work")]);
        let router = Router::new(&config);
        assert_eq!(router.route("https://example.com"), "Default");
    }

    #[test]
    fn test_empty_routes_use_default() {
        let config = config(vec![]);
        let router = Router::new(&config);
        assert_eq!(router.route("https://github.com"), "Default");
        assert_eq!(router.route(""), "Default");
    }

    #[test]
    fn test_first_match_wins() {
        let config = config(vec![
            Route::contains("github.com", "Work"),
            Route::contains("github.com/personal", "Personal"),
            Route::exact("https://github.com/personal", "Exact"),
        ]);
        let router = Router::new(&config);
        assert_eq!(router.route("https://github.com/personal"), "Work");

        let (index, route) = router.matching_route("https://github.com/personal").unwrap();
        assert_eq!(index, 0);
        assert_eq!(route.profile, "Work");
    }

    #[test]
    fn test_later_route_used_when_earlier_misses() {
        let config = config(vec![
            Route::exact("https://github.com", "Exact"),
            Route::contains("github", "Loose"),
        ]);
        let router = Router::new(&config);
        assert_eq!(router.route("https://github.com/org"), "Loose");
        assert_eq!(router.route("https://github.com"), "Exact");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let config = config(vec![Route::contains("YOUTUBE", "Fun")]);
        let router = Router::new(&config);
        assert_eq!(router.route("https://youtube.com"), "Fun");
        assert_eq!(router.route("HTTPS://WWW.YouTube.COM/watch"), "Fun");
    }

    #[test]
    fn test_exact_requires_full_equality() {
        let config = config(vec![Route::exact("https://Example.com/", "Ex")]);
        let router = Router::new(&config);
        assert_eq!(router.route("https://example.com/"), "Ex");
        assert_eq!(router.route("HTTPS://EXAMPLE.COM/"), "Ex");
        assert_eq!(router.route("https://example.com"), "Default");
        assert_eq!(router.route("https://example.com/page"), "Default");
    }

    #[test]
    fn test_no_url_normalization() {
        let config = config(vec![Route::contains("a%20b", "Encoded")]);
        let router = Router::new(&config);
        assert_eq!(router.route("https://x.com/a b"), "Default");
        assert_eq!(router.route("https://x.com/A%20B"), "Encoded");
    }
}
