use axum::http::Method;

use super::request::RequestInfo;

/// Exact paths the portfolio service never guards, whatever the method.
const PORTFOLIO_PUBLIC_PATHS: &[&str] = &["/", "/openapi", "/swagger", "/health"];

const USER_SERVICE_PUBLIC_PATHS: &[&str] = &["/"];

/// How a rule decides which part of the path it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatcher {
    /// Prefix ending on a segment boundary: `/api/portfolio` covers
    /// `/api/portfolio/1` but not `/api/portfoliotemplate`.
    Segment(&'static str),
    /// Plain string prefix: `/api/oauth/` covers `/api/oauth/callback`.
    Prefix(&'static str),
    /// Every fragment must occur somewhere in the path.
    ContainsAll(&'static [&'static str]),
}

impl PathMatcher {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Segment(prefix) => match path.strip_prefix(prefix) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
            PathMatcher::Prefix(prefix) => path.starts_with(prefix),
            PathMatcher::ContainsAll(fragments) => fragments.iter().all(|fragment| path.contains(fragment)),
        }
    }
}

/// Methods for which a matching path is public.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodPolicy {
    AnyMethod,
    GetOnly,
}

/// One public (or conditionally public) area of the API.
#[derive(Debug, Clone)]
pub struct PathRule {
    pub matcher: PathMatcher,
    pub policy: MethodPolicy,
    /// Fragments that take the path back out of the rule's method policy
    pub excluded: &'static [&'static str],
    /// Final path segments that are public for POST (e.g. `view` for view counters)
    pub public_post_suffixes: &'static [&'static str],
}

impl PathRule {
    pub const fn new(matcher: PathMatcher, policy: MethodPolicy) -> Self {
        Self {
            matcher,
            policy,
            excluded: &[],
            public_post_suffixes: &[],
        }
    }

    /// Read-oriented collection under `prefix`: public on GET only.
    pub const fn collection(prefix: &'static str) -> Self {
        Self::new(PathMatcher::Segment(prefix), MethodPolicy::GetOnly)
    }

    pub const fn excluding(mut self, fragments: &'static [&'static str]) -> Self {
        self.excluded = fragments;
        self
    }

    pub const fn with_public_posts(mut self, suffixes: &'static [&'static str]) -> Self {
        self.public_post_suffixes = suffixes;
        self
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    /// True when this rule makes `path` public for `method`. The path must
    /// already be normalized.
    pub fn allows(&self, path: &str, method: &Method) -> bool {
        if !self.matches(path) {
            return false;
        }

        if method == Method::POST && self.is_public_post(path) {
            return true;
        }

        let method_allowed = match self.policy {
            MethodPolicy::AnyMethod => true,
            MethodPolicy::GetOnly => method == Method::GET,
        };

        method_allowed && !self.excluded.iter().any(|fragment| path.contains(fragment))
    }

    fn is_public_post(&self, path: &str) -> bool {
        let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        self.public_post_suffixes.contains(&last)
    }
}

/// Decides whether a request needs an authenticated caller.
///
/// Pure and deterministic; anything it does not recognise is protected.
#[derive(Debug, Clone)]
pub struct AuthorizationPaths {
    public_paths: &'static [&'static str],
    rules: Vec<PathRule>,
}

impl Default for AuthorizationPaths {
    fn default() -> Self {
        Self::portfolio_service()
    }
}

impl AuthorizationPaths {
    pub fn new(public_paths: &'static [&'static str], rules: Vec<PathRule>) -> Self {
        Self { public_paths, rules }
    }

    /// Read-mostly portfolio API: collections are public on GET, aggregate
    /// listings are not, and two POST endpoints are open to anonymous visitors.
    pub fn portfolio_service() -> Self {
        const DETAILED: &[&str] = &["/detailed-all"];
        Self::new(
            PORTFOLIO_PUBLIC_PATHS,
            vec![
                PathRule::collection("/api/portfolio").excluding(DETAILED).with_public_posts(&["view"]),
                PathRule::collection("/api/portfoliotemplate").excluding(DETAILED).with_public_posts(&["seed"]),
                PathRule::collection("/api/project").excluding(DETAILED),
                PathRule::collection("/api/bookmark").excluding(DETAILED),
                PathRule::collection("/api/image").excluding(DETAILED),
            ],
        )
    }

    /// User API: sign-in flows are open for every method, user lookups for
    /// portfolio display are open on GET.
    pub fn user_service() -> Self {
        use MethodPolicy::{AnyMethod, GetOnly};
        use PathMatcher::{ContainsAll, Prefix};

        Self::new(
            USER_SERVICE_PUBLIC_PATHS,
            vec![
                PathRule::new(Prefix("/api/users/login"), AnyMethod),
                PathRule::new(Prefix("/api/users/register"), AnyMethod),
                PathRule::new(Prefix("/api/users/oauth-providers/check"), AnyMethod),
                PathRule::new(Prefix("/api/users/check-email"), AnyMethod),
                PathRule::new(Prefix("/api/oauth/"), AnyMethod),
                PathRule::new(Prefix("/api/oauth2/"), AnyMethod),
                PathRule::new(Prefix("/openapi"), AnyMethod),
                PathRule::new(Prefix("/swagger"), AnyMethod),
                PathRule::new(Prefix("/health"), AnyMethod),
                PathRule::new(ContainsAll(&["/api/users/email/"]), AnyMethod),
                PathRule::new(ContainsAll(&["/oauth-providers/"]), GetOnly),
                PathRule::new(ContainsAll(&["/api/users/", "/portfolio-info"]), GetOnly),
                PathRule::new(ContainsAll(&["/api/users/"]), GetOnly).excluding(&["/oauth-providers/", "/bookmarks/"]),
            ],
        )
    }

    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    pub fn requires_authentication(&self, path: Option<&str>, method: &Method) -> bool {
        let path = match path.map(|p| p.trim().to_lowercase()) {
            Some(p) if !p.is_empty() => p,
            _ => return true,
        };

        if self.public_paths.contains(&path.as_str()) {
            return false;
        }

        !self.rules.iter().any(|rule| rule.allows(&path, method))
    }

    pub fn requires_authentication_for(&self, request: &RequestInfo) -> bool {
        self.requires_authentication(request.path.as_deref(), &request.method)
    }
}
