//! Cross-origin policy.
//!
//! The policy only tells browsers which pages may read responses. Requests
//! from other origins are still served; it is not an access control.

use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method, Request, Response};
use tower::{Layer, Service, ServiceExt};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, Cors, CorsLayer};

use crate::config::Config;
use crate::error::ConfigError;

/// Methods advertised when every method is allowed.
///
/// `Access-Control-Allow-Methods: *` is ignored by browsers on credentialed
/// requests, so the wildcard is expanded to this list instead.
pub const ALL_METHODS: [Method; 7] = [
    Method::DELETE,
    Method::GET,
    Method::HEAD,
    Method::OPTIONS,
    Method::PATCH,
    Method::POST,
    Method::PUT,
];

/// Either every value or an explicit set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allowed<T> {
    /// Wildcard.
    Any,
    /// Explicit set.
    List(Vec<T>),
}

impl<T: FromStr> Allowed<T> {
    /// Parse a configured list; a `*` entry anywhere means [`Allowed::Any`].
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self, String> {
        let entries: Vec<&str> = entries
            .iter()
            .map(|e| e.as_ref().trim())
            .filter(|e| !e.is_empty())
            .collect();

        if entries.contains(&"*") {
            return Ok(Allowed::Any);
        }

        entries
            .into_iter()
            .map(|e| e.parse::<T>().map_err(|_| e.to_string()))
            .collect::<Result<Vec<_>, _>>()
            .map(Allowed::List)
    }
}

/// Cross-origin policy fixed at startup.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    /// Origins whose pages may read responses.
    pub allowed_origins: Vec<HeaderValue>,
    /// Whether cookies and auth headers may accompany requests.
    pub allow_credentials: bool,
    /// Methods permitted on cross-origin requests.
    pub allowed_methods: Allowed<Method>,
    /// Request headers permitted on cross-origin requests.
    pub allowed_headers: Allowed<HeaderName>,
    /// How long a browser may cache a pre-flight answer.
    pub max_age: Duration,
}

impl CorsPolicy {
    /// Build the policy from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let allowed_origins = config
            .allowed_origins()
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidOrigin {
                    origin: origin.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if allowed_origins.is_empty() {
            return Err(ConfigError::NoOrigins);
        }

        let allowed_methods = Allowed::<Method>::parse(config.cors_allow_methods.as_slice())
            .map_err(ConfigError::InvalidMethod)?;
        let allowed_headers = Allowed::<HeaderName>::parse(config.cors_allow_headers.as_slice())
            .map_err(ConfigError::InvalidHeader)?;

        Ok(Self {
            allowed_origins,
            allow_credentials: config.cors_allow_credentials,
            allowed_methods,
            allowed_headers,
            max_age: Duration::from_secs(config.cors_max_age_secs),
        })
    }

    /// Whether responses to `origin` are exposed to page scripts.
    pub fn allows_origin(&self, origin: &HeaderValue) -> bool {
        self.allowed_origins.contains(origin)
    }

    /// The tower-http layer enforcing this policy, applied to every request.
    ///
    /// With credentials enabled, wildcards are rendered as the full method
    /// list and as a mirror of the requested headers.
    pub fn cors_layer(&self) -> CorsLayer {
        let methods = match (&self.allowed_methods, self.allow_credentials) {
            (Allowed::Any, true) => AllowMethods::list(ALL_METHODS),
            (Allowed::Any, false) => AllowMethods::from(Any),
            (Allowed::List(list), _) => AllowMethods::list(list.iter().cloned()),
        };

        let headers = match (&self.allowed_headers, self.allow_credentials) {
            (Allowed::Any, true) => AllowHeaders::mirror_request(),
            (Allowed::Any, false) => AllowHeaders::from(Any),
            (Allowed::List(list), _) => AllowHeaders::list(list.iter().cloned()),
        };

        let policy = self.clone();
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(move |origin, _| {
                policy.allows_origin(origin)
            }))
            .allow_credentials(self.allow_credentials)
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(self.max_age)
    }

    /// Layer that runs [`CorsPolicy::cors_layer`] only for cross-origin
    /// requests; everything else goes straight to the router.
    pub fn layer(&self) -> CorsGateLayer {
        CorsGateLayer {
            cors: self.cors_layer(),
        }
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allowed_origins: vec![HeaderValue::from_static("http://localhost:5173")],
            allow_credentials: true,
            allowed_methods: Allowed::Any,
            allowed_headers: Allowed::Any,
            max_age: Duration::from_secs(600),
        }
    }
}

/// A request the browser tagged as cross-origin.
///
/// Pre-flights are `OPTIONS` carrying both `Origin` and
/// `Access-Control-Request-Method`; a bare `OPTIONS` is an ordinary request.
pub fn is_cross_origin<B>(request: &Request<B>) -> bool {
    let headers = request.headers();
    if !headers.contains_key(header::ORIGIN) {
        return false;
    }
    request.method() != Method::OPTIONS
        || headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Layer produced by [`CorsPolicy::layer`].
#[derive(Debug, Clone)]
pub struct CorsGateLayer {
    cors: CorsLayer,
}

impl<S: Clone> Layer<S> for CorsGateLayer {
    type Service = CorsGate<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorsGate {
            cors: self.cors.layer(inner.clone()),
            inner,
        }
    }
}

/// Routes cross-origin requests through [`Cors`], the rest to `inner`.
#[derive(Debug, Clone)]
pub struct CorsGate<S> {
    cors: Cors<S>,
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CorsGate<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Readiness is checked on the clone picked in `call`.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        if is_cross_origin(&request) {
            Box::pin(self.cors.clone().oneshot(request))
        } else {
            Box::pin(self.inner.clone().oneshot(request))
        }
    }
}
