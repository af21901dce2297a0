//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the compiled route table
//! - Resolve (method, path) to exactly one route, or an explicit miss
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Most specific template wins; registration order is irrelevant
//! - Ambiguous tables are refused at construction instead of shadowing silently
//! - Path matched but verb not → `MethodNotAllowed`, never a silent 404

use axum::http::Method;

use super::matcher::{PathParams, PathTemplate};
use super::RouteError;

/// A single entry of the route table.
#[derive(Debug, Clone)]
pub struct Route<T> {
    pub method: Method,
    pub template: PathTemplate,
    pub target: T,
}

impl<T> Route<T> {
    pub fn new(method: Method, template: &str, target: T) -> Result<Self, RouteError> {
        Ok(Self {
            method,
            template: PathTemplate::parse(template)?,
            target,
        })
    }
}

/// Outcome of resolving a request against the table.
#[derive(Debug)]
pub enum RouteMatch<'a, T> {
    Found {
        route: &'a Route<T>,
        params: PathParams,
    },
    /// Some template matched the path, none of them with this verb.
    MethodNotAllowed { allowed: Vec<Method> },
    NotFound,
}

/// Immutable route table.
#[derive(Debug)]
pub struct Router<T> {
    routes: Vec<Route<T>>,
}

impl<T> Router<T> {
    /// Build the table, rejecting pairs of routes that would match the same
    /// requests with equal precedence.
    pub fn new(routes: Vec<Route<T>>) -> Result<Self, RouteError> {
        for (i, a) in routes.iter().enumerate() {
            for b in &routes[i + 1..] {
                if a.method == b.method && a.template.same_shape(&b.template) {
                    return Err(RouteError::Ambiguous {
                        method: a.method.clone(),
                        first: a.template.to_string(),
                        second: b.template.to_string(),
                    });
                }
            }
        }
        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[Route<T>] {
        &self.routes
    }

    pub fn resolve(&self, method: &Method, path: &str) -> RouteMatch<'_, T> {
        let mut best: Option<(&Route<T>, PathParams)> = None;
        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            let Some(params) = route.template.matches(path) else {
                continue;
            };

            if route.method != *method {
                if !allowed.contains(&route.method) {
                    allowed.push(route.method.clone());
                }
                continue;
            }

            let better = match &best {
                Some((current, _)) => route.template.rank() > current.template.rank(),
                None => true,
            };
            if better {
                best = Some((route, params));
            }
        }

        match best {
            Some((route, params)) => RouteMatch::Found { route, params },
            None if !allowed.is_empty() => {
                allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
                RouteMatch::MethodNotAllowed { allowed }
            }
            None => RouteMatch::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(Method, &str, &'static str)]) -> Router<&'static str> {
        let routes = entries
            .iter()
            .map(|(m, t, name)| Route::new(m.clone(), t, *name).unwrap())
            .collect();
        Router::new(routes).unwrap()
    }

    fn found(m: RouteMatch<'_, &'static str>) -> (&'static str, PathParams) {
        match m {
            RouteMatch::Found { route, params } => (route.target, params),
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_match() {
        let router = table(&[
            (Method::GET, "/", "home"),
            (Method::GET, "/get", "get"),
            (Method::POST, "/post", "post"),
        ]);

        assert_eq!(found(router.resolve(&Method::GET, "/")).0, "home");
        assert_eq!(found(router.resolve(&Method::GET, "/get")).0, "get");
        assert_eq!(found(router.resolve(&Method::POST, "/post")).0, "post");
    }

    #[test]
    fn test_params_extracted() {
        let router = table(&[(Method::GET, "/status/{code}", "status")]);
        let (target, params) = found(router.resolve(&Method::GET, "/status/418"));
        assert_eq!(target, "status");
        assert_eq!(params.get("code"), Some("418"));
    }

    #[test]
    fn test_not_found() {
        let router = table(&[(Method::GET, "/get", "get")]);
        assert!(matches!(
            router.resolve(&Method::GET, "/unknown-path"),
            RouteMatch::NotFound
        ));
        assert!(matches!(
            router.resolve(&Method::GET, "/get/"),
            RouteMatch::NotFound
        ));
    }

    #[test]
    fn test_method_not_allowed_lists_verbs() {
        let router = table(&[
            (Method::PUT, "/thing", "put"),
            (Method::GET, "/thing", "get"),
            (Method::POST, "/other", "post"),
        ]);

        match router.resolve(&Method::DELETE, "/thing") {
            RouteMatch::MethodNotAllowed { allowed } => {
                assert_eq!(allowed, vec![Method::GET, Method::PUT]);
            }
            other => panic!("expected 405, got {other:?}"),
        }
    }

    #[test]
    fn test_head_is_not_get() {
        let router = table(&[(Method::GET, "/get", "get")]);
        assert!(matches!(
            router.resolve(&Method::HEAD, "/get"),
            RouteMatch::MethodNotAllowed { .. }
        ));
    }

    #[test]
    fn test_registration_order_does_not_matter() {
        let forward = table(&[
            (Method::GET, "/status/{code}", "param"),
            (Method::GET, "/status/teapot", "literal"),
        ]);
        let reverse = table(&[
            (Method::GET, "/status/teapot", "literal"),
            (Method::GET, "/status/{code}", "param"),
        ]);

        for router in [forward, reverse] {
            assert_eq!(found(router.resolve(&Method::GET, "/status/teapot")).0, "literal");
            assert_eq!(found(router.resolve(&Method::GET, "/status/200")).0, "param");
        }
    }

    #[test]
    fn test_specificity_is_left_to_right() {
        let router = table(&[
            (Method::GET, "/{a}/fixed", "tail"),
            (Method::GET, "/fixed/{b}", "head"),
        ]);
        assert_eq!(found(router.resolve(&Method::GET, "/fixed/fixed")).0, "head");
        assert_eq!(found(router.resolve(&Method::GET, "/other/fixed")).0, "tail");
    }

    #[test]
    fn test_ambiguous_table_rejected() {
        let routes = vec![
            Route::new(Method::GET, "/status/{code}", "a").unwrap(),
            Route::new(Method::GET, "/status/{other}", "b").unwrap(),
        ];
        assert!(matches!(
            Router::new(routes),
            Err(RouteError::Ambiguous { .. })
        ));

        // Same shape, different verbs: fine.
        let routes = vec![
            Route::new(Method::GET, "/item/{id}", "a").unwrap(),
            Route::new(Method::POST, "/item/{id}", "b").unwrap(),
        ];
        assert!(Router::new(routes).is_ok());
    }
}
