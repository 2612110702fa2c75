use axum::{
    body::Body,
    http::{header::SET_COOKIE, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use tower::ServiceExt; // for `oneshot`

use portfolio_api::{api_routes, with_middleware, AppState, Config};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const DASHBOARD_URL: &str = "http://dashboard.test";
pub const PORTFOLIO_URL: &str = "https://portfolio.test";
pub const OWNER_EMAIL: &str = "owner@example.com";
pub const OWNER_PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `token=<value>` part of the Set-Cookie header, ready to send back
    pub fn session_cookie(&self) -> String {
        let header = self
            .headers
            .get(SET_COOKIE)
            .expect("response should set a cookie")
            .to_str()
            .unwrap();
        header.split(';').next().unwrap().to_string()
    }

    pub fn set_cookie_header(&self) -> String {
        self.headers
            .get(SET_COOKIE)
            .expect("response should set a cookie")
            .to_str()
            .unwrap()
            .to_string()
    }
}

pub struct TestAppBuilder {
    vars: HashMap<String, String>,
    extra_routes: Option<Router<AppState>>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        let vars = [
            ("JWT_SECRET_KEY", "integration-test-secret"),
            ("JWT_EXPIRES", "7d"),
            ("COOKIE_EXPIRE", "5"),
            ("NODE_ENV", "test"),
            ("PORTFOLIO_URL", PORTFOLIO_URL),
            ("DASHBOARD_URL", DASHBOARD_URL),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            vars,
            extra_routes: None,
        }
    }

    pub fn with_environment(mut self, environment: &str) -> Self {
        self.vars
            .insert("NODE_ENV".to_string(), environment.to_string());
        self
    }

    pub fn without_environment(mut self) -> Self {
        self.vars.remove("NODE_ENV");
        self
    }

    /// Mounts additional routes behind the same middleware stack as the API
    pub fn with_routes(mut self, routes: Router<AppState>) -> Self {
        self.extra_routes = Some(routes);
        self
    }

    pub fn build(self) -> TestApp {
        let config = Config::from_lookup(|key| self.vars.get(key).cloned()).unwrap();
        let state = AppState::in_memory(config);

        let mut routes = api_routes(&state);
        if let Some(extra) = self.extra_routes {
            routes = routes.merge(extra);
        }

        TestApp {
            router: with_middleware(routes, state.clone()),
            state,
        }
    }
}

impl TestApp {
    pub fn new() -> Self {
        TestAppBuilder::new().build()
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("body is not JSON: {}", String::from_utf8_lossy(&bytes))
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, cookie).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), cookie).await
    }

    pub async fn put(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), cookie).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, None, cookie).await
    }

    pub fn register_body(email: &str) -> Value {
        json!({
            "fullName": "Portfolio Owner",
            "email": email,
            "phone": "555-0100",
            "aboutMe": "I build backends",
            "password": OWNER_PASSWORD,
            "githubURL": "https://github.com/owner"
        })
    }

    /// Registers the portfolio owner and returns the session cookie
    pub async fn register_owner(&self) -> String {
        let response = self
            .post("/api/v1/user/register", Self::register_body(OWNER_EMAIL), None)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.session_cookie()
    }
}
