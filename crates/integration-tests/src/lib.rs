//! Integration test harness for the cafe listing site.
//!
//! [`TestApp`] builds the real router against a fresh in-memory `SQLite`
//! database and drives it in-process with `tower::ServiceExt::oneshot`. The
//! session cookie handed out by one response is sent with the next request,
//! so a `TestApp` behaves like a single browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cafe-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use secrecy::SecretString;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use cafe_web::config::AppConfig;
use cafe_web::middleware::csrf::CSRF_FIELD;
use cafe_web::middleware::session::SESSION_COOKIE_NAME;
use cafe_web::{AppState, app, db};

/// Round count for test hashes; the production default is far too slow here.
pub const TEST_PASSWORD_ROUNDS: u32 = 1_000;

/// A response with its body already read.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Assert a `303 See Other` to `path`.
    pub fn assert_redirect_to(&self, path: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location(), Some(path));
    }
}

/// The application plus one browser's cookie jar.
pub struct TestApp {
    router: Router,
    pool: SqlitePool,
    session_cookie: Option<String>,
}

impl TestApp {
    /// Build the app over a freshly migrated in-memory database.
    pub async fn spawn() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::migrate(&pool).await.unwrap();

        let config = AppConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            session_secret: SecretString::from("k8#Qz2!vT9@wL4$nR7^pX1&mB6*cF3%hJ0"),
            password_rounds: TEST_PASSWORD_ROUNDS,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let router = app(AppState::new(config, pool.clone()));

        Self {
            router,
            pool,
            session_cookie: None,
        }
    }

    /// The database behind the app.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Whether the browser currently holds a session cookie.
    #[must_use]
    pub const fn has_session_cookie(&self) -> bool {
        self.session_cookie.is_some()
    }

    /// The `name=value` pair of the current session cookie.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.session_cookie.clone()
    }

    /// Replace the session cookie, e.g. to replay an old one.
    pub fn set_session_cookie(&mut self, cookie: Option<String>) {
        self.session_cookie = cookie;
    }

    /// Forget the session cookie, like a fresh browser.
    pub fn clear_cookies(&mut self) {
        self.session_cookie = None;
    }

    /// `GET path`.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self.request("GET", path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// `POST path` with an `application/x-www-form-urlencoded` body.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Register through the form and return the response.
    pub async fn register(&mut self, email: &str, password: &str, name: &str) -> TestResponse {
        self.post_form(
            "/register",
            &[("email", email), ("password", password), ("name", name)],
        )
        .await
    }

    /// Log in through the form and return the response.
    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    /// The anti-forgery token rendered into the add-cafe form.
    pub async fn csrf_token(&mut self) -> String {
        let form = self.get("/add").await;
        assert_eq!(form.status, StatusCode::OK, "body: {}", form.body);
        csrf_token_in(&form.body).unwrap()
    }

    /// Submit the add-cafe form the way a browser would, token included.
    pub async fn add_cafe(&mut self, fields: &[(&str, &str)]) -> TestResponse {
        let token = self.csrf_token().await;
        let mut fields = fields.to_vec();
        fields.push((CSRF_FIELD, &token));
        self.post_form("/add", &fields).await
    }

    /// Number of rows in `table`.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.session_cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            self.store_cookie(value.to_str().unwrap());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    fn store_cookie(&mut self, set_cookie: &str) {
        let Some(pair) = set_cookie.split(';').next() else {
            return;
        };
        let Some((name, value)) = pair.trim().split_once('=') else {
            return;
        };
        if name != SESSION_COOKIE_NAME {
            return;
        }

        let removed = value.is_empty() || set_cookie.contains("Max-Age=0");
        self.session_cookie = if removed {
            None
        } else {
            Some(format!("{name}={value}"))
        };
    }
}

/// Value of the hidden anti-forgery input in a rendered page.
#[must_use]
pub fn csrf_token_in(body: &str) -> Option<String> {
    let marker = format!("name=\"{CSRF_FIELD}\" value=\"");
    let start = body.find(&marker)? + marker.len();
    let len = body[start..].find('"')?;
    Some(body[start..start + len].to_string())
}

/// Fields of a valid add-cafe submission.
#[must_use]
pub fn cafe_fields(name: &str) -> Vec<(&str, &str)> {
    vec![
        ("name", name),
        ("map_url", "https://goo.gl/maps/2EvhB4oq4gyUXKXx9"),
        ("img_url", "https://images.example.com/cafe.jpg"),
        ("location", "Peckham"),
        ("has_sockets", "YES"),
        ("has_toilet", "NO"),
        ("has_wifi", "YES"),
        ("can_take_calls", "YES"),
        ("seats", "20-30"),
        ("coffee_price", "£2.40"),
    ]
}
