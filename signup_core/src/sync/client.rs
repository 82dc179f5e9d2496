use super::error::{self, Error};
use super::register;
use crate::flow::Submitter;
use crate::input::RegistrationInput;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// How long we'll wait for the server by default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the registration API
#[derive(Debug, Clone)]
pub struct Client {
    /// The server to connect to. Should only be the protocol and domain, e.g.
    /// `https://accounts.your-domain.com`.
    pub server: String,

    /// Where registrations are sent, relative to `server`.
    pub register_path: String,

    /// How long to wait for the whole request before giving up.
    pub timeout: Duration,

    /// Shared connection pool
    http: reqwest::Client,
}

impl Client {
    /// Construct a new client with the default path and timeout.
    pub fn new(server: String) -> Self {
        Self {
            server,
            register_path: register::PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            http: reqwest::Client::new(),
        }
    }

    /// Send registrations somewhere other than the default path.
    #[must_use]
    pub fn with_register_path(mut self, register_path: String) -> Self {
        self.register_path = register_path;
        self
    }

    /// Wait a different amount of time for the server.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register with the server.
    ///
    /// ## Errors
    ///
    /// `Error::UrlParse` if `server` or `register_path` don't make a URL;
    /// otherwise the same as `handle_response`.
    pub async fn register(&self, req: &register::Req) -> error::Result<register::Resp> {
        let url = Url::parse(&self.server)?.join(&self.register_path)?;

        tracing::debug!(%url, "sending registration");

        Self::handle_response(self.http.post(url).timeout(self.timeout).json(req)).await
    }

    /// Convert an HTTP response into a result, interpreting errors in a
    /// standard way.
    ///
    /// ## Errors
    ///
    /// - `Ok(..)` if the server returned a success (2xx), or a client error
    ///   (4xx) whose body is an unsuccessful registration result
    /// - `Error::Client` if the server returned any other client error
    /// - `Error::Server` if the server returned a server error (5xx)
    /// - `Error::Unexpected` if the server returned something else (the server is
    ///   not supposed to issue redirects or informational responses.)
    /// - `Error::Timeout` if we gave up waiting
    async fn handle_response(resp: reqwest::RequestBuilder) -> error::Result<register::Resp> {
        let resp = resp.send().await?;

        let status = resp.status();

        if status.is_success() {
            Ok(resp.json().await?)
        } else if status.is_client_error() {
            let body = resp.text().await?;

            // an error status can only ever carry a rejection
            if let Some(rejection) = serde_json::from_str::<register::Resp>(&body)
                .ok()
                .filter(|resp| !resp.success)
            {
                return Ok(rejection);
            }

            match serde_json::from_str::<error::ErrorResp>(&body) {
                Ok(err) => Err(Error::Client(err.error)),
                Err(_) => Err(Error::Client(status.to_string())),
            }
        } else if status.is_server_error() {
            Err(Error::Server)
        } else {
            Err(Error::Unexpected(status))
        }
    }
}

impl Submitter for Client {
    fn submit(
        &self,
        input: &RegistrationInput,
    ) -> impl Future<Output = error::Result<register::Resp>> + Send {
        self.register(input)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        format!("http://{addr}")
    }

    fn req() -> register::Req {
        RegistrationInput {
            email: "a@b.c".to_string(),
            password: "secret".to_string(),
            agree: true,
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_success() {
        let server = serve(Router::new().route(
            register::PATH,
            post(|Json(req): Json<register::Req>| async move {
                assert_eq!(req.email, "a@b.c");
                assert_eq!(req.password, "secret");
                assert!(req.agree);

                Json(register::Resp::accepted())
            }),
        ))
        .await;

        let resp = Client::new(server).register(&req()).await.unwrap();

        assert_eq!(resp, register::Resp::accepted());
    }

    #[test_log::test(tokio::test)]
    async fn test_custom_path() {
        let server = serve(Router::new().route(
            "/signup",
            post(|| async { Json(register::Resp::accepted()) }),
        ))
        .await;

        let resp = Client::new(server)
            .with_register_path("/signup".to_string())
            .register(&req())
            .await
            .unwrap();

        assert!(resp.success);
    }

    #[test_log::test(tokio::test)]
    async fn test_rejection_in_ok_body() {
        let server = serve(Router::new().route(
            register::PATH,
            post(|| async { Json(register::Resp::rejected("duplicate email")) }),
        ))
        .await;

        let resp = Client::new(server).register(&req()).await.unwrap();

        assert_eq!(resp, register::Resp::rejected("duplicate email"));
    }

    #[test_log::test(tokio::test)]
    async fn test_rejection_in_client_error_body() {
        let server = serve(Router::new().route(
            register::PATH,
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(register::Resp::rejected("duplicate email")),
                )
            }),
        ))
        .await;

        let resp = Client::new(server).register(&req()).await.unwrap();

        assert_eq!(resp, register::Resp::rejected("duplicate email"));
    }

    #[test_log::test(tokio::test)]
    async fn test_client_error_claiming_success() {
        let server = serve(Router::new().route(
            register::PATH,
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(register::Resp {
                        success: true,
                        message: "nope".to_string(),
                    }),
                )
            }),
        ))
        .await;

        let err = Client::new(server).register(&req()).await.unwrap_err();

        assert!(
            matches!(err, Error::Client(ref message) if message.starts_with("422")),
            "{err:?}"
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_client_error_without_result() {
        let server = serve(Router::new().route(
            register::PATH,
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(error::ErrorResp {
                        error: "bad json".to_string(),
                    }),
                )
            }),
        ))
        .await;

        let err = Client::new(server).register(&req()).await.unwrap_err();

        assert!(matches!(err, Error::Client(ref message) if message == "bad json"), "{err:?}");
    }

    #[test_log::test(tokio::test)]
    async fn test_server_error() {
        let server = serve(Router::new().route(
            register::PATH,
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR.into_response() }),
        ))
        .await;

        let err = Client::new(server).register(&req()).await.unwrap_err();

        assert!(matches!(err, Error::Server), "{err:?}");
    }

    #[test_log::test(tokio::test)]
    async fn test_timeout() {
        let server = serve(Router::new().route(
            register::PATH,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(register::Resp::accepted())
            }),
        ))
        .await;

        let err = Client::new(server)
            .with_timeout(Duration::from_millis(50))
            .register(&req())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout), "{err:?}");
    }

    #[test_log::test(tokio::test)]
    async fn test_bad_server_url() {
        let err = Client::new("not a url".to_string())
            .register(&req())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UrlParse(_)), "{err:?}");
    }
}
