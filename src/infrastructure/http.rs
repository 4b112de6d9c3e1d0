use crate::domain::intent::CreateIntentResponse;
use crate::domain::payload::{CreateIntentPayload, UpdateIntentPayload};
use crate::domain::ports::CheckoutBackend;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use serde::Serialize;
use tracing::debug;
use url::Url;

/// Cookie carrying the anti-forgery token.
pub const CSRF_COOKIE: &str = "csrftoken";
/// Header the token is echoed in on mutating requests.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Anti-forgery token read from the page's cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AntiForgeryToken(String);

impl AntiForgeryToken {
    /// Looks up `name` in a `Cookie` header value.
    ///
    /// A cookie that is missing or present more than once yields an empty
    /// token, which is still sent.
    pub fn from_cookie_header(header: &str, name: &str) -> Self {
        let cookies = format!("; {header}");
        let needle = format!("; {name}=");
        let parts: Vec<&str> = cookies.split(needle.as_str()).collect();

        match parts.as_slice() {
            [_, rest] => Self(rest.split(';').next().unwrap_or_default().to_string()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Backend adapter talking to the storefront's checkout endpoints.
///
/// Endpoints are resolved against the storefront origin, so the relative
/// paths a page configures work unchanged. The page's cookies are forwarded
/// so requests run in the same session as the page.
pub struct HttpBackend {
    client: reqwest::Client,
    origin: Url,
    cookie_header: Option<String>,
    token: AntiForgeryToken,
}

impl HttpBackend {
    pub fn new(origin: Url, cookie_header: Option<String>) -> Self {
        let token = cookie_header
            .as_deref()
            .map(|header| AntiForgeryToken::from_cookie_header(header, CSRF_COOKIE))
            .unwrap_or_default();

        Self {
            client: reqwest::Client::new(),
            origin,
            cookie_header,
            token,
        }
    }

    pub fn token(&self) -> &AntiForgeryToken {
        &self.token
    }

    fn resolve(&self, endpoint: &str) -> Result<Url> {
        Ok(self.origin.join(endpoint)?)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        let url = self.resolve(endpoint)?;
        debug!(%url, "POST");

        let mut request = self
            .client
            .post(url)
            .header(CSRF_HEADER, self.token.as_str())
            .header(ACCEPT, "application/json")
            .json(body);
        if let Some(cookies) = &self.cookie_header {
            request = request.header(COOKIE, cookies);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckoutError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CheckoutBackend for HttpBackend {
    async fn create_intent(
        &self,
        endpoint: &str,
        payload: &CreateIntentPayload,
    ) -> Result<CreateIntentResponse> {
        let response = self.post_json(endpoint, payload).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn update_intent(&self, endpoint: &str, update: &UpdateIntentPayload) -> Result<()> {
        self.post_json(endpoint, update).await?;
        Ok(())
    }
}
