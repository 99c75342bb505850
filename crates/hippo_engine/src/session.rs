use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use hippo_logging::{hippo_debug, hippo_info};
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use url::Url;

use crate::decode::decode_page;

pub const DEFAULT_HOST: &str = "https://intranet.hbtn.io";

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub host: String,
    pub sign_in_path: String,
    pub projects_path: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            sign_in_path: "/auth/sign_in".to_string(),
            projects_path: "/projects".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

impl SessionSettings {
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, SessionError> {
        Url::parse(&format!("{}{}", self.host.trim_end_matches('/'), path))
            .map_err(|err| SessionError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    /// Project pages live under `{host}{projects_path}`; anything else is refused
    /// before credentials are sent anywhere.
    pub fn validate_project_url(&self, url: &str) -> Result<Url, SessionError> {
        let parsed = Url::parse(url.trim())
            .map_err(|err| SessionError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let prefix = self.endpoint(&self.projects_path)?;
        if parsed.as_str().starts_with(prefix.as_str()) {
            Ok(parsed)
        } else {
            Err(SessionError::new(
                FailureKind::InvalidUrl,
                format!("{url} is not a project page under {prefix}"),
            ))
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub login: String,
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub final_url: String,
    pub html: String,
    pub encoding: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    LoginFailed,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::LoginFailed => write!(f, "login failed (are your credentials correct?)"),
            FailureKind::Decode => write!(f, "undecodable page"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SessionError {
    pub kind: FailureKind,
    pub message: String,
}

impl SessionError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Source of project pages. The runner only needs this seam, which keeps
/// the scrape pipeline testable without a network.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, SessionError>;
}

/// Logged-in session against the intranet. Cookies from the sign-in form
/// are kept by the client and reused for every project page.
pub struct IntranetSession {
    settings: SessionSettings,
    credentials: LoginCredentials,
    client: reqwest::Client,
    redirects: Arc<AtomicUsize>,
    logged_in: AtomicBool,
}

impl IntranetSession {
    pub fn new(
        settings: SessionSettings,
        credentials: LoginCredentials,
    ) -> Result<Self, SessionError> {
        let redirects = Arc::new(AtomicUsize::new(0));
        let client = build_client(&settings, redirects.clone())?;
        Ok(Self {
            settings,
            credentials,
            client,
            redirects,
            logged_in: AtomicBool::new(false),
        })
    }

    async fn login(&self) -> Result<(), SessionError> {
        let sign_in = self.settings.endpoint(&self.settings.sign_in_path)?;
        hippo_info!("Logging in as {}", self.credentials.login);
        let page = self.get_html(sign_in.clone()).await?;
        let form = SignInForm::from_html(&page.html)?;

        let params = [
            ("user[login]", self.credentials.login.as_str()),
            ("user[password]", self.credentials.password.as_str()),
            ("authenticity_token", form.authenticity_token.as_str()),
            ("commit", form.commit.as_str()),
        ];
        let response = self
            .client
            .post(sign_in)
            .form(&params)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::new(
                FailureKind::LoginFailed,
                format!("sign-in answered {status}"),
            ));
        }
        self.logged_in.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn get_html(&self, url: Url) -> Result<FetchedPage, SessionError> {
        self.redirects.store(0, Ordering::Relaxed);
        let requested = url.to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(SessionError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(SessionError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(SessionError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_page(&bytes, content_type.as_deref())
            .map_err(|err| SessionError::new(FailureKind::Decode, err.to_string()))?;
        hippo_debug!(
            "GET {} -> {} ({} bytes, {}, {} redirects)",
            requested,
            final_url,
            bytes.len(),
            decoded.encoding_label,
            self.redirects.load(Ordering::Relaxed)
        );

        Ok(FetchedPage {
            url: requested,
            final_url,
            html: decoded.html,
            encoding: decoded.encoding_label,
        })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}

#[async_trait::async_trait]
impl PageSource for IntranetSession {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, SessionError> {
        let parsed = self.settings.validate_project_url(url)?;
        if !self.logged_in.load(Ordering::Relaxed) {
            self.login().await?;
        }
        let page = self.get_html(parsed).await?;

        // The intranet answers unauthenticated requests with the sign-in page.
        let sign_in = self.settings.endpoint(&self.settings.sign_in_path)?;
        if page.final_url.starts_with(sign_in.as_str()) {
            self.logged_in.store(false, Ordering::Relaxed);
            return Err(SessionError::new(
                FailureKind::LoginFailed,
                "redirected back to the sign-in page",
            ));
        }
        Ok(page)
    }
}

fn build_client(
    settings: &SessionSettings,
    redirect_counter: Arc<AtomicUsize>,
) -> Result<reqwest::Client, SessionError> {
    let redirect_limit = settings.redirect_limit;
    let policy = reqwest::redirect::Policy::custom(move |attempt| {
        let count = attempt.previous().len();
        redirect_counter.store(count, Ordering::Relaxed);
        if count >= redirect_limit {
            attempt.error("redirect limit exceeded")
        } else {
            attempt.follow()
        }
    });

    reqwest::Client::builder()
        .cookie_store(true)
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .redirect(policy)
        .build()
        .map_err(|err| SessionError::new(FailureKind::Network, err.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SignInForm {
    authenticity_token: String,
    commit: String,
}

impl SignInForm {
    fn from_html(html: &str) -> Result<Self, SessionError> {
        let doc = Html::parse_document(html);
        let input_value = |name: &str| -> Result<String, SessionError> {
            let selector = Selector::parse(&format!("input[name=\"{name}\"]"))
                .map_err(|err| SessionError::new(FailureKind::LoginFailed, err.to_string()))?;
            doc.select(&selector)
                .next()
                .and_then(|input| input.value().attr("value"))
                .map(ToOwned::to_owned)
                .ok_or_else(|| {
                    SessionError::new(
                        FailureKind::LoginFailed,
                        format!("sign-in form has no {name} field"),
                    )
                })
        };
        Ok(Self {
            authenticity_token: input_value("authenticity_token")?,
            commit: input_value("commit")?,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SessionError {
    if err.is_timeout() {
        return SessionError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return SessionError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    SessionError::new(FailureKind::Network, err.to_string())
}
