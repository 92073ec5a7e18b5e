//! Shared client utilities: errors, the `reqwest` transport, the token file
//! store and the per-invocation application context.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use marquee_session::{
    ApiConfig, ApiError, ApiRequest, ApiResponse, Credential, CredentialStore, Method,
    SessionContext, Transport, TransportError,
};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use crate::cli::{Cli, OutputFormat};
use crate::telemetry::build_sha;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;
const TOKEN_FILE_NAME: &str = "token";

/// CLI-level error type; each variant maps to its own exit code.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
    Unauthorized(String),
    Denied(String),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::Unauthorized(_) => 4,
            Self::Denied(_) => 5,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
            Self::Unauthorized(message) => {
                format!("{message} (stored token cleared; run `marquee login`)")
            }
            Self::Denied(message) => message.clone(),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NoCredential => Self::validation("not signed in; run `marquee login` first"),
            ApiError::Unauthorized { message, .. } => Self::Unauthorized(message),
            ApiError::Validation { message, .. } => Self::Validation(message),
            ApiError::Transient { detail } => Self::failure(anyhow!(detail)),
            ApiError::Denied(denied) => Self::Denied(denied.to_string()),
            ApiError::Superseded => Self::failure(anyhow!("operation was superseded")),
        }
    }
}

/// Parse the API base URL provided to the CLI.
pub(crate) fn parse_api_url(input: &str) -> Result<ApiConfig, String> {
    let url = input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))?;
    ApiConfig::new(url.as_str()).map_err(|err| err.to_string())
}

/// `$XDG_CONFIG_HOME/marquee/token`, else `~/.config/marquee/token`, else a
/// file in the working directory.
pub(crate) fn default_token_path() -> PathBuf {
    if let Some(config) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(config).join("marquee").join(TOKEN_FILE_NAME);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home)
            .join(".config")
            .join("marquee")
            .join(TOKEN_FILE_NAME);
    }
    PathBuf::from(".marquee-token")
}

/// Sends API requests with `reqwest`.
#[derive(Clone)]
pub(crate) struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client that tags every request with `request_id`.
    pub(crate) fn new(timeout: Duration, request_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(request_id).map_err(|_| {
            CliError::failure(anyhow!("request identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);
        let agent = format!("marquee-cli/{} ({})", env!("CARGO_PKG_VERSION"), build_sha());
        let agent = HeaderValue::from_str(&agent)
            .map_err(|_| CliError::failure(anyhow!("user agent contains invalid characters")))?;
        default_headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, request.url.as_str());
        if let Some(bearer) = &request.bearer {
            builder = builder.header(AUTHORIZATION, bearer.bearer_header());
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::new(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::new(format!("failed to read response body: {err}")))?;
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

/// Token persisted in a single file. A missing file means signed out.
#[derive(Debug, Clone)]
pub(crate) struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn write_token(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&self.path)?;
        restrict_permissions(&file)?;
        file.write_all(token.as_bytes())?;
        file.write_all(b"\n")
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, credential: &Credential) {
        if let Err(err) = self.write_token(credential.expose()) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to persist token");
        }
    }

    fn read(&self) -> Option<Credential> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Credential::new(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read token");
                None
            }
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to remove token");
            }
        }
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) session: SessionContext,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    pub(crate) fn from_cli(cli: &Cli, request_id: &str) -> CliResult<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(cli.timeout), request_id)?;
        let token_file = cli.token_file.clone().unwrap_or_else(default_token_path);
        tracing::debug!(api = cli.api_url.base_url(), token_file = %token_file.display(), "cli context");
        Ok(Self::new(
            cli.api_url.clone(),
            Rc::new(transport),
            FileCredentialStore::new(token_file),
            cli.output,
        ))
    }

    pub(crate) fn new(
        config: ApiConfig,
        transport: Rc<dyn Transport>,
        store: FileCredentialStore,
        output: OutputFormat,
    ) -> Self {
        let session = SessionContext::builder(config, transport, Rc::new(store)).build();
        Self { session, output }
    }

    /// Hand a failed call to the session (a rejected token is cleared) and
    /// convert it for the terminal.
    pub(crate) fn fail(&self, err: ApiError) -> CliError {
        self.session.report(&err);
        CliError::from(err)
    }
}
