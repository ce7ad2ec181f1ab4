use crate::config::{ClientConfig, InfogramConfig, DEFAULT_ENDPOINT};
use crate::context::RequestContext;
use crate::errors::{ApiError, Result};
use crate::transport::{HttpTransport, RawResponse, Transport};
use infogram_core::{
    encode_path_segment, mask_key, ApiRequest, Credentials, ExportFormat, Infographic, Method,
    Signer, SigningPolicy, Theme,
};
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use url::Url;

/// Signed HTTP client for the Infogram API.
///
/// All configuration is fixed at construction, so one client can be cloned
/// and shared between tasks freely.
pub struct InfogramClient<T = HttpTransport> {
    transport: Arc<T>,
    credentials: Credentials,
    endpoint: String,
    signing: SigningPolicy,
}

impl<T> Clone for InfogramClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            credentials: self.credentials.clone(),
            endpoint: self.endpoint.clone(),
            signing: self.signing,
        }
    }
}

impl<T> fmt::Debug for InfogramClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfogramClient")
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials)
            .field("signing", &self.signing)
            .finish()
    }
}

impl InfogramClient<HttpTransport> {
    /// Create API client from `INFOGRAM_API_KEY`, `INFOGRAM_API_SECRET` and
    /// the optional `INFOGRAM_ENDPOINT`.
    pub fn from_env() -> Result<Self> {
        debug!("Creating InfogramClient from environment variables");
        let credentials = Credentials::from_env()?;
        Self::new(credentials, ClientConfig::from_env())
    }
}

impl<T: Transport + Default> InfogramClient<T> {
    /// Create a client, filling unset options with their defaults.
    pub fn new(credentials: Credentials, config: ClientConfig<T>) -> Result<Self> {
        let transport = config.transport.unwrap_or_default();
        let endpoint = config
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Self::with_transport(credentials, transport, &endpoint, config.signing)
    }

    /// Create API client from any configuration implementing InfogramConfig
    pub fn from_config<C>(config: &C) -> std::result::Result<Self, C::Error>
    where
        C: InfogramConfig,
    {
        debug!("Creating InfogramClient from config");
        let credentials = config.credentials()?;

        let endpoint = config.endpoint()?;
        if let Some(ref url) = endpoint {
            debug!("Got custom endpoint from config: {}", url);
        } else {
            debug!("Using default endpoint");
        }

        let client_config = ClientConfig {
            endpoint,
            ..ClientConfig::default()
        };
        Ok(Self::new(credentials, client_config)?)
    }
}

impl<T: Transport> InfogramClient<T> {
    /// Create a client over an explicit transport.
    pub fn with_transport(
        credentials: Credentials,
        transport: T,
        endpoint: &str,
        signing: SigningPolicy,
    ) -> Result<Self> {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        Url::parse(&endpoint)?;

        debug!("Creating InfogramClient");
        debug!("  API Key: {}", mask_key(credentials.api_key()));
        debug!("  Endpoint: {}", endpoint);

        Ok(Self {
            transport: Arc::new(transport),
            credentials,
            endpoint,
            signing,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn signing_policy(&self) -> SigningPolicy {
        self.signing
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build an unsigned request for `path` relative to the endpoint.
    pub fn new_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiRequest> {
        let url = format!("{}/{}", self.endpoint, path.trim_start_matches('/'));
        let request = ApiRequest::new(method, Url::parse(&url)?).with_query(query.iter().copied());
        Ok(request)
    }

    /// Build an unsigned request carrying `body` as JSON.
    pub fn new_json_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<ApiRequest> {
        self.new_request(method, path, query)?
            .with_json(body)
            .map_err(|e| ApiError::Request(format!("failed to encode request body: {}", e)))
    }

    /// Add `api_key` and `api_sig` to `request`.
    pub fn sign(&self, request: &mut ApiRequest) -> Result<()> {
        Signer::new(&self.credentials, self.signing).sign(request)?;
        Ok(())
    }

    /// Send `request` and return the body of a 2xx response.
    ///
    /// Any other status fails with the raw response body as the message.
    pub async fn dispatch(&self, ctx: &RequestContext, request: ApiRequest) -> Result<RawResponse> {
        let method = request.method();
        let path = request.url().path().to_string();
        debug!("Dispatching {} {}", method, path);

        let response = ctx
            .run(async {
                self.transport.send(request).await.map_err(|e| {
                    error!("{} {} failed: {}", method, path, e);
                    ApiError::Transport(e)
                })
            })
            .await?;

        if response.is_success() {
            debug!("Request successful with status: {}", response.status);
            return Ok(response);
        }

        let message = String::from_utf8_lossy(&response.body).into_owned();
        error!("Request failed with status: {}", response.status);
        debug!("Error response body: {}", message);

        Err(ApiError::Status {
            status: response.status,
            message,
        })
    }

    /// Send `request` and decode the JSON response into `R`.
    ///
    /// An empty body yields `R::default()`.
    pub async fn execute<R>(&self, ctx: &RequestContext, request: ApiRequest) -> Result<R>
    where
        R: DeserializeOwned + Default,
    {
        let response = self.dispatch(ctx, request).await?;
        decode_body(&response.body)
    }

    /// Send `request` and copy the response body verbatim into `sink`.
    ///
    /// Returns the number of bytes written.
    pub async fn execute_raw<W>(
        &self,
        ctx: &RequestContext,
        request: ApiRequest,
        sink: &mut W,
    ) -> Result<u64>
    where
        W: Write + ?Sized,
    {
        let response = self.dispatch(ctx, request).await?;
        sink.write_all(&response.body)?;
        sink.flush()?;
        Ok(response.body.len() as u64)
    }

    async fn get<R>(&self, ctx: &RequestContext, path: &str, query: &[(&str, &str)]) -> Result<R>
    where
        R: DeserializeOwned + Default,
    {
        let mut request = self.new_request(Method::Get, path, query)?;
        self.sign(&mut request)?;
        self.execute(ctx, request).await
    }

    /// Fetch the list of infographics
    pub async fn infographics(&self) -> Result<Vec<Infographic>> {
        self.infographics_with(&RequestContext::background()).await
    }

    pub async fn infographics_with(&self, ctx: &RequestContext) -> Result<Vec<Infographic>> {
        debug!("Fetching infographics");
        let infographics: Vec<Infographic> = self.get(ctx, "infographics", &[]).await?;

        info!("Successfully fetched {} infographics", infographics.len());
        Ok(infographics)
    }

    /// Fetch a single infographic by id
    pub async fn infographic(&self, id: impl fmt::Display) -> Result<Infographic> {
        self.infographic_with(&RequestContext::background(), id)
            .await
    }

    pub async fn infographic_with(
        &self,
        ctx: &RequestContext,
        id: impl fmt::Display,
    ) -> Result<Infographic> {
        debug!("Fetching infographic {}", id);
        let path = format!("infographics/{}", encode_path_segment(&id.to_string()));
        let infographic: Infographic = self.get(ctx, &path, &[]).await?;

        info!("Successfully fetched infographic {}", infographic.id);
        Ok(infographic)
    }

    /// Fetch the infographics owned by a user
    pub async fn user_infographics(&self, user_id: impl fmt::Display) -> Result<Vec<Infographic>> {
        self.user_infographics_with(&RequestContext::background(), user_id)
            .await
    }

    pub async fn user_infographics_with(
        &self,
        ctx: &RequestContext,
        user_id: impl fmt::Display,
    ) -> Result<Vec<Infographic>> {
        debug!("Fetching infographics for user {}", user_id);
        let path = format!(
            "users/{}/infographics",
            encode_path_segment(&user_id.to_string())
        );
        let infographics: Vec<Infographic> = self.get(ctx, &path, &[]).await?;

        info!(
            "Successfully fetched {} infographics for user {}",
            infographics.len(),
            user_id
        );
        Ok(infographics)
    }

    /// Fetch the themes available to infographics
    pub async fn themes(&self) -> Result<Vec<Theme>> {
        self.themes_with(&RequestContext::background()).await
    }

    pub async fn themes_with(&self, ctx: &RequestContext) -> Result<Vec<Theme>> {
        debug!("Fetching themes");
        let themes: Vec<Theme> = self.get(ctx, "themes", &[]).await?;

        info!("Successfully fetched {} themes", themes.len());
        Ok(themes)
    }

    /// Download a rendered infographic into `sink`
    pub async fn export_infographic<W>(
        &self,
        id: impl fmt::Display,
        format: ExportFormat,
        sink: &mut W,
    ) -> Result<u64>
    where
        W: Write + ?Sized,
    {
        self.export_infographic_with(&RequestContext::background(), id, format, sink)
            .await
    }

    pub async fn export_infographic_with<W>(
        &self,
        ctx: &RequestContext,
        id: impl fmt::Display,
        format: ExportFormat,
        sink: &mut W,
    ) -> Result<u64>
    where
        W: Write + ?Sized,
    {
        debug!("Exporting infographic {} as {}", id, format);
        let path = format!("infographics/{}", encode_path_segment(&id.to_string()));
        let mut request = self.new_request(Method::Get, &path, &[("format", format.as_str())])?;
        self.sign(&mut request)?;

        let written = self.execute_raw(ctx, request, sink).await?;
        info!("Exported infographic {} ({} bytes of {})", id, written, format);
        Ok(written)
    }
}

/// Decode a JSON body, treating an empty (or all-whitespace) body as `R::default()`.
pub(crate) fn decode_body<R>(body: &[u8]) -> Result<R>
where
    R: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(R::default());
    }
    Ok(serde_json::from_slice(body)?)
}

/// Download helpers on the infographic record itself.
pub trait InfographicExport {
    fn export<'a, T, W>(
        &'a self,
        client: &'a InfogramClient<T>,
        format: ExportFormat,
        sink: &'a mut W,
    ) -> impl Future<Output = Result<u64>> + 'a
    where
        T: Transport + 'a,
        W: Write + ?Sized + 'a;
}

impl InfographicExport for Infographic {
    fn export<'a, T, W>(
        &'a self,
        client: &'a InfogramClient<T>,
        format: ExportFormat,
        sink: &'a mut W,
    ) -> impl Future<Output = Result<u64>> + 'a
    where
        T: Transport + 'a,
        W: Write + ?Sized + 'a,
    {
        client.export_infographic(self.id, format, sink)
    }
}
