use crate::client::InfogramClient;
use crate::config::ClientConfig;
use crate::errors::Result;
use infogram_core::{Credentials, ExportFormat, Infographic, Theme};
use log::{error, info};
use std::io::Write;

/// Main SDK struct for Infogram
pub struct Infogram {
    api_client: InfogramClient,
}

impl Infogram {
    /// Create new Infogram instance against the public endpoint
    pub fn new(credentials: Credentials) -> Result<Self> {
        let api_client = InfogramClient::new(credentials, ClientConfig::default())?;
        Ok(Self { api_client })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_client: InfogramClient::from_env()?,
        })
    }

    pub fn from_client(api_client: InfogramClient) -> Self {
        Self { api_client }
    }

    pub fn client(&self) -> &InfogramClient {
        &self.api_client
    }

    /// List available themes
    pub async fn themes(&self) -> Result<Vec<Theme>> {
        self.api_client.themes().await
    }

    /// Get theme by id. The API has no single-theme endpoint, so this
    /// filters the full list.
    pub async fn theme(&self, id: i64) -> Result<Option<Theme>> {
        let themes = self.themes().await?;
        Ok(themes.into_iter().find(|theme| theme.id == id))
    }

    /// List infographics
    pub async fn infographics(&self) -> Result<Vec<Infographic>> {
        self.api_client.infographics().await
    }

    /// List only published infographics
    pub async fn published_infographics(&self) -> Result<Vec<Infographic>> {
        let mut infographics = self.infographics().await?;
        infographics.retain(|infographic| infographic.published);
        Ok(infographics)
    }

    /// Get infographic by id
    pub async fn infographic(&self, id: i64) -> Result<Infographic> {
        self.api_client.infographic(id).await
    }

    /// List infographics owned by a user
    pub async fn user_infographics(&self, user_id: &str) -> Result<Vec<Infographic>> {
        self.api_client.user_infographics(user_id).await
    }

    /// Download a rendered infographic
    pub async fn export<W: Write + ?Sized>(
        &self,
        id: i64,
        format: ExportFormat,
        sink: &mut W,
    ) -> Result<u64> {
        self.api_client.export_infographic(id, format, sink).await
    }

    /// Test API connection
    pub async fn test_connection(&self) -> bool {
        match self.api_client.themes().await {
            Ok(_) => {
                info!("API connection successful");
                true
            }
            Err(e) => {
                error!("API connection failed: {:?}", e);
                false
            }
        }
    }
}
