use crate::decode;
use chrono::{DateTime, Utc};
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// An infographic as returned by the Infogram API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Infographic {
    pub id: i64,
    pub title: String,
    #[serde(rename = "thumbnail_url", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Url>,
    pub theme_id: i64,
    pub published: bool,
    #[serde(rename = "date_modified", skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
}

/// A theme infographics can be rendered with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: i64,
    pub title: String,
    #[serde(rename = "thumbnail_url", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Url>,
}

/// Rendered formats an infographic can be downloaded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Png,
    Html,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
            ExportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Missing keys keep their default, unknown keys are skipped, and a present
// key with the wrong type fails with a message naming that key.

impl<'de> Deserialize<'de> for Infographic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(InfographicVisitor)
    }
}

struct InfographicVisitor;

impl<'de> Visitor<'de> for InfographicVisitor {
    type Value = Infographic;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an infographic object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Infographic, A::Error> {
        let mut infographic = Infographic::default();

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "id" => infographic.id = decode::int(&mut map, "id")?,
                "title" => infographic.title = decode::string(&mut map, "title")?,
                "thumbnail_url" => {
                    infographic.thumbnail = Some(decode::url(&mut map, "thumbnail_url")?)
                }
                "theme_id" => infographic.theme_id = decode::int(&mut map, "theme_id")?,
                "published" => infographic.published = decode::boolean(&mut map, "published")?,
                "date_modified" => {
                    infographic.modified = Some(decode::timestamp(&mut map, "date_modified")?)
                }
                "url" => infographic.url = Some(decode::url(&mut map, "url")?),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(infographic)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ThemeVisitor)
    }
}

struct ThemeVisitor;

impl<'de> Visitor<'de> for ThemeVisitor {
    type Value = Theme;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a theme object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Theme, A::Error> {
        let mut theme = Theme::default();

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "id" => theme.id = decode::int(&mut map, "id")?,
                "title" => theme.title = decode::string(&mut map, "title")?,
                "thumbnail_url" => theme.thumbnail = Some(decode::url(&mut map, "thumbnail_url")?),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(theme)
    }
}
