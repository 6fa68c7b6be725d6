use url::Url;

use crate::csrf::{CookieJar, DEFAULT_COOKIE_NAME};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid dashboard URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("dashboard URL must use http or https, got {0}")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub base_url: Url,
    pub cookie_header: String,
    pub csrf_cookie_name: String,
}

impl DashboardConfig {
    pub fn new(
        base_url: &str,
        cookie_header: Option<String>,
        csrf_cookie_name: Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            cookie_header: cookie_header.unwrap_or_default(),
            csrf_cookie_name: csrf_cookie_name.unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
        })
    }

    pub fn cookie_jar(&self) -> CookieJar {
        CookieJar::new(self.cookie_header.clone(), self.csrf_cookie_name.clone())
    }
}

/// Endpoint paths are joined relative to the base, so the base always ends
/// in `/` to keep any mount prefix.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_mount_prefix() {
        let url = parse_base_url("https://clinic.example.org/dashboard").unwrap();
        assert_eq!(url.as_str(), "https://clinic.example.org/dashboard/");
        assert_eq!(
            url.join("predictions/api/models/").unwrap().as_str(),
            "https://clinic.example.org/dashboard/predictions/api/models/"
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            parse_base_url("ftp://clinic.example.org"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn defaults_the_csrf_cookie_name() {
        let config = DashboardConfig::new(
            "http://localhost:8000",
            Some("csrftoken=xyz".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(config.csrf_cookie_name, "csrftoken");
        assert_eq!(config.cookie_jar().csrf_token().as_deref(), Some("xyz"));
    }
}
