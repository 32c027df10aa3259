// Site URL composition for local routes

use url::Url;

use crate::config::SiteConfig;

/// Turns a generated route path into a URL for this site
pub trait UrlComposer: Send + Sync {
    /// `protocol` asks for an absolute URL with that scheme (`"https"` or
    /// `"https://"`); `None` keeps whatever form the base URL has.
    fn site(&self, path: &str, protocol: Option<&str>) -> String;
}

/// Joins paths under a base URL and optional index file
#[derive(Debug, Clone)]
pub struct SiteUrl {
    base_url: String,
    index_file: String,
    host: Option<String>,
}

impl SiteUrl {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            index_file: config.index_file.clone(),
            host: config.host.clone().filter(|h| !h.is_empty()),
        }
    }

    fn base(&self, protocol: Option<&str>) -> String {
        let Some(protocol) = protocol else {
            return self.base_url.clone();
        };
        let scheme = protocol.trim_end_matches("://");

        if let Ok(mut absolute) = Url::parse(&self.base_url) {
            if absolute.set_scheme(scheme).is_err() {
                tracing::warn!(base_url = %self.base_url, scheme, "cannot switch base url to requested scheme");
            }
            return absolute.to_string();
        }

        match &self.host {
            Some(host) => format!("{}://{}/{}", scheme, host, self.base_url.trim_start_matches('/')),
            None => {
                tracing::warn!(protocol, "protocol requested but no site host configured, using relative url");
                self.base_url.clone()
            }
        }
    }
}

impl Default for SiteUrl {
    fn default() -> Self {
        Self::new(&SiteConfig::default())
    }
}

impl UrlComposer for SiteUrl {
    fn site(&self, path: &str, protocol: Option<&str>) -> String {
        let mut url = self.base(protocol).trim_end_matches('/').to_string();
        url.push('/');
        if !self.index_file.is_empty() {
            url.push_str(&self.index_file);
            url.push('/');
        }
        url.push_str(&encode_path(path.trim_start_matches('/')));
        url
    }
}

/// Percent-encode path segments that contain non-ASCII characters
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.is_ascii() {
                segment.to_string()
            } else {
                urlencoding::encode(segment).into_owned()
            }
        })
        .collect::<Vec<String>>()
        .join("/")
}
