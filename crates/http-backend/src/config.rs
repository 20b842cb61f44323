use std::fmt::Debug;

const DEFAULT_CATEGORIES_PATH: &str = "get-category-list";

/// Builder for [`HttpConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HttpConfigBuilder {
    base_url: String,
    api_token: Option<String>,
    categories_path: Option<String>,
}

impl HttpConfigBuilder {
    /// Creates a builder with the given API base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            categories_path: None,
        }
    }

    /// Sets a bearer token sent with every request.
    #[inline]
    pub fn with_api_token<S: Into<String>>(mut self, api_token: S) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    /// Sets the path of the site configuration endpoint that lists the
    /// categories.
    #[inline]
    pub fn with_categories_path<S: Into<String>>(mut self, path: S) -> Self {
        self.categories_path = Some(path.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> HttpConfig {
        HttpConfig {
            base_url: self.base_url.trim_end_matches('/').to_owned(),
            api_token: self.api_token.filter(|token| !token.is_empty()),
            categories_path: self
                .categories_path
                .unwrap_or_else(|| DEFAULT_CATEGORIES_PATH.to_owned()),
        }
    }
}

impl Debug for HttpConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfigBuilder")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<deducted>"))
            .field("categories_path", &self.categories_path)
            .finish()
    }
}

/// Configuration for the HTTP listing backend.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HttpConfig {
    pub(crate) base_url: String,
    pub(crate) api_token: Option<String>,
    pub(crate) categories_path: String,
}

impl HttpConfig {
    /// Returns the base URL, without a trailing slash.
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the bearer token, if any.
    #[inline]
    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    /// Returns the path of the categories endpoint.
    #[inline]
    pub fn categories_path(&self) -> &str {
        &self.categories_path
    }

    /// Returns the absolute URL of an endpoint.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<deducted>"))
            .field("categories_path", &self.categories_path)
            .finish()
    }
}
