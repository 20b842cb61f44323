//! A listing backend talking to the site's REST API.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use listing_bot_backend::{
    BackendError, CategoryRecord, CityRecord, ErrorKind, ListingBackend,
    LookupRequest, LookupResponse,
};
use mime::Mime;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, header};
use tracing::Instrument;

pub use config::{HttpConfig, HttpConfigBuilder};

/// Error type for [`HttpBackend`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {}

impl BackendError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Listing backend served over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    config: Arc<HttpConfig>,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` with the given configuration.
    #[inline]
    pub fn new(config: HttpConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Creates a new `HttpBackend` sending requests through `client`.
    #[inline]
    pub fn with_client(config: HttpConfig, client: Client) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(header::ACCEPT, "application/json");
        match &self.config.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.request(self.client.get(self.config.endpoint(path)))
    }
}

impl ListingBackend for HttpBackend {
    type Error = Error;

    fn fetch_categories(
        &self,
    ) -> impl Future<Output = Result<Vec<CategoryRecord>, Self::Error>>
    + Send
    + 'static {
        let endpoint = self.config.categories_path.clone();
        let resp_fut = self.get(&endpoint).send();

        async move {
            let body = read_body(resp_fut.await).await?;
            proto::decode_list(&endpoint, &body)
        }
        .instrument(debug_span!("fetch categories"))
    }

    fn fetch_cities(
        &self,
    ) -> impl Future<Output = Result<Vec<CityRecord>, Self::Error>> + Send + 'static
    {
        let resp_fut = self.get(proto::CITY_LIST_PATH).send();

        async move {
            let body = read_body(resp_fut.await).await?;
            proto::decode_list(proto::CITY_LIST_PATH, &body)
        }
        .instrument(debug_span!("fetch cities"))
    }

    fn lookup_listings(
        &self,
        req: &LookupRequest,
    ) -> impl Future<Output = Result<LookupResponse, Self::Error>> + Send + 'static
    {
        let form = req
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name, value.to_owned())
            });
        let resp_fut = self
            .request(
                self.client
                    .post(self.config.endpoint(proto::LOOKUP_PATH)),
            )
            .multipart(form)
            .send();

        async move {
            let body = read_body(resp_fut.await).await?;
            proto::decode(proto::LOOKUP_PATH, &body)
        }
        .instrument(debug_span!("lookup listings"))
    }
}

async fn read_body(resp: reqwest::Result<Response>) -> Result<String, Error> {
    let resp = match resp {
        Ok(resp) => resp,
        Err(err) => {
            return Err(Error::new(format!("{err}"), ErrorKind::Transport));
        }
    };
    let resp = match resp.error_for_status() {
        Ok(resp) => resp,
        Err(err) => {
            return Err(Error::new(format!("{err}"), ErrorKind::Status));
        }
    };

    // Some deployments label JSON as HTML, so only complain about it.
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let is_json = content_type
        .and_then(|v| v.parse().ok())
        .map(|m: Mime| {
            m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON)
        })
        .unwrap_or(false);
    if !is_json {
        warn!("unexpected content type: {content_type:?}");
    }

    let body = resp
        .text()
        .await
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Transport))?;
    trace!("got a body of {} bytes", body.len());
    Ok(body)
}
