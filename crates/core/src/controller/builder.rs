use std::time::Duration;

use listing_bot_backend::{CityRecord, ListingBackend};

use super::{Chat, IdleCallback, MessageCallback};
use crate::backend_client::BackendClient;
use crate::catalog::Catalog;
use crate::message::Message;

/// [`Chat`] builder.
pub struct ChatBuilder {
    pub(crate) backend: BackendClient,
    pub(crate) catalog: Catalog,
    pub(crate) cities: Option<Vec<CityRecord>>,
    pub(crate) typing_delay: Duration,
    pub(crate) on_message: Option<MessageCallback>,
    pub(crate) on_idle: Option<IdleCallback>,
}

impl ChatBuilder {
    /// Creates a new builder with the specified backend.
    #[inline]
    pub fn with_backend<B: ListingBackend + 'static>(backend: B) -> Self {
        Self {
            backend: BackendClient::new(backend),
            catalog: Catalog::default(),
            cities: None,
            typing_delay: Duration::ZERO,
            on_message: None,
            on_idle: None,
        }
    }

    /// Sets the categories offered to the visitor.
    #[inline]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Provides the city list upfront, so it won't be fetched lazily.
    #[inline]
    pub fn with_cities(mut self, cities: Vec<CityRecord>) -> Self {
        self.cities = Some(cities);
        self
    }

    /// Sets how long the bot "types" before each reply.
    #[inline]
    pub fn with_typing_delay(mut self, typing_delay: Duration) -> Self {
        self.typing_delay = typing_delay;
        self
    }

    /// Attaches a callback to be invoked whenever a message is appended to
    /// the transcript, including the greeting and the visitor's messages.
    #[inline]
    pub fn on_message(
        mut self,
        on_message: impl Fn(&Message) + Send + Sync + 'static,
    ) -> Self {
        self.on_message = Some(Box::new(on_message));
        self
    }

    /// Attaches a callback to be invoked when the chat is idle.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the chat and starts its task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[inline]
    pub fn build(self) -> Chat {
        Chat::spawn_from_builder(self)
    }
}
