use std::time::Duration;

use listing_bot_core::backend::ListingBackend;
use listing_bot_core::{Catalog, Chat, ChatBuilder, ChatSnapshot, Message};
use listing_bot_http_backend::{HttpBackend, HttpConfig};

/// Fetches the categories of the site and sorts them for the page at
/// `page_path`.
pub async fn load_catalog<B: ListingBackend>(
    backend: &B,
    page_path: Option<&str>,
) -> Result<Catalog, B::Error> {
    let categories = backend.fetch_categories().await?;
    debug!("loaded {} categories", categories.len());
    let catalog = Catalog::new(categories);
    Ok(match page_path {
        Some(path) => catalog.with_page_path(path),
        None => catalog,
    })
}

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    chat_builder: ChatBuilder,
}

impl SessionBuilder {
    /// Creates a session builder talking to the listing HTTP API.
    pub fn with_http_config(config: HttpConfig) -> Self {
        Self::with_backend(HttpBackend::new(config))
    }

    /// Creates a session builder with a specified backend.
    pub fn with_backend<B: ListingBackend + 'static>(backend: B) -> Self {
        let chat_builder = ChatBuilder::with_backend(backend);
        Self { chat_builder }
    }

    /// Sets the categories offered to the visitor.
    #[inline]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.chat_builder = self.chat_builder.with_catalog(catalog);
        self
    }

    /// Sets how long the bot "types" before each reply.
    #[inline]
    pub fn with_typing_delay(mut self, typing_delay: Duration) -> Self {
        self.chat_builder = self.chat_builder.with_typing_delay(typing_delay);
        self
    }

    /// Attaches a callback to be invoked when the session is idle.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.chat_builder = self.chat_builder.on_idle(on_idle);
        self
    }

    /// Attaches a callback to be invoked when a message is appended to the
    /// transcript.
    #[inline]
    pub fn on_message(
        mut self,
        on_message: impl Fn(&Message) + Send + Sync + 'static,
    ) -> Self {
        self.chat_builder = self.chat_builder.on_message(on_message);
        self
    }

    /// Builds a new session and opens the dialog.
    pub fn build(self) -> Session {
        let chat = self.chat_builder.build();
        chat.open();
        Session { chat }
    }
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session is basically a wrapper around [`Chat`] that is already
/// opened when built.
pub struct Session {
    chat: Chat,
}

impl Session {
    /// Sends a message to the session.
    #[inline]
    pub fn send_message(&self, message: &str) {
        self.chat.send_message(message);
    }

    /// Picks a category from an option list.
    #[inline]
    pub fn select_category(&self, category_id: &str) {
        self.chat.select_category(category_id);
    }

    /// Closes the dialog and opens it again, starting over from the
    /// greeting.
    pub fn restart(&self) {
        self.chat.close();
        self.chat.open();
    }

    /// Returns a copy of the conversation.
    #[inline]
    pub async fn snapshot(&self) -> Option<ChatSnapshot> {
        self.chat.snapshot().await
    }
}
