use listing_bot_backend::CategoryRecord;

/// The categories a conversation offers, plus the topic of the page the
/// chat runs on.
///
/// Categories come from the site configuration and are handed to the
/// controller at construction. The topic only affects the order in which
/// they are presented.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<CategoryRecord>,
    topic_slug: Option<String>,
}

impl Catalog {
    /// Creates a catalog without a topic.
    #[inline]
    pub fn new(categories: impl Into<Vec<CategoryRecord>>) -> Self {
        Self {
            categories: categories.into(),
            topic_slug: None,
        }
    }

    /// Sets the topic from the path (or URL) of the hosting page.
    #[inline]
    pub fn with_page_path(mut self, path: &str) -> Self {
        self.topic_slug = topic_slug_from_path(path);
        self
    }

    /// Returns the categories in their original order.
    #[inline]
    pub fn categories(&self) -> &[CategoryRecord] {
        &self.categories
    }

    /// Returns the topic slug, if any.
    #[inline]
    pub fn topic_slug(&self) -> Option<&str> {
        self.topic_slug.as_deref()
    }

    /// Returns the categories with the ones matching the page topic first.
    ///
    /// A category matches when its slug is non-empty and occurs in the
    /// topic slug, ignoring case. Both groups keep their original relative
    /// order.
    pub fn ordered_for_topic(&self) -> Vec<CategoryRecord> {
        let Some(topic) = self.topic_slug.as_deref() else {
            return self.categories.clone();
        };

        let (mut matching, rest): (Vec<_>, Vec<_>) =
            self.categories.iter().cloned().partition(|category| {
                let slug = category.slug.trim().to_lowercase();
                !slug.is_empty() && topic.contains(&slug)
            });
        matching.extend(rest);
        matching
    }

    /// Finds a category by its display name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&CategoryRecord> {
        self.categories
            .iter()
            .find(|category| same_name(&category.name, name))
    }

    /// Finds a category by its identifier.
    pub fn find_by_id(&self, id: &str) -> Option<&CategoryRecord> {
        self.categories.iter().find(|category| category.id == id)
    }
}

/// Derives the topic slug from the path or URL of a page: the last
/// non-empty path segment, without query or fragment, in lowercase.
///
/// ```
/// # use listing_bot_core::topic_slug_from_path;
/// assert_eq!(
///     topic_slug_from_path("https://example.com/rent/Laptop-Rental-Mumbai?ref=home"),
///     Some("laptop-rental-mumbai".to_owned())
/// );
/// assert_eq!(topic_slug_from_path("/"), None);
/// ```
pub fn topic_slug_from_path(path: &str) -> Option<String> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    // Skip the scheme and the host of absolute URLs.
    let path = match path.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or(""),
        None => path,
    };
    path.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_lowercase)
}

/// Compares two display names the way visitors expect: surrounding spaces
/// and letter case don't matter.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
