use listing_bot_backend::{CityRecord, LookupRequest};

use crate::catalog::Catalog;
use crate::classifier::{self, Classification};
use crate::conversation::{ConversationStore, Stage};
use crate::message::Message;
use crate::prompts;

/// What the caller has to do after the flow advanced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Advance {
    /// Bot messages appended to the transcript, in order.
    pub replies: Vec<Message>,
    /// The city list should be fetched in the background.
    pub fetch_cities: bool,
    /// All slots are filled; this lookup should be sent exactly once and
    /// its outcome reported through [`Flow::finish_lookup`].
    pub lookup: Option<LookupRequest>,
}

/// The conversation flow without any I/O.
///
/// `Flow` binds the store, the classifier and the catalog together. It
/// decides what to say and when a lookup is due, but the actual network
/// calls and delays are left to the caller (see [`crate::Chat`]).
#[derive(Clone, Debug)]
pub struct Flow {
    store: ConversationStore,
    catalog: Catalog,
    cities: Option<Vec<CityRecord>>,
}

impl Flow {
    /// Creates a flow presenting the categories of `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            store: ConversationStore::new(),
            catalog,
            cities: None,
        }
    }

    /// Returns the underlying store.
    #[inline]
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Returns the catalog.
    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns `true` once the city list has been cached.
    #[inline]
    pub fn has_cities(&self) -> bool {
        self.cities.is_some()
    }

    /// Caches the city list used to match city inputs.
    pub fn cache_cities(&mut self, cities: Vec<CityRecord>) {
        debug!("cached {} cities", cities.len());
        self.cities = Some(cities);
    }

    /// Records what the visitor typed. Returns the appended message, or
    /// `None` if the input is blank or a lookup is in flight, in which case
    /// nothing is recorded.
    pub fn push_user(&mut self, input: &str) -> Option<Message> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if self.store.stage() == Stage::Dispatching {
            warn!("input while a lookup is in flight: {input:?}");
            return None;
        }
        let message = Message::user(input);
        self.store.append_message(message.clone());
        Some(message)
    }

    /// Advances the conversation with an input already recorded by
    /// [`Flow::push_user`].
    pub fn advance(&mut self, input: &str) -> Advance {
        let input = input.trim();
        if input.is_empty() {
            return Advance::default();
        }

        let cities = self.cities.as_deref().unwrap_or_default();
        let classification =
            classifier::classify(self.store.stage(), input, &self.catalog, cities);
        trace!("classified {input:?} as {classification:?}");

        let mut advance = Advance::default();
        match classification {
            Classification::Greeting | Classification::FollowUp => {
                self.store.selection_mut().clear();
                self.reply(
                    &mut advance,
                    Message::option_list(
                        prompts::SELECT_CATEGORY,
                        self.catalog.ordered_for_topic(),
                    ),
                );
                self.store.set_stage(Stage::AwaitingCategory);
                advance.fetch_cities = self.cities.is_none();
            }
            Classification::Category(category) => {
                self.store.selection_mut().set_category(category);
                self.reply(&mut advance, Message::bot(prompts::ENTER_CITY));
                self.store.set_stage(Stage::AwaitingCity);
            }
            Classification::UnknownCategory => {
                self.reply(
                    &mut advance,
                    Message::option_list(
                        prompts::INVALID_CATEGORY,
                        self.catalog.categories().to_vec(),
                    ),
                );
            }
            Classification::City(city) => {
                self.store.selection_mut().set_city(city);
                self.reply(&mut advance, Message::bot(prompts::ENTER_PHONE));
                self.store.set_stage(Stage::AwaitingPhone);
            }
            Classification::Phone(phone) => {
                self.store.selection_mut().set_phone_number(phone);
                match self.store.selection().lookup_request() {
                    Some(req) => {
                        self.store.set_stage(Stage::Dispatching);
                        advance.lookup = Some(req);
                    }
                    None => {
                        // Only reachable if slots were filled out of order.
                        error!("selection is incomplete: {:?}", self.store.selection());
                        self.reply(&mut advance, Message::bot(prompts::LOOKUP_FAILED));
                        self.store.set_stage(Stage::AwaitingFollowUp);
                    }
                }
            }
            Classification::InvalidPhone => {
                self.reply(&mut advance, Message::bot(prompts::INVALID_PHONE));
            }
            Classification::Busy => {
                warn!("input while a lookup is in flight: {input:?}");
            }
        }
        advance
    }

    /// Records and advances in one go.
    #[inline]
    pub fn submit(&mut self, input: &str) -> Advance {
        if self.push_user(input).is_none() {
            return Advance::default();
        }
        self.advance(input)
    }

    /// Reports the outcome of the lookup returned by [`Flow::advance`].
    pub fn finish_lookup(&mut self, message: Message) {
        if self.store.stage() != Stage::Dispatching {
            warn!("no lookup in flight, discard the result");
            return;
        }
        self.store.append_message(message);
        self.store.set_stage(Stage::AwaitingFollowUp);
    }

    /// Starts over from the greeting. Cached cities are kept.
    #[inline]
    pub fn reset(&mut self) {
        self.store.reset_conversation();
    }

    fn reply(&mut self, advance: &mut Advance, message: Message) {
        self.store.append_message(message.clone());
        advance.replies.push(message);
    }
}

#[cfg(test)]
mod tests {
    use listing_bot_backend::{CategoryRecord, ListingGroup, LookupResponse, VendorRecord};

    use super::*;
    use crate::dispatcher;
    use crate::selection::CitySelection;

    fn flow() -> Flow {
        let catalog = Catalog::new([
            CategoryRecord::new("1", "Printer Rental", "printer-rental"),
            CategoryRecord::new("2", "Laptop Rental", "laptop-rental"),
        ])
        .with_page_path("/laptop-rental-in-pune");
        Flow::new(catalog)
    }

    fn last_text(flow: &Flow) -> &str {
        flow.store().messages().last().unwrap().text()
    }

    #[test]
    fn test_full_cycle() {
        let mut flow = flow();

        let advance = flow.submit("hi");
        assert!(advance.fetch_cities);
        assert_eq!(advance.replies.len(), 1);
        let ids: Vec<_> = advance.replies[0]
            .list_items()
            .iter()
            .map(|category| category.id.as_str())
            .collect();
        assert_eq!(ids, ["2", "1"]);
        assert_eq!(flow.store().stage(), Stage::AwaitingCategory);

        flow.cache_cities(vec![CityRecord::named("Pune")]);

        let advance = flow.submit("laptop rental");
        assert_eq!(advance.replies[0].text(), prompts::ENTER_CITY);
        assert_eq!(flow.store().selection().category().unwrap().id, "2");

        let advance = flow.submit("PUNE");
        assert_eq!(advance.replies[0].text(), prompts::ENTER_PHONE);
        assert_eq!(
            flow.store().selection().city(),
            Some(&CitySelection::Listed(CityRecord::named("Pune")))
        );

        let advance = flow.submit("9876543210");
        assert!(advance.replies.is_empty());
        let req = advance.lookup.unwrap();
        assert_eq!(req.location, "Pune");
        assert_eq!(req.category, "2");
        assert_eq!(flow.store().stage(), Stage::Dispatching);

        let message = dispatcher::result_message::<String>(Ok(LookupResponse {
            data: vec![ListingGroup::premium([VendorRecord::new("Prime", "9000000001")])],
        }));
        flow.finish_lookup(message);
        assert_eq!(flow.store().stage(), Stage::AwaitingFollowUp);
        assert!(flow.store().messages().last().unwrap().is_final_result());

        // A follow-up starts over without fetching the cities again.
        let advance = flow.submit("another one");
        assert!(!advance.fetch_cities);
        assert!(advance.replies[0].is_option_list());
        assert!(flow.store().selection().is_empty());
        assert_eq!(flow.store().stage(), Stage::AwaitingCategory);
    }

    #[test]
    fn test_reprompts_keep_slots() {
        let mut flow = flow();
        flow.submit("hi");

        let advance = flow.submit("Bicycles");
        assert_eq!(advance.replies[0].text(), prompts::INVALID_CATEGORY);
        // The full list is reattached in its original order.
        assert_eq!(advance.replies[0].list_items(), flow.catalog().categories());
        assert_eq!(flow.store().stage(), Stage::AwaitingCategory);

        flow.submit("Printer Rental");
        flow.submit("Nowhereville");
        let selection = flow.store().selection().clone();

        let advance = flow.submit("12345");
        assert_eq!(advance.replies[0].text(), prompts::INVALID_PHONE);
        assert!(advance.lookup.is_none());
        assert_eq!(flow.store().selection(), &selection);
        assert_eq!(flow.store().stage(), Stage::AwaitingPhone);
        assert_eq!(last_text(&flow), prompts::INVALID_PHONE);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut flow = flow();
        assert_eq!(flow.submit("   "), Advance::default());
        assert_eq!(flow.store().messages().len(), 1);
        assert_eq!(flow.store().stage(), Stage::AwaitingFirstMessage);
    }

    #[test]
    fn test_busy_while_dispatching() {
        let mut flow = flow();
        for input in ["hi", "Laptop Rental", "Pune", "9876543210"] {
            flow.submit(input);
        }
        let transcript = flow.store().messages().to_vec();

        assert_eq!(flow.push_user("hello?"), None);
        let advance = flow.submit("hello?");
        assert_eq!(advance, Advance::default());
        assert_eq!(flow.store().messages(), transcript);
        assert_eq!(flow.store().stage(), Stage::Dispatching);
    }

    #[test]
    fn test_late_result_after_reset() {
        let mut flow = flow();
        for input in ["hi", "Laptop Rental", "Pune", "9876543210"] {
            flow.submit(input);
        }
        flow.reset();
        flow.finish_lookup(dispatcher::result_message::<String>(Ok(
            LookupResponse::default(),
        )));
        assert_eq!(flow.store().messages().len(), 1);
        assert_eq!(flow.store().stage(), Stage::AwaitingFirstMessage);
    }
}
