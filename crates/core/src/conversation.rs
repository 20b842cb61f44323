use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::prompts;
use crate::selection::SelectionState;

/// Where a conversation stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Only the greeting has been shown.
    #[default]
    AwaitingFirstMessage,
    /// The category list is shown and no category is selected.
    AwaitingCategory,
    /// A category is selected, the city is missing.
    AwaitingCity,
    /// Category and city are selected, the phone number is missing.
    AwaitingPhone,
    /// All slots are filled and the lookup is in flight.
    Dispatching,
    /// A lookup has completed; the next input starts over.
    AwaitingFollowUp,
}

/// The transcript of a conversation plus what it has collected so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationStore {
    messages: Vec<Message>,
    selection: SelectionState,
    stage: Stage,
}

impl ConversationStore {
    /// Creates a store holding only the greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::bot(prompts::GREETING)],
            selection: SelectionState::default(),
            stage: Stage::default(),
        }
    }

    /// Appends a message to the transcript.
    #[inline]
    pub fn append_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Truncates the transcript to the greeting and forgets the selection.
    pub fn reset_conversation(&mut self) {
        self.messages.truncate(1);
        self.selection.clear();
        self.stage = Stage::default();
    }

    /// Returns the transcript.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the collected slots.
    #[inline]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Returns the current stage.
    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline]
    pub(crate) fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    #[inline]
    pub(crate) fn set_stage(&mut self, stage: Stage) {
        trace!("stage: {:?} -> {stage:?}", self.stage);
        self.stage = stage;
    }
}

impl Default for ConversationStore {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
