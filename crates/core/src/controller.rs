mod builder;
mod state;
#[cfg(test)]
mod tests;

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::backend_client::BackendClient;
use crate::conversation::Stage;
use crate::flow::Flow;
use crate::message::Message;
use crate::selection::SelectionState;
pub use builder::ChatBuilder;
use state::{Command, ControllerStage};

type MessageCallback = Box<dyn Fn(&Message) + Send + Sync>;
type IdleCallback = Box<dyn Fn() + Send + Sync>;

/// A copy of the conversation at some point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatSnapshot {
    /// The transcript.
    pub messages: Vec<Message>,
    /// The collected slots.
    pub selection: SelectionState,
    /// The stage of the conversation.
    pub stage: Stage,
    /// Whether the city list has been cached.
    pub cities_loaded: bool,
}

/// A running conversation, like a chat dialog with a transcript and an
/// input box.
///
/// Commands sent through this handle are processed in order by a
/// background task. Inputs that arrive while the bot is still typing or
/// waiting for a lookup are queued and handled once it becomes idle. The
/// task stops when the last handle is dropped, aborting whatever is still
/// in flight.
#[derive(Clone)]
pub struct Chat {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl Chat {
    /// Opens the dialog: starts over from the greeting and publishes it.
    #[inline]
    pub fn open(&self) {
        self.send(Command::Open);
    }

    /// Submits what the visitor typed.
    #[inline]
    pub fn send_message<S: Into<String>>(&self, text: S) {
        self.send(Command::Input(text.into()));
    }

    /// Submits a click on a category of an option list. It behaves as if
    /// the category's name was typed.
    #[inline]
    pub fn select_category<S: Into<String>>(&self, category_id: S) {
        self.send(Command::SelectCategory(category_id.into()));
    }

    /// Closes the dialog: cancels pending work and resets the
    /// conversation to the greeting.
    #[inline]
    pub fn close(&self) {
        self.send(Command::Close);
    }

    /// Returns a copy of the conversation, once every command sent before
    /// has been handled.
    pub async fn snapshot(&self) -> Option<ChatSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx));
        rx.await.ok()
    }

    fn send(&self, cmd: Command) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("chat task has been dropped, discard the command");
        }
    }
}

struct ChatState {
    flow: Flow,
    backend: BackendClient,
    typing_delay: Duration,
    current_stage: ControllerStage,
    pending_inputs: VecDeque<String>,
    fetching_cities: bool,
    running_tasks: HashMap<u64, JoinHandle<()>>,
    next_task_id: u64,
    // Bumped on every open and close. Results of tasks spawned in an
    // earlier generation are discarded.
    generation: u64,
    cmd_tx: mpsc::WeakUnboundedSender<Command>,

    on_message: Option<MessageCallback>,
    on_idle: Option<IdleCallback>,
}

impl Chat {
    fn spawn_from_builder(builder: ChatBuilder) -> Self {
        let ChatBuilder {
            backend,
            catalog,
            cities,
            typing_delay,
            on_message,
            on_idle,
        } = builder;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let mut flow = Flow::new(catalog);
        if let Some(cities) = cities {
            flow.cache_cities(cities);
        }

        let state = ChatState {
            flow,
            backend,
            typing_delay,
            current_stage: Default::default(),
            pending_inputs: Default::default(),
            fetching_cities: false,
            running_tasks: Default::default(),
            next_task_id: 1,
            generation: 0,
            cmd_tx: cmd_tx.downgrade(),
            on_message,
            on_idle,
        };
        tokio::spawn(state::run_chat(state, cmd_rx).instrument(trace_span!("chat")));
        Self { cmd_tx }
    }
}
