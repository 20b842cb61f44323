use std::fmt::{self, Debug};

use listing_bot_backend::CityRecord;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;

use super::{ChatSnapshot, ChatState};
use crate::backend_client::BackendResult;
use crate::dispatcher;
use crate::message::Message;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) enum ControllerStage {
    #[default]
    Idle,
    Typing,
    LookingUp,
}

pub(super) enum Command {
    Open,
    Close,
    Input(String),
    SelectCategory(String),
    Snapshot(oneshot::Sender<ChatSnapshot>),
    Typed {
        generation: u64,
        input: String,
    },
    CitiesFetched {
        generation: u64,
        result: BackendResult<Vec<CityRecord>>,
    },
    LookupFinished {
        generation: u64,
        message: Message,
    },
    TaskEnded(u64),
}

impl Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Open => f.write_str("Open"),
            Command::Close => f.write_str("Close"),
            Command::Input(input) => f.debug_tuple("Input").field(input).finish(),
            Command::SelectCategory(id) => {
                f.debug_tuple("SelectCategory").field(id).finish()
            }
            Command::Snapshot(_) => f.write_str("Snapshot"),
            Command::Typed { generation, input } => f
                .debug_struct("Typed")
                .field("generation", generation)
                .field("input", input)
                .finish(),
            Command::CitiesFetched { generation, result } => f
                .debug_struct("CitiesFetched")
                .field("generation", generation)
                .field("ok", &result.is_ok())
                .finish(),
            Command::LookupFinished {
                generation,
                message,
            } => f
                .debug_struct("LookupFinished")
                .field("generation", generation)
                .field("message", &message.text())
                .finish(),
            Command::TaskEnded(id) => f.debug_tuple("TaskEnded").field(id).finish(),
        }
    }
}

pub(super) async fn run_chat(
    mut state: ChatState,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    debug!("started");
    // Tasks only hold weak senders, so this ends with the last `Chat`.
    while let Some(cmd) = cmd_rx.recv().await {
        trace!("received command: {cmd:?}");
        state.handle(cmd);
    }
    debug!("will terminate");
}

impl ChatState {
    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Open => {
                self.start_generation();
                if let Some(greeting) = self.flow.store().messages().first() {
                    self.notify(greeting);
                }
                self.process_next_input();
            }
            Command::Close => {
                self.start_generation();
                self.process_next_input();
            }
            Command::Input(input) => self.enqueue_user_input(input),
            Command::SelectCategory(id) => {
                match self.flow.catalog().find_by_id(&id) {
                    Some(category) => {
                        let name = category.name.clone();
                        self.enqueue_user_input(name);
                    }
                    None => {
                        warn!("unknown category: {id}");
                        self.process_next_input();
                    }
                }
            }
            Command::Snapshot(tx) => {
                tx.send(self.snapshot()).ok();
            }
            Command::Typed { generation, input } => {
                if self.is_current(generation) {
                    self.respond(&input);
                }
            }
            Command::CitiesFetched { generation, result } => {
                if self.is_current(generation) {
                    self.fetching_cities = false;
                    // Failures were logged by the client; unmatched cities
                    // fall back to free text until a later fetch succeeds.
                    if let Ok(cities) = result {
                        self.flow.cache_cities(cities);
                    }
                }
            }
            Command::LookupFinished {
                generation,
                message,
            } => {
                if self.is_current(generation) {
                    self.flow.finish_lookup(message.clone());
                    self.notify(&message);
                    self.current_stage = ControllerStage::Idle;
                    self.process_next_input();
                }
            }
            Command::TaskEnded(id) => {
                // Aborted tasks have already been removed.
                self.running_tasks.remove(&id);
            }
        }
    }

    fn enqueue_user_input(&mut self, input: String) {
        if self.current_stage != ControllerStage::Idle {
            // Handle it later, when the current reply or lookup is done.
            self.pending_inputs.push_back(input);
            return;
        }
        self.process_input_checked(input);
    }

    fn process_next_input(&mut self) {
        if self.current_stage != ControllerStage::Idle {
            return;
        }
        if let Some(input) = self.pending_inputs.pop_front() {
            self.process_input_checked(input);
        } else if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }

    /// Process the input string, assuming the stage is checked.
    fn process_input_checked(&mut self, input: String) {
        let Some(message) = self.flow.push_user(&input) else {
            trace!("ignored a blank input");
            self.process_next_input();
            return;
        };
        self.notify(&message);

        if self.typing_delay.is_zero() {
            self.respond(&input);
            return;
        }

        self.current_stage = ControllerStage::Typing;
        let delay = self.typing_delay;
        let generation = self.generation;
        let cmd_tx = self.cmd_tx.clone();
        self.spawn_task(async move {
            sleep(delay).await;
            if let Some(cmd_tx) = cmd_tx.upgrade() {
                cmd_tx.send(Command::Typed { generation, input }).ok();
            }
        });
    }

    fn respond(&mut self, input: &str) {
        let advance = self.flow.advance(input);
        for reply in &advance.replies {
            self.notify(reply);
        }
        if advance.fetch_cities {
            self.fetch_cities();
        }

        if let Some(req) = advance.lookup {
            self.current_stage = ControllerStage::LookingUp;
            let backend = self.backend.clone();
            let generation = self.generation;
            let cmd_tx = self.cmd_tx.clone();
            self.spawn_task(async move {
                let message = dispatcher::dispatch(&backend, req).await;
                if let Some(cmd_tx) = cmd_tx.upgrade() {
                    cmd_tx
                        .send(Command::LookupFinished {
                            generation,
                            message,
                        })
                        .ok();
                }
            });
            return;
        }

        self.current_stage = ControllerStage::Idle;
        self.process_next_input();
    }

    fn fetch_cities(&mut self) {
        if self.fetching_cities {
            return;
        }
        self.fetching_cities = true;

        let backend = self.backend.clone();
        let generation = self.generation;
        let cmd_tx = self.cmd_tx.clone();
        self.spawn_task(async move {
            let result = backend.fetch_cities().await;
            if let Some(cmd_tx) = cmd_tx.upgrade() {
                cmd_tx
                    .send(Command::CitiesFetched { generation, result })
                    .ok();
            }
        });
    }

    /// Cancels everything in flight and resets the conversation.
    fn start_generation(&mut self) {
        self.generation += 1;
        debug!(
            "generation {}, aborting {} tasks",
            self.generation,
            self.running_tasks.len()
        );
        self.abort_tasks();
        self.pending_inputs.clear();
        self.fetching_cities = false;
        self.current_stage = ControllerStage::Idle;
        self.flow.reset();
    }

    fn is_current(&self, generation: u64) -> bool {
        let current = generation == self.generation;
        if !current {
            debug!("discard a result from generation {generation}");
        }
        current
    }

    fn spawn_task<F>(&mut self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let cmd_tx = self.cmd_tx.clone();
        let task = tokio::spawn(async move {
            fut.await;
            if let Some(cmd_tx) = cmd_tx.upgrade() {
                cmd_tx.send(Command::TaskEnded(task_id)).ok();
            }
        });
        self.running_tasks.insert(task_id, task);
    }

    fn abort_tasks(&mut self) {
        for (_, task) in self.running_tasks.drain() {
            task.abort();
        }
    }

    fn notify(&self, message: &Message) {
        if let Some(on_message) = &self.on_message {
            on_message(message);
        }
    }

    fn snapshot(&self) -> ChatSnapshot {
        let store = self.flow.store();
        ChatSnapshot {
            messages: store.messages().to_vec(),
            selection: store.selection().clone(),
            stage: store.stage(),
            cities_loaded: self.flow.has_cities(),
        }
    }
}

impl Drop for ChatState {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}
