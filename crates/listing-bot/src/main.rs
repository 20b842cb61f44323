//! A terminal front-end for the listing chat bot.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use listing_bot::core::backend::CategoryRecord;
use listing_bot::core::{Message, Sender};
use listing_bot::{AppConfig, Session, SessionBuilder, load_catalog};
use listing_bot_http_backend::HttpBackend;
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

enum SessionEvent {
    Idle,
    Message(Message),
}

enum Input<'a> {
    Quit,
    Restart,
    Transcript,
    Pick(&'a str),
    Text(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "/quit" => Input::Quit,
            "/restart" => Input::Restart,
            "/transcript" => Input::Transcript,
            _ => match line.strip_prefix("/pick") {
                Some(index) => Input::Pick(index.trim()),
                None => Input::Text(line),
            },
        }
    }
}

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    debug!("starting with {config:?}");

    let backend = HttpBackend::new(config.http);
    let catalog = match load_catalog(&backend, config.page_path.as_deref()).await {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("failed to load the categories: {err}");
            return;
        }
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let session = SessionBuilder::with_backend(backend)
        .with_catalog(catalog)
        .with_typing_delay(config.typing_delay)
        .on_idle({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(SessionEvent::Idle).ok();
            }
        })
        .on_message({
            let event_tx = event_tx.clone();
            move |message| {
                event_tx.send(SessionEvent::Message(message.clone())).ok();
            }
        })
        .build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    // Categories of the last option list, for `/pick`.
    let mut options = Vec::new();
    // The session publishes the greeting when built.
    let mut idle_events = 1;

    'outer: loop {
        if idle_events == 0 {
            print!("> ");
            std::io::stdout().flush().unwrap();

            let Some(line) = read_line().await else {
                break;
            };
            match Input::parse(&line) {
                Input::Quit => break,
                Input::Restart => {
                    println!();
                    session.restart();
                    // One for closing, one for opening.
                    idle_events = 2;
                }
                Input::Transcript => {
                    print_transcript(&session).await;
                    continue;
                }
                Input::Pick(index) => {
                    let Some(category) = pick(&options, index) else {
                        println!(
                            "{}",
                            "Usage: /pick N, where N is a number from the list."
                                .bright_red()
                        );
                        continue;
                    };
                    session.select_category(&category.id);
                    idle_events = 1;
                }
                Input::Text(text) => {
                    session.send_message(text);
                    idle_events = 1;
                }
            }
        }

        let mut progress_bar = None;

        loop {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message("💬 Typing...");
                    progress_bar
                })
                .inc(1);

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = &progress_bar {
                progress_bar.finish_and_clear();
            }
            progress_bar = None;

            match event {
                SessionEvent::Message(message) => {
                    if message.is_option_list() {
                        options = message.list_items().to_vec();
                    }
                    print_message(&message);
                }
                SessionEvent::Idle => {
                    idle_events -= 1;
                    if idle_events == 0 {
                        break;
                    }
                }
            }
        }
    }
}

fn pick<'a>(options: &'a [CategoryRecord], index: &str) -> Option<&'a CategoryRecord> {
    let index: usize = index.parse().ok()?;
    options.get(index.checked_sub(1)?)
}

fn print_message(message: &Message) {
    // The visitor's own messages are already on the screen.
    if message.sender() == Sender::User {
        return;
    }

    println!("{}🤖 {}", BAR_CHAR.bright_cyan(), message.text().bright_white());
    for (index, category) in message.list_items().iter().enumerate() {
        println!("{}  {}. {}", BAR_CHAR.bright_cyan(), index + 1, category.name);
    }

    if message.is_final_result() {
        let sections = [
            ("Premium", message.premium_vendors()),
            ("Standard", message.standard_vendors()),
        ];
        for (title, vendors) in sections {
            if vendors.is_empty() {
                continue;
            }
            println!("{}  {}", BAR_CHAR.bright_yellow(), title.bold());
            for vendor in vendors {
                let phone_number = match vendor.phone_number.as_str() {
                    "" => "-",
                    phone_number => phone_number,
                };
                println!(
                    "{}  {} {}",
                    BAR_CHAR.bright_yellow(),
                    vendor.name.bright_white(),
                    phone_number.dimmed()
                );
            }
        }
    }
    println!();
}

async fn print_transcript(session: &Session) {
    let Some(snapshot) = session.snapshot().await else {
        error!("session is gone");
        return;
    };
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => error!("failed to serialize the transcript: {err}"),
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
