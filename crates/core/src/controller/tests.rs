use std::sync::{Arc, Mutex};
use std::time::Duration;

use listing_bot_backend::{CategoryRecord, CityRecord, ListingGroup, VendorRecord};
use listing_bot_test_backend::{PresetLookup, TestBackend};
use tokio::sync::watch;
use tokio::time::{Instant, sleep, timeout};

use crate::conversation::Stage;
use crate::message::{Message, Sender};
use crate::{Catalog, Chat, ChatBuilder, ChatSnapshot, prompts};

fn catalog() -> Catalog {
    Catalog::new([
        CategoryRecord::new("1", "Printer Rental", "printer-rental"),
        CategoryRecord::new("2", "Laptop Rental", "laptop-rental"),
    ])
}

fn backend() -> TestBackend {
    let mut backend = TestBackend::default();
    backend.set_cities([CityRecord::named("Pune")]);
    backend.add_lookup(PresetLookup::with_groups([ListingGroup::standard([
        VendorRecord::new("City Laptops", "9000000002"),
    ])]));
    backend
}

fn build(builder: ChatBuilder) -> (Chat, watch::Receiver<usize>) {
    let (idle_tx, idle_rx) = watch::channel(0);
    let chat = builder
        .on_idle(move || {
            idle_tx.send_modify(|count| *count += 1);
        })
        .build();
    (chat, idle_rx)
}

async fn wait_idle(idle_rx: &mut watch::Receiver<usize>, count: usize) {
    timeout(Duration::from_secs(10), idle_rx.wait_for(|n| *n >= count))
        .await
        .unwrap()
        .unwrap();
}

async fn snapshot(chat: &Chat) -> ChatSnapshot {
    chat.snapshot().await.unwrap()
}

fn texts(snapshot: &ChatSnapshot) -> Vec<&str> {
    snapshot.messages.iter().map(|message| message.text()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_typing_delay() {
    let delay = Duration::from_millis(400);
    let (chat, mut idle_rx) = build(
        ChatBuilder::with_backend(backend())
            .with_catalog(catalog())
            .with_typing_delay(delay),
    );

    let started = Instant::now();
    chat.open();
    chat.send_message("hi");

    // The visitor's message shows up before the bot starts typing.
    let before = snapshot(&chat).await;
    assert_eq!(texts(&before), [prompts::GREETING, "hi"]);
    assert_eq!(before.stage, Stage::AwaitingFirstMessage);

    wait_idle(&mut idle_rx, 2).await;
    assert!(started.elapsed() >= delay);

    let after = snapshot(&chat).await;
    assert_eq!(after.messages.len(), 3);
    assert!(after.messages[2].is_option_list());
    assert_eq!(after.stage, Stage::AwaitingCategory);
}

#[tokio::test(start_paused = true)]
async fn test_queued_inputs() {
    let backend = backend();
    let observer = backend.clone();

    let published = Arc::new(Mutex::new(Vec::new()));
    let (chat, mut idle_rx) = build(
        ChatBuilder::with_backend(backend)
            .with_catalog(catalog())
            .with_typing_delay(Duration::from_millis(100))
            .on_message({
                let published = Arc::clone(&published);
                move |message: &Message| published.lock().unwrap().push(message.clone())
            }),
    );

    chat.open();
    for input in ["hi", "Laptop Rental", "Pune", "9876543210"] {
        chat.send_message(input);
    }
    wait_idle(&mut idle_rx, 2).await;

    let snapshot = snapshot(&chat).await;
    assert_eq!(
        texts(&snapshot),
        [
            prompts::GREETING,
            "hi",
            prompts::SELECT_CATEGORY,
            "Laptop Rental",
            prompts::ENTER_CITY,
            "Pune",
            prompts::ENTER_PHONE,
            "9876543210",
            prompts::LISTINGS_FOUND,
        ]
    );
    // Every input waited for the reply to the previous one.
    let senders: Vec<_> = snapshot.messages.iter().map(|m| m.sender()).collect();
    for pair in senders[1..].chunks(2) {
        assert_eq!(pair, [Sender::User, Sender::Bot]);
    }
    assert_eq!(snapshot.stage, Stage::AwaitingFollowUp);
    assert_eq!(*published.lock().unwrap(), snapshot.messages);

    let requests = observer.lookup_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].location, "Pune");
    assert_eq!(requests[0].category, "2");
}

#[tokio::test(start_paused = true)]
async fn test_input_during_lookup() {
    let mut backend = backend();
    backend.set_delay(Duration::from_secs(1));
    let (chat, mut idle_rx) = build(ChatBuilder::with_backend(backend).with_catalog(catalog()));

    chat.open();
    for input in ["hi", "Laptop Rental", "Pune", "9876543210", "thanks"] {
        chat.send_message(input);
    }

    // Handled after the result, not dropped.
    wait_idle(&mut idle_rx, 5).await;
    let snapshot = snapshot(&chat).await;
    let tail: Vec<_> = texts(&snapshot).into_iter().rev().take(3).collect();
    assert_eq!(
        tail,
        [prompts::SELECT_CATEGORY, "thanks", prompts::LISTINGS_FOUND]
    );
    assert_eq!(snapshot.stage, Stage::AwaitingCategory);
    assert!(snapshot.selection.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_close_during_lookup() {
    let mut backend = backend();
    backend.set_delay(Duration::from_secs(1));
    let observer = backend.clone();
    let (chat, mut idle_rx) = build(ChatBuilder::with_backend(backend).with_catalog(catalog()));

    chat.open();
    for input in ["hi", "Laptop Rental", "Pune", "9876543210"] {
        chat.send_message(input);
    }
    assert_eq!(snapshot(&chat).await.stage, Stage::Dispatching);

    chat.close();
    wait_idle(&mut idle_rx, 5).await;
    let closed = snapshot(&chat).await;
    assert_eq!(texts(&closed), [prompts::GREETING]);
    assert_eq!(closed.stage, Stage::AwaitingFirstMessage);
    assert!(closed.selection.is_empty());

    // The aborted lookup never reports back.
    sleep(Duration::from_secs(3)).await;
    let later = snapshot(&chat).await;
    assert_eq!(later, closed);
    assert_eq!(observer.lookup_requests().len(), 1);

    // Reopening starts a fresh conversation.
    chat.open();
    chat.send_message("hello again");
    wait_idle(&mut idle_rx, 7).await;
    let reopened = snapshot(&chat).await;
    assert_eq!(reopened.messages.len(), 3);
    assert!(reopened.messages[2].is_option_list());
}

#[tokio::test(start_paused = true)]
async fn test_select_category() {
    let (chat, mut idle_rx) = build(
        ChatBuilder::with_backend(backend())
            .with_catalog(catalog())
            .with_cities(vec![CityRecord::named("Pune")]),
    );

    chat.open();
    chat.send_message("hi");
    chat.select_category("2");
    wait_idle(&mut idle_rx, 3).await;

    // Unknown ids are ignored, but still end in an idle signal.
    chat.select_category("99");
    wait_idle(&mut idle_rx, 4).await;

    let snapshot = snapshot(&chat).await;
    assert_eq!(
        texts(&snapshot),
        [
            prompts::GREETING,
            "hi",
            prompts::SELECT_CATEGORY,
            "Laptop Rental",
            prompts::ENTER_CITY,
        ]
    );
    assert_eq!(snapshot.selection.category().unwrap().id, "2");
    assert_eq!(snapshot.stage, Stage::AwaitingCity);
}

#[tokio::test(start_paused = true)]
async fn test_lazy_city_fetch() {
    // No cities in the script yet, the first fetch fails.
    let backend = TestBackend::default();
    let mut observer = backend.clone();
    let (chat, mut idle_rx) = build(ChatBuilder::with_backend(backend).with_catalog(catalog()));

    chat.open();
    chat.send_message("hi");
    wait_idle(&mut idle_rx, 2).await;
    timeout(Duration::from_secs(10), async {
        while observer.city_fetch_count() == 0 {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    for input in ["Laptop Rental", "Nowhereville", "9876543210"] {
        chat.send_message(input);
    }
    wait_idle(&mut idle_rx, 5).await;
    let failed = snapshot(&chat).await;
    assert!(!failed.cities_loaded);
    assert_eq!(failed.messages.last().unwrap().text(), prompts::LOOKUP_FAILED);
    assert_eq!(observer.lookup_requests()[0].location, "Nowhereville");

    // The next round fetches again.
    observer.set_cities([CityRecord::named("Pune")]);
    chat.send_message("again");
    wait_idle(&mut idle_rx, 6).await;
    timeout(Duration::from_secs(10), async {
        while !snapshot(&chat).await.cities_loaded {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(observer.city_fetch_count(), 2);

    // Cached from now on, even across a close.
    chat.close();
    chat.open();
    chat.send_message("hi");
    wait_idle(&mut idle_rx, 9).await;
    let snapshot = snapshot(&chat).await;
    assert!(snapshot.cities_loaded);
    assert_eq!(observer.city_fetch_count(), 2);
}

#[tokio::test]
async fn test_preloaded_cities() {
    let backend = backend();
    let observer = backend.clone();
    let (chat, mut idle_rx) = build(
        ChatBuilder::with_backend(backend)
            .with_catalog(catalog())
            .with_cities(vec![CityRecord::named("Pune")]),
    );

    chat.open();
    chat.send_message("hi");
    wait_idle(&mut idle_rx, 2).await;
    assert!(snapshot(&chat).await.cities_loaded);
    assert_eq!(observer.city_fetch_count(), 0);
}
