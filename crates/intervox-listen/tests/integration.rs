use intervox_listen::{EngineRegistry, SessionCallbacks, SessionOptions, SpeechSession};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

fn scripted_config(utterances: &[&str], gap_ms: i64) -> toml::Value {
    let mut table = toml::map::Map::new();
    table.insert(
        "utterances".to_string(),
        toml::Value::Array(
            utterances
                .iter()
                .map(|s| toml::Value::String(s.to_string()))
                .collect(),
        ),
    );
    table.insert("utterance_gap_ms".to_string(), toml::Value::Integer(gap_ms));
    toml::Value::Table(table)
}

async fn scripted_session(utterances: &[&str], gap_ms: i64) -> SpeechSession {
    let registry = EngineRegistry::new();
    let mut engine = registry.create("scripted").unwrap();
    engine
        .initialize(scripted_config(utterances, gap_ms))
        .await
        .unwrap();
    let options = SessionOptions {
        quiet_window: Duration::from_millis(200),
        ..Default::default()
    };
    SpeechSession::new(engine, options)
}

#[tokio::test]
async fn test_full_session_collects_scripted_answer() {
    let session = scripted_session(&["hello there", "how are you"], 10).await;

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let (pause_tx, mut pause_rx) = mpsc::unbounded_channel::<()>();
    let callbacks = SessionCallbacks::new(
        move |chunk| {
            let _ = tx.send(chunk.to_string());
        },
        move || {
            let _ = pause_tx.send(());
        },
    );

    session.start(callbacks).await.unwrap();
    assert!(session.is_listening());

    let timeout = Duration::from_secs(2);
    let first = tokio::time::timeout(timeout, rx.recv())
        .await
        .expect("timed out")
        .expect("closed");
    let second = tokio::time::timeout(timeout, rx.recv())
        .await
        .expect("timed out")
        .expect("closed");
    assert_eq!(first, "hello there");
    assert_eq!(second, "how are you");

    // The quiet window elapses after the script drains.
    tokio::time::timeout(timeout, pause_rx.recv())
        .await
        .expect("pause timed out")
        .expect("closed");

    session.stop().await;
    assert!(!session.is_listening());
    assert_eq!(session.transcript(), "hello there how are you");
}

#[tokio::test]
async fn test_session_survives_engine_end_between_utterances() {
    // The scripted engine fires Ended when its script drains; a session
    // still listening restarts it. Feed a script, let it drain, and verify
    // the transcript survived the restart untouched.
    let session = scripted_session(&["only line"], 10).await;

    let chunks = Arc::new(Mutex::new(Vec::new()));
    let pauses = Arc::new(AtomicUsize::new(0));
    let callbacks = {
        let chunks = Arc::clone(&chunks);
        let pauses = Arc::clone(&pauses);
        SessionCallbacks::new(
            move |chunk| chunks.lock().unwrap().push(chunk.to_string()),
            move || {
                pauses.fetch_add(1, Ordering::SeqCst);
            },
        )
    };
    session.start(callbacks).await.unwrap();

    // Wait for the chunk, the drain-triggered Ended + restart, and the pause.
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(*chunks.lock().unwrap(), vec!["only line".to_string()]);
    assert_eq!(session.transcript(), "only line");
    assert!(session.is_listening(), "restart is invisible to the consumer");
    assert_eq!(pauses.load(Ordering::SeqCst), 1);

    session.stop().await;
}

#[tokio::test]
async fn test_reset_between_questions_reuses_session() {
    // A wide gap leaves room to reset between the two utterances.
    let session = scripted_session(&["answer one", "answer two"], 300).await;

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let callbacks = SessionCallbacks::new(
        move |chunk| {
            let _ = tx.send(chunk.to_string());
        },
        || {},
    );
    session.start(callbacks).await.unwrap();

    let timeout = Duration::from_secs(2);
    let first = tokio::time::timeout(timeout, rx.recv())
        .await
        .expect("timed out")
        .expect("closed");
    assert_eq!(first, "answer one");

    session.reset_transcript();
    assert_eq!(session.transcript(), "");

    let second = tokio::time::timeout(timeout, rx.recv())
        .await
        .expect("timed out")
        .expect("closed");
    assert_eq!(second, "answer two");
    assert_eq!(session.transcript(), "answer two");

    session.stop().await;
}

#[tokio::test]
async fn test_unknown_engine_degrades_to_unsupported_session() {
    let registry = EngineRegistry::new();
    let session = match registry.create("webspeech") {
        Ok(engine) => SpeechSession::new(engine, SessionOptions::default()),
        Err(_) => SpeechSession::unsupported(),
    };
    assert!(!session.is_supported());

    let callbacks = SessionCallbacks::new(|_| {}, || {});
    assert!(session.start(callbacks).await.is_err());
}

#[tokio::test]
async fn test_double_stop_after_answer_is_quiet() {
    let session = scripted_session(&["short answer"], 10).await;

    let pauses = Arc::new(AtomicUsize::new(0));
    let callbacks = {
        let pauses = Arc::clone(&pauses);
        SessionCallbacks::new(
            |_| {},
            move || {
                pauses.fetch_add(1, Ordering::SeqCst);
            },
        )
    };
    session.start(callbacks).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    session.stop().await;
    session.stop().await;

    let observed = pauses.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(pauses.load(Ordering::SeqCst), observed);
    assert!(!session.is_listening());
}
