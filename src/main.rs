use anyhow::{bail, Context, Result};
use clap::Parser;
use intervox_core::{AppConfig, QaPair, QaSummary};
use intervox_generate::GenerationClient;
use intervox_listen::{EngineRegistry, SessionCallbacks, SessionOptions, SpeechSession};
use intervox_speak::{ConsoleSynthesizer, Synthesizer};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "intervox", about = "Voice interview practice assistant")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

/// What the listening side reports back to the interview loop.
enum AnswerEvent {
    Chunk(String),
    Pause,
}

/// Ceiling on how long one answer may stay open with no pause before the
/// interview moves on anyway.
const ANSWER_TIMEOUT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_file(&cli.config)
        .with_context(|| format!("failed to load config from {:?}", cli.config))?;

    let env_filter =
        EnvFilter::try_new(&config.general.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        engine = %config.recognition.engine,
        language = %config.recognition.language,
        "intervox starting"
    );

    if config.interview.questions.is_empty() {
        bail!("no interview questions configured; add [interview] questions to the config");
    }

    let session = build_session(&config).await;
    if !session.is_supported() {
        bail!(
            "speech recognition engine '{}' is not available",
            config.recognition.engine
        );
    }

    let synth = ConsoleSynthesizer::with_pace(Duration::from_millis(120));
    let client = GenerationClient::new(config.generation.clone());
    if !client.is_configured() {
        tracing::warn!("no generation API key configured; using canned responses");
    }

    // Warm the voice up before the first real utterance.
    if let Err(e) = synth.speak("").await {
        tracing::debug!("voice warm-up failed: {e}");
    }

    run_interview(&config, &session, &synth, &client).await;
    Ok(())
}

/// Create the configured engine and wrap it in a session. An unknown engine
/// name or a failed initialization yields an unsupported session, the same
/// way a host without speech recognition would look.
async fn build_session(config: &AppConfig) -> SpeechSession {
    let registry = EngineRegistry::new();
    let mut engine = match registry.create(&config.recognition.engine) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(
                available = ?registry.list_engines(),
                "cannot create recognition engine: {e}"
            );
            return SpeechSession::unsupported();
        }
    };

    let engine_config = config
        .recognition
        .scripted
        .as_ref()
        .and_then(|scripted| toml::Value::try_from(scripted).ok())
        .unwrap_or(toml::Value::Table(toml::map::Map::new()));
    if let Err(e) = engine.initialize(engine_config).await {
        tracing::error!("recognition engine initialization failed: {e}");
        return SpeechSession::unsupported();
    }

    SpeechSession::new(engine, SessionOptions::from_config(&config.recognition))
}

async fn run_interview(
    config: &AppConfig,
    session: &SpeechSession,
    synth: &ConsoleSynthesizer,
    client: &GenerationClient,
) {
    let total = config.interview.questions.len();
    let mut pairs: Vec<QaPair> = Vec::new();
    let mut assessments: Vec<QaSummary> = Vec::new();

    for (index, question) in config.interview.questions.iter().enumerate() {
        tracing::info!(question = index + 1, total, "asking question");
        if let Err(e) = synth.speak(question).await {
            tracing::warn!("failed to speak question: {e}");
        }

        let answer = match collect_answer(session, synth, client, question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("listening failed: {e}");
                break;
            }
        };

        if answer.is_empty() {
            tracing::info!("no answer captured, moving on");
            continue;
        }

        let assessment = client.qa_summary(question, &answer).await;
        pairs.push(QaPair {
            question: question.clone(),
            answer,
        });
        assessments.push(assessment);
    }

    let report = client.final_summary(&pairs, &assessments, total).await;
    print_report(&pairs, &assessments, &report);
}

/// Listen for one answer. Accepted chunks drive spoken acknowledgements
/// (short ones are skipped, and a cooldown keeps the interviewer from
/// interrupting constantly); the first pause ends the answer.
async fn collect_answer(
    session: &SpeechSession,
    synth: &ConsoleSynthesizer,
    client: &GenerationClient,
    question: &str,
) -> Result<String> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let callbacks = {
        let chunk_tx = tx.clone();
        let pause_tx = tx;
        SessionCallbacks::new(
            move |text| {
                let _ = chunk_tx.send(AnswerEvent::Chunk(text.to_string()));
            },
            move || {
                let _ = pause_tx.send(AnswerEvent::Pause);
            },
        )
    };
    session.start(callbacks).await?;

    let min_chunk_len = client.config().min_chunk_len;
    let filler_cooldown = Duration::from_millis(client.config().filler_cooldown_ms);
    let mut last_filler: Option<tokio::time::Instant> = None;

    loop {
        match tokio::time::timeout(ANSWER_TIMEOUT, rx.recv()).await {
            Ok(Some(AnswerEvent::Chunk(chunk))) => {
                tracing::debug!(len = chunk.len(), "answer chunk");
                if chunk.len() < min_chunk_len {
                    continue;
                }
                let cooled_down = last_filler
                    .map(|at| at.elapsed() >= filler_cooldown)
                    .unwrap_or(true);
                if !cooled_down {
                    continue;
                }
                last_filler = Some(tokio::time::Instant::now());
                let phrase = client.filler_phrase(question, &chunk).await;
                if let Err(e) = synth.speak(&phrase).await {
                    tracing::debug!("failed to speak acknowledgement: {e}");
                }
            }
            Ok(Some(AnswerEvent::Pause)) => {
                tracing::debug!("pause detected, answer complete");
                break;
            }
            Ok(None) => break,
            Err(_) => {
                tracing::warn!("answer timed out, moving on");
                break;
            }
        }
    }

    session.stop().await;
    Ok(session.transcript())
}

fn print_report(pairs: &[QaPair], assessments: &[QaSummary], report: &intervox_core::FinalSummary) {
    println!("\n========== Interview Report ==========\n");

    for (index, (pair, assessment)) in pairs.iter().zip(assessments.iter()).enumerate() {
        println!("Q{}: {}", index + 1, pair.question);
        println!("A{}: {}", index + 1, pair.answer);
        println!("  Summary: {}", assessment.summary);
        for point in &assessment.key_points {
            println!("  - {point}");
        }
        println!(
            "  Clarity: {} | Completeness: {}\n",
            assessment.clarity, assessment.completeness
        );
    }

    println!("Overall: {}", report.overall_summary);
    if !report.strengths.is_empty() {
        println!("\nStrengths:");
        for item in &report.strengths {
            println!("  - {item}");
        }
    }
    if !report.areas_for_improvement.is_empty() {
        println!("\nAreas for improvement:");
        for item in &report.areas_for_improvement {
            println!("  - {item}");
        }
    }
    if !report.improvement_plan.short_term.is_empty() {
        println!("\nShort-term plan:");
        for item in &report.improvement_plan.short_term {
            println!("  - {item}");
        }
    }
    if !report.improvement_plan.long_term.is_empty() {
        println!("\nLong-term plan:");
        for item in &report.improvement_plan.long_term {
            println!("  - {item}");
        }
    }
    println!("\nScore: {}", report.overall_score);
}
