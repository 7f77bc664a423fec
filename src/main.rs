use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;

use tv_queue_caller::{
    AnnouncementSequencer, AppResult, CallCode, ChimeSpeech, Config, Counter, Language,
    NullSpeech, Patient, SpeechCapability,
};

/// Initialize tracing with file rotation
///
/// - Daily rotation (new file each day)
/// - Files named: tv-queue-caller.YYYY-MM-DD.log
///
/// Console output is controlled with RUST_LOG; file logs always capture
/// info and up.
fn initialize_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("TvQueueCaller").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));

    let file_appender = tracing_appender::rolling::daily(&log_dir, "tv-queue-caller");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Log directory: {}", log_dir.display());
    guard
}

fn build_speech(config: &Config) -> Arc<dyn SpeechCapability> {
    if let Some(path) = &config.chime_path {
        match ChimeSpeech::new(std::path::Path::new(path)) {
            Ok(chime) => {
                tracing::info!(path = %path, "Using chime announcer");
                return Arc::new(chime);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chime unavailable, running display-only");
            }
        }
    }
    Arc::new(NullSpeech)
}

/// Scripted snapshots replaying a typical morning on two counters
fn demo_snapshots() -> Vec<Vec<Counter>> {
    let radiology = |current: Option<Patient>| {
        let mut c = Counter::new("c1", "Radiology - Room 1").with_upcoming(vec![
            Patient::new("محمد سالم", CallCode::numbered("R", 102)),
            Patient::new("Aisha Saeed", CallCode::numbered("R", 103)).with_lang(Language::English),
            Patient::new("هند عبدالله", CallCode::numbered("R", 104)),
        ]);
        c.current = current;
        c
    };
    let pharmacy = |current: Option<Patient>| {
        let mut c = Counter::new("c2", "Pharmacy - Window 1").with_upcoming(vec![
            Patient::new("عبدالعزيز خميس", CallCode::numbered("P", 202)),
            Patient::new("Mona Salem", CallCode::numbered("P", 203)).with_lang(Language::English),
        ]);
        c.current = current;
        c
    };

    vec![
        // Initial load: recorded, never announced
        vec![
            radiology(Some(Patient::new("أحمد علي", CallCode::numbered("R", 101)))),
            pharmacy(Some(Patient::new("رحيق الحضرمي", CallCode::numbered("P", 201)))),
        ],
        // No change
        vec![
            radiology(Some(Patient::new("أحمد علي", CallCode::numbered("R", 101)))),
            pharmacy(Some(Patient::new("رحيق الحضرمي", CallCode::numbered("P", 201)))),
        ],
        // Radiology calls the next patient
        vec![
            radiology(Some(Patient::new("محمد سالم", CallCode::numbered("R", 102)))),
            pharmacy(Some(Patient::new("رحيق الحضرمي", CallCode::numbered("P", 201)))),
        ],
        // Both counters advance in the same snapshot; announcements queue FIFO
        vec![
            radiology(Some(
                Patient::new("Aisha Saeed", CallCode::numbered("R", 103))
                    .with_lang(Language::English),
            )),
            pharmacy(Some(Patient::new("عبدالعزيز خميس", CallCode::numbered("P", 202)))),
        ],
    ]
}

fn main() -> AppResult<()> {
    let _guard = initialize_tracing();

    println!("===========================================");
    println!("  TV Queue Caller - Announcement Demo");
    println!("===========================================\n");

    let config = Config::load().context("loading configuration")?;
    println!("✓ Configuration loaded");
    println!("  Speech timeout: {}ms", config.speech_timeout_ms);
    println!("  Settle delay:   {}ms", config.settle_ms);
    println!("  Silent display: {}ms\n", config.silent_display_ms);

    let speech = build_speech(&config);
    let sequencer = AnnouncementSequencer::new(config.timing(), speech);
    let (events, _subscription) = sequencer.subscribe();

    for (tick, snapshot) in demo_snapshots().into_iter().enumerate() {
        println!("--- Snapshot {} ---", tick + 1);
        sequencer.ingest(&snapshot);

        // Give announcements time to play, echoing events as they arrive
        let deadline = std::time::Instant::now()
            + Duration::from_millis(config.speech_timeout_ms * 2 + 1000);
        let mut shown: Option<String> = None;
        while std::time::Instant::now() < deadline {
            for event in events.try_iter() {
                println!("  {}", event.description());
            }
            let call = sequencer.current_call();
            let label = call.map(|c| {
                format!("{} | {} {}", c.counter_name, c.patient.name, c.patient.code)
            });
            if label != shown {
                if let Some(label) = &label {
                    println!("  [POP-UP] {}", label);
                }
                shown = label;
            }
            thread::sleep(Duration::from_millis(200));
        }
    }

    println!("\nShutting down (waiting for queued announcements)...");
    sequencer.shutdown();
    println!("Done.");

    Ok(())
}
