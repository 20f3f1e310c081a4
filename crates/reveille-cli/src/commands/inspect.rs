use std::path::PathBuf;

use reveille_core::{
    capture_timestamp, Attachment, Config, Submission, SubmissionValidator, ValidationStrategy,
};

/// Classify a local image file exactly the way the bot's capture-time
/// strategy would, without touching the ledger.
pub fn run(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let window = config.window()?;
    let content = std::fs::read(&path)?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("proof.jpg")
        .to_string();

    match capture_timestamp(&content) {
        Some(raw) => println!("capture timestamp: {raw}"),
        None => println!("capture timestamp: none"),
    }

    let validator = SubmissionValidator::new(window, ValidationStrategy::CaptureTime, None);
    let submission = Submission {
        user_id: "local".into(),
        arrival: chrono::Utc::now(),
        attachments: vec![Attachment::new(filename, content)],
    };
    let verdict = validator.validate(&submission);

    println!("outcome: {}", verdict.outcome);
    if let Some(at) = verdict.verified_at {
        println!("verified instant: {}", at.format("%Y-%m-%d %H:%M:%S %:z"));
    }
    Ok(())
}
