use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use rep_coach::models::{ExerciseEvent, ExerciseType, PoseFrame, WorkoutSummary};
use rep_coach::PosePipeline;

use crate::config::Config;

/// Frames buffered between the reader and the pipeline
const FRAME_BUFFER: usize = 64;

#[derive(Args)]
pub struct ReplayCommand {
    /// JSON-lines file with one pose frame per line, or `-` for stdin
    input: PathBuf,

    /// Exercise to track (squat, push-up, lunge, plank, jumping-jack or any custom name)
    #[arg(short, long, default_value = "squat")]
    exercise: ExerciseType,

    /// Override a threshold (repeatable), e.g. --threshold kneeAngleStart=110
    #[arg(short, long = "threshold", value_parser = super::parse_threshold)]
    thresholds: Vec<(String, f32)>,

    /// Print events and summary as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct TimedEvent<'a> {
    timestamp_ms: i64,
    #[serde(flatten)]
    event: &'a ExerciseEvent,
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    event: &'static str,
    skipped_lines: usize,
    #[serde(flatten)]
    summary: &'a WorkoutSummary,
}

impl ReplayCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        if !config.ui.color {
            colored::control::set_override(false);
        }

        let table = config.threshold_table(&self.exercise, &self.thresholds)?;
        let mut pipeline = PosePipeline::with_thresholds(table, config.pipeline_config()?)
            .context("Failed to start tracking session")?;

        let (tx, mut rx) = mpsc::channel::<PoseFrame>(FRAME_BUFFER);
        let input = self.input.clone();
        let reader = tokio::task::spawn_blocking(move || read_frames(&input, tx));

        // Single consumer: frames reach the pipeline strictly in input order
        while let Some(frame) = rx.recv().await {
            for event in pipeline.process(&frame) {
                self.print_event(frame.timestamp_ms, &event)?;
            }
        }

        let skipped = reader.await.context("Frame reader panicked")??;
        let summary = pipeline.finish();
        self.print_summary(&summary, skipped)
    }

    fn print_event(&self, timestamp_ms: i64, event: &ExerciseEvent) -> Result<()> {
        if self.json {
            let line = serde_json::to_string(&TimedEvent {
                timestamp_ms,
                event,
            })?;
            println!("{}", line);
            return Ok(());
        }

        let time = format!("{:>8} ms", timestamp_ms).dimmed();
        match event {
            ExerciseEvent::StateChanged {
                in_position,
                repetition_count,
                feedback,
            } => {
                let state = if *in_position {
                    "in position".cyan()
                } else {
                    "out of position".normal()
                };
                println!("{}  {}  reps: {}", time, state, repetition_count.to_string().bold());
                if let Some(feedback) = feedback {
                    let message = if feedback.is_critical {
                        feedback.message.red().bold()
                    } else {
                        feedback.message.yellow()
                    };
                    println!("{}    {}", time, message);
                }
            }
            ExerciseEvent::HoldProgressUpdated { elapsed_seconds } => {
                println!("{}  holding for {}s", time, elapsed_seconds.to_string().green());
            }
            ExerciseEvent::SessionReset => {
                println!("{}  {}", time, "session reset".magenta().bold());
            }
            ExerciseEvent::DataQuality { issue } => {
                println!("{}  {} {}", time, "skipped frame:".red(), issue);
            }
            ExerciseEvent::AnomalyDetected { messages } => {
                for message in messages {
                    println!("{}  {} {}", time, "anomaly:".yellow(), message);
                }
            }
        }
        Ok(())
    }

    fn print_summary(&self, summary: &WorkoutSummary, skipped: usize) -> Result<()> {
        if self.json {
            let line = serde_json::to_string(&SummaryLine {
                event: "summary",
                skipped_lines: skipped,
                summary,
            })?;
            println!("{}", line);
            return Ok(());
        }

        println!();
        println!("{}", "Workout Summary".bold());
        println!("────────────────────────────────");
        println!("Exercise:     {}", summary.exercise);
        println!("Repetitions:  {}", summary.repetition_count.to_string().green().bold());
        println!("Duration:     {:.1}s", summary.total_duration_ms as f64 / 1000.0);
        if let Some(average) = summary.average_repetition_duration_ms {
            println!("Average rep:  {:.1}s", average / 1000.0);
        }
        if skipped > 0 {
            println!("Skipped:      {} unreadable lines", skipped.to_string().yellow());
        }
        Ok(())
    }
}

/// Read frames line by line and feed them to the channel
///
/// Blank lines are ignored and undecodable lines are skipped with a warning.
/// Returns the number of skipped lines.
fn read_frames(input: &Path, tx: mpsc::Sender<PoseFrame>) -> Result<usize> {
    let reader: Box<dyn BufRead> = if input.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(input)
            .with_context(|| format!("Failed to open {}", input.display()))?;
        Box::new(BufReader::new(file))
    };

    let mut skipped = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        match PoseFrame::from_json(&line) {
            Ok(frame) => {
                if tx.blocking_send(frame).is_err() {
                    tracing::debug!("Pipeline stopped, no longer reading input");
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("Skipping line {}: {}", index + 1, e);
                skipped += 1;
            }
        }
    }

    Ok(skipped)
}
