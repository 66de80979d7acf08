use anyhow::Result;
use clap::Args;
use colored::Colorize;

use rep_coach::models::ExerciseType;

use crate::config::Config;

#[derive(Args)]
pub struct ThresholdsCommand {
    /// Exercise to show (squat, push-up, lunge, plank, jumping-jack or any custom name)
    exercise: ExerciseType,

    /// Override a threshold (repeatable), e.g. --threshold kneeAngleStart=110
    #[arg(short, long = "threshold", value_parser = super::parse_threshold)]
    thresholds: Vec<(String, f32)>,
}

impl ThresholdsCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        if !config.ui.color {
            colored::control::set_override(false);
        }

        let table = config.threshold_table(&self.exercise, &self.thresholds)?;

        println!("{}", format!("[thresholds.{}]", self.exercise.config_key()).bold());
        for (key, value) in table.iter() {
            println!("{} = {}", key, value);
        }

        Ok(())
    }
}
