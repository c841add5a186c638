//! Percent milestones for each pipeline stage.

use std::time::Duration;

use super::ticker::{DEFAULT_TICK_INTERVAL, DEFAULT_TICK_STEP};

/// Where each stage lands on the 0–100 progress scale.
///
/// Absolute fields are positions; `*_slice` fields are increments added by
/// each finished unit of work in a parallel stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressPlan {
    /// Position once the input buffer is read.
    pub bytes_read: f64,
    /// Position once the game kind is known.
    pub type_detected: f64,
    /// Position when the engine parse starts polling.
    pub parse_start: f64,
    /// Ceiling the synthetic ticker approaches during the parse.
    pub parse_end: f64,
    /// Increment per finished asset or game-data fetch.
    pub fetch_slice: f64,
    /// Position after the coarse engine pass.
    pub coarse_pass: f64,
    /// Increment when the full engine pass finishes.
    pub full_pass_slice: f64,
    /// Increment when the renderer setup finishes.
    pub render_slice: f64,
    /// Synthetic ticker period.
    pub tick_interval: Duration,
    /// Synthetic ticker step in percent.
    pub tick_step: f64,
}

impl Default for ProgressPlan {
    fn default() -> Self {
        Self {
            bytes_read: 10.0,
            type_detected: 15.0,
            parse_start: 20.0,
            parse_end: 45.0,
            // shaders + textures + province index + game data = 4 slices
            fetch_slice: 1.25,
            coarse_pass: 50.0,
            full_pass_slice: 25.0,
            render_slice: 20.0,
            tick_interval: DEFAULT_TICK_INTERVAL,
            tick_step: DEFAULT_TICK_STEP,
        }
    }
}

impl ProgressPlan {
    /// Check the plan for values a progress bar cannot display.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let bounded = [
            ("bytes_read", self.bytes_read),
            ("type_detected", self.type_detected),
            ("parse_start", self.parse_start),
            ("parse_end", self.parse_end),
            ("coarse_pass", self.coarse_pass),
        ];
        for (name, value) in bounded {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{} must be between 0 and 100, got {}", name, value));
            }
        }

        let slices = [
            ("fetch_slice", self.fetch_slice),
            ("full_pass_slice", self.full_pass_slice),
            ("render_slice", self.render_slice),
            ("tick_step", self.tick_step),
        ];
        for (name, value) in slices {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{} must be between 0 and 100, got {}", name, value));
            }
        }

        if self.parse_start >= self.parse_end {
            return Err(format!(
                "parse_start ({}) must be below parse_end ({})",
                self.parse_start, self.parse_end
            ));
        }

        if self.tick_interval.is_zero() {
            return Err("tick interval must be greater than zero".to_string());
        }

        Ok(())
    }
}
