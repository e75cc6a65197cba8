//! Test data builders for creating sampling plans

use framecollect::SamplingPlan;
use std::path::PathBuf;
use std::time::Duration;

/// Builder for creating test SamplingPlans
pub struct PlanBuilder {
    duration: Duration,
    interval: Duration,
    warmup: Duration,
    output_dir: PathBuf,
    prefix: String,
    extension: String,
    quality: u8,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            duration: Duration::from_secs(2),
            interval: Duration::from_millis(500),
            warmup: Duration::ZERO,
            output_dir: PathBuf::from("out"),
            prefix: "img".to_string(),
            extension: "jpg".to_string(),
            quality: 95,
        }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    pub fn build(self) -> SamplingPlan {
        SamplingPlan {
            duration: self.duration,
            interval: self.interval,
            warmup: self.warmup,
            output_dir: self.output_dir,
            prefix: self.prefix,
            extension: self.extension,
            quality: self.quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_builder() {
        let plan = PlanBuilder::new()
            .duration(Duration::from_secs(5))
            .interval(Duration::from_secs(1))
            .prefix("cat")
            .build();

        assert_eq!(plan.duration, Duration::from_secs(5));
        assert_eq!(plan.interval, Duration::from_secs(1));
        assert_eq!(plan.prefix, "cat");
        assert_eq!(plan.warmup, Duration::ZERO);
    }
}
