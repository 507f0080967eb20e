//! @ai:module:intent Chart generation for benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator
//! @ai:module:stateless true

use crate::metrics::BenchmarkResults;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts from results
    fn generate_all(&self, results: &BenchmarkResults, output_dir: &Path) -> Result<Vec<String>>;
}

/// @ai:intent Generates charts from benchmark results
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Bar per repetition with the average drawn across
    /// @ai:pre at least one sample carries a duration
    /// @ai:effects fs:write
    fn generate_duration_chart(&self, results: &BenchmarkResults, output_path: &Path) -> Result<()> {
        let durations: Vec<(u32, f64)> = results
            .samples
            .iter()
            .filter_map(|s| s.duration_ms().map(|d| (s.run, d)))
            .collect();

        let runs = results.samples.len() as u32;
        let peak = durations.iter().map(|(_, d)| *d).fold(0.0, f64::max);
        let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

        let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let caption = format!(
            "Sieve '{}' up to {}",
            results.summary.sieve_name, results.summary.max_number
        );

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 25))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(1u32..runs + 1, 0f64..y_max)?;

        chart
            .configure_mesh()
            .y_desc("Duration (ms)")
            .x_desc("Run")
            .draw()?;

        chart
            .draw_series(durations.iter().map(|(run, duration)| {
                Rectangle::new([(*run, 0.0), (*run + 1, *duration)], BLUE.mix(0.7).filled())
            }))?
            .label("Duration")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], BLUE.mix(0.7).filled()));

        if let Some(avg) = results.summary.average_duration_ms {
            chart
                .draw_series(LineSeries::new(
                    vec![(1u32, avg), (runs + 1, avg)],
                    RED.stroke_width(2),
                ))?
                .label(format!("Average {:.3}ms", avg))
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Generate all charts, skipping them when no run produced a result
    /// @ai:effects fs:write
    fn generate_all(&self, results: &BenchmarkResults, output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        let mut generated = Vec::new();

        if results.summary.sample_count == 0 {
            tracing::warn!("No durations recorded, skipping charts");
            return Ok(generated);
        }

        let durations_path = output_dir.join("durations.png");
        self.generate_duration_chart(results, &durations_path)?;
        generated.push("durations.png".to_string());

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{BenchmarkSummary, RunResult, Sample};
    use tempfile::TempDir;

    fn create_test_results(durations: &[Option<f64>]) -> BenchmarkResults {
        let samples: Vec<Sample> = durations
            .iter()
            .enumerate()
            .map(|(i, d)| Sample {
                run: i as u32 + 1,
                result: d.map(|duration_ms| RunResult {
                    prime_count: 1229,
                    duration_ms,
                }),
            })
            .collect();
        let present: Vec<f64> = durations.iter().flatten().copied().collect();

        BenchmarkResults {
            timestamp: "2026-01-19T00:00:00Z".to_string(),
            program: "examples/primes".to_string(),
            summary: BenchmarkSummary {
                max_number: 10_000,
                sieve_name: "default".to_string(),
                last_prime_count: Some(1229),
                sample_count: present.len(),
                missing_count: durations.len() - present.len(),
                average_duration_ms: if present.is_empty() {
                    None
                } else {
                    Some(present.iter().sum::<f64>() / present.len() as f64)
                },
            },
            samples,
        }
    }

    #[test]
    fn test_generate_duration_chart() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();
        let results = create_test_results(&[Some(10.0), None, Some(30.0)]);

        let files = generator.generate_all(&results, temp.path()).unwrap();

        assert_eq!(files, vec!["durations.png".to_string()]);
        assert!(temp.path().join("durations.png").exists());
    }

    #[test]
    fn test_no_chart_without_durations() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();
        let results = create_test_results(&[None, None]);

        let files = generator.generate_all(&results, temp.path()).unwrap();

        assert!(files.is_empty());
        assert!(!temp.path().join("durations.png").exists());
    }
}
