use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub solver: SolverConfig,
    pub testing: TestingConfig,
}

/// Knobs for the gradient-descent solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Number of evenly spaced seed angles across [0, 2pi) for the
    /// multi-start sweep. Ignored when `initial_angles` is set.
    pub seed_count: usize,
    /// Explicit seed angles in radians, overriding `seed_count`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_angles: Option<Vec<f64>>,
    /// Initial step size for the angle update.
    pub learning_rate: f64,
    /// Iteration cap per seed; reaching it flags the result not-converged.
    pub max_iterations: usize,
    /// Descent stops once |dL/dtheta| falls below this.
    pub gradient_tolerance: f64,
    /// Learning-rate decay applied after each accepted step.
    pub rate_decay: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed_count: 8,
            initial_angles: None,
            learning_rate: 0.05,
            max_iterations: 200,
            gradient_tolerance: 1e-9,
            rate_decay: 0.95,
        }
    }
}

/// Parameters for the synthetic recovery tests run by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestingConfig {
    pub point_count: usize,
    pub coordinate_range: f64,
    pub rotation_accuracy_threshold_radians: f64,
    pub translation_accuracy_threshold: f64,
    pub test_repetitions: u32,
}

impl Default for TestingConfig {
    fn default() -> Self {
        Self {
            point_count: 6,
            coordinate_range: 10.0,
            rotation_accuracy_threshold_radians: 1e-4,
            translation_accuracy_threshold: 1e-4,
            test_repetitions: 3,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;

        if content.trim_start().starts_with('{') {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        format: ConfigFormat,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.solver.learning_rate <= 0.0 {
            errors.push("Solver learning_rate must be positive".to_string());
        }

        if self.solver.max_iterations == 0 {
            errors.push("Solver max_iterations must be positive".to_string());
        }

        if self.solver.gradient_tolerance <= 0.0 {
            errors.push("Solver gradient_tolerance must be positive".to_string());
        }

        if !(0.0..=1.0).contains(&self.solver.rate_decay) || self.solver.rate_decay == 0.0 {
            errors.push("Solver rate_decay must be in (0, 1]".to_string());
        }

        let no_explicit_seeds = self
            .solver
            .initial_angles
            .as_ref()
            .map(|a| a.is_empty())
            .unwrap_or(true);
        if self.solver.seed_count == 0 && no_explicit_seeds {
            errors.push("Solver needs at least one seed angle".to_string());
        }

        if self.testing.point_count < 2 {
            errors.push("Testing point_count must be at least 2".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConfigFormat {
    Json,
    Toml,
}

pub fn load_config_or_default(config_path: Option<&str>) -> Config {
    match config_path {
        Some(path) => match Config::load_from_file(path) {
            Ok(config) => {
                if let Err(errors) = config.validate() {
                    eprintln!("Configuration validation errors:");
                    for error in errors {
                        eprintln!("  - {}", error);
                    }
                    eprintln!("Using default configuration instead.");
                    Config::default()
                } else {
                    config
                }
            }
            Err(e) => {
                eprintln!("Failed to load config from '{}': {}", path, e);
                eprintln!("Using default configuration.");
                Config::default()
            }
        },
        None => Config::default(),
    }
}
