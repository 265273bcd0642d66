use clap::{Parser, Subcommand};
use point_alignment::config::{load_config_or_default, Config};
use point_alignment::*;
use rand::Rng;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "align")]
#[command(about = "Planar rigid point-set alignment (2D Wahba's problem)")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Align a source point set onto a target point set
    Align {
        /// JSON file with "source" and "target" point arrays
        #[arg(short, long)]
        input: PathBuf,

        /// Solver to use (descent, procrustes)
        #[arg(short, long, default_value = "descent")]
        algorithm: String,

        /// Configuration file (JSON or TOML)
        #[arg(short, long)]
        config: Option<String>,

        /// Output file for the result
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare solvers on the same correspondence file
    Compare {
        /// JSON file with "source" and "target" point arrays
        #[arg(short, long)]
        input: PathBuf,

        /// Solvers to compare (comma-separated)
        #[arg(short, long, default_value = "descent,procrustes")]
        algorithms: String,

        /// Configuration file (JSON or TOML)
        #[arg(short, long)]
        config: Option<String>,

        /// Output file for comparison results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Test recovery accuracy against synthetic ground-truth transforms
    Test {
        /// Ground-truth rotation in degrees
        #[arg(long, default_value = "30.0")]
        angle: f64,

        /// Ground-truth x translation
        #[arg(long, default_value = "2.0")]
        tx: f64,

        /// Ground-truth y translation
        #[arg(long, default_value = "-1.0")]
        ty: f64,

        /// Configuration file (JSON or TOML)
        #[arg(short, long)]
        config: Option<String>,
    },
}

/// On-disk correspondence format: two equal-length arrays of [x, y] pairs.
#[derive(Deserialize)]
struct CorrespondenceFile {
    source: Vec<[f64; 2]>,
    target: Vec<[f64; 2]>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    match cli.command {
        Commands::Align {
            input,
            algorithm,
            config,
            output,
        } => {
            handle_align(input, algorithm, config, output)?;
        }
        Commands::Compare {
            input,
            algorithms,
            config,
            output,
        } => {
            handle_compare(input, algorithms, config, output)?;
        }
        Commands::Test {
            angle,
            tx,
            ty,
            config,
        } => {
            handle_test(angle.to_radians(), tx, ty, config)?;
        }
    }

    Ok(())
}

fn load_points(path: &PathBuf) -> anyhow::Result<(Vec<Point2>, Vec<Point2>)> {
    let content = std::fs::read_to_string(path)?;
    let file: CorrespondenceFile = serde_json::from_str(&content)?;
    let to_points = |raw: Vec<[f64; 2]>| raw.iter().map(|p| Point2::new(p[0], p[1])).collect();
    Ok((to_points(file.source), to_points(file.target)))
}

fn make_aligner(name: &str, config: &Config) -> anyhow::Result<Box<dyn PointSetAligner>> {
    match name {
        "descent" => Ok(Box::new(GradientDescentAligner::new(config.solver.clone()))),
        "procrustes" => Ok(Box::new(ProcrustesAligner)),
        _ => Err(anyhow::anyhow!("Unknown algorithm: {}", name)),
    }
}

fn print_result(result: &AlignmentResult) {
    println!("Algorithm:   {}", result.algorithm_used);
    println!(
        "Rotation:    {:.6} rad ({:.3} deg)",
        result.rotation,
        result.rotation.to_degrees()
    );
    println!(
        "Translation: ({:.6}, {:.6})",
        result.translation.0, result.translation.1
    );
    println!("Residual:    {:.6e}", result.residual);
    println!("Iterations:  {}", result.iterations);
    println!("Converged:   {}", result.converged);
    println!("Time:        {:.3}ms", result.processing_time_ms);
    println!("SVG:         {}", result.transform.svg_matrix());
}

fn print_comparison_table(results: &[AlignmentResult]) {
    println!(
        "{:<16} {:>12} {:>12} {:>12} {:>12} {:>6} {:>10}",
        "Algorithm", "Rotation", "Tx", "Ty", "Residual", "Iters", "Time(ms)"
    );
    for r in results {
        println!(
            "{:<16} {:>12.6} {:>12.6} {:>12.6} {:>12.4e} {:>6} {:>10.3}",
            r.algorithm_used,
            r.rotation,
            r.translation.0,
            r.translation.1,
            r.residual,
            r.iterations,
            r.processing_time_ms
        );
    }
}

fn handle_align(
    input: PathBuf,
    algorithm: String,
    config_path: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config_or_default(config_path.as_deref());
    let (source, target) = load_points(&input)?;
    println!(
        "Loaded {} correspondences, running {} solver...",
        source.len(),
        algorithm
    );

    let aligner = make_aligner(&algorithm, &config)?;
    let result = aligner.align(&source, &target)?;

    print_result(&result);
    if !result.converged {
        log::warn!("solver hit the iteration cap before meeting tolerance");
    }

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(output_path, json)?;
        println!("Results saved to file.");
    }

    Ok(())
}

fn handle_compare(
    input: PathBuf,
    algorithms: String,
    config_path: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config_or_default(config_path.as_deref());
    let (source, target) = load_points(&input)?;
    println!("Loaded {} correspondences", source.len());

    let algorithm_list: Vec<&str> = algorithms.split(',').map(|s| s.trim()).collect();
    let mut results = Vec::new();

    for name in algorithm_list {
        let aligner = match make_aligner(name, &config) {
            Ok(aligner) => aligner,
            Err(_) => {
                log::warn!("Unknown algorithm: {}, skipping", name);
                continue;
            }
        };
        println!("Running {} solver...", aligner.name());
        results.push(aligner.align(&source, &target)?);
    }

    print_comparison_table(&results);

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&results)?;
        std::fs::write(output_path, json)?;
        println!("Comparison results saved to file.");
    }

    Ok(())
}

fn handle_test(
    angle: f64,
    tx: f64,
    ty: f64,
    config_path: Option<String>,
) -> anyhow::Result<()> {
    let config = load_config_or_default(config_path.as_deref());
    let testing = &config.testing;
    let truth = AffineTransform::rotation(angle).translate(tx, ty);

    println!(
        "Testing recovery of rotation={:.4} rad, translation=({}, {}) over {} repetitions",
        angle, tx, ty, testing.test_repetitions
    );

    let mut rng = rand::thread_rng();
    let mut failures = 0;

    for repetition in 0..testing.test_repetitions {
        let source: Vec<Point2> = (0..testing.point_count)
            .map(|_| {
                Point2::new(
                    rng.gen_range(-testing.coordinate_range..testing.coordinate_range),
                    rng.gen_range(-testing.coordinate_range..testing.coordinate_range),
                )
            })
            .collect();
        let target: Vec<Point2> = source.iter().map(|&p| truth.apply(p)).collect();

        for name in ["descent", "procrustes"] {
            let aligner = make_aligner(name, &config)?;
            let result = aligner.align(&source, &target)?;

            let rotation_error = wrap_angle(result.rotation - angle).abs();
            let translation_error = ((result.translation.0 - tx).powi(2)
                + (result.translation.1 - ty).powi(2))
            .sqrt();
            let passed = rotation_error <= testing.rotation_accuracy_threshold_radians
                && translation_error <= testing.translation_accuracy_threshold;

            println!(
                "  rep {} {:<12} rotation_error={:.3e} translation_error={:.3e} residual={:.3e} {}",
                repetition + 1,
                result.algorithm_used,
                rotation_error,
                translation_error,
                result.residual,
                if passed { "ok" } else { "FAILED" }
            );
            if !passed {
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow::anyhow!("{} recovery checks failed", failures));
    }
    println!("All recovery checks passed.");
    Ok(())
}
