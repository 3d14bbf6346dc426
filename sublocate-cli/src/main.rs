use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use sublocate::io::load_gray_image;
use sublocate::{
    generate, read_pgm, write_sub_images, BatchLocator, GenerateConfig, GrayImage, Ledger,
    LocateConfig,
};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Sub-image locator (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct GenerateConfigJson {
    count: usize,
    width: usize,
    height: usize,
    output_dir: String,
    seed: Option<u64>,
    smooth: bool,
}

impl Default for GenerateConfigJson {
    fn default() -> Self {
        let cfg = GenerateConfig::default();
        Self {
            count: cfg.count,
            width: cfg.width,
            height: cfg.height,
            output_dir: "probes".to_string(),
            seed: None,
            smooth: cfg.smooth,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LocateConfigJson {
    probe_dir: String,
    ledger_path: String,
    parallel: bool,
    early_exit: bool,
}

impl Default for LocateConfigJson {
    fn default() -> Self {
        let cfg = LocateConfig::default();
        Self {
            probe_dir: "probes".to_string(),
            ledger_path: "coordinates.txt".to_string(),
            parallel: cfg.parallel,
            early_exit: cfg.early_exit,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    reference_path: String,
    generate: Option<GenerateConfigJson>,
    locate: Option<LocateConfigJson>,
}

#[derive(Debug, Serialize)]
struct GeneratedRecord {
    file: String,
    x: usize,
    y: usize,
}

#[derive(Debug, Serialize)]
struct SkippedRecord {
    label: String,
    reason: String,
}

#[derive(Debug, Serialize)]
struct LocateSummary {
    ledger_path: String,
    located: usize,
    skipped: Vec<SkippedRecord>,
    elapsed_s: f64,
}

#[derive(Debug, Default, Serialize)]
struct Output {
    generated: Vec<GeneratedRecord>,
    locate: Option<LocateSummary>,
}

fn load_reference(path: &Path) -> Result<GrayImage, Box<dyn std::error::Error>> {
    let is_pgm = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pgm"));
    let image = if is_pgm {
        read_pgm(path)?
    } else {
        load_gray_image(path)?
    };
    Ok(image)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("sublocate=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.reference_path.is_empty() {
        return Err("reference_path must be set in the config".into());
    }
    if config.generate.is_none() && config.locate.is_none() {
        return Err("config must contain a generate or locate section".into());
    }

    let reference = load_reference(Path::new(&config.reference_path))?;
    let mut output = Output::default();

    if let Some(gen_cfg) = &config.generate {
        let mut rng = match gen_cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let probes = generate(
            &reference,
            &GenerateConfig {
                count: gen_cfg.count,
                width: gen_cfg.width,
                height: gen_cfg.height,
                smooth: gen_cfg.smooth,
            },
            &mut rng,
        )?;
        let paths = write_sub_images(&gen_cfg.output_dir, &probes)?;
        output.generated = probes
            .iter()
            .zip(paths)
            .map(|(probe, path)| GeneratedRecord {
                file: path.display().to_string(),
                x: probe.x,
                y: probe.y,
            })
            .collect();
    }

    if let Some(loc_cfg) = config.locate {
        let batch = BatchLocator::new(
            reference,
            LocateConfig {
                parallel: loc_cfg.parallel,
                early_exit: loc_cfg.early_exit,
            },
        );
        let mut ledger = Ledger::open(&loc_cfg.ledger_path)?;
        let report = batch.run(&loc_cfg.probe_dir, &mut ledger)?;
        eprintln!(
            "located {} probes in {:.2} s",
            report.records.len(),
            report.elapsed.as_secs_f64()
        );
        output.locate = Some(LocateSummary {
            ledger_path: loc_cfg.ledger_path,
            located: report.records.len(),
            skipped: report
                .skipped
                .into_iter()
                .map(|s| SkippedRecord {
                    label: s.label,
                    reason: s.reason.to_string(),
                })
                .collect(),
            elapsed_s: report.elapsed.as_secs_f64(),
        });
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
