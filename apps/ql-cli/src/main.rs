use clap::{Parser, Subcommand, ValueEnum};
use ql_app::{
    AppError, AppResult, RunProgressEvent, RunStage, run_analysis, run_study_with_progress,
    study_service,
};
use ql_project::StudyFormat;
use ql_project::schema::*;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser)]
#[command(name = "ql")]
#[command(about = "queuelab - steady-state analysis of small queueing systems", long_about = None)]
struct Cli {
    /// Output format for reports
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Two repairable nodes: state probabilities and incomes
    Repair {
        /// Decimal places for probabilities and incomes
        #[arg(long, default_value_t = 2)]
        precision: u32,
    },
    /// Single-server station with shop economics (rates per hour)
    Single {
        #[arg(long, default_value_t = 2.4)]
        arrival: f64,
        #[arg(long, default_value_t = 3.0)]
        service: f64,
        /// Number of identical masters
        #[arg(long, default_value_t = 2)]
        masters: usize,
    },
    /// Multi-channel station swept over the channel count
    Channels {
        #[arg(long, default_value_t = 2.0)]
        arrival: f64,
        #[arg(long, default_value_t = 4.0)]
        service: f64,
        #[arg(long, default_value_t = 10)]
        max_channels: usize,
    },
    /// Two-class non-preemptive priority queue
    Priority {
        /// Arrival rate of the priority class
        #[arg(long, default_value_t = 0.1)]
        arrival1: f64,
        /// Arrival rate of the regular class
        #[arg(long, default_value_t = 0.2)]
        arrival2: f64,
        /// Mean service time of the priority class
        #[arg(long, default_value_t = 1.0)]
        time1: f64,
        /// Mean service time of the regular class
        #[arg(long, default_value_t = 2.5)]
        time2: f64,
    },
    /// Loss system whose channels prepare and then serve
    TwoPhase {
        #[arg(long, default_value_t = 0.2)]
        arrival: f64,
        #[arg(long, default_value_t = 0.5)]
        prep_time: f64,
        #[arg(long, default_value_t = 2.0)]
        service_time: f64,
        #[arg(long, default_value_t = 3)]
        channels: usize,
    },
    /// Waiting places against service time for a finite queue
    Grid {
        /// Arrivals per minute
        #[arg(long, default_value_t = 4.0)]
        arrival: f64,
        #[arg(long, default_value_t = 1)]
        channels: usize,
        #[arg(long, default_value_t = 10.0)]
        select_capacity: f64,
        /// Seconds
        #[arg(long, default_value_t = 120.0)]
        select_service_time: f64,
        /// Print every grid point
        #[arg(long)]
        all_points: bool,
    },
    /// Run every analysis of a study file
    Run {
        /// Path to the study file (.yaml, .yml or .json)
        study_path: PathBuf,
    },
    /// Validate a study file
    Validate {
        /// Path to the study file
        study_path: PathBuf,
    },
    /// Print the reference study
    Template {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match cli.command {
        Commands::Repair { precision } => cmd_analysis(
            AnalysisDef::Repair(RepairDef {
                precision,
                ..RepairDef::default()
            }),
            format,
        ),
        Commands::Single {
            arrival,
            service,
            masters,
        } => cmd_analysis(
            AnalysisDef::SingleServer(SingleServerDef {
                arrival,
                service,
                masters,
                ..SingleServerDef::default()
            }),
            format,
        ),
        Commands::Channels {
            arrival,
            service,
            max_channels,
        } => cmd_analysis(
            AnalysisDef::Channels(ChannelsDef {
                arrival,
                service,
                max_channels,
            }),
            format,
        ),
        Commands::Priority {
            arrival1,
            arrival2,
            time1,
            time2,
        } => cmd_analysis(
            AnalysisDef::Priority(PriorityDef {
                arrival_priority: arrival1,
                arrival_regular: arrival2,
                service_time_priority: time1,
                service_time_regular: time2,
            }),
            format,
        ),
        Commands::TwoPhase {
            arrival,
            prep_time,
            service_time,
            channels,
        } => cmd_analysis(
            AnalysisDef::TwoPhase(TwoPhaseDef {
                arrival,
                prep_time,
                service_time,
                channels,
            }),
            format,
        ),
        Commands::Grid {
            arrival,
            channels,
            select_capacity,
            select_service_time,
            all_points,
        } => cmd_analysis(
            AnalysisDef::CapacityGrid(CapacityGridDef {
                arrival_per_minute: arrival,
                channels,
                select: Some(GridSelectDef {
                    row: select_capacity,
                    col: select_service_time,
                }),
                include_points: all_points,
                ..CapacityGridDef::default()
            }),
            format,
        ),
        Commands::Run { study_path } => cmd_run(&study_path, format),
        Commands::Validate { study_path } => cmd_validate(&study_path),
        Commands::Template { output } => cmd_template(output.as_deref(), format),
    }
}

/// Run one analysis built from command-line flags, validated like a study entry.
fn cmd_analysis(analysis: AnalysisDef, format: OutputFormat) -> AppResult<()> {
    let study = Study {
        version: STUDY_VERSION,
        name: analysis.kind().to_string(),
        analyses: vec![analysis],
    };
    study_service::validate_study(&study)?;
    let report = run_analysis(&study.analyses[0])?;
    match format {
        OutputFormat::Text => print!("{}", render::render_analysis(&report)),
        _ => emit_structured(&report, format)?,
    }
    Ok(())
}

fn cmd_run(study_path: &Path, format: OutputFormat) -> AppResult<()> {
    let study = study_service::load_study(study_path)?;
    let show_progress = format == OutputFormat::Text;

    let report = run_study_with_progress(
        &study,
        Some(&mut |event| {
            if show_progress {
                render_cli_progress(&event);
            }
        }),
    )?;
    if show_progress {
        clear_progress_line();
    }

    match format {
        OutputFormat::Text => print!("{}", render::render_study(&report)),
        _ => emit_structured(&report, format)?,
    }
    Ok(())
}

fn cmd_validate(study_path: &Path) -> AppResult<()> {
    println!("Validating study: {}", study_path.display());
    let study = study_service::load_study(study_path)?;
    study_service::validate_study(&study)?;
    println!("✓ Study is valid");
    for summary in study_service::list_analyses(&study) {
        println!("  [{}] {}", summary.index, summary.kind);
    }
    Ok(())
}

fn cmd_template(output: Option<&Path>, format: OutputFormat) -> AppResult<()> {
    let study = study_service::template_study();
    if let Some(path) = output {
        study_service::save_study(path, &study)?;
        println!("✓ Wrote reference study to {}", path.display());
        return Ok(());
    }
    let study_format = match format {
        OutputFormat::Json => StudyFormat::Json,
        _ => StudyFormat::Yaml,
    };
    print!("{}", study_service::render_study(&study, study_format)?);
    Ok(())
}

fn emit_structured<T: Serialize>(value: &T, format: OutputFormat) -> AppResult<()> {
    let text = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|e| AppError::Output(e.to_string()))?
                + "\n"
        }
        _ => serde_yaml::to_string(value).map_err(|e| AppError::Output(e.to_string()))?,
    };
    print!("{}", text);
    Ok(())
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(80));
    let _ = io::stderr().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    let line = match &event.stage {
        RunStage::Validating => "validating".to_string(),
        RunStage::RunningAnalysis { index, kind } => {
            format!("[{}/{}] {}", index + 1, event.total_analyses, kind)
        }
        RunStage::Completed => "done".to_string(),
    };
    eprint!("\r{}  elapsed={:.2}s", line, event.elapsed_wall_s);
    let _ = io::stderr().flush();
}
