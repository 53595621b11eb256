use clap::{Args, Parser, Subcommand};
use scenariogen_config::{AppConfig, FileConfig, load_file_config};
use scenariogen_engine::{Engine, EngineConfig, RunReport, RunRequest};
use scenariogen_error::PipelineError;
use scenariogen_llm::backend_from_config;
use scenariogen_logging::{LogFormat, LogLevel};
use scenariogen_schema::{ArtifactKind, PublishOutcome};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "scenariogen", version)]
#[command(
    about = "Generate Gherkin scenarios or headless test code from a requirement.",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
    /// Directory the test-cases/ and headless-test/ trees are written under.
    #[arg(long, global = true, env = "SCENARIOGEN_OUT_DIR")]
    out_dir: Option<PathBuf>,
    /// Defaults file (YAML, or JSON with a .json extension).
    #[arg(long, global = true, env = "SCENARIOGEN_CONFIG")]
    config: Option<PathBuf>,
    /// error, warn, info, debug or trace. RUST_LOG wins when set.
    #[arg(long, global = true, env = "SCENARIOGEN_LOG")]
    log_level: Option<LogLevel>,
    /// plain, compact or json.
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
    /// Don't print the generated content.
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate Gherkin test scenarios.
    Scenarios {
        #[command(flatten)]
        input: Input,
        /// Also convert the scenarios into headless test code.
        #[arg(long)]
        with_test_code: bool,
    },
    /// Generate headless Flutter test code.
    Headless {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args, Debug)]
struct Input {
    /// What the feature must do, in one sentence.
    #[arg(long, short = 'r', env = "REQUIREMENT")]
    requirement: String,
    /// Owning squad; becomes the folder name.
    #[arg(long, short = 's', env = "SQUAD")]
    squad: String,
    /// File name to use instead of one derived from the requirement.
    #[arg(long = "file-name", short = 'f', visible_alias = "filename", env = "FILE_NAME")]
    file_name: Option<String>,
    /// Priority tag, e.g. P1.
    #[arg(long, env = "TAG")]
    tag: Option<String>,
    /// More tags, separated by commas or spaces.
    #[arg(long, env = "OTHER_TAGS")]
    other_tags: Option<String>,
    /// Product background; names the app in the prompt.
    #[arg(long, env = "BACKGROUND")]
    background: Option<String>,
    /// Extra context for the prompt.
    #[arg(long, env = "ADDITIONAL_BACKGROUND")]
    additional_background: Option<String>,
    /// Write locally only. NO_UPLOAD=true does the same.
    #[arg(long)]
    no_upload: bool,
}

impl Input {
    fn into_request(self, kind: ArtifactKind, with_test_code: bool) -> RunRequest {
        let mut req = RunRequest::new(kind, self.requirement, self.squad);
        req.file_name = self.file_name.or_else(|| std::env::var("FILENAME").ok());
        req.tag = self.tag;
        req.other_tags = self.other_tags;
        req.background = self.background;
        req.additional_background = self.additional_background;
        req.with_test_code = with_test_code;
        req
    }
}

fn main() -> ExitCode {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    let file = match &cli.config {
        Some(path) => load_file_config(path)
            .map_err(|e| PipelineError::configuration(format!("{e:#}")))?,
        None => FileConfig::default(),
    };
    let mut config = AppConfig::from_env(&file)?;

    if let Some(dir) = cli.out_dir {
        config.output_root = dir;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    if let Err(e) = scenariogen_logging::init(&config.logging) {
        eprintln!("WARN: {e:#}");
    }

    let (request, no_upload) = match cli.cmd {
        Command::Scenarios {
            input,
            with_test_code,
        } => {
            let no_upload = input.no_upload;
            (input.into_request(ArtifactKind::ScenarioSet, with_test_code), no_upload)
        }
        Command::Headless { input } => {
            let no_upload = input.no_upload;
            (input.into_request(ArtifactKind::TestCode, false), no_upload)
        }
    };
    if no_upload {
        config.publish.enabled = false;
    }

    config.validate()?;
    tracing::debug!(
        provider = %config.generation.provider,
        model = %config.generation.model,
        publish = config.publish.enabled,
        out = %config.output_root.display(),
        "configuration resolved"
    );

    let generator = backend_from_config(&config.generation.llm_config());
    let publisher = config.publish.publisher();
    let engine = Engine::new(
        generator.as_ref(),
        &publisher,
        EngineConfig {
            output_root: config.output_root.clone(),
            publish: config.publish.enabled,
        },
    );

    let report = engine.run(&request)?;
    print_report(&report, cli.quiet);
    Ok(())
}

fn print_report(report: &RunReport, quiet: bool) {
    if !quiet {
        println!("{}\n", report.content);
    }
    println!("saved: {}", report.local_path.display());
    match &report.publish {
        PublishOutcome::Published { preview_url } => println!("published: {preview_url}"),
        PublishOutcome::Skipped => {
            eprintln!("WARN: upload skipped; the file is only saved locally")
        }
        PublishOutcome::Failed { message, .. } => {
            eprintln!("WARN: GitHub upload failed: {message}. The local file was kept.")
        }
    }
    if let Some(derived) = &report.derived {
        print_report(derived, quiet);
    }
}
