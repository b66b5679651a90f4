use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use insightboard::analysis::AnalysisResult;
use insightboard::chart::{ChartKind, ChartSpec};
use insightboard::client::AnalysisClient;
use insightboard::config::Config;
use insightboard::dashboard::{compose, DashboardState};
use insightboard::data::{column_names, missing_columns, rows_from_csv};
use insightboard::render::{render_chart, RenderedChart};
use insightboard::report;
use insightboard::upload::{file_icon, format_file_size, validate, UploadFile, UploadFlow};
use insightboard::{OutputFormat, RenderOptions};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "insightboard")]
#[command(version, about = "Upload a dataset for analysis and build a dashboard from the result", long_about = None)]
struct Cli {
    /// Config file (defaults to ./insightboard.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Analysis service base URL
    #[arg(long, global = true, env = "INSIGHTBOARD_ENDPOINT")]
    endpoint: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a file's type and size without uploading it
    Validate {
        file: PathBuf,
    },

    /// Upload a file and print or save the dashboard
    Analyze {
        file: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Also keep the raw analysis result as JSON
        #[arg(long)]
        save_json: Option<PathBuf>,
    },

    /// Build the dashboard from a saved analysis result
    Render {
        result: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Html)]
        format: ReportFormat,
    },

    /// Draw a single chart from a local CSV (stdin when --csv is omitted)
    Chart {
        #[arg(long)]
        csv: Option<PathBuf>,

        /// line, bar, histogram, pie, scatter or heatmap
        #[arg(long = "type")]
        kind: String,

        #[arg(long, default_value = "")]
        x: String,

        /// Column to plot, or "count"
        #[arg(long, default_value = "count")]
        y: String,

        #[arg(long, default_value = "")]
        title: String,

        /// Image encoding (config default when omitted)
        #[arg(long, value_enum)]
        image: Option<ImageFormat>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download the generated report
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReportFormat {
    Html,
    Text,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ImageFormat {
    Png,
    Svg,
}

impl From<ImageFormat> for OutputFormat {
    fn from(value: ImageFormat) -> Self {
        match value {
            ImageFormat::Png => OutputFormat::Png,
            ImageFormat::Svg => OutputFormat::Svg,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug,reqwest=info,hyper=warn,hyper_util=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?.with_endpoint(cli.endpoint);
    tracing::debug!(endpoint = %config.endpoint, "configuration loaded");

    match cli.command {
        Commands::Validate { file } => validate_file(&file),
        Commands::Analyze { file, output, format, save_json } => {
            analyze(&config, &file, output.as_deref(), format, save_json.as_deref()).await
        }
        Commands::Render { result, output, format } => {
            let content = std::fs::read_to_string(&result)
                .with_context(|| format!("Failed to read {}", result.display()))?;
            let analysis: AnalysisResult = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse analysis result {}", result.display()))?;
            let client = AnalysisClient::from_config(&config).context("Failed to build HTTP client")?;
            let page = dashboard_output(&analysis, &config.render, &client.report_url(), format);
            write_output(output.as_deref(), page.as_bytes())
        }
        Commands::Chart { csv, kind, x, y, title, image, output } => {
            let rows = match &csv {
                Some(path) => {
                    let file = File::open(path)
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    rows_from_csv(file)
                }
                None => rows_from_csv(io::stdin().lock()),
            }
            .context("Failed to read CSV")?;

            let spec = ChartSpec::new(ChartKind::from(kind.as_str()), &x, &y, &title);
            let mut wanted = vec![x.as_str()];
            if !spec.counts_rows() {
                wanted.push(y.as_str());
            }
            let missing = missing_columns(&rows, &wanted);
            if !missing.is_empty() {
                tracing::warn!(
                    "column(s) {} not found; available: {}",
                    missing.join(", "),
                    column_names(&rows).join(", ")
                );
            }
            let options = match image {
                Some(format) => config.render.with_format(format.into()),
                None => config.render.clone(),
            };

            match render_chart(&spec, &rows, &options) {
                RenderedChart::Image { bytes, .. } => write_output(output.as_deref(), &bytes),
                RenderedChart::Placeholder(text) => anyhow::bail!("{}", text),
            }
        }
        Commands::Export { output } => {
            let client = AnalysisClient::from_config(&config).context("Failed to build HTTP client")?;
            let written = client.download_report(&output).await?;
            eprintln!("Saved report to {} ({})", output.display(), format_file_size(written as u64));
            Ok(())
        }
    }
}

fn validate_file(path: &Path) -> Result<()> {
    let file = UploadFile::from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    validate(&file)?;
    println!(
        "{} {} ({}) is ready for analysis",
        file_icon(&file.name),
        file.name,
        format_file_size(file.size)
    );
    Ok(())
}

async fn analyze(
    config: &Config,
    path: &Path,
    output: Option<&Path>,
    format: ReportFormat,
    save_json: Option<&Path>,
) -> Result<()> {
    let client = AnalysisClient::from_config(config).context("Failed to build HTTP client")?;
    let file = UploadFile::from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut flow = UploadFlow::new();
    if !flow.select(file.clone()) {
        anyhow::bail!("{}", flow.error().unwrap_or("Invalid file"));
    }
    eprintln!(
        "{} Analyzing {} ({})...",
        file_icon(&file.name),
        file.name,
        format_file_size(file.size)
    );

    let result = flow.submit(&client).await?;

    if let Some(json_path) = save_json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize analysis result")?;
        std::fs::write(json_path, json)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
    }

    let mut state = DashboardState::new();
    state.load(result);
    let analysis = state.current().context("No analysis loaded")?;
    let page = dashboard_output(analysis, &config.render, &client.report_url(), format);
    write_output(output, page.as_bytes())
}

fn dashboard_output(
    result: &AnalysisResult,
    render: &RenderOptions,
    export_url: &str,
    format: ReportFormat,
) -> String {
    match format {
        // Charts are inlined in the page, so always draw them as SVG
        ReportFormat::Html => {
            report::to_html(&compose(result, &render.with_format(OutputFormat::Svg), export_url))
        }
        ReportFormat::Text => report::to_text(&compose(result, render, export_url)),
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(bytes).context("Failed to write to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
            Ok(())
        }
    }
}
