//! earnviz CLI binary.
//!
//! Renders quarterly earnings charts, prints earnings summaries and serves
//! the web form.

use clap::{Parser, Subcommand, ValueEnum};
use earnviz::Quarter;
use earnviz::pipeline::{chart_for_quarter, quarter_for_ticker};
use earnviz_bin::config::parse_listen_addr;
use earnviz_bin::{Config, init_tracing, serve};
use earnviz_data::{Provider, ProviderKind};
use earnviz_output::{ChartFormat, Destination, ExportFormat, Exporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use std::time::Duration as StdDuration;

#[derive(Parser)]
#[command(name = "earnviz")]
#[command(about = "earnviz: quarterly earnings as Sankey flow charts", long_about = None)]
#[command(version)]
struct Cli {
    /// Statement source (edgar, yahoo or fixture)
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,

    /// JSON file of statements for the fixture provider
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    /// Directory for cached lookup tables
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the latest quarter's earnings chart
    Render {
        /// Stock ticker
        ticker: String,

        /// Output file (default: <TICKER>.svg)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Chart format (svg or html); inferred from --out when omitted
        #[arg(long)]
        format: Option<ChartFormat>,

        /// Chart title (default: "<TICKER> Earnings Q<n> <year>")
        #[arg(long)]
        title: Option<String>,
    },

    /// Print the latest quarter's earnings summary
    Report {
        /// Stock ticker
        ticker: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },

    /// Run the web form
    Serve {
        /// Address to listen on (default: EARNVIZ_LISTEN_ADDR or 127.0.0.1:8080)
        #[arg(long)]
        listen: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Table,
    Markdown,
    Csv,
    Json,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(kind) = cli.provider {
        config.provider = kind;
    }
    if let Some(path) = cli.fixtures {
        config.data = config.data.with_fixtures(path);
    }
    if let Some(dir) = cli.cache_dir {
        config.data = config.data.with_cache_dir(dir);
    }

    let default_filter = match cli.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    init_tracing(config.log_format, default_filter);

    let provider = config.provider()?;

    match cli.command {
        Commands::Render {
            ticker,
            out,
            format,
            title,
        } => {
            render_chart(&provider, &ticker, out, format, title.as_deref()).await?;
        }
        Commands::Report { ticker, format } => {
            print_report(&provider, &ticker, format).await?;
        }
        Commands::Serve { listen } => {
            if let Some(raw) = listen {
                config.listen_addr = parse_listen_addr("--listen", &raw)?;
            }
            println!("earnviz {} serving on http://{}", earnviz_bin::VERSION, config.listen_addr);
            println!("  Provider: {}", provider.kind());
            serve(config.listen_addr, provider).await?;
        }
    }

    Ok(())
}

async fn fetch_with_spinner(
    provider: &Provider,
    ticker: &str,
) -> Result<Quarter, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(StdDuration::from_millis(100));
    pb.set_message(format!(
        "Fetching latest quarter for {} from {}...",
        ticker.trim().to_uppercase(),
        provider.kind()
    ));

    match quarter_for_ticker(provider, ticker).await {
        Ok(quarter) => {
            pb.finish_with_message(format!(
                "Fetched {} quarter ending {}",
                quarter.statement.symbol, quarter.statement.period_end
            ));
            Ok(quarter)
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            Err(e.into())
        }
    }
}

async fn render_chart(
    provider: &Provider,
    ticker: &str,
    out: Option<PathBuf>,
    format: Option<ChartFormat>,
    title: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let quarter = fetch_with_spinner(provider, ticker).await?;

    let destination = match (out, format) {
        (Some(path), Some(format)) => Destination::file_as(path, format),
        (Some(path), None) => Destination::file(path),
        (None, format) => {
            let format = format.unwrap_or_default();
            let path = PathBuf::from(format!(
                "{}.{}",
                quarter.statement.symbol,
                format.extension()
            ));
            Destination::file_as(path, format)
        }
    };

    let chart = chart_for_quarter(quarter, title, &destination)?;
    let path = chart
        .artifact
        .path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    println!("\n{}", chart.title);
    println!("  Revenue:    {}", earnviz_output::format_dollar_amount(chart.report.revenue()));
    println!("  Net income: {}", earnviz_output::format_dollar_amount(chart.report.net_income()));
    println!("  Source:     {}", chart.statement.source);
    println!("\nWrote {} ({} bytes)", path, chart.artifact.bytes.len());

    Ok(())
}

async fn print_report(
    provider: &Provider,
    ticker: &str,
    format: ReportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let quarter = fetch_with_spinner(provider, ticker).await?;
    let summary = quarter.summary();

    match format {
        ReportFormat::Table => print!("{}", summary.to_ascii_table()),
        ReportFormat::Markdown => print!("{}", summary.to_markdown()),
        ReportFormat::Csv => print!("{}", summary.export_to_string(ExportFormat::Csv)?),
        ReportFormat::Json => {
            println!("{}", summary.export_to_string(ExportFormat::PrettyJson)?)
        }
    }

    Ok(())
}
