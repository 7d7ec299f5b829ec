use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use swag_engine::config::ConfigLoader;
use swag_engine::runner::{CaseOutcome, Runner};
use swag_engine::suite::{SuiteKind, select_cases};
use swag_webdriver::backend::WebDriverFactory;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swag", version, about = "Swag Labs browser test runner")]
struct Args {
    /// External WebDriver URL (chromedriver is launched locally if not provided)
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Config file (defaults to ./swag.yaml, then ~/.swag/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which suite to run: login, products or all
    #[arg(long, default_value = "all")]
    suite: SuiteKind,

    /// Only run cases whose name contains this text
    #[arg(long)]
    filter: Option<String>,

    /// Write the JSON suite report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigLoader::load_default().await?,
    };
    if let Some(url) = args.webdriver_url {
        config.browser.webdriver_url = Some(url);
    }
    if args.headed {
        config.browser.headless = false;
    }

    let cases = select_cases(args.suite, args.filter.as_deref());
    if cases.is_empty() {
        anyhow::bail!("no test cases match the given suite and filter");
    }

    let runner = Runner::new(WebDriverFactory, config);
    let report = runner.run_all(&cases).await;

    if let Some(path) = &args.report {
        let json = report.to_json()?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    for case in report.failures() {
        if let CaseOutcome::Failed {
            phase,
            message,
            code,
            hint,
        } = &case.outcome
        {
            println!("FAILED {} ({:?}): {}", case.name, phase, message);
            if let (Some(code), Some(hint)) = (code, hint) {
                println!("  {}: {}", code, hint);
            }
            if let Some(shot) = &case.screenshot {
                println!("  screenshot: {}", shot.display());
            }
        }
    }
    println!("{}", report.summary());

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
