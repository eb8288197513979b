//! storefront: run the end-to-end suite from the command line

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use storefront::{catalog, EnvironmentConfig, Scenario, ScenarioRunner, SuiteReport};
use storefront_cli::{
    render_config, render_scenario_list, Cli, CliConfig, CliError, CliResult, Commands,
    ConfigArgs, ListArgs, ProgressReporter, RunArgs, Verbosity,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Run(args) => run_suite(&config, &args),
        Commands::List(args) => {
            run_list(&args);
            Ok(())
        }
        Commands::Config(args) => run_config(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.clone().into())
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn run_list(args: &ListArgs) {
    let runner = ScenarioRunner::new().with_tag(args.tag.clone());
    let scenarios = catalog();
    print!("{}", render_scenario_list(&runner.select(&scenarios)));
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let env = EnvironmentConfig::from_env();
    print!("{}", render_config(&env, args.json)?);
    if !args.json {
        println!();
    }
    Ok(())
}

fn run_suite(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let mut env = EnvironmentConfig::from_env();
    if let Some(ref base_url) = args.base_url {
        env = env.with_base_url(base_url.clone());
    }
    if args.headless {
        let mut browser = env.browser().clone();
        browser.headless = true;
        env = env.with_browser(browser);
    }

    let runner = ScenarioRunner::new()
        .with_fail_fast(args.fail_fast)
        .with_filter(args.filter.clone())
        .with_tag(args.tag.clone())
        .with_isolation(!args.no_isolation);
    let scenarios = catalog();
    if runner.select(&scenarios).is_empty() {
        return Err(CliError::invalid_argument(
            "no scenario matches the given filter and tag",
        ));
    }

    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| SuiteReport::default_path(&env));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::test_execution(format!("Failed to create runtime: {e}")))?;
    let report = rt.block_on(execute(config, env, &runner, &scenarios))?;

    report.write_json(&report_path)?;

    let reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.summary(
        report.passed_count(),
        report.failed_count(),
        report.skipped,
        Duration::from_millis(report.duration_ms()),
    );
    reporter.info(&format!("report written to {}", report_path.display()));

    if report.all_passed() {
        Ok(())
    } else {
        Err(CliError::test_execution(format!(
            "{} scenario(s) failed, {} skipped",
            report.failed_count(),
            report.skipped
        )))
    }
}

#[cfg(feature = "browser")]
async fn execute(
    config: &CliConfig,
    env: EnvironmentConfig,
    runner: &ScenarioRunner,
    scenarios: &[Scenario],
) -> CliResult<SuiteReport> {
    use std::sync::Arc;
    use storefront::{ChromiumDriver, LaunchOptions, PageSession};

    let mut reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.header(&format!("storefront @ {}", env.base_url()));

    let driver = ChromiumDriver::launch(LaunchOptions::from(env.browser())).await?;
    let session = PageSession::new(Arc::new(driver), Arc::new(env));

    reporter.start_progress(runner.select(scenarios).len() as u64, "running");
    let report = runner
        .run_with_observer(&session, scenarios, |result| {
            reporter.scenario(result);
            reporter.increment(1);
        })
        .await;
    reporter.finish();

    if let Err(e) = session.driver().close().await {
        tracing::warn!(error = %e, "failed to close browser");
    }
    Ok(report)
}

#[cfg(not(feature = "browser"))]
async fn execute(
    _config: &CliConfig,
    _env: EnvironmentConfig,
    _runner: &ScenarioRunner,
    _scenarios: &[Scenario],
) -> CliResult<SuiteReport> {
    Err(CliError::config(
        "built without the `browser` feature; rebuild with --features browser",
    ))
}
