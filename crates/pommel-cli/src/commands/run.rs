//! `pommel run`: execute the selected scenarios over the CDP engine.

use std::sync::Arc;

use colored::Colorize;
use tracing::info;

use pommel_cdp::CdpEngine;
use pommel_core::artifacts::RunPaths;
use pommel_core::config::RunConfig;
use pommel_core::report::SuiteReport;
use pommel_core::runner::SuiteRunner;
use pommel_core::session::TestOutcome;

use crate::cli::Cli;
use crate::scenarios;

pub async fn execute(
    cli: &Cli,
    config: RunConfig,
    tags: &[String],
    filter: Option<&str>,
) -> anyhow::Result<i32> {
    let suite = scenarios::suite();
    let selected = suite.select(tags, filter);
    if selected.is_empty() {
        println!("{}", "no scenarios match the requested tags/filter".yellow());
        return Ok(0);
    }

    info!(
        "running {} of {} scenarios against {}",
        selected.len(),
        suite.scenarios().len(),
        config.base_url
    );

    let paths = RunPaths::new(&cli.output_dir);
    let results_dir = paths.results();
    let runner = SuiteRunner::new(Arc::new(config), Arc::new(CdpEngine::new()), paths);
    let report = runner.run(&selected).await;

    print_summary(&report);
    report.write(&results_dir)?;

    Ok(if report.all_passed() { 0 } else { 1 })
}

fn print_summary(report: &SuiteReport) {
    println!();
    for result in &report.results {
        let marker = match result.outcome {
            TestOutcome::Passed => "PASS".green().bold(),
            TestOutcome::Failed => "FAIL".red().bold(),
        };
        println!("  {marker} {} ({} ms)", result.name, result.duration_ms);
        if let Some(ref error) = result.error {
            println!("        {}", error.red());
        }
    }
    println!();
    let tally = format!("{} passed, {} failed", report.passed, report.failed);
    if report.all_passed() {
        println!("{}", tally.green().bold());
    } else {
        println!("{}", tally.red().bold());
    }
}
