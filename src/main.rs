// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (to stderr, so --json output stays clean)
// 3. Run one analysis and print the report
// 4. Exit with proper code (0 = success, 1 = analysis failed, 2 = error)
// =============================================================================

mod cli; // src/cli.rs - command-line parsing

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use page_inspector::{AnalysisResult, Analyzer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = page analyzed
//   Ok(1) = the analysis itself failed (bad URL, fetch error, non-200 page)
//   Err   = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.json {
        println!("🔍 Analyzing: {}", cli.url);
    }

    let analyzer = Analyzer::new(cli.analyzer_config())?;

    match analyzer.analyze(&cli.url).await {
        Ok(result) => {
            print_report(&result, cli.json)?;
            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Analysis failed (HTTP {}): {}", e.status_code(), e);
            Ok(1)
        }
    }
}

// RUST_LOG wins when set; otherwise --verbose picks debug output
fn init_logging(verbose: bool) {
    let default_level = if verbose { "page_inspector=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Prints the report either as a table or JSON
fn print_report(result: &AnalysisResult, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(result)?;
        println!("{}", json_output);
    } else {
        print_table(result);
    }
    Ok(())
}

fn print_table(result: &AnalysisResult) {
    let title = if result.title.is_empty() {
        "(none)"
    } else {
        result.title.as_str()
    };

    println!();
    println!("{:<30} {}", "HTML version", result.html_version);
    println!("{:<30} {}", "Title", title);
    println!("{}", "=".repeat(60));

    println!("📑 Headings:");
    for (level, count) in &result.headings {
        println!("   {:<27} {}", level, count);
    }
    println!("   {:<27} {}", "Total", result.total_headings());
    println!();

    println!("🔗 Links:");
    println!(
        "   {:<27} {} ({} inaccessible)",
        "Internal", result.internal_links, result.inaccessible_internal_links
    );
    println!(
        "   {:<27} {} ({} inaccessible)",
        "External", result.external_links, result.inaccessible_external_links
    );
    println!("   {:<27} {}", "Total", result.total_links());
    println!();

    let login = if result.has_login_form { "✅ yes" } else { "❌ no" };
    println!("🔐 Login form: {}", login);
}
