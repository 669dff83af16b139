// Main entry point for the application

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use mapcheck::protocol::PackageDescriptor;
use mapcheck::{MapValidator, ProgressSink, ValidationReport, ValidatorConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mapcheck")]
#[command(about = "Validate a MIB3 map update before installing it", long_about = None)]
struct Cli {
    /// Map folder (USB stick root or extracted tar file)
    #[arg(long, value_parser = existing_dir)]
    folder: PathBuf,
}

fn existing_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.is_dir() {
        return Err(format!("'{}' is not an existing directory", value));
    }
    if let Err(e) = std::fs::read_dir(&path) {
        return Err(format!("'{}' is not readable: {}", value, e));
    }
    Ok(path)
}

/// Console progress: one line per package, spinner for the current file
struct ConsoleProgress {
    spinner: ProgressBar,
}

impl ConsoleProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::with_template("      {spinner} {wide_msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self { spinner }
    }
}

impl ProgressSink for ConsoleProgress {
    fn package_started(&mut self, _index: usize, _total: usize, descriptor: &PackageDescriptor) {
        // println() on a hidden bar is a no-op, so print around it instead
        self.spinner.suspend(|| println!("    Validating package: {}", descriptor.id));
    }

    fn file_started(&mut self, path: &str) {
        self.spinner.set_message(path.to_string());
    }

    fn finished(&mut self, _report: &ValidationReport) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

fn print_error_chain(err: &dyn std::error::Error) {
    println!("  {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        println!("    caused by: {}", cause);
        source = cause.source();
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let validator = MapValidator::new(ValidatorConfig::new(&cli.folder));

    let result = {
        let mut progress = ConsoleProgress::new();
        validator.validate(&mut progress)
    };

    match result {
        Ok(report) => {
            println!("{}", style("Validation succeeded!").green());
            println!("This looks like a valid map update. Go ahead and try it in your vehicle!");
            log::info!(
                "{} packages, {} partitions, {} content files checked",
                report.packages,
                report.partitions,
                report.content_files
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", style("Validation failed!").red());
            println!("This does not look like a valid map update:");
            print_error_chain(&e);
            ExitCode::FAILURE
        }
    }
}
