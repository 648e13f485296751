//! wadmerge command line
//!
//! Joins WAD files for Doom-engine games.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;
use wadmerge_rs::{MergeConfig, MergeReport, OutputKind, WadError, WadMerger, VERSION};

const LICENSE: &str = "\
This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.";

const AFTER_HELP: &str = "\
By default duplicate lumps are not included: the first lump encountered under
a name is the one used in the output. If the input wads double up on data, put
the wad with the data to keep first.

The output is a PWAD unless at least one input is an IWAD. Use -I or -P to
override this.";

#[derive(Parser, Debug)]
#[command(name = "wadmerge")]
#[command(about = "Joins/merges WAD files for Doom and Doom engine based games")]
#[command(override_usage = "wadmerge [OPTIONS] -i input1.wad -i input2.wad -o output.wad")]
#[command(after_help = AFTER_HELP)]
#[command(disable_version_flag = true)]
struct Args {
    /// Input WAD file (repeatable, merged in order)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Output WAD file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Allow duplicate lumps
    #[arg(short = 'd', long)]
    allow_duplicates: bool,

    /// Compact: store lumps with identical data only once
    #[arg(short = 'c', long)]
    deduplicate: bool,

    /// Output file is an IWAD
    #[arg(short = 'I', long, conflicts_with = "pwad")]
    iwad: bool,

    /// Output file is a PWAD
    #[arg(short = 'P', long)]
    pwad: bool,

    /// TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the license and exit
    #[arg(short = 'V', long)]
    license: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log every discarded duplicate and skipped map block
    #[arg(short, long)]
    verbose: bool,
}

fn banner_text() -> String {
    format!(
        "WADMERGE: Joins/merges WAD files for Doom and Doom engine based games.  Version {}\n\
         (C) Dennis Katsonis (2014)\n",
        VERSION
    )
}

fn banner() {
    println!("{}", banner_text());
}

fn init_logging(args: &Args) {
    let level = if args.quiet {
        Level::WARN
    } else if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();
}

fn build_config(args: &Args) -> anyhow::Result<MergeConfig> {
    let mut config = match &args.config {
        Some(path) => MergeConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => MergeConfig::default(),
    };

    if args.allow_duplicates {
        config.allow_duplicates = true;
    }
    if args.deduplicate {
        config.deduplicate = true;
    }
    if args.iwad {
        config.output_kind = OutputKind::Iwad;
    } else if args.pwad {
        config.output_kind = OutputKind::Pwad;
    }

    Ok(config)
}

fn run(args: Args) -> anyhow::Result<MergeReport> {
    if args.inputs.is_empty() {
        return Err(WadError::Usage("No input WAD files specified".to_string()).into());
    }
    let output = args
        .output
        .clone()
        .ok_or_else(|| WadError::Usage("No valid output WAD file specified".to_string()))?;

    let config = build_config(&args)?;

    let report = WadMerger::new()
        .config(config)
        .inputs(args.inputs)
        .run(&output)
        .with_context(|| format!("Failed to merge into {}", output.display()))?;

    Ok(report)
}

fn main() -> ExitCode {
    if std::env::args_os().len() <= 1 {
        banner();
        // Help goes to stdout; a closed pipe is not worth reporting
        let _ = Args::command().print_help();
        return ExitCode::SUCCESS;
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(err.exit_code() as u8);
        }
    };

    banner();
    if args.license {
        println!("{}", LICENSE);
        return ExitCode::SUCCESS;
    }

    init_logging(&args);

    match run(args) {
        Ok(report) => {
            info!(
                "Done: {} inputs, {} lumps written ({}), {} duplicates discarded, {} deduplicated",
                report.inputs,
                report.lumps_written,
                report.kind,
                report.duplicates_discarded,
                report.lumps_deduplicated
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            let usage = err
                .downcast_ref::<WadError>()
                .is_some_and(WadError::is_usage);
            if usage {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_lines() {
        let text = banner_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("WADMERGE: Joins/merges WAD files"));
        assert!(lines[0].ends_with(&format!("Version {}", VERSION)));
        assert_eq!(lines[1], "(C) Dennis Katsonis (2014)");
    }

    #[test]
    fn test_conflicting_kind_flags_rejected() {
        let result = Args::try_parse_from(["wadmerge", "-I", "-P", "-i", "a.wad", "-o", "b.wad"]);
        assert!(result.is_err());
    }
}
