/*!
 * Command-line interface for treeprompt
 */

use std::io;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use treeprompt::config::{Args, Config, ReportFormat};
use treeprompt::error::Result;
use treeprompt::git::Git2Provider;
use treeprompt::prompt::PromptAssembler;
use treeprompt::report::{Reporter, ScanReport};
use treeprompt::scanner::Scanner;
use treeprompt::tokenizer::{create_tokenizer, Tokenizer};
use treeprompt::writer::PromptWriter;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "treeprompt", &mut io::stdout());
        return;
    }

    // Warnings are carried in the JSON report, keep stderr parseable
    let quiet = args.quiet || (args.report_format == ReportFormat::Json && args.verbose == 0);
    init_logger(quiet, args.verbose);

    if let Err(e) = run(Config::from_args(args)) {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn init_logger(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run(config: Config) -> Result<()> {
    // Validate configuration
    config.validate()?;

    let tokenizer: Arc<dyn Tokenizer> = Arc::from(create_tokenizer(&config.tokenizer)?);
    log::info!("Using {} encoding", tokenizer.encoding_name());

    // Spinner, the number of matching files is unknown until the walk ends
    let progress = ProgressBar::new_spinner();
    match ProgressStyle::default_spinner()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos} files ⏱️  {elapsed_precise}")
    {
        Ok(style) => progress.set_style(style),
        Err(e) => log::debug!("Falling back to default progress style: {}", e),
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📂 Scanning");

    let progress = Arc::new(progress);
    let scanner = Scanner::new(config.clone(), Arc::clone(&tokenizer), Arc::clone(&progress))?;
    let writer = PromptWriter::new(config.clone());

    // Time everything from scan start to prompt written
    let start_time = Instant::now();

    let scan_result = scanner.scan()?;
    log::info!("Selected {} files", scan_result.files.len());

    progress.set_prefix("📝 Rendering");
    progress.set_message("Assembling prompt...");
    let provider = Git2Provider::new();
    let prompt = PromptAssembler::new(&config, &provider).assemble(&scan_result.files)?;
    let prompt_tokens = tokenizer.count_tokens(&prompt.text)?;

    writer.write(&prompt.text)?;

    let total_duration = start_time.elapsed();
    progress.finish_and_clear();

    let high_token_folders = config
        .show_high_token_folders
        .then(|| scan_result.high_token_folders(config.high_token_folder_count));

    let scan_report = ScanReport {
        output: writer.target(),
        duration: total_duration,
        files_matched: scan_result.files.len(),
        files_rendered: prompt.files_rendered,
        prompt_tokens,
        encoding: tokenizer.encoding_name(),
        prompt_bytes: prompt.text.len() as u64,
        high_token_folders,
        warnings: prompt.warnings,
    };

    Reporter::new(config.report_format).print_report(&scan_report)
}
