//! resume-parser: resume field extraction and job description matching

use clap::Parser;
use log::{debug, error, info};
use resume_parser::cli::{self, Cli, Commands, ConfigAction};
use resume_parser::config::Config;
use resume_parser::error::{Result, ResumeParserError};
use resume_parser::input::{DocumentFormat, InputManager};
use resume_parser::output::{save_report_to_file, ReportGenerator};
use resume_parser::processing::analyzer::validate_job_description;
use resume_parser::processing::AnalysisEngine;
use resume_parser::storage::{NewRecord, ResumeStore};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    // `config` subcommands load the file themselves so reset still works on a broken one
    let result = match cli.command {
        Commands::Config { action } => run_config_command(action, &config_path),
        command => match Config::load_from(&config_path) {
            Ok(config) => run_command(command, config, &config_path).await,
            Err(e) => {
                error!("Failed to load configuration: {}", e);
                process::exit(1);
            }
        },
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Parse {
            resume,
            job,
            job_file,
            mode,
            output,
            detailed,
            save,
            owner,
            save_report,
        } => {
            info!("Starting resume analysis");

            let output_format = match output {
                Some(output) => cli::parse_output_format(&output).map_err(ResumeParserError::InvalidInput)?,
                None => config.output.format,
            };

            let mut engine = AnalysisEngine::new(&config)?;
            if let Some(mode) = mode {
                engine = engine.with_mode(cli::parse_match_mode(&mode).map_err(ResumeParserError::InvalidInput)?);
            }
            debug!("Extraction rules: {}", engine.rule_names().join(", "));

            let mut input_manager = InputManager::new().with_cache(config.extraction.cache_text);

            let job_description = match (job, job_file) {
                (Some(text), _) => text,
                (None, Some(path)) => input_manager.extract_text(&path).await?,
                (None, None) => {
                    return Err(ResumeParserError::InvalidInput(
                        "Either --job or --job-file is required".to_string(),
                    ))
                }
            };
            validate_job_description(&job_description)?;

            let resume_text = input_manager.extract_text(&resume).await?;
            let format = DocumentFormat::from_path(&resume);
            let source = resume.to_string_lossy().to_string();

            let report = engine.analyze_text(&source, format, &resume_text, &job_description)?;

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                detailed || config.output.detailed,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, output_format)?;
            println!("{}", rendered);

            if let Some(report_path) = save_report {
                // Files never carry terminal color codes
                let plain = ReportGenerator::with_options(false, detailed || config.output.detailed, true, true)
                    .generate_report(&report, output_format)?;
                save_report_to_file(&plain, &report_path)?;
                info!("Report written to {}", report_path.display());
            }

            if save {
                let owner = owner.unwrap_or_else(|| config.storage.default_owner.clone());
                let store = ResumeStore::open(config.database_path()).await?;
                let saved = store.save(NewRecord::from_report(&owner, &report)).await?;
                store.close().await;
                println!("💾 Saved as record #{} for '{}'", saved.id, saved.owner);
            }
        }

        Commands::History {
            owner,
            limit,
            output,
            detailed,
        } => {
            let output_format = match output {
                Some(output) => cli::parse_output_format(&output).map_err(ResumeParserError::InvalidInput)?,
                None => config.output.format,
            };

            let store = ResumeStore::open(config.database_path()).await?;
            let records = store.list(owner.as_deref(), limit).await?;
            store.close().await;

            let generator = ReportGenerator::with_options(config.output.color_output, detailed, true, true);
            println!("{}", generator.generate_history(&records, output_format)?);
        }

        Commands::Config { action } => run_config_command(action, config_path)?,
    }

    Ok(())
}

fn run_config_command(action: Option<ConfigAction>, config_path: &Path) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            let config = Config::load_from(config_path)?;
            println!("⚙️  Current Configuration\n");
            println!("Config File: {}", config_path.display());
            println!("Database: {}", config.database_path().display());
            println!("Default Owner: {}", config.storage.default_owner);
            println!("\nExtraction:");
            println!("  Name Strategy: {:?}", config.extraction.name_strategy);
            println!("  Skills Strategy: {:?}", config.extraction.skills_strategy);
            println!("  Skill Vocabulary: {}", config.extraction.skill_vocabulary.join(", "));
            println!("  Role Body Limit: {} characters", config.extraction.role_body_limit);
            println!("  Cache Extracted Text: {}", config.extraction.cache_text);
            println!("\nMatching:");
            println!("  Mode: {}", config.matching.mode);
            println!("\nOutput:");
            println!("  Format: {:?}", config.output.format);
            println!("  Detailed: {}", config.output.detailed);
            println!("  Colors: {}", config.output.color_output);
        }

        Some(ConfigAction::Reset) => {
            println!("🔄 Resetting configuration to defaults...");
            Config::reset(config_path)?;
            println!("✅ Configuration reset successfully!");
        }

        Some(ConfigAction::Path) => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
