use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::translation::{
    BlockDocument, DocumentTransformer, FieldRef, SkipReason, TransformReport, TranslationGateway,
    TranslationService,
};

// @module: Application controller for block-document translation

/// Per-run switches that are not part of the configuration file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only list the fields that would be translated
    pub dry_run: bool,
    /// Replace an existing output file
    pub force_overwrite: bool,
    /// Hide the progress bar
    pub quiet: bool,
}

/// Outcome of one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// File written, `None` for dry runs and skipped runs
    pub output_path: Option<PathBuf>,
    /// Fields selected for translation
    pub planned: Vec<FieldRef>,
    /// What the transformation did; empty for dry runs
    pub report: TransformReport,
    /// Wall time of the run
    pub elapsed: Duration,
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the workflow with the provider selected in the configuration
    pub async fn run(&self, options: &RunOptions) -> Result<RunSummary> {
        let service = TranslationService::new(&self.config.translation)?;
        info!(
            "Using {} (request delay {:?}, retries {})",
            service.provider_name(),
            service.options().request_delay,
            service.options().retry_count
        );

        if !options.dry_run {
            service
                .test_connection()
                .await
                .with_context(|| format!("{} is not reachable", service.provider_name()))?;
        }

        let summary = self.run_with_gateway(service, options).await?;
        Ok(summary)
    }

    /// Run the workflow: load the source document, translate it, write the output.
    ///
    /// The output file is only written once the whole document is translated.
    pub async fn run_with_gateway<G: TranslationGateway>(&self, gateway: G, options: &RunOptions) -> Result<RunSummary> {
        let start_time = Instant::now();
        let source_language = &self.config.source_language;
        let target_language = &self.config.target_language;
        let output_path = self.config.output.path.clone();

        if !options.dry_run && FileManager::file_exists(&output_path) && !options.force_overwrite {
            warn!("Skipping, output already exists: {:?} (use -f to force overwrite)", output_path);
            return Ok(RunSummary {
                output_path: None,
                planned: Vec::new(),
                report: TransformReport::default(),
                elapsed: start_time.elapsed(),
            });
        }

        let source = self.config.source.resolve()?;
        info!("Loading source document from {}", source.describe());
        let document = source.load(source_language, target_language).await?;

        let transformer = DocumentTransformer::new(gateway, self.config.policy.clone());
        let planned = transformer.plan(&document);
        info!(
            "{} block(s), {} field(s) to translate from {} to {}",
            document.len(),
            planned.len(),
            language_utils::display_language(source_language),
            language_utils::display_language(target_language)
        );

        if options.dry_run {
            for field in &planned {
                info!("Would translate {}", field);
            }
            return Ok(RunSummary {
                output_path: None,
                planned,
                report: TransformReport::default(),
                elapsed: start_time.elapsed(),
            });
        }

        let (translated, report) = self
            .translate_with_progress(&transformer, &document, planned.len(), options.quiet)
            .await?;

        let json = translated
            .to_json_string(self.config.output.pretty)
            .context("Failed to serialize translated document")?;
        FileManager::write_atomically(&output_path, &json)?;

        let elapsed = start_time.elapsed();
        info!(
            "Translated {} field(s), skipped {} block(s) ({} without data) in {}",
            report.translated_count(),
            report.skipped.len(),
            report.skipped_count(SkipReason::MissingData),
            Self::format_duration(elapsed)
        );
        info!("Success: {}", output_path.display());

        Ok(RunSummary {
            output_path: Some(output_path),
            planned,
            report,
            elapsed,
        })
    }

    async fn translate_with_progress<G: TranslationGateway>(
        &self,
        transformer: &DocumentTransformer<G>,
        document: &BlockDocument,
        total_fields: usize,
        quiet: bool,
    ) -> Result<(BlockDocument, TransformReport)> {
        let progress_bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total_fields as u64)
        };
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} fields ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let result = transformer
            .transform_with_progress(
                document,
                &self.config.source_language,
                &self.config.target_language,
                |field| {
                    progress_bar.set_message(field.to_string());
                    progress_bar.inc(1);
                },
            )
            .await;

        match result {
            Ok(done) => {
                progress_bar.finish_and_clear();
                Ok(done)
            }
            Err(e) => {
                progress_bar.abandon();
                error!("{}", e);
                Err(anyhow::Error::new(e).context("Translation aborted, no output written"))
            }
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
