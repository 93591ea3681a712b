use clinsight_config::Config;
use clinsight_core::risk::RISK_TABLES;
use clinsight_core::{Category, ExtractionEngine, Field};

/// Strategy for displaying configuration and library information.
///
/// Outputs:
/// - the config file location and effective settings
/// - rule counts of the extraction library
/// - keyword counts of the taxonomy
/// - the risk tables
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::config_path()?;
        let config = Config::load_or_default()?;

        println!("=== clinsight Configuration ===\n");
        if config_path.exists() {
            println!("Config file: {}", config_path.display());
        } else {
            println!("Config file: {} (not found, using defaults)", config_path.display());
        }
        println!("  Pretty output: {}", config.output.pretty);
        println!("  Log level: {}", config.logging.level);
        println!(
            "  Ingest input dir: {}",
            display_or(config.ingest.input_dir.as_deref(), "(CASE_REPORTS_DIR or ./case_reports)")
        );
        println!(
            "  Ingest output dir: {}",
            display_or(config.ingest.output_dir.as_deref(), "(./case_report_insights)")
        );
        println!("  Ingest glob: {}", config.ingest.glob);
        println!();

        let engine = ExtractionEngine::standard();
        let rule_count: usize = Field::ALL.iter().map(|f| engine.rules(*f).len()).sum();
        println!("Extraction Library:");
        println!("  Fields: {}", Field::ALL.len());
        println!("  Rules: {rule_count}");
        println!();

        println!("Keyword Taxonomy:");
        for category in Category::ALL {
            let suffix = if category.is_reported() { "" } else { " (risk marker)" };
            println!(
                "  {}: {} keywords{suffix}",
                category.as_str(),
                category.keywords().len()
            );
        }
        println!();

        println!("Risk Tables:");
        for table in RISK_TABLES {
            let rules: Vec<String> = table
                .rules
                .iter()
                .map(|rule| format!("{} -> {}", rule.name, rule.level))
                .collect();
            println!(
                "  {}: {} (default {})",
                table.category.as_str(),
                rules.join(", "),
                table.default
            );
        }

        Ok(())
    }
}

fn display_or(path: Option<&std::path::Path>, fallback: &str) -> String {
    path.map_or_else(|| fallback.to_string(), |p| p.display().to_string())
}
