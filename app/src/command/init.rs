use clinsight_config::Config;

/// Strategy for initializing the configuration.
///
/// Creates the default configuration file at `~/clinsight/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::create_config()?;

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Configuration options:");
        println!("   - output.pretty: pretty-print JSON records");
        println!("   - logging.level: trace, debug, info, warn or error");
        println!("   - ingest.input_dir / ingest.output_dir: defaults for 'clinsight ingest'");
        println!("   - ingest.glob: file pattern for batch ingestion");
        println!();
        Ok(())
    }
}
