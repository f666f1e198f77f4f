use anyhow::Context;
use clap::Parser;
use sqd_entity_store::StoreSettings;
use sqd_mapping::MappingConfig;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::info;


#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON lines file with decoded blocks, `-` to read from stdin
    #[arg(short, long, value_name = "FILE")]
    input: String,

    /// Database directory
    #[arg(long = "db", default_value = "indexer.db")]
    database_dir: String,

    /// Mapping config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Database block cache size
    #[arg(long, value_name = "MB", default_value_t = 256)]
    cache_size: usize,

    /// Whether the logs should be structured in JSON format
    #[arg(long)]
    json_log: bool
}


fn init_logging(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::builder().parse_lossy(
        std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV)
            .unwrap_or("info".to_string()),
    );

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .flatten_event(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .compact()
            .init();
    }
}


async fn run(args: &Cli) -> anyhow::Result<()> {
    let config = match args.config.as_ref() {
        Some(file) => MappingConfig::read(file).with_context(|| {
            format!("failed to read config from '{}'", file)
        })?,
        None => MappingConfig::default()
    };

    let store = StoreSettings::default()
        .with_cache_size(args.cache_size)
        .open(&args.database_dir)
        .context("failed to open rocksdb database")?;

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = if args.input == "-" {
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        let file = tokio::fs::File::open(&args.input).await.with_context(|| {
            format!("failed to open '{}'", args.input)
        })?;
        Box::new(BufReader::new(file))
    };

    let stats = sqd_indexer::ingest(reader, &store, &config).await?;

    info!(
        blocks = stats.blocks,
        extrinsics = stats.extrinsics,
        skipped = stats.skipped,
        "ingestion finished"
    );

    Ok(())
}


fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    init_logging(args.json_log);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(&args))
}
