use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autoweb_translator::env::load_dotenv;
use autoweb_translator::translation::unit::normalize_language;
use autoweb_translator::translation::{
    ConfigManager, GoogleTranslationBackend, TranslationBackend, TranslationFilter,
    TranslationRequest, TranslationResult, UnterminatedPolicy,
};

const DEFAULT_CHUNK_SIZE: usize = 8192;

#[derive(Parser)]
#[command(name = "autoweb-translator")]
#[command(version, about = "Machine-translate the text of an HTML document", long_about = None)]
struct Cli {
    /// Source language [default: from configuration]
    #[arg(short, long)]
    from: Option<String>,

    /// Target language
    #[arg(short, long, required_unless_present = "write_config")]
    to: Option<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of bytes fed to the filter per write
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Drop input that never reaches </html> instead of passing it through
    #[arg(long)]
    discard_unterminated: bool,

    /// Write an example configuration file and exit
    #[arg(long, value_name = "FILE")]
    write_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// HTML file to translate [default: stdin]
    input: Option<PathBuf>,
}

/// 源语言与目标语言相同时使用，过滤器直通时不会调用它
struct Untranslated;

impl TranslationBackend for Untranslated {
    fn provider_name(&self) -> &str {
        "none"
    }

    fn translate(&self, _request: &mut TranslationRequest) -> TranslationResult<()> {
        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("autoweb_translator=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("autoweb_translator=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &cli.write_config {
        ConfigManager::generate_example_config(path)?;
        eprintln!("Example configuration written to {}", path.display());
        return Ok(());
    }

    let manager = ConfigManager::load(cli.config.as_deref())?;
    if let Some(path) = manager.loaded_from() {
        tracing::debug!("使用配置文件 {}", path.display());
    }
    let mut config = manager.into_config();

    if cli.discard_unterminated {
        config.filter.unterminated = UnterminatedPolicy::Discard;
    }

    let source_lang = cli.from.unwrap_or_else(|| config.source_lang.clone());
    let target_lang = cli.to.ok_or("missing target language (--to)")?;

    let backend: Box<dyn TranslationBackend> =
        if normalize_language(&source_lang) == normalize_language(&target_lang) {
            tracing::info!("源语言与目标语言相同 ({})，原样输出", target_lang);
            Box::new(Untranslated)
        } else {
            Box::new(GoogleTranslationBackend::new(config.google.clone())?)
        };

    let mut reader: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(
            File::open(path).map_err(|e| format!("cannot open {}: {}", path.display(), e))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    let sink = BufWriter::new(io::stdout().lock());
    let mut filter =
        TranslationFilter::with_options(sink, backend, &source_lang, &target_lang, config.filter);

    let mut chunk = vec![0u8; cli.chunk_size.max(1)];
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        filter.write_chunk(&chunk[..read])?;
    }

    filter.finish()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let dotenv_file = load_dotenv();
    init_logging(cli.verbose);
    if let Some(file) = dotenv_file {
        tracing::debug!("已加载环境变量文件: {}", file);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
