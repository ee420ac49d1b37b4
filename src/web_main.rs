//! Web 服务器主程序入口
//!
//! 提供静态目录，带 `?lang=xx` 的 HTML 请求经翻译后返回

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autoweb_translator::env::{documented_variables, load_dotenv};
use autoweb_translator::translation::{ConfigManager, GoogleTranslationBackend, SharedBackend};
use autoweb_translator::web::{router, WebState};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_file = load_dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    if let Some(file) = dotenv_file {
        tracing::info!("已加载环境变量文件: {}", file);
    }

    // 解析命令行参数
    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: Option<String> = None;
    let mut port: Option<u16> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut static_dir: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--bind" | "-b", Some(value)) => bind_addr = Some(value.clone()),
            ("--port" | "-p", Some(value)) => {
                port = Some(value.parse().map_err(|_| format!("Invalid port number: {}", value))?)
            }
            ("--config" | "-c", Some(value)) => config_path = Some(PathBuf::from(value)),
            ("--static" | "-s", Some(value)) => static_dir = Some(value.clone()),
            ("--help" | "-h", _) => {
                print_help();
                return Ok(());
            }
            ("--bind" | "-b" | "--port" | "-p" | "--config" | "-c" | "--static" | "-s", None) => {
                eprintln!("Error: {} requires a value", args[i]);
                std::process::exit(1);
            }
            (other, _) => {
                eprintln!("Error: Unknown argument: {}", other);
                print_help();
                std::process::exit(1);
            }
        }
        i += 2;
    }

    let mut config = ConfigManager::load(config_path.as_deref())?.into_config();
    if let Some(bind_addr) = bind_addr {
        config.web.bind_addr = bind_addr;
    }
    if let Some(port) = port {
        config.web.port = port;
    }
    if let Some(static_dir) = static_dir {
        config.web.static_dir = static_dir;
    }

    // 阻塞客户端在运行时之外创建
    let backend: SharedBackend = Arc::new(GoogleTranslationBackend::new(config.google.clone())?);
    let state = Arc::new(WebState::new(backend, &config));
    let app = router(state, &config.web.static_dir);
    let address = format!("{}:{}", config.web.bind_addr, config.web.port);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&address).await?;
        tracing::info!(
            "翻译服务启动: http://{} (静态目录 {})",
            address,
            config.web.static_dir
        );
        axum::serve(listener, app).await
    })?;

    Ok(())
}

fn print_help() {
    println!("Autoweb Translator Web Server");
    println!();
    println!("USAGE:");
    println!("    autoweb-web [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -b, --bind <ADDRESS>     Bind address [default: 127.0.0.1]");
    println!("    -p, --port <PORT>        Port number [default: 7080]");
    println!("    -c, --config <FILE>      Configuration file");
    println!("    -s, --static <DIR>       Static directory [default: static]");
    println!("    -h, --help               Print help information");
    println!();
    println!("ENVIRONMENT:");
    for (name, description) in documented_variables() {
        println!("    {:<28} {}", name, description);
    }
    println!();
    println!("EXAMPLES:");
    println!("    autoweb-web");
    println!("    autoweb-web --bind 0.0.0.0 --port 3000");
    println!("    curl 'http://127.0.0.1:7080/index.html?lang=de'");
}
