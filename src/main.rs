use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use plant_identify_client::models::language;
use plant_identify_client::orchestrator::open_storage;
use plant_identify_client::presentation::render_results;
use plant_identify_client::{logger, App, Config};

/// 植物识别客户端
#[derive(Parser, Debug)]
#[command(name = "plant-id", version, about, long_about = None)]
struct Cli {
    /// 配置文件路径（TOML）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 后端地址，覆盖配置
    #[arg(long)]
    api: Option<String>,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 识别一张植物图片
    Identify {
        /// 图片路径
        image: PathBuf,
        /// 目标语言
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// 向聊天机器人提问，不带消息时进入交互模式
    Chat {
        /// 当前讨论的植物
        #[arg(short, long)]
        plant: Option<String>,
        /// 单条消息
        message: Option<String>,
    },
    /// 列出支持的语言
    Languages,
    /// 查看缓存情况
    Cache,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path).await?,
        None => Config::from_env(),
    };
    if let Some(api) = cli.api {
        config.api_base_url = api;
    }
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logger::init_with_verbosity(config.verbose_logging);

    match cli.command {
        Commands::Languages => {
            for (code, name) in language::all() {
                println!("{:<4} {}", code, name);
            }
            return Ok(());
        }
        // 只读取缓存目录，不安装网关也不访问网络
        Commands::Cache => {
            if config.cache_dir.is_none() {
                println!("未配置缓存目录（PLANT_CACHE_DIR），缓存只保存在内存中");
                return Ok(());
            }
            let storage = open_storage(&config).await?;
            println!("当前缓存代: {}", config.cache_generation);
            for (name, count) in storage.report() {
                println!("  {:<24} {} 个条目", name, count);
            }
            return Ok(());
        }
        _ => {}
    }

    let app = App::initialize(config).await?;

    match cli.command {
        Commands::Identify { image, lang } => {
            let mut home = app.home_state();
            if let Some(lang) = lang {
                home.set_language(&lang);
            }

            app.identify(&mut home, &image).await;

            if let Some(alert) = home.take_alert() {
                eprintln!("{}", alert);
                std::process::exit(1);
            }
            print!("{}", render_results(home.result().map(|r| r.as_ref()), home.is_loading()));
        }
        Commands::Chat { plant, message } => {
            let mut session = app.chat_session();
            session.toggle();
            let context = plant.as_deref();

            if let Some(message) = message {
                session.send(&message, context).await;
                if let Some(reply) = session.last_reply() {
                    println!("{}", reply.content);
                }
                return Ok(());
            }

            if let Some(greeting) = session.messages().first() {
                println!("🤖 {}", greeting.content);
            }
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                if matches!(line.trim(), "exit" | "quit") {
                    break;
                }
                if session.send(&line, context).await {
                    if let Some(reply) = session.last_reply() {
                        println!("🤖 {}", reply.content);
                    }
                }
            }
            session.close();
        }
        Commands::Languages | Commands::Cache => {}
    }

    Ok(())
}
