use clap::Parser;
use course_cart::adapters::catalog::load_catalog;
use course_cart::adapters::export::SelectionExporter;
use course_cart::app::prompt::{AlwaysConfirm, LinePrompt};
use course_cart::app::{render, shell::Shell};
use course_cart::config::cli::{BrowseArgs, CheckoutArgs, Command};
use course_cart::core::cart_query;
use course_cart::core::filter::{LevelBucket, SortKey};
use course_cart::core::session::ConfirmOutcome;
use course_cart::core::ConfigProvider;
use course_cart::utils::logger::{self, LogFormat};
use course_cart::utils::validation::Validate;
use course_cart::{
    AppConfig, CartError, CliArgs, HttpRatingFetcher, LocalStorage, RatingLoad, Result, Session,
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 載入配置；預設路徑不存在時使用內建預設值
    let config_missing = !Path::new(&args.config).exists();
    let mut config = if config_missing {
        AppConfig::default()
    } else {
        match AppConfig::from_file(&args.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        }
    };
    args.apply_overrides(&mut config);

    // 初始化日誌
    let log_format = config
        .log_format()
        .and_then(LogFormat::parse)
        .unwrap_or_default();
    logger::init_cli_logger(config.verbose(), log_format);

    tracing::info!("🚀 Starting course-cart");
    if config_missing {
        tracing::warn!("Config file '{}' not found, using defaults", args.config);
    }
    tracing::debug!("Config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&args, &config).await {
        tracing::error!(
            "❌ course-cart failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        std::process::exit(e.severity().exit_code());
    }

    Ok(())
}

async fn run(args: &CliArgs, config: &AppConfig) -> Result<()> {
    let storage = LocalStorage::new(".");
    let catalog = load_catalog(&storage, config.catalog_path()).await?;
    let session = Session::new(catalog);

    let load = if args.offline {
        tracing::info!("Offline mode, skipping rating fetch");
        None
    } else {
        let fetcher = Arc::new(HttpRatingFetcher::from_config(config));
        Some(RatingLoad::spawn(fetcher, session.catalog().ids()))
    };

    match &args.command {
        Command::Browse(browse_args) => browse(session, load, browse_args).await,
        Command::Checkout(checkout_args) => checkout(session, load, checkout_args, config).await,
        Command::Shell => shell(session, load).await,
    }
}

async fn resolve(session: &mut Session, load: Option<RatingLoad>) {
    match load {
        Some(mut load) => {
            let ratings = load.wait().await.unwrap_or_default();
            session.apply_ratings(ratings);
        }
        None => session.apply_ratings(Vec::new()),
    }
}

fn restore_cart(session: &mut Session, query: &str) -> Result<()> {
    let ids = cart_query::from_query(query)?;
    for id in session.restore_cart(&ids) {
        tracing::warn!("{} is not in the catalog, dropped from cart", id);
    }
    Ok(())
}

async fn browse(mut session: Session, load: Option<RatingLoad>, args: &BrowseArgs) -> Result<()> {
    resolve(&mut session, load).await;
    restore_cart(&mut session, &args.cart)?;

    session.set_search(args.search.clone());
    for level in &args.level {
        let bucket = LevelBucket::parse(level).ok_or_else(|| CartError::InvalidConfigValueError {
            field: "--level".to_string(),
            value: level.clone(),
            reason: "expected intro, regular or upper".to_string(),
        })?;
        session.toggle_bucket(bucket);
    }
    if let Some(sort) = &args.sort {
        let key = SortKey::parse(sort).ok_or_else(|| CartError::InvalidConfigValueError {
            field: "--sort".to_string(),
            value: sort.clone(),
            reason: "expected number, quality, difficulty or workload".to_string(),
        })?;
        session.select_sort(key);
    }
    if args.cart_only {
        session.toggle_view();
    }

    println!("{}", render::filter_summary(session.filter()));
    print!(
        "{}",
        render::course_list(&session.visible(), session.cart(), session.is_loading())
    );
    print!("{}", render::cart_sidebar(session.cart()));
    Ok(())
}

async fn checkout(
    mut session: Session,
    load: Option<RatingLoad>,
    args: &CheckoutArgs,
    config: &AppConfig,
) -> Result<()> {
    resolve(&mut session, load).await;
    restore_cart(&mut session, &args.cart)?;

    print!(
        "{}",
        render::checkout(&session.checkout_summary(), session.is_loading())
    );

    let outcome = if args.yes {
        session.confirm_checkout(&mut AlwaysConfirm)
    } else {
        let stdin = std::io::stdin();
        let mut prompt = LinePrompt::new(stdin.lock(), std::io::stdout());
        session.confirm_checkout(&mut prompt)
    };

    match outcome {
        ConfirmOutcome::Confirmed(summary) => {
            if let Some(message) = session.notification() {
                println!("✅ {}", message);
            }
            if args.export {
                let export = config.export_settings()?;
                let exporter = SelectionExporter::new(
                    LocalStorage::new(export.output_path.clone()),
                    export.formats.clone(),
                );
                for file in exporter.export(&summary, chrono::Utc::now()).await? {
                    println!("📁 {}/{}", export.output_path, file);
                }
            }
        }
        ConfirmOutcome::Declined => println!("Checkout cancelled"),
        ConfirmOutcome::EmptyCart => println!("Your cart is currently empty."),
        ConfirmOutcome::RatingsLoading => println!("Ratings are still loading"),
    }
    Ok(())
}

async fn shell(session: Session, mut load: Option<RatingLoad>) -> Result<()> {
    let mut shell = Shell::new(session, std::io::stdout());
    if load.is_none() {
        shell.session_mut().apply_ratings(Vec::new());
    }
    shell.greet()?;

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut loading = load.is_some();

    // 評分在背景載入，期間仍可操作，評分欄位顯示 Loading...
    loop {
        tokio::select! {
            ratings = async { load.as_mut()?.wait().await }, if loading => {
                loading = false;
                shell.ratings_loaded(ratings.unwrap_or_default())?;
                shell.prompt()?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !shell.execute(&line)? {
                    break;
                }
                shell.prompt()?;
            }
        }
    }

    // 離開時取消尚未完成的載入
    if let Some(mut load) = load {
        load.cancel();
    }
    Ok(())
}
