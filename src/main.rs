use anyhow::Context;
use chrono::Local;
use clap::Parser;
use inventur_common::Session;
use inventur_scan::{cli, config, export, import, logging, terminal};
use cli::{Cli, Commands};
use config::Config;
use export::backup::{export_backup, BackupTarget};
use export::XlsxLedgerStore;
use std::path::PathBuf;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("設定の読み込みに失敗しました")?;
    logging::init(Config::config_dir().ok().as_deref(), cli.verbose);

    let result = run(cli.command, config);
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

fn with_data_dir(mut config: Config, data_dir: Option<PathBuf>) -> Config {
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    config
}

fn run(command: Commands, stored: Config) -> anyhow::Result<()> {
    // 環境変数の上書きは実行時の設定のみ
    let config = stored.clone().with_env_overrides();

    match command {
        Commands::Scan { catalog, data_dir, no_auto_save } => {
            println!("📦 inventur-scan - 棚卸スキャン\n");
            let config = with_data_dir(config, data_dir);
            let catalog_path = catalog.unwrap_or_else(|| config.catalog_path());

            let catalog = import::load_catalog(&catalog_path).with_context(|| {
                format!("Arbeitstabelleを読み込めません: {}", catalog_path.display())
            })?;
            std::fs::create_dir_all(&config.data_dir)?;
            let ledger = import::load_ledger(&config.roll_ledger_path(), &config.granulate_ledger_path())?;

            let store = XlsxLedgerStore::from_config(&config, &catalog);
            let auto_save = config.auto_save && !no_auto_save;
            info!(catalog = %catalog_path.display(), auto_save, "セッション開始");

            let mut session = Session::new(catalog, ledger, store, auto_save);
            terminal::run_interactive_session(&mut session, &config.backup_path())?;
            println!("\n✅ 終了しました（記録: {}件）", session.ledger().len());
        }

        Commands::List { json, data_dir } => {
            let config = with_data_dir(config, data_dir);
            let ledger = import::load_ledger(&config.roll_ledger_path(), &config.granulate_ledger_path())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&ledger.all_entries())?);
            } else {
                terminal::render::print_entries(&ledger);
            }
        }

        Commands::Check { catalog } => {
            let catalog_path = catalog.unwrap_or_else(|| config.catalog_path());
            let catalog = import::load_catalog(&catalog_path)?;

            println!("✔ {}", catalog_path.display());
            println!("  Rollen:   {}件", catalog.rolls().len());
            match catalog.granulate() {
                Some(g) => println!("  Granulat: {}件", g.len()),
                None => println!("  Granulat: なし（ロールのみ）"),
            }
        }

        Commands::Export { output, data_dir } => {
            let config = with_data_dir(config, data_dir);
            let sources = vec![config.roll_ledger_path(), config.granulate_ledger_path()];
            let target = BackupTarget::from_output(output, &config.backup_path());

            let created = export_backup(&sources, &target, &Local::now().naive_local())?;
            for path in created {
                println!("✔ バックアップ: {}", path.display());
            }
        }

        Commands::Config { show, auto_save } => {
            let mut config = stored;

            if let Some(value) = auto_save {
                config.set_auto_save(value)?;
                println!("✔ 自動保存: {}", if value { "ON" } else { "OFF" });
            }

            if show || auto_save.is_none() {
                println!("設定: {}", Config::config_path()?.display());
                println!("  自動保存: {}", if config.auto_save { "ON" } else { "OFF" });
                println!("  データフォルダ: {}", config.data_dir.display());
                if let Ok(dir) = std::env::var(config::DATA_DIR_ENV) {
                    println!("  （実行時は INVENTUR_DATA_DIR={} を使用）", dir);
                }
                println!("  Arbeitstabelle: {}", config.catalog_path().display());
                println!("  棚卸（ロール）: {}", config.roll_ledger_path().display());
                println!("  棚卸（グラニュレート）: {}", config.granulate_ledger_path().display());
                println!("  バックアップ: {}", config.backup_path().display());
            }
        }
    }
    Ok(())
}
