//! 対話式スキャン
//!
//! バーコードスキャナはキーボード入力として扱う。1入力 = 1操作。

pub mod prompts;
pub mod render;

use crate::error::Result;
use crate::export::backup::{export_backup, BackupTarget};
use crate::export::XlsxLedgerStore;
use chrono::Local;
use inventur_common::{Error, FlushStatus, LedgerStore, Receipt, ScanOutcome, Session};
use std::path::Path;
use tracing::{error, info, warn};

/// 入力欄のコマンド
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Scan(String),
    Undo,
    Delete(String),
    Save,
    List,
    Export,
    Help,
    Quit,
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Command::Scan(trimmed.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().unwrap_or_default().trim().to_string();

    match name {
        "u" | "undo" => Command::Undo,
        "d" | "del" => Command::Delete(arg),
        "s" | "save" => Command::Save,
        "l" | "list" => Command::List,
        "e" | "export" => Command::Export,
        "q" | "quit" => Command::Quit,
        _ => Command::Help,
    }
}

fn print_help() {
    println!("操作: [Charge]スキャン  :u 取り消し  :d <Charge> 削除  :s 保存  :l 一覧  :e バックアップ  :q 終了");
    println!("      入力中は :c でキャンセル");
}

fn report(action: &str, receipt: &Receipt) {
    if let FlushStatus::Failed(e) = &receipt.flush {
        error!(code = %receipt.code, "保存失敗: {}", e);
    }
    println!("{}\n", render::receipt_message(action, receipt));
}

/// ループを続けるか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 1操作の結果を処理
///
/// 1操作内のエラーは表示してループに戻る。続行できないエラーは
/// 台帳を保存してから返す（自動保存オフでも記録を失わない）。
pub fn settle_step<S: LedgerStore>(session: &mut Session<S>, step: Result<Flow>) -> Result<Flow> {
    let err = match step {
        Ok(flow) => return Ok(flow),
        Err(e) => e,
    };

    if !err.is_fatal() {
        warn!("操作を中断: {}", err);
        println!("⚠ {}（キャンセルしました）\n", err);
        return Ok(Flow::Continue);
    }

    error!("セッションを続行できません: {}", err);
    match session.save() {
        Ok(()) => info!("終了前に保存: {}件", session.ledger().len()),
        Err(e) => {
            error!("終了前の保存失敗: {}", e);
            println!("⚠ 保存失敗: {}", e);
        }
    }
    Err(err)
}

/// 対話式スキャンを実行
pub fn run_interactive_session(
    session: &mut Session<XlsxLedgerStore>,
    backup_dir: &Path,
) -> Result<()> {
    println!(
        "📦 Arbeitstabelle: {}件  記録済み: {}件  自動保存: {}",
        session.catalog().len(),
        session.ledger().len(),
        if session.auto_save() { "ON" } else { "OFF" }
    );
    print_help();
    println!("---\n");

    loop {
        let step = prompts::prompt_text("Charge").and_then(|input| match input {
            Some(input) => dispatch(session, backup_dir, parse_command(&input)),
            None => Ok(Flow::Continue),
        });
        if settle_step(session, step)? == Flow::Quit {
            break;
        }
    }

    info!("セッション終了: {}件", session.ledger().len());
    Ok(())
}

fn dispatch(
    session: &mut Session<XlsxLedgerStore>,
    backup_dir: &Path,
    command: Command,
) -> Result<Flow> {
    match command {
        Command::Scan(raw) => handle_scan(session, &raw)?,
        Command::Undo => match session.undo() {
            Some(receipt) => {
                info!(code = %receipt.code, "取り消し");
                report("取り消し", &receipt);
            }
            None => println!("取り消す操作がありません\n"),
        },
        Command::Delete(code) => handle_delete(session, &code)?,
        Command::Save => match session.save() {
            Ok(()) => println!("✔ 保存しました\n"),
            Err(e) => {
                error!("手動保存失敗: {}", e);
                println!("⚠ 保存失敗: {}\n", e);
            }
        },
        Command::List => {
            render::print_entries(session.ledger());
            println!();
        }
        Command::Export => handle_export(session, backup_dir),
        Command::Help => print_help(),
        Command::Quit => {
            if prompts::confirm("終了しますか？")? {
                if !session.auto_save() {
                    if let Err(e) = session.save() {
                        error!("終了時の保存失敗: {}", e);
                        println!("⚠ 保存失敗: {}", e);
                    }
                }
                return Ok(Flow::Quit);
            }
        }
    }
    Ok(Flow::Continue)
}

fn handle_scan(session: &mut Session<XlsxLedgerStore>, raw: &str) -> Result<()> {
    let outcome = match session.scan(raw) {
        Ok(outcome) => outcome,
        Err(Error::EmptyCode) => {
            println!("バーコードを入力またはスキャンしてください\n");
            return Ok(());
        }
        Err(Error::Duplicate(code)) => {
            warn!(code = %code, "重複スキャン");
            println!("⚠ Charge {} は既にスキャン済みです。一覧を確認してください\n", code);
            return Ok(());
        }
        Err(e) => {
            println!("⚠ {}\n", e);
            return Ok(());
        }
    };
    info!(code = %outcome.code(), found = matches!(outcome, ScanOutcome::Found { .. }), "スキャン");

    let recorded = match outcome {
        ScanOutcome::Found { code, record } => {
            render::print_record(&code, &record);
            match prompts::prompt_measurement(&record)? {
                Some((measurement, remark)) => {
                    Some(session.record_found(&code, &record, measurement, &remark))
                }
                None => None,
            }
        }
        ScanOutcome::NotFound { code } => {
            let categories = session.catalog().categories();
            match prompts::prompt_manual_entry(&code, &categories)? {
                Some(manual) => Some(session.record_manual(&code, manual)),
                None => None,
            }
        }
    };

    match recorded {
        Some(Ok(receipt)) => {
            info!(code = %receipt.code, "記録");
            report("記録", &receipt);
        }
        Some(Err(e)) => println!("⚠ {}\n", e),
        None => println!("キャンセルしました\n"),
    }
    Ok(())
}

fn handle_delete(session: &mut Session<XlsxLedgerStore>, code: &str) -> Result<()> {
    if code.is_empty() {
        println!("削除するChargeを指定してください（:d <Charge>）\n");
        return Ok(());
    }
    if !session.ledger().is_duplicate(code) {
        println!("Charge {} は記録されていません\n", code);
        return Ok(());
    }
    if !prompts::confirm(&format!("Charge {} を削除しますか？", code))? {
        return Ok(());
    }
    if let Some(receipt) = session.delete(code) {
        info!(code = %receipt.code, "削除");
        report("削除", &receipt);
    }
    Ok(())
}

fn handle_export(session: &mut Session<XlsxLedgerStore>, backup_dir: &Path) {
    // 最新の状態を書き出してからコピー
    if let Err(e) = session.save() {
        error!("バックアップ前の保存失敗: {}", e);
        println!("⚠ 保存失敗: {}\n", e);
        return;
    }
    let sources = session.store().existing_files();
    let target = BackupTarget::Directory(backup_dir.to_path_buf());
    let stamp = Local::now().naive_local();

    match export_backup(&sources, &target, &stamp) {
        Ok(created) => {
            for path in created {
                println!("✔ バックアップ: {}", path.display());
            }
            println!();
        }
        Err(e) => {
            error!("バックアップ失敗: {}", e);
            println!("⚠ {}\n", e);
        }
    }
}
