//! 批次报告格式化
//!
//! 把 [`BatchResult`] 变成发回聊天频道的文本，并按平台的消息长度上限分段。

use std::fmt::Write;

use crate::translation::config::constants::DISCORD_MESSAGE_LIMIT;
use crate::translation::pipeline::{BatchResult, BatchStatus, RenameOutcome, RenameStatus, SkipReason};

/// 批次开始前发送的提示
pub fn started_notice(dry_run: bool, source_lang: &str, target_lang: &str) -> String {
    if dry_run {
        format!(
            "Computing planned translations ({} -> {})...",
            source_lang, target_lang
        )
    } else {
        format!(
            "Translating channels and roles ({} -> {})...",
            source_lang, target_lang
        )
    }
}

/// 格式化批次结果
///
/// 中止的批次只报告原因；预览列出每个实体的计划译文；
/// 实际运行给出计数并列出每个失败的实体及其错误种类。
pub fn format_batch_report(result: &BatchResult) -> String {
    if let BatchStatus::Aborted(reason) = &result.status {
        return format!("Translation aborted: {}", reason.describe());
    }

    let summary = result.summary();
    let mut report = String::new();

    if result.dry_run {
        let _ = writeln!(
            report,
            "Planned translations ({} -> {}):",
            result.source_lang, result.target_lang
        );
        for outcome in &result.outcomes {
            let _ = writeln!(report, "{}", preview_line(outcome));
        }
        let _ = write!(
            report,
            "{} to rename, {} skipped, {} failed.",
            summary.previewed, summary.skipped, summary.failed
        );
        return report;
    }

    let _ = write!(
        report,
        "Translation finished ({} -> {}): {} renamed, {} skipped, {} failed.",
        result.source_lang, result.target_lang, summary.renamed, summary.skipped, summary.failed
    );
    let failures: Vec<_> = result.failures().collect();
    if !failures.is_empty() {
        let _ = write!(report, "\nFailures:");
        for outcome in failures {
            let _ = write!(report, "\n{}", failure_line(outcome));
        }
    }
    report
}

fn preview_line(outcome: &RenameOutcome) -> String {
    match (&outcome.status, &outcome.translated_name) {
        (RenameStatus::Skipped(SkipReason::PreviewOnly), Some(translated)) => {
            format!("{} -> {}", outcome.original_name, translated)
        }
        (RenameStatus::Skipped(reason), _) => {
            format!("{} (skipped: {})", outcome.original_name, reason)
        }
        (RenameStatus::Failed(_), _) => failure_line(outcome),
        (RenameStatus::Renamed, _) => outcome.original_name.clone(),
    }
}

fn failure_line(outcome: &RenameOutcome) -> String {
    let kind = outcome
        .error()
        .map(|error| error.kind_label())
        .unwrap_or("unknown error");
    format!("{} ({}): {}", outcome.original_name, outcome.kind, kind)
}

/// 格式化当前的频道和角色名称
pub fn format_listing(channels: &[String], roles: &[String]) -> String {
    format!(
        "Current channels:\n{}\n\nCurrent roles:\n{}",
        channels.join("\n"),
        roles.join("\n")
    )
}

/// 按平台上限切分消息
pub fn split_for_discord(text: &str) -> Vec<String> {
    split_message(text, DISCORD_MESSAGE_LIMIT)
}

/// 按行切分消息，每段不超过 `limit` 个字符
///
/// 单行超过上限时按字符边界硬切。空行保留，只有恰好单独构成一段的
/// 空行会被丢弃（平台不接受空消息）。
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut current_lines = 0;

    fn flush(chunks: &mut Vec<String>, current: &mut String) {
        let chunk = std::mem::take(current);
        if !chunk.trim().is_empty() {
            chunks.push(chunk);
        }
    }

    for line in text.lines() {
        let line_len = line.chars().count();

        if line_len > limit {
            if current_lines > 0 {
                flush(&mut chunks, &mut current);
                current_len = 0;
                current_lines = 0;
            }
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current_lines == 0 { line_len } else { line_len + 1 };
        if current_lines > 0 && current_len + needed > limit {
            flush(&mut chunks, &mut current);
            current_len = 0;
            current_lines = 0;
        }
        if current_lines > 0 {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
        current_lines += 1;
    }

    if current_lines > 0 {
        flush(&mut chunks, &mut current);
    }
    chunks
}
