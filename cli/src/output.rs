//! Console output formatting

use callkit_domain::{CacheEntry, CacheStatistics, FunctionDefinition, util::preview};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::time::Duration;

/// Formats command results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Pretty JSON, for `--output json` and the wire-shaped results
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// One result of `call`
    pub fn format_call(name: &str, result: &str, cache_used: bool, elapsed: Duration) -> String {
        let source = if cache_used {
            "cache".green().bold()
        } else {
            "executed".yellow().bold()
        };
        let is_error = serde_json::from_str::<serde_json::Value>(result)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_bool()))
            .unwrap_or(false);
        let label = if is_error {
            format!("{name}:").red().bold()
        } else {
            format!("{name}:").cyan().bold()
        };

        format!(
            "{} {}\n  {} {} {}",
            label,
            result,
            "source:".dimmed(),
            source,
            format!("({} ms)", elapsed.as_millis()).dimmed()
        )
    }

    pub fn format_functions(functions: &[FunctionDefinition]) -> String {
        let mut output = Self::section_header(&format!("Functions ({})", functions.len()));

        for function in functions {
            output.push_str(&format!(
                "\n{}  {}\n",
                function.name.yellow().bold(),
                function.description
            ));
            for param in &function.parameters {
                let required = if param.required { "*" } else { " " };
                let mut line = format!(
                    "  {}{} {} {}",
                    required.red(),
                    param.name.bold(),
                    format!("<{}>", param.param_type).dimmed(),
                    param.description
                );
                if !param.allowed_values.is_empty() {
                    line.push_str(&format!(
                        " {}",
                        format!("[{}]", param.allowed_values.join("|")).dimmed()
                    ));
                }
                output.push_str(&line);
                output.push('\n');
            }
        }

        output
    }

    pub fn format_stats(stats: &CacheStatistics) -> String {
        let mut output = Self::section_header("Cache Statistics");
        let rows = [
            ("Requests", stats.total_requests.to_string()),
            ("Hits", stats.cache_hits.to_string()),
            ("Misses", stats.cache_misses.to_string()),
            ("Hit rate", format!("{:.1}%", stats.hit_rate() * 100.0)),
            ("Expired evictions", stats.evictions.to_string()),
            ("Memory evictions", stats.memory_evictions.to_string()),
            (
                "Memory tier",
                format!(
                    "{} entries, {}",
                    stats.memory_entries,
                    Self::human_bytes(stats.memory_bytes)
                ),
            ),
            (
                "Durable tier",
                format!(
                    "{} entries, {}",
                    stats.durable_entries,
                    Self::human_bytes(stats.durable_bytes)
                ),
            ),
        ];
        for (label, value) in rows {
            output.push_str(&format!("{:<18} {}\n", format!("{label}:").cyan(), value));
        }
        output
    }

    pub fn format_entries(entries: &[CacheEntry], now: DateTime<Utc>) -> String {
        if entries.is_empty() {
            return "No cached results.\n".dimmed().to_string();
        }

        let mut output = Self::section_header(&format!("Cache Entries ({})", entries.len()));
        for entry in entries {
            let expiry = if entry.is_expired_at(now) {
                "expired".red().to_string()
            } else {
                let remaining = entry.expires_at - now;
                format!("expires in {}s", remaining.num_seconds()).green().to_string()
            };
            output.push_str(&format!(
                "\n{} {}\n  {} {}\n  {} {}\n  {} {} hits, {}, {}\n",
                entry.function_name.yellow().bold(),
                entry.key[..12.min(entry.key.len())].dimmed(),
                "args:".dimmed(),
                preview(&entry.arguments_json, 80),
                "result:".dimmed(),
                preview(&entry.result, 80),
                "meta:".dimmed(),
                entry.hit_count,
                Self::human_bytes(entry.size_bytes),
                expiry
            ));
        }
        output
    }

    fn section_header(title: &str) -> String {
        format!("{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn human_bytes(bytes: usize) -> String {
        const KIB: f64 = 1024.0;
        let b = bytes as f64;
        if b < KIB {
            format!("{bytes} B")
        } else if b < KIB * KIB {
            format!("{:.1} KiB", b / KIB)
        } else {
            format!("{:.1} MiB", b / (KIB * KIB))
        }
    }
}
