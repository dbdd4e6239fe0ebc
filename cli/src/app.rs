//! Dependency wiring and command handlers

use anyhow::{Context, Result, bail};
use callkit_application::{
    CachedExecutor, DurableCacheStore, ExecutionLog, FunctionExecutor, ResultCache,
};
use callkit_domain::{Arguments, FunctionResultMessage, OutputFormat, ToolCall};
use callkit_infrastructure::{
    FileCacheStore, FileConfig, FunctionSchemaConverter, InMemoryCacheStore,
    JsonlExecutionLogger, builtin_registry,
};
use serde_json::{Value, json};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::commands::Command;
use crate::output::ConsoleFormatter;

/// Fully wired pipeline for one CLI invocation
pub struct App {
    cached: Arc<CachedExecutor>,
    format: OutputFormat,
    shutdown: CancellationToken,
    sweeper: JoinHandle<()>,
}

impl App {
    /// Build the registry, cache, executors and sinks from configuration.
    ///
    /// Must be called inside the runtime: the expiry sweeper is spawned here.
    pub fn new(config: &FileConfig, cache_dir: Option<PathBuf>, format: OutputFormat) -> Self {
        let (cache_params, _) = config.cache.to_cache_params();
        let execution_params = config.execution.to_execution_params();

        let registry = Arc::new(builtin_registry(&execution_params));
        info!(functions = registry.len(), "Registered built-in functions");

        let log = match &config.execution.audit_log {
            Some(path) => match JsonlExecutionLogger::new(path) {
                Some(logger) => {
                    info!(path = %path.display(), "Writing execution audit log");
                    ExecutionLog::with_sink(Arc::new(logger))
                }
                None => ExecutionLog::new(),
            },
            None => ExecutionLog::new(),
        };

        let store = Self::durable_store(config, cache_dir);
        let cache = Arc::new(ResultCache::new(store, &cache_params));
        let shutdown = CancellationToken::new();
        let sweeper = cache.spawn_sweeper(cache_params.sweep_interval, shutdown.clone());

        let executor = Arc::new(FunctionExecutor::new(registry, Arc::new(log)));
        Self {
            cached: Arc::new(CachedExecutor::new(executor, cache)),
            format,
            shutdown,
            sweeper,
        }
    }

    fn durable_store(config: &FileConfig, cache_dir: Option<PathBuf>) -> Arc<dyn DurableCacheStore> {
        if !config.cache.durable && cache_dir.is_none() {
            debug!("Durable cache disabled, using in-memory store");
            return Arc::new(InMemoryCacheStore::new());
        }

        match cache_dir
            .or_else(|| config.cache.directory.clone())
            .or_else(FileCacheStore::default_dir)
        {
            Some(dir) => {
                debug!(dir = %dir.display(), "Using file cache store");
                Arc::new(FileCacheStore::new(dir))
            }
            None => {
                warn!("No cache directory available, falling back to in-memory store");
                Arc::new(InMemoryCacheStore::new())
            }
        }
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Call {
                name,
                args,
                ttl,
                force_refresh,
                repeat,
            } => {
                self.call(&name, &args, ttl.map(Duration::from_secs), force_refresh, repeat)
                    .await
            }
            Command::Exec { tool_call, cached } => self.exec(&tool_call, cached).await,
            Command::List => {
                let definitions = self.cached.executor().registry().definitions();
                match self.format {
                    OutputFormat::Text => print!("{}", ConsoleFormatter::format_functions(&definitions)),
                    OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&definitions)),
                }
                Ok(())
            }
            Command::Schema => {
                let tools =
                    FunctionSchemaConverter.registry_schema(self.cached.executor().registry());
                println!("{}", ConsoleFormatter::format_json(&tools));
                Ok(())
            }
            Command::Stats => {
                let cache = self.cached.cache();
                cache.refresh_usage().await;
                let stats = cache.stats();
                match self.format {
                    OutputFormat::Text => print!("{}", ConsoleFormatter::format_stats(&stats)),
                    OutputFormat::Json => println!(
                        "{}",
                        ConsoleFormatter::format_json(&json!({
                            "stats": stats,
                            "hit_rate": stats.hit_rate(),
                        }))
                    ),
                }
                Ok(())
            }
            Command::Entries => {
                let entries = self.cached.cache().entries().await;
                match self.format {
                    OutputFormat::Text => print!(
                        "{}",
                        ConsoleFormatter::format_entries(&entries, chrono::Utc::now())
                    ),
                    OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&entries)),
                }
                Ok(())
            }
            Command::Invalidate { name } => {
                self.cached.cache().invalidate(name.as_deref()).await;
                match (self.format, name) {
                    (OutputFormat::Json, name) => {
                        println!("{}", json!({ "invalidated": name.unwrap_or_else(|| "*".into()) }))
                    }
                    (OutputFormat::Text, Some(name)) => println!("Invalidated cached results of {name}"),
                    (OutputFormat::Text, None) => println!("Cleared the result cache"),
                }
                Ok(())
            }
            Command::Sweep => {
                let removed = self.cached.cache().sweep_expired().await;
                match self.format {
                    OutputFormat::Json => println!("{}", json!({ "removed": removed })),
                    OutputFormat::Text => println!("Removed {removed} expired entries"),
                }
                Ok(())
            }
        }
    }

    async fn call(
        &self,
        name: &str,
        raw_args: &str,
        ttl: Option<Duration>,
        force_refresh: bool,
        repeat: u32,
    ) -> Result<()> {
        let args = Arguments::from_json_str(raw_args).context("--args must be a JSON object")?;
        if repeat == 0 {
            bail!("--repeat must be at least 1");
        }

        let mut runs = Vec::new();
        for _ in 0..repeat {
            let started = Instant::now();
            let result = self.cached.execute(name, &args, ttl, force_refresh).await;
            let elapsed = started.elapsed();
            let cache_used = self.cached.cache_used();

            match self.format {
                OutputFormat::Text => {
                    println!(
                        "{}",
                        ConsoleFormatter::format_call(name, &result, cache_used, elapsed)
                    )
                }
                OutputFormat::Json => runs.push(json!({
                    "name": name,
                    "result": serde_json::from_str::<Value>(&result).unwrap_or(Value::String(result)),
                    "cache_used": cache_used,
                    "duration_ms": elapsed.as_millis() as u64,
                })),
            }
        }

        if self.format == OutputFormat::Json {
            let value = if runs.len() == 1 {
                runs.remove(0)
            } else {
                Value::Array(runs)
            };
            println!("{}", ConsoleFormatter::format_json(&value));
        }
        Ok(())
    }

    async fn exec(&self, raw: &str, cached: bool) -> Result<()> {
        let input = if raw == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read tool call from stdin")?;
            buf
        } else {
            raw.to_string()
        };

        let value: Value = serde_json::from_str(&input).context("Tool call is not valid JSON")?;
        let (calls, batch): (Vec<ToolCall>, bool) = match value {
            Value::Array(items) => (
                items
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<_, _>>()
                    .context("Tool call array has an invalid element")?,
                true,
            ),
            single => (
                vec![serde_json::from_value(single).context("Invalid tool call")?],
                false,
            ),
        };

        // Ctrl-C cancels in-flight calls; each still gets its execution entry
        let interrupt = CancellationToken::new();
        let watcher = {
            let interrupt = interrupt.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    interrupt.cancel();
                }
            })
        };

        let messages = self.run_calls(&calls, cached, &interrupt).await;
        watcher.abort();

        if batch {
            println!("{}", ConsoleFormatter::format_json(&messages));
        } else if let Some(message) = messages.first() {
            println!("{}", ConsoleFormatter::format_json(message));
        }
        Ok(())
    }

    /// Run every call concurrently; `interrupt` cancels the ones still in flight.
    async fn run_calls(
        &self,
        calls: &[ToolCall],
        cached: bool,
        interrupt: &CancellationToken,
    ) -> Vec<FunctionResultMessage> {
        futures::future::join_all(calls.iter().map(|call| async move {
            if cached {
                self.cached
                    .execute_tool_call_with_cancellation(call, None, false, interrupt)
                    .await
            } else {
                self.cached
                    .executor()
                    .execute_with_cancellation(call, interrupt)
                    .await
            }
        }))
        .await
    }

    /// Stop the background sweeper
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.sweeper.await {
            warn!(error = %e, "Cache sweeper did not stop cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut config = FileConfig::default();
        config.cache.durable = false;
        config.execution.simulated_latency_ms = 60_000;
        App::new(&config, None, OutputFormat::Json)
    }

    fn weather(id: &str) -> ToolCall {
        ToolCall::new(id, "get_weather", r#"{"location": "Oslo"}"#)
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_cancels_cached_calls() {
        let app = app();
        let interrupt = CancellationToken::new();

        let calls = [weather("a"), weather("b")];
        let (messages, ()) = tokio::join!(app.run_calls(&calls, true, &interrupt), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            interrupt.cancel();
        });

        assert_eq!(messages.len(), 2);
        for (message, id) in messages.iter().zip(["a", "b"]) {
            assert!(message.is_error());
            assert_eq!(message.tool_call_id, id);
        }
        assert!(app.cached.cache().entries().await.is_empty());
        assert_eq!(app.cached.executor().log().stats().cancelled, 2);
        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_cancels_uncached_calls() {
        let app = app();
        let interrupt = CancellationToken::new();
        interrupt.cancel();

        let messages = app.run_calls(&[weather("a")], false, &interrupt).await;

        assert!(messages[0].is_error());
        assert_eq!(app.cached.executor().log().stats().cancelled, 1);
        app.shutdown().await;
    }
}
