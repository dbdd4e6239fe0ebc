//! Cached execution: consult the result cache before invoking a function.
//!
//! Only successful results are cached, so a cancelled call is never
//! stored. A cache hit produces no execution entry since no handler runs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use callkit_domain::{Arguments, FunctionResultMessage, ToolCall};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::ResultCache;
use crate::use_cases::execute_function::FunctionExecutor;

#[derive(Debug, Default)]
struct LastRun {
    result: Option<String>,
    cache_used: bool,
}

pub struct CachedExecutor {
    executor: Arc<FunctionExecutor>,
    cache: Arc<ResultCache>,
    last: Mutex<LastRun>,
}

impl CachedExecutor {
    pub fn new(executor: Arc<FunctionExecutor>, cache: Arc<ResultCache>) -> Self {
        Self {
            executor,
            cache,
            last: Mutex::new(LastRun::default()),
        }
    }

    pub fn executor(&self) -> &Arc<FunctionExecutor> {
        &self.executor
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Run `name` with `args`, serving from cache when possible.
    ///
    /// `ttl` of `None` uses the cache default. `force_refresh` skips the
    /// lookup but still stores a fresh successful result. Failures come
    /// back as the JSON error payload and are never cached.
    pub async fn execute(
        &self,
        name: &str,
        args: &Arguments,
        ttl: Option<Duration>,
        force_refresh: bool,
    ) -> String {
        self.run(name, None, args, ttl, force_refresh, None).await
    }

    /// [`execute`](Self::execute) that `token` may cancel while the handler
    /// runs. A cancelled call returns the cancellation payload.
    pub async fn execute_with_cancellation(
        &self,
        name: &str,
        args: &Arguments,
        ttl: Option<Duration>,
        force_refresh: bool,
        token: &CancellationToken,
    ) -> String {
        self.run(name, None, args, ttl, force_refresh, Some(token)).await
    }

    /// Same as [`execute`](Self::execute) for a raw tool call.
    ///
    /// Malformed arguments are handed to the executor so the failure is
    /// logged once, then returned as an error message.
    pub async fn execute_tool_call(
        &self,
        call: &ToolCall,
        ttl: Option<Duration>,
        force_refresh: bool,
    ) -> FunctionResultMessage {
        self.run_tool_call(call, ttl, force_refresh, None).await
    }

    pub async fn execute_tool_call_with_cancellation(
        &self,
        call: &ToolCall,
        ttl: Option<Duration>,
        force_refresh: bool,
        token: &CancellationToken,
    ) -> FunctionResultMessage {
        self.run_tool_call(call, ttl, force_refresh, Some(token)).await
    }

    async fn run_tool_call(
        &self,
        call: &ToolCall,
        ttl: Option<Duration>,
        force_refresh: bool,
        token: Option<&CancellationToken>,
    ) -> FunctionResultMessage {
        match call.parse_arguments() {
            Ok(args) => {
                let output = self
                    .run(call.name(), Some(&call.id), &args, ttl, force_refresh, token)
                    .await;
                FunctionResultMessage::success(call.name(), &call.id, &output)
            }
            Err(_) => {
                let message = self.executor.execute(call).await;
                self.remember(message.content.clone(), false);
                message
            }
        }
    }

    async fn run(
        &self,
        name: &str,
        tool_call_id: Option<&str>,
        args: &Arguments,
        ttl: Option<Duration>,
        force_refresh: bool,
        token: Option<&CancellationToken>,
    ) -> String {
        if !force_refresh {
            let started = Instant::now();
            if let Some(cached) = self.cache.get(name, args).await {
                info!(
                    function = %name,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Served from cache"
                );
                self.remember(cached.clone(), true);
                return cached;
            }
        } else {
            debug!(function = %name, "Forced refresh, skipping cache lookup");
        }

        let output = match self.executor.run(name, tool_call_id, args, token).await {
            Ok(output) => {
                let ttl = ttl.unwrap_or_else(|| self.cache.default_ttl());
                self.cache.set(name, args, output.clone(), ttl).await;
                output
            }
            Err(e) => e.to_payload().to_string(),
        };

        self.remember(output.clone(), false);
        output
    }

    fn remember(&self, result: String, cache_used: bool) {
        let mut last = self.last.lock();
        last.result = Some(result);
        last.cache_used = cache_used;
    }

    /// Output of the most recent call
    pub fn last_result(&self) -> Option<String> {
        self.last.lock().result.clone()
    }

    /// Whether the most recent call was served from cache
    pub fn cache_used(&self) -> bool {
        self.last.lock().cache_used
    }
}
