//! CLI command definitions

use callkit_domain::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for callkit
#[derive(Parser, Debug)]
#[command(name = "callkit")]
#[command(author, version, about = "Run function calls through a cached executor")]
#[command(long_about = r#"
callkit executes model-issued function calls against a registry of built-in
functions and caches successful results by a digest of the function name and
its arguments.

Every call produces a normalized result message:
  {"role": "function", "name": ..., "toolCallId": ..., "content": ...}
Failures are returned as {"error": true, "message": ...} content, never as a crash.

Configuration files are loaded from (in priority order):
1. CALLKIT_<SECTION>__<KEY>                environment variables
2. --config <path>                         Explicit config file
3. ./callkit.toml                          Project-level config
4. ~/.config/callkit/config.toml           Global config

Example:
  callkit call calculate --args '{"operation": "divide", "numbers": [10, 4]}'
  callkit call get_weather --args '{"location": "SF"}' --repeat 2
  echo '{"id": "call_1", "function": {"name": "transform_text", "arguments": "{\"text\": \"hi\", \"operation\": \"uppercase\"}"}}' | callkit exec -
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (text or json)
    #[arg(short, long, global = true, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Override the durable cache directory
    #[arg(long, global = true, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Show configuration file locations and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Call a function through the result cache
    Call {
        /// Function name
        name: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}", value_name = "JSON")]
        args: String,

        /// Cache lifetime in seconds (default from configuration)
        #[arg(long, value_name = "SECS")]
        ttl: Option<u64>,

        /// Skip the cache lookup and store a fresh result
        #[arg(long)]
        force_refresh: bool,

        /// Run the same call several times
        #[arg(long, default_value_t = 1, value_name = "N")]
        repeat: u32,
    },

    /// Execute raw tool call JSON (a single call or an array run concurrently)
    Exec {
        /// Tool call JSON, or `-` to read it from stdin
        #[arg(value_name = "TOOL_CALL")]
        tool_call: String,

        /// Serve and store results through the cache
        #[arg(long)]
        cached: bool,
    },

    /// List registered functions
    List,

    /// Print the function definitions as chat-completion tool schemas
    Schema,

    /// Show cache statistics
    Stats,

    /// List durable cache entries
    Entries,

    /// Drop cached results (all, or those of one function)
    Invalidate {
        /// Only invalidate results of this function
        name: Option<String>,
    },

    /// Remove expired cache entries now
    Sweep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_call() {
        let cli = Cli::parse_from([
            "callkit",
            "call",
            "get_weather",
            "--args",
            r#"{"location": "SF"}"#,
            "--ttl",
            "60",
            "--repeat",
            "2",
        ]);
        match cli.command {
            Some(Command::Call {
                name,
                args,
                ttl,
                force_refresh,
                repeat,
            }) => {
                assert_eq!(name, "get_weather");
                assert_eq!(args, r#"{"location": "SF"}"#);
                assert_eq!(ttl, Some(60));
                assert!(!force_refresh);
                assert_eq!(repeat, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["callkit", "stats", "-vv", "--output", "json", "--no-config"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(cli.no_config);
        assert!(matches!(cli.command, Some(Command::Stats)));
    }

    #[test]
    fn test_invalidate_optional_name() {
        let all = Cli::parse_from(["callkit", "invalidate"]);
        assert!(matches!(all.command, Some(Command::Invalidate { name: None })));

        let one = Cli::parse_from(["callkit", "invalidate", "calculate"]);
        match one.command {
            Some(Command::Invalidate { name }) => assert_eq!(name.as_deref(), Some("calculate")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_output_format() {
        assert!(Cli::try_parse_from(["callkit", "list", "--output", "yaml"]).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
