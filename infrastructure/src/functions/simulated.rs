//! Simulated I/O: `get_weather`, `read_file`, `fetch_url`
//!
//! These functions never touch the network or the file system. Each one
//! sleeps for the configured latency and answers with a canned payload
//! derived deterministically from its arguments, so repeated calls with the
//! same arguments produce identical output.

use std::time::Duration;

use async_trait::async_trait;
use callkit_domain::{
    Arguments, FunctionDefinition, FunctionError, FunctionHandler, FunctionParameter,
};
use serde_json::json;
use tracing::debug;

pub const GET_WEATHER: &str = "get_weather";
pub const READ_FILE: &str = "read_file";
pub const FETCH_URL: &str = "fetch_url";

const CONDITIONS: [&str; 5] = ["sunny", "cloudy", "rainy", "windy", "foggy"];
const METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "HEAD"];

pub fn get_weather_definition() -> FunctionDefinition {
    FunctionDefinition::new(GET_WEATHER, "Get the current weather for a location")
        .with_parameter(FunctionParameter::new(
            "location",
            "City or place name, e.g. \"San Francisco\"",
            true,
        ))
        .with_parameter(
            FunctionParameter::new("unit", "Temperature unit (default celsius)", false)
                .with_allowed_values(["celsius", "fahrenheit"]),
        )
}

pub fn read_file_definition() -> FunctionDefinition {
    FunctionDefinition::new(READ_FILE, "Read the contents of a file").with_parameter(
        FunctionParameter::new("path", "Path to the file to read", true).with_type("path"),
    )
}

pub fn fetch_url_definition() -> FunctionDefinition {
    FunctionDefinition::new(FETCH_URL, "Fetch a URL over HTTP")
        .with_parameter(FunctionParameter::new("url", "http(s) URL to fetch", true))
        .with_parameter(
            FunctionParameter::new("method", "HTTP method (default GET)", false)
                .with_allowed_values(METHODS),
        )
}

/// Stable seed so a given input always yields the same canned values
fn seed(input: &str) -> u64 {
    input
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, b| {
            (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        })
}

async fn simulate_latency(function: &str, latency: Duration) {
    if !latency.is_zero() {
        debug!(function, latency_ms = latency.as_millis() as u64, "Simulating I/O latency");
        tokio::time::sleep(latency).await;
    }
}

fn non_empty<'a>(args: &'a Arguments, key: &str) -> Result<&'a str, FunctionError> {
    let value = args.require_str(key)?.trim();
    if value.is_empty() {
        return Err(FunctionError::execution(format!(
            "Parameter '{key}' must not be empty"
        )));
    }
    Ok(value)
}

/// `get_weather { location, unit? }`
pub struct GetWeather {
    latency: Duration,
}

impl GetWeather {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl FunctionHandler for GetWeather {
    fn definition(&self) -> FunctionDefinition {
        get_weather_definition()
    }

    async fn call(&self, args: &Arguments) -> Result<String, FunctionError> {
        let location = non_empty(args, "location")?;
        let unit = args.get_str("unit")?.unwrap_or("celsius");
        if unit != "celsius" && unit != "fahrenheit" {
            return Err(FunctionError::execution(format!(
                "Unknown unit '{unit}'. Supported: celsius, fahrenheit"
            )));
        }

        simulate_latency(GET_WEATHER, self.latency).await;

        let seed = seed(&location.to_lowercase());
        let celsius = 5 + (seed % 26) as i64;
        let temperature = if unit == "fahrenheit" {
            celsius * 9 / 5 + 32
        } else {
            celsius
        };

        Ok(json!({
            "location": location,
            "temperature": temperature,
            "unit": unit,
            "condition": CONDITIONS[(seed / 26 % CONDITIONS.len() as u64) as usize],
            "humidity": 30 + (seed / 7 % 60),
        })
        .to_string())
    }
}

/// `read_file { path }`
pub struct ReadFile {
    latency: Duration,
}

impl ReadFile {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl FunctionHandler for ReadFile {
    fn definition(&self) -> FunctionDefinition {
        read_file_definition()
    }

    async fn call(&self, args: &Arguments) -> Result<String, FunctionError> {
        let path = non_empty(args, "path")?;

        simulate_latency(READ_FILE, self.latency).await;

        let content = format!("Simulated contents of {path}\n");
        Ok(json!({
            "path": path,
            "content": content,
            "size_bytes": content.len(),
            "simulated": true,
        })
        .to_string())
    }
}

/// `fetch_url { url, method? }`
pub struct FetchUrl {
    latency: Duration,
}

impl FetchUrl {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl FunctionHandler for FetchUrl {
    fn definition(&self) -> FunctionDefinition {
        fetch_url_definition()
    }

    async fn call(&self, args: &Arguments) -> Result<String, FunctionError> {
        let url = non_empty(args, "url")?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FunctionError::execution(format!(
                "Unsupported URL '{url}': only http and https are allowed"
            )));
        }

        let method = args.get_str("method")?.unwrap_or("GET").to_uppercase();
        if !METHODS.contains(&method.as_str()) {
            return Err(FunctionError::execution(format!(
                "Unsupported HTTP method '{method}'. Supported: {}",
                METHODS.join(", ")
            )));
        }

        simulate_latency(FETCH_URL, self.latency).await;

        Ok(json!({
            "url": url,
            "method": method,
            "status": 200,
            "headers": { "content-type": "application/json" },
            "body": { "message": format!("Simulated {method} response from {url}") },
            "simulated": true,
        })
        .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::time::Instant;

    fn parse(output: &str) -> Value {
        serde_json::from_str(output).unwrap()
    }

    #[tokio::test]
    async fn test_weather_is_deterministic() {
        let handler = GetWeather::new(Duration::ZERO);
        let args = Arguments::new().with("location", "San Francisco");

        let first = handler.call(&args).await.unwrap();
        let second = handler.call(&args).await.unwrap();

        assert_eq!(first, second);
        let value = parse(&first);
        assert_eq!(value["location"], "San Francisco");
        assert_eq!(value["unit"], "celsius");
        assert!(CONDITIONS.contains(&value["condition"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn test_weather_fahrenheit() {
        let handler = GetWeather::new(Duration::ZERO);
        let base = Arguments::new().with("location", "Tokyo");
        let c = parse(&handler.call(&base).await.unwrap())["temperature"]
            .as_i64()
            .unwrap();
        let f = parse(
            &handler
                .call(&base.clone().with("unit", "fahrenheit"))
                .await
                .unwrap(),
        )["temperature"]
            .as_i64()
            .unwrap();
        assert_eq!(f, c * 9 / 5 + 32);
    }

    #[tokio::test]
    async fn test_weather_rejects_bad_input() {
        let handler = GetWeather::new(Duration::ZERO);
        assert_eq!(
            handler.call(&Arguments::new()).await.unwrap_err(),
            FunctionError::MissingParameter("location".into())
        );
        assert!(handler
            .call(&Arguments::new().with("location", "   "))
            .await
            .is_err());
        assert!(handler
            .call(&Arguments::new().with("location", "Oslo").with("unit", "kelvin"))
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let handler = GetWeather::new(Duration::from_millis(500));
        let started = tokio::time::Instant::now();
        handler
            .call(&Arguments::new().with("location", "SF"))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_read_file() {
        let started = Instant::now();
        let output = ReadFile::new(Duration::ZERO)
            .call(&Arguments::new().with("path", "/etc/hosts"))
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_millis(100));

        let value = parse(&output);
        assert_eq!(value["path"], "/etc/hosts");
        assert_eq!(value["simulated"], true);
        assert!(value["content"].as_str().unwrap().contains("/etc/hosts"));
    }

    #[tokio::test]
    async fn test_fetch_url() {
        let handler = FetchUrl::new(Duration::ZERO);
        let value = parse(
            &handler
                .call(
                    &Arguments::new()
                        .with("url", "https://example.com/api")
                        .with("method", "post"),
                )
                .await
                .unwrap(),
        );
        assert_eq!(value["status"], 200);
        assert_eq!(value["method"], "POST");
    }

    #[tokio::test]
    async fn test_fetch_url_validation() {
        let handler = FetchUrl::new(Duration::ZERO);
        assert!(handler
            .call(&Arguments::new().with("url", "ftp://example.com"))
            .await
            .is_err());
        assert!(handler
            .call(
                &Arguments::new()
                    .with("url", "https://example.com")
                    .with("method", "TRACE")
            )
            .await
            .is_err());
    }
}
