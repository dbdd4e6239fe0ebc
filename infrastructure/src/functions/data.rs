//! Numeric data: `analyze_data` and `filter_data`

use async_trait::async_trait;
use callkit_domain::{
    Arguments, FunctionDefinition, FunctionError, FunctionHandler, FunctionParameter,
};
use serde_json::json;

pub const ANALYZE_DATA: &str = "analyze_data";
pub const FILTER_DATA: &str = "filter_data";

const STATISTICS: [&str; 6] = ["mean", "median", "min", "max", "sum", "std_dev"];
const COMPARISONS: [&str; 3] = ["greater_than", "less_than", "equal_to"];

pub fn analyze_data_definition() -> FunctionDefinition {
    FunctionDefinition::new(ANALYZE_DATA, "Compute a statistic over a list of numbers")
        .with_parameter(FunctionParameter::new("numbers", "Data set", true).with_type("array"))
        .with_parameter(
            FunctionParameter::new("operation", "Statistic to compute", true)
                .with_allowed_values(STATISTICS),
        )
}

pub fn filter_data_definition() -> FunctionDefinition {
    FunctionDefinition::new(FILTER_DATA, "Keep the numbers that satisfy a threshold predicate")
        .with_parameter(FunctionParameter::new("numbers", "Data set", true).with_type("array"))
        .with_parameter(
            FunctionParameter::new("threshold", "Value to compare against", true)
                .with_type("number"),
        )
        .with_parameter(
            FunctionParameter::new("comparison", "Predicate to apply", true)
                .with_allowed_values(COMPARISONS),
        )
}

/// `analyze_data { numbers[], operation }`
pub struct AnalyzeData;

#[async_trait]
impl FunctionHandler for AnalyzeData {
    fn definition(&self) -> FunctionDefinition {
        analyze_data_definition()
    }

    async fn call(&self, args: &Arguments) -> Result<String, FunctionError> {
        let numbers = args.require_f64_array("numbers")?;
        let operation = args.require_str("operation")?;
        let result = statistic(operation, &numbers)?;

        Ok(json!({
            "operation": operation,
            "count": numbers.len(),
            "result": result,
        })
        .to_string())
    }
}

/// `filter_data { numbers[], threshold, comparison }`
pub struct FilterData;

#[async_trait]
impl FunctionHandler for FilterData {
    fn definition(&self) -> FunctionDefinition {
        filter_data_definition()
    }

    async fn call(&self, args: &Arguments) -> Result<String, FunctionError> {
        let numbers = args.require_f64_array("numbers")?;
        let threshold = args.require_f64("threshold")?;
        let comparison = args.require_str("comparison")?;

        let predicate: fn(f64, f64) -> bool = match comparison {
            "greater_than" => |n, t| n > t,
            "less_than" => |n, t| n < t,
            "equal_to" => |n, t| n == t,
            other => {
                return Err(FunctionError::execution(format!(
                    "Unknown comparison '{other}'. Supported: {}",
                    COMPARISONS.join(", ")
                )));
            }
        };
        let filtered: Vec<f64> = numbers
            .iter()
            .copied()
            .filter(|&n| predicate(n, threshold))
            .collect();

        Ok(json!({
            "comparison": comparison,
            "threshold": threshold,
            "original_count": numbers.len(),
            "filtered_count": filtered.len(),
            "result": filtered,
        })
        .to_string())
    }
}

pub fn statistic(operation: &str, numbers: &[f64]) -> Result<f64, FunctionError> {
    if !STATISTICS.contains(&operation) {
        return Err(FunctionError::execution(format!(
            "Unknown operation '{operation}'. Supported: {}",
            STATISTICS.join(", ")
        )));
    }
    if numbers.is_empty() {
        return Err(FunctionError::execution(format!(
            "Operation '{operation}' requires a non-empty data set"
        )));
    }

    let n = numbers.len() as f64;
    let sum: f64 = numbers.iter().sum();
    let result = match operation {
        "sum" => sum,
        "mean" => sum / n,
        "min" => numbers.iter().copied().fold(f64::INFINITY, f64::min),
        "max" => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        "median" => {
            let mut sorted = numbers.to_vec();
            sorted.sort_by(f64::total_cmp);
            let mid = sorted.len() / 2;
            if sorted.len() % 2 == 0 {
                (sorted[mid - 1] + sorted[mid]) / 2.0
            } else {
                sorted[mid]
            }
        }
        // population standard deviation
        _ => {
            let mean = sum / n;
            let variance = numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
            variance.sqrt()
        }
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(FunctionError::execution(format!(
            "Operation '{operation}' produced a non-finite result"
        )))
    }
}
