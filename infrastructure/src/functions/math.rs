//! Arithmetic: `calculate`

use async_trait::async_trait;
use callkit_domain::{
    Arguments, FunctionDefinition, FunctionError, FunctionHandler, FunctionParameter,
};
use serde_json::json;

pub const CALCULATE: &str = "calculate";

const OPERATIONS: [&str; 6] = ["add", "subtract", "multiply", "divide", "power", "sqrt"];

pub fn calculate_definition() -> FunctionDefinition {
    FunctionDefinition::new(
        CALCULATE,
        "Perform an arithmetic operation over a list of numbers",
    )
    .with_parameter(
        FunctionParameter::new("operation", "Operation to apply", true)
            .with_allowed_values(OPERATIONS),
    )
    .with_parameter(
        FunctionParameter::new(
            "numbers",
            "Operands, applied left to right (power takes base and exponent, sqrt takes one)",
            true,
        )
        .with_type("array"),
    )
}

/// `calculate { operation, numbers[] }`
///
/// Invalid operations never propagate NaN or infinity: dividing by zero,
/// taking the root of a negative number and overflowing are all errors.
pub struct Calculate;

#[async_trait]
impl FunctionHandler for Calculate {
    fn definition(&self) -> FunctionDefinition {
        calculate_definition()
    }

    async fn call(&self, args: &Arguments) -> Result<String, FunctionError> {
        let operation = args.require_str("operation")?;
        let numbers = args.require_f64_array("numbers")?;
        let result = calculate(operation, &numbers)?;

        Ok(json!({
            "operation": operation,
            "numbers": numbers,
            "result": result,
        })
        .to_string())
    }
}

pub fn calculate(operation: &str, numbers: &[f64]) -> Result<f64, FunctionError> {
    let Some((&first, rest)) = numbers.split_first() else {
        return Err(FunctionError::execution(format!(
            "Operation '{operation}' requires at least one number"
        )));
    };

    let result = match operation {
        "add" => numbers.iter().sum(),
        "subtract" => rest.iter().fold(first, |acc, n| acc - n),
        "multiply" => numbers.iter().product(),
        "divide" => {
            if rest.iter().any(|&n| n == 0.0) {
                return Err(FunctionError::execution("Division by zero"));
            }
            rest.iter().fold(first, |acc, n| acc / n)
        }
        "power" => match rest {
            [exponent] => first.powf(*exponent),
            _ => {
                return Err(FunctionError::execution(
                    "Operation 'power' requires exactly two numbers: base and exponent",
                ));
            }
        },
        "sqrt" => {
            if !rest.is_empty() {
                return Err(FunctionError::execution(
                    "Operation 'sqrt' requires exactly one number",
                ));
            }
            if first < 0.0 {
                return Err(FunctionError::execution(format!(
                    "Cannot take the square root of a negative number: {first}"
                )));
            }
            first.sqrt()
        }
        other => {
            return Err(FunctionError::execution(format!(
                "Unknown operation '{other}'. Supported: {}",
                OPERATIONS.join(", ")
            )));
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
