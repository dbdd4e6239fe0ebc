//! String transforms: `transform_text`

use async_trait::async_trait;
use callkit_domain::{
    Arguments, FunctionDefinition, FunctionError, FunctionHandler, FunctionParameter,
};
use serde_json::{Value, json};

pub const TRANSFORM_TEXT: &str = "transform_text";

const OPERATIONS: [&str; 8] = [
    "uppercase",
    "lowercase",
    "capitalize",
    "reverse",
    "trim",
    "word_count",
    "char_count",
    "replace",
];

pub fn transform_text_definition() -> FunctionDefinition {
    FunctionDefinition::new(TRANSFORM_TEXT, "Transform or measure a piece of text")
        .with_parameter(FunctionParameter::new("text", "Input text", true))
        .with_parameter(
            FunctionParameter::new("operation", "Transformation to apply", true)
                .with_allowed_values(OPERATIONS),
        )
        .with_parameter(FunctionParameter::new(
            "find",
            "Substring to look for (replace only)",
            false,
        ))
        .with_parameter(FunctionParameter::new(
            "replace",
            "Replacement text (replace only, defaults to empty)",
            false,
        ))
}

/// `transform_text { text, operation, find?, replace? }`
pub struct TransformText;

#[async_trait]
impl FunctionHandler for TransformText {
    fn definition(&self) -> FunctionDefinition {
        transform_text_definition()
    }

    async fn call(&self, args: &Arguments) -> Result<String, FunctionError> {
        let text = args.require_str("text")?;
        let operation = args.require_str("operation")?;
        let result = transform(text, operation, args)?;

        Ok(json!({
            "operation": operation,
            "original": text,
            "result": result,
        })
        .to_string())
    }
}

fn transform(text: &str, operation: &str, args: &Arguments) -> Result<Value, FunctionError> {
    let result = match operation {
        "uppercase" => json!(text.to_uppercase()),
        "lowercase" => json!(text.to_lowercase()),
        "capitalize" => json!(capitalize(text)),
        "reverse" => json!(text.chars().rev().collect::<String>()),
        "trim" => json!(text.trim()),
        "word_count" => json!(text.split_whitespace().count()),
        "char_count" => json!(text.chars().count()),
        "replace" => {
            let find = args.require_str("find")?;
            if find.is_empty() {
                return Err(FunctionError::execution(
                    "Parameter 'find' must not be empty",
                ));
            }
            let replacement = args.get_str("replace")?.unwrap_or("");
            json!(text.replace(find, replacement))
        }
        other => {
            return Err(FunctionError::execution(format!(
                "Unknown operation '{other}'. Supported: {}",
                OPERATIONS.join(", ")
            )));
        }
    };
    Ok(result)
}

/// Upper-case the first letter of every whitespace-separated word
fn capitalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(args: Arguments) -> Result<Value, FunctionError> {
        let output = TransformText.call(&args).await?;
        Ok(serde_json::from_str::<Value>(&output).unwrap()["result"].clone())
    }

    fn args(text: &str, operation: &str) -> Arguments {
        Arguments::new().with("text", text).with("operation", operation)
    }

    #[tokio::test]
    async fn test_case_changes() {
        assert_eq!(run(args("Hello", "uppercase")).await.unwrap(), "HELLO");
        assert_eq!(run(args("Hello", "lowercase")).await.unwrap(), "hello");
        assert_eq!(
            run(args("hello wORLD  again", "capitalize")).await.unwrap(),
            "Hello World  Again"
        );
    }

    #[tokio::test]
    async fn test_reverse_is_char_aware() {
        assert_eq!(run(args("añb", "reverse")).await.unwrap(), "bña");
    }

    #[tokio::test]
    async fn test_counts() {
        assert_eq!(run(args("  one two\tthree ", "word_count")).await.unwrap(), 3);
        assert_eq!(run(args("日本語", "char_count")).await.unwrap(), 3);
        assert_eq!(run(args("  padded  ", "trim")).await.unwrap(), "padded");
    }

    #[tokio::test]
    async fn test_replace() {
        let a = args("a-b-c", "replace").with("find", "-").with("replace", "+");
        assert_eq!(run(a).await.unwrap(), "a+b+c");

        let no_replacement = args("a-b-c", "replace").with("find", "-");
        assert_eq!(run(no_replacement).await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_replace_requires_find() {
        assert_eq!(
            run(args("abc", "replace")).await.unwrap_err(),
            FunctionError::MissingParameter("find".into())
        );
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let err = run(args("abc", "shout")).await.unwrap_err();
        assert!(err.to_string().contains("Unknown operation 'shout'"));
    }
}
