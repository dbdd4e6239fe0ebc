//! Built-in functions.
//!
//! | Function | Module |
//! |----------|--------|
//! | `calculate` | [`math`] |
//! | `transform_text` | [`text`] |
//! | `analyze_data`, `filter_data` | [`data`] |
//! | `get_weather`, `read_file`, `fetch_url` | [`simulated`] |

pub mod data;
pub mod math;
pub mod schema;
pub mod simulated;
pub mod text;

use callkit_application::{ExecutionParams, FunctionRegistry};

pub use data::{AnalyzeData, FilterData};
pub use math::Calculate;
pub use schema::FunctionSchemaConverter;
pub use simulated::{FetchUrl, GetWeather, ReadFile};
pub use text::TransformText;

/// Register every built-in function into `registry`.
pub fn register_builtin_functions(registry: &FunctionRegistry, params: &ExecutionParams) {
    let latency = params.simulated_latency;
    registry.register(Calculate);
    registry.register(TransformText);
    registry.register(AnalyzeData);
    registry.register(FilterData);
    registry.register(GetWeather::new(latency));
    registry.register(ReadFile::new(latency));
    registry.register(FetchUrl::new(latency));
}

/// A fresh registry holding the built-in functions
pub fn builtin_registry(params: &ExecutionParams) -> FunctionRegistry {
    let registry = FunctionRegistry::new();
    register_builtin_functions(&registry, params);
    registry
}
