use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(fields)) = data {
                if let Value::Object(map) = &mut response {
                    map.extend(fields);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print a bare value: JSON-encoded in JSON mode, as-is otherwise
pub fn output_value(output_format: OutputFormat, key: &str, value: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut map = serde_json::Map::new();
            map.insert(key.to_string(), Value::String(value.to_string()));
            println!("{}", serde_json::to_string_pretty(&Value::Object(map))?);
        }
        OutputFormat::Text => println!("{}", value),
    }
    Ok(())
}
