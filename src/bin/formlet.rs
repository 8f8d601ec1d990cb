use formlet::{evaluate_with_config, json_to_value, value_to_json, EngineConfig, Value};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Once;
use std::time::Instant;

static TRACING_INIT: Once = Once::new();

/// Install a fmt subscriber, only when RUST_LOG is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn usage() -> ! {
    eprintln!("Usage: formlet \"expression\" [options] [var=value ...]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --output-json    Output result in JSON format with type and timing");
    eprintln!("  --json JSON      Use JSON string for variable values");
    eprintln!("  --config FILE    Load engine configuration (case sensitivity, separators)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  formlet \"=LET(x, 23, x + 100)\"");
    eprintln!("  formlet \"=SUMIF(:sales, \\\">1000\\\")\" --json '{{\"sales\": [500, 1500, 2500]}}'");
    eprintln!("  formlet \"=LAMBDA(a, b, a * b)(:price, :qty)\" price=19.99 qty=3 --output-json");
    std::process::exit(1);
}

fn fail_usage(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        usage();
    }

    let expr = args[0].as_str();
    let mut output_json = false;
    let mut config = EngineConfig::default();
    let mut vars = HashMap::new();
    let mut i = 1;

    while i < args.len() {
        let arg = &args[i];
        if arg == "--json" {
            let Some(text) = args.get(i + 1) else {
                fail_usage("--json flag requires a JSON string argument");
            };
            match parse_json_vars(text) {
                Ok(parsed) => vars.extend(parsed),
                Err(e) => fail_usage(&e),
            }
            i += 1;
        } else if arg == "--config" {
            let Some(path) = args.get(i + 1) else {
                fail_usage("--config flag requires a file path");
            };
            config = match EngineConfig::from_file(path) {
                Ok(c) => c,
                Err(e) => fail_usage(&e.to_string()),
            };
            i += 1;
        } else if arg == "--output-json" {
            output_json = true;
        } else if let Some((name, value_str)) = arg.split_once('=') {
            vars.insert(name.to_string(), parse_value(value_str));
        } else {
            fail_usage(&format!("Invalid variable assignment: '{}'. Use format: var=value", arg));
        }
        i += 1;
    }

    let start_time = Instant::now();
    let result = evaluate_with_config(expr, &vars, &config);
    let execution_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(val) => {
            if output_json {
                println!("{}", format_json_output(&val, execution_time_ms));
            } else {
                println!("{:?}", val);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn parse_json_vars(text: &str) -> Result<HashMap<String, Value>, String> {
    let parsed: serde_json::Value = serde_json::from_str(text).map_err(|e| format!("Invalid JSON: {}", e))?;
    let serde_json::Value::Object(map) = parsed else {
        return Err("JSON must be an object with key-value pairs".to_string());
    };
    map.into_iter()
        .map(|(key, value)| json_to_value(value).map(|v| (key, v)).map_err(|e| e.to_string()))
        .collect()
}

fn format_json_output(value: &Value, execution_time_ms: f64) -> String {
    let output = json!({
        "result": value_to_json(value),
        "type": value.type_name(),
        "execution_time": format!("{:.2} ms", execution_time_ms)
    });
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

fn parse_value(s: &str) -> Value {
    // Check for string (quoted)
    if s.len() >= 2 && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\''))) {
        return Value::String(s[1..s.len() - 1].to_string());
    }

    match s.to_lowercase().as_str() {
        "true" => return Value::Boolean(true),
        "false" => return Value::Boolean(false),
        "null" => return Value::Null,
        _ => {}
    }

    // Basic support for [1,2,3]
    if s.starts_with('[') && s.ends_with(']') {
        let inner = &s[1..s.len() - 1];
        if inner.trim().is_empty() {
            return Value::Array(vec![]);
        }
        return Value::Array(inner.split(',').map(|item| parse_value(item.trim())).collect());
    }

    if let Ok(num) = s.parse::<f64>() {
        return Value::Number(num);
    }

    Value::String(s.to_string())
}
