// Defensive JSON-path extraction
//
// `pm2 jlist` output differs between PM2 versions and platforms; every lookup
// falls back to a zero value instead of failing the whole listing.

use serde_json::Value;

/// Walk a dotted path (`"pm2_env.status"`) through nested objects
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.as_object()?.get(key))
}

/// String at `path`, empty when missing or not a string
pub fn get_str(value: &Value, path: &str) -> String {
    lookup(value, path)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Integer at `path`; floats are truncated, numeric strings are parsed
pub fn get_i64(value: &Value, path: &str) -> i64 {
    match lookup(value, path) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| parse_finite(s).map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Non-negative integer at `path` that fits in u32, else 0
pub fn get_u32(value: &Value, path: &str) -> u32 {
    u32::try_from(get_i64(value, path)).unwrap_or(0)
}

/// Float at `path`; numeric strings are parsed, non-finite values become 0
pub fn get_f64(value: &Value, path: &str) -> f64 {
    match lookup(value, path) {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => parse_finite(s.trim()).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Boolean at `path`; accepts `"true"`/`"1"` and non-zero numbers
pub fn get_bool(value: &Value, path: &str) -> bool {
    match lookup(value, path) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.as_str(), "true" | "1"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}
