use serde_json::Value;

/// Canonize a code value (OT type, priority, role): trim and uppercase ASCII.
/// Blank input yields `None`.
pub fn canonize_code(raw: Option<&str>) -> Option<String> {
    let code = raw?.trim();
    if code.is_empty() {
        None
    } else {
        Some(code.to_ascii_uppercase())
    }
}

/// Trimmed copy of `s`, or `None` when nothing is left.
pub fn non_blank(s: Option<&str>) -> Option<String> {
    let t = s?.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Render a scalar JSON value as text. Numbers and booleans use their JSON
/// spelling; null, arrays and objects have no text form.
pub fn value_to_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Positive minute count from a number or numeric string. Fractional minutes
/// round up; zero, negative and non-numeric values yield `None`.
pub fn positive_minutes(v: &Value) -> Option<u32> {
    let minutes = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !minutes.is_finite() || minutes <= 0.0 {
        return None;
    }
    Some(minutes.ceil().min(u32::MAX as f64) as u32)
}
