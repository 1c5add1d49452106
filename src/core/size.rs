const UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Renders a byte count in binary units, e.g. `1536` as `"1.5 KB"`.
///
/// The value is rounded to two decimals and always keeps at least one
/// fractional digit (`"1.0 KB"`). Zero is the bare literal `"0B"`.
pub fn convert_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }

    let mut exponent = 0usize;
    let mut scale = 1u64;
    while exponent + 1 < UNITS.len() {
        let Some(next) = scale.checked_mul(1024) else {
            break;
        };
        if next > bytes {
            break;
        }
        scale = next;
        exponent += 1;
    }

    let value = bytes as f64 / scale as f64;
    let rounded = (value * 100.0).round() / 100.0;
    let mut rendered = rounded.to_string();
    if !rendered.contains('.') {
        rendered.push_str(".0");
    }
    format!("{rendered} {}", UNITS[exponent])
}
