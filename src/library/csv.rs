//! Line-level CSV helpers for track exports.
//!
//! Exports from DJ software are only loosely CSV: fields may or may not be
//! quoted, and quoted fields may contain commas. A comma separates fields
//! only when an even number of quote characters follows it on the line.

/// Split one line into trimmed fields.
///
/// One bounding quote is stripped from each end of a field before trimming.
pub fn split_line(line: &str) -> Vec<String> {
    let bytes = line.as_bytes();

    // quotes_after[i] = number of '"' in line[i..]
    let mut quotes_after = vec![0usize; bytes.len() + 1];
    for i in (0..bytes.len()).rev() {
        quotes_after[i] = quotes_after[i + 1] + usize::from(bytes[i] == b'"');
    }

    let mut fields = Vec::new();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b',' && quotes_after[i + 1] % 2 == 0 {
            fields.push(clean_field(&line[start..i]));
            start = i + 1;
        }
    }
    fields.push(clean_field(&line[start..]));
    fields
}

fn clean_field(raw: &str) -> String {
    let raw = raw.strip_prefix('"').unwrap_or(raw);
    let raw = raw.strip_suffix('"').unwrap_or(raw);
    raw.trim().to_string()
}

/// Parse the leading decimal number of a value, ignoring trailing text.
///
/// `"128"`, `"128.5 BPM"` and `" -3"` parse; `"BPM 128"` and `""` do not.
/// Exponents are not read: `"1.28e2"` is 1.28.
pub fn leading_number(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let bytes = value.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }
    value[..end].parse().ok()
}
