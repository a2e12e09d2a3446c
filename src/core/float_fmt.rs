/// Float formatting for SVG output.
///
/// Float-to-decimal formatting in core has panicked on some wasm
/// toolchain/browser combinations (`dragon.rs`). The plot is rendered inside
/// the browser module too, so coordinates and tick labels avoid `format!` on
/// floats: the value is scaled and rounded into an `i64`, then integers are
/// formatted.

pub fn fmt_f64_fixed(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return if v.is_nan() {
            "NaN".to_string()
        } else if v.is_sign_positive() {
            "Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }

    let decimals = decimals.min(9);
    let scale_i64 = 10_i64.pow(decimals as u32);
    let scaled = (v * scale_i64 as f64).round();
    if !scaled.is_finite() || scaled.abs() > (i64::MAX as f64) {
        return if v.is_sign_negative() {
            "-Inf".to_string()
        } else {
            "Inf".to_string()
        };
    }

    let scaled_i = scaled as i64;
    let abs_i = scaled_i.unsigned_abs();
    let scale_u = scale_i64 as u64;
    let int_part = abs_i / scale_u;
    let frac_part = abs_i % scale_u;

    let mut out = String::new();
    if scaled_i < 0 {
        out.push('-');
    }
    out.push_str(&int_part.to_string());

    if decimals > 0 {
        out.push('.');
        let frac_str = frac_part.to_string();
        for _ in 0..decimals.saturating_sub(frac_str.len()) {
            out.push('0');
        }
        out.push_str(&frac_str);
    }
    out
}

/// Fixed-point with trailing zeros (and a bare trailing dot) removed.
pub fn fmt_f64_trim(v: f64, decimals: usize) -> String {
    let s = fmt_f64_fixed(v, decimals);
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
