//! Primitives shared by the line-oriented configuration formats.

/// Strips a trailing comment. A `#` only starts a comment when preceded by
/// whitespace, so URLs with fragments survive.
pub fn strip_inline_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (idx, byte) in bytes.iter().enumerate() {
        if *byte == b'#' && idx > 0 && bytes[idx - 1].is_ascii_whitespace() {
            return line[..idx].trim_end();
        }
    }
    line
}

pub fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Splits on the first run of two-or-more spaces, the navbar field separator.
pub fn split_on_double_space(line: &str) -> Option<(&str, &str)> {
    let bytes = line.as_bytes();
    let mut run_start = None;
    let mut run_len = 0;
    for (idx, byte) in bytes.iter().enumerate() {
        if *byte == b' ' {
            if run_len == 0 {
                run_start = Some(idx);
            }
            run_len += 1;
        } else {
            if run_len >= 2 {
                break;
            }
            run_len = 0;
            run_start = None;
        }
    }
    match run_start {
        Some(start) if run_len >= 2 => {
            let rest = line[start..].trim_start();
            Some((line[..start].trim_end(), rest))
        }
        _ => None,
    }
}

/// Formats a number for SVG/script output: at most three decimals, trailing
/// zeros trimmed. Used by both the static markup and the resize script so the
/// two stay numerically identical.
pub fn format_number(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn escape_html_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    escape_html_text(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_comment_requires_leading_whitespace() {
        assert_eq!(strip_inline_comment("back.color red # dark"), "back.color red");
        assert_eq!(
            strip_inline_comment("nav https://example.com/#frag"),
            "nav https://example.com/#frag"
        );
        assert_eq!(strip_inline_comment("# whole line"), "# whole line");
    }

    #[test]
    fn double_space_split_finds_first_run() {
        assert_eq!(
            split_on_double_space("Home  index.html"),
            Some(("Home", "index.html"))
        );
        assert_eq!(
            split_on_double_space("About me    about.html"),
            Some(("About me", "about.html"))
        );
        assert_eq!(split_on_double_space("single space only"), None);
    }

    #[test]
    fn number_formatting_trims_zeros() {
        assert_eq!(format_number(0.2), "0.2");
        assert_eq!(format_number(0.125), "0.125");
        assert_eq!(format_number(60.0), "60");
        assert_eq!(format_number(1.0 / 3.0), "0.333");
    }

    #[test]
    fn escaping_covers_markup_characters() {
        assert_eq!(escape_html_text("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
