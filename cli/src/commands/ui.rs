use console::{pad_str, Alignment, Style};

const SNIPPET_CHARS: usize = 100;

pub fn print_header(title: &str) {
    println!("\n{}", Style::new().bold().cyan().apply_to(title));
    println!("{}", Style::new().dim().apply_to("─".repeat(console::measure_text_width(title))));
}

pub fn print_success(msg: &str) {
    println!("{} {}", Style::new().green().bold().apply_to("SUCCESS:"), msg);
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "{}: {}",
        Style::new().dim().apply_to(key),
        Style::new().bold().apply_to(value)
    );
}

/// Print rows under a bold magenta header, columns padded to fit.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| console::measure_text_width(h)).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(console::measure_text_width(cell));
        }
    }

    let header_style = Style::new().bold().magenta();
    let header: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| header_style.apply_to(pad_str(h, *w, Alignment::Left, None)).to_string())
        .collect();
    println!("{}", header.join("  "));
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    println!("{}", Style::new().dim().apply_to(rule.join("  ")));

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad_str(cell, *w, Alignment::Left, None).to_string())
            .collect();
        println!("{}", cells.join("  "));
    }
}

/// First 100 characters of `text`, marked when cut.
pub fn truncate_snippet(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= SNIPPET_CHARS {
        return flat;
    }
    let head: String = flat.chars().take(SNIPPET_CHARS).collect();
    format!("{} ... (truncated)", head)
}

/// `m:ss`, or `h:mm:ss` past the hour.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_snippet_is_kept() {
        assert_eq!(truncate_snippet("hello\nworld"), "hello world");
    }

    #[test]
    fn test_long_snippet_is_cut_at_100_chars() {
        let text = "é".repeat(150);
        let cut = truncate_snippet(&text);
        assert!(cut.ends_with(" ... (truncated)"));
        assert_eq!(cut.chars().count(), 100 + " ... (truncated)".len());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "0:00");
        assert_eq!(format_timestamp(75.4), "1:15");
        assert_eq!(format_timestamp(3725.0), "1:02:05");
    }
}
