//! Post-processing for completion text

/// Remove a surrounding Markdown code fence, if any
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Info string (e.g. `javascript`) runs to the end of the first line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Split text into bullet lines, dropping list markers and blanks
#[must_use]
pub fn to_bullet_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = line[digits..]
            .strip_prefix(". ")
            .or_else(|| line[digits..].strip_prefix(") "))
        {
            return rest.trim_start();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fenced_block() {
        assert_eq!(strip_code_fences("```js\nalert(1)\n```"), "alert(1)");
        assert_eq!(strip_code_fences("```\nx()\n```\n"), "x()");
        assert_eq!(strip_code_fences("  plain()  "), "plain()");
    }

    #[test]
    fn bullets_lose_markers() {
        let lines = to_bullet_lines("- Selects links.\n\n* Styles them.\n2. Logs.\nPlain line");
        assert_eq!(
            lines,
            vec!["Selects links.", "Styles them.", "Logs.", "Plain line"]
        );
    }

    #[test]
    fn numbers_without_marker_are_kept() {
        assert_eq!(to_bullet_lines("42 items"), vec!["42 items"]);
    }
}
