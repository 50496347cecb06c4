/// Split a deck into raw slide strings.
///
/// Three mechanisms create slide breaks:
/// 1. `---` with blank lines on both sides
/// 2. Three or more consecutive blank lines
/// 3. A `# ` heading when the current slide already has content
pub fn split(source: &str) -> Vec<String> {
    let source = source.replace("\r\n", "\n");
    let lines: Vec<&str> = source.split('\n').collect();

    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut blank_run = 0;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if is_dash_separator(trimmed) {
            let prev_blank = current.last().is_none_or(|l| l.trim().is_empty());
            let next_blank = lines.get(i + 1).is_none_or(|l| l.trim().is_empty());
            if prev_blank && next_blank {
                flush(&mut current, &mut chunks);
                blank_run = 0;
                i += 1;
                continue;
            }
        }

        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == 3 {
                flush(&mut current, &mut chunks);
            }
        } else {
            blank_run = 0;
        }
        current.push(line);
        i += 1;
    }
    flush(&mut current, &mut chunks);

    let mut slides = Vec::new();
    for chunk in chunks {
        split_by_heading(&chunk, &mut slides);
    }
    slides
}

fn flush(current: &mut Vec<&str>, chunks: &mut Vec<String>) {
    let chunk = current.join("\n").trim().to_string();
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    current.clear();
}

/// Break a chunk before every `# ` heading that follows content.
/// Lines inside fenced code blocks are never treated as headings.
fn split_by_heading(chunk: &str, slides: &mut Vec<String>) {
    let mut current = String::new();
    let mut has_content = false;
    let mut fence: Option<(char, usize)> = None;

    for line in chunk.lines() {
        let trimmed = line.trim();

        match fence {
            Some((c, len)) => {
                if closes_fence(trimmed, c, len) {
                    fence = None;
                }
            }
            None => fence = opens_fence(trimmed),
        }

        if fence.is_none() && line.starts_with("# ") && has_content {
            slides.push(current.trim().to_string());
            current.clear();
            has_content = false;
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
        if !trimmed.is_empty() {
            has_content = true;
        }
    }

    let slide = current.trim();
    if !slide.is_empty() {
        slides.push(slide.to_string());
    }
}

pub(crate) fn opens_fence(trimmed: &str) -> Option<(char, usize)> {
    let c = trimmed.chars().next()?;
    if c != '`' && c != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|&x| x == c).count();
    (len >= 3).then_some((c, len))
}

pub(crate) fn closes_fence(trimmed: &str, c: char, len: usize) -> bool {
    let count = trimmed.chars().take_while(|&x| x == c).count();
    count >= len && trimmed.chars().skip(count).all(char::is_whitespace)
}

fn is_dash_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}
