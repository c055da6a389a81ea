/// Greedy: each window is cut at the last newline in its final third, or
/// exactly at `max_runes` when that stretch has none. Pages are trimmed and
/// the result always holds at least one page. `max_runes == 0` disables
/// splitting and returns the text untouched.
pub(crate) fn paginate(text: &str, max_runes: usize) -> Vec<String> {
    if max_runes == 0 {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_runes {
        return vec![text.trim().to_string()];
    }

    let mut pages = Vec::new();
    let mut start = 0;
    while chars.len() - start > max_runes {
        let end = start + max_runes;
        let lower = start + max_runes * 2 / 3;
        let split = (lower..end).rev().find(|&i| chars[i] == '\n');
        let (page_end, next_start) = match split {
            Some(newline) => (newline, newline + 1),
            None => (end, end),
        };
        push_page(&mut pages, &chars[start..page_end]);
        start = next_start;
    }
    push_page(&mut pages, &chars[start..]);

    if pages.is_empty() {
        pages.push(String::new());
    }
    pages
}

fn push_page(pages: &mut Vec<String>, chars: &[char]) {
    let page: String = chars.iter().collect();
    let trimmed = page.trim();
    if !trimmed.is_empty() {
        pages.push(trimmed.to_string());
    }
}

pub(crate) fn clamp_page(index: u32, page_count: usize) -> usize {
    (index as usize).min(page_count.saturating_sub(1))
}
