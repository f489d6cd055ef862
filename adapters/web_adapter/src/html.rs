// Low-level HTML string helpers.
// Deliberately naive: they scan for tag names case-insensitively and do not
// build a document tree. Nested elements of the same name are not supported.

/// ASCII-lowercased copy of a document. Byte offsets line up with the original,
/// so positions found in one can slice the other.
pub struct Lowered<'a> {
    pub raw: &'a str,
    lower: String,
}

impl<'a> Lowered<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_ascii_lowercase(),
        }
    }

    /// Find the next `<tag ...>...</tag>` element starting at `from`.
    /// Returns the byte range of the whole element, closing tag included.
    /// `<tag` only matches when followed by whitespace, `>` or `/`, so `th` never
    /// matches `<thead>`.
    pub fn next_element(&self, tag: &str, from: usize) -> Option<(usize, usize)> {
        let open = format!("<{}", tag.to_ascii_lowercase());
        let close = format!("</{}>", tag.to_ascii_lowercase());

        let mut search = from;
        let start = loop {
            let at = self.lower.get(search..)?.find(&open)? + search;
            let next = self.lower.as_bytes().get(at + open.len()).copied();
            match next {
                Some(b) if b == b'>' || b == b'/' || b.is_ascii_whitespace() => break at,
                _ => search = at + open.len(),
            }
        };
        let open_end = self.lower[start..].find('>')? + start + 1;
        let end = self.lower[open_end..].find(&close)? + open_end + close.len();
        Some((start, end))
    }
}

/// The opening tag of a block, `<` through `>`.
pub fn open_tag(block: &str) -> &str {
    match block.find('>') {
        Some(i) => &block[..=i],
        None => block,
    }
}

/// Whether an opening tag carries `name="value"`, quoted or not, ASCII case-insensitive.
pub fn has_attr(open_tag: &str, name: &str, value: &str) -> bool {
    let tag = open_tag.to_ascii_lowercase();
    let name = name.to_ascii_lowercase();
    let value = value.to_ascii_lowercase();
    [
        format!("{name}=\"{value}\""),
        format!("{name}='{value}'"),
        format!("{name}={value}"),
    ]
    .iter()
    .any(|needle| {
        tag.match_indices(needle.as_str()).any(|(i, _)| {
            let before_ok = tag[..i].ends_with(|c: char| c.is_ascii_whitespace());
            let after = tag[i + needle.len()..].chars().next();
            let after_ok = needle.ends_with(['"', '\''])
                || matches!(after, Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace());
            before_ok && after_ok
        })
    })
}

/// Given a complete tag block like `<td ...>INNER</td>`,
/// return INNER without the wrapping tags (still may contain nested tags).
pub fn inner_after_open_tag(block: &str) -> &str {
    if let Some(open_end) = block.find('>') {
        if let Some(close_start) = block.rfind('<') {
            if close_start > open_end {
                return &block[open_end + 1..close_start];
            }
        }
    }
    ""
}

/// Remove all HTML tags `<...>` from the string, then collapse whitespace.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Decode the handful of entities titles actually use. `&amp;` goes last so
/// `&amp;lt;` stays literal.
pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Collapse sequences of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Text of an element: tags stripped, entities decoded, whitespace collapsed.
pub fn element_text(block: &str) -> String {
    normalize_ws(&decode_entities(&strip_tags(inner_after_open_tag(block))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_element_skips_longer_tag_names() {
        let html = "<thead><tr><TH scope=\"col\">Title</TH></tr></thead>";
        let doc = Lowered::new(html);
        let (start, end) = doc.next_element("th", 0).unwrap();
        assert_eq!(&html[start..end], "<TH scope=\"col\">Title</TH>");
    }

    #[test]
    fn test_next_element_from_offset() {
        let html = "<i>One</i> and <i class=\"x\">Two</i>";
        let doc = Lowered::new(html);
        let (_, first_end) = doc.next_element("i", 0).unwrap();
        let (start, end) = doc.next_element("i", first_end).unwrap();
        assert_eq!(&html[start..end], "<i class=\"x\">Two</i>");
        assert!(doc.next_element("i", end).is_none());
    }

    #[test]
    fn test_next_element_ignores_img() {
        let html = "<img src=\"a.png\"><i>Title</i>";
        let doc = Lowered::new(html);
        let (start, end) = doc.next_element("i", 0).unwrap();
        assert_eq!(&html[start..end], "<i>Title</i>");
    }

    #[test]
    fn test_next_element_unclosed() {
        let doc = Lowered::new("<th scope=row>Title");
        assert!(doc.next_element("th", 0).is_none());
    }

    #[test]
    fn test_has_attr() {
        assert!(has_attr("<th scope=\"row\">", "scope", "row"));
        assert!(has_attr("<th SCOPE='Row' class=x>", "scope", "row"));
        assert!(has_attr("<th scope=row>", "scope", "row"));
        assert!(!has_attr("<th scope=\"col\">", "scope", "row"));
        assert!(!has_attr("<th scope=rowgroup>", "scope", "row"));
        assert!(!has_attr("<th data-scope=\"row\">", "scope", "row"));
    }

    #[test]
    fn test_open_tag() {
        assert_eq!(open_tag("<th scope=\"row\"><i>x</i></th>"), "<th scope=\"row\">");
    }

    #[test]
    fn test_inner_after_open_tag() {
        assert_eq!(inner_after_open_tag("<td class=a>Inner <b>x</b></td>"), "Inner <b>x</b>");
        assert_eq!(inner_after_open_tag("<td>"), "");
    }

    #[test]
    fn test_element_text() {
        let block = "<i><a href=\"/wiki/X\">Fantasian  Neo&nbsp;Dimension</a> &amp; more</i>";
        assert_eq!(element_text(block), "Fantasian Neo Dimension & more");
    }

    #[test]
    fn test_decode_entities_order() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("Tom &#39;n&#39; Jerry"), "Tom 'n' Jerry");
    }

    #[test]
    fn test_normalize_ws() {
        assert_eq!(normalize_ws("  a \n\t b  "), "a b");
    }
}
