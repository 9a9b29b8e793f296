use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

/// Schemes allowed in link and image destinations.
const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Render markdown to HTML, escaping any raw HTML in the source.
///
/// Link and image destinations with a scheme other than http, https or
/// mailto are replaced by `#`; relative destinations are kept.
pub fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_destination(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_destination(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn safe_destination(dest_url: CowStr<'_>) -> CowStr<'_> {
    if is_allowed_destination(&dest_url) {
        dest_url
    } else {
        tracing::debug!(url = %dest_url, "Dropping link with disallowed scheme");
        CowStr::Borrowed("#")
    }
}

/// Browsers ignore whitespace and control characters inside a scheme, so
/// they are stripped before the scheme is compared.
fn is_allowed_destination(url: &str) -> bool {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    match cleaned.find([':', '/', '?', '#']) {
        Some(pos) if cleaned[pos..].starts_with(':') => {
            let scheme = cleaned[..pos].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

/// Operator-supplied page content after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// Nothing configured (or the fetch failed): show the built-in page.
    Default,
    /// Content is a URL to embed as a whole page.
    Embed(String),
    /// Rendered, sanitized HTML.
    Html(String),
}

impl PageContent {
    /// Resolve a raw backend value: `https://` URLs are embedded as-is,
    /// anything else is treated as markdown.
    pub fn from_raw(raw: &str) -> Self {
        Self::from_resolved(resolve_content(raw))
    }

    /// Classify an already-resolved value, e.g. one read from the local store.
    pub fn from_resolved(resolved: String) -> Self {
        if resolved.trim().is_empty() {
            PageContent::Default
        } else if resolved.starts_with("https://") {
            PageContent::Embed(resolved)
        } else {
            PageContent::Html(resolved)
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, PageContent::Default)
    }
}

/// The cacheable string form of operator content.
pub fn resolve_content(raw: &str) -> String {
    if raw.starts_with("https://") {
        raw.to_string()
    } else {
        markdown_to_html(raw)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_markdown_rendering() {
        let html = markdown_to_html("# Welcome\n\nSome **bold** text");
        assert!(html.contains("<h1>Welcome</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = markdown_to_html("hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    fn destinations(html: &str) -> Vec<&str> {
        ["href=\"", "src=\""]
            .iter()
            .flat_map(|attr| {
                html.match_indices(attr).map(move |(i, _)| {
                    let rest = &html[i + attr.len()..];
                    &rest[..rest.find('"').unwrap_or(rest.len())]
                })
            })
            .collect()
    }

    #[rstest]
    #[case("[click](javascript:alert(document.cookie))")]
    #[case("[click](JavaScript:alert(1))")]
    #[case("[click](<java\tscript:alert(1)>)")]
    #[case("[click](data:text/html;base64,PHNjcmlwdD4=)")]
    #[case("<javascript:alert(1)>")]
    #[case("![img](vbscript:msgbox(1))")]
    fn test_disallowed_link_schemes_are_neutralized(#[case] source: &str) {
        let html = markdown_to_html(source);
        let dests = destinations(&html);
        assert!(!dests.is_empty(), "{html}");
        assert!(dests.iter().all(|d| *d == "#"), "{html}");
    }

    #[rstest]
    #[case("[home](https://example.com/a?b=c)", "https://example.com/a?b=c")]
    #[case("[mail](mailto:ops@example.com)", "mailto:ops@example.com")]
    #[case("[docs](/docs/quickstart)", "/docs/quickstart")]
    #[case("[anchor](#pricing)", "#pricing")]
    #[case("[rel](guide/setup:v2)", "guide/setup:v2")]
    fn test_allowed_link_destinations_are_kept(#[case] source: &str, #[case] href: &str) {
        let html = markdown_to_html(source);
        assert!(html.contains(&format!("href=\"{href}\"")), "{html}");
    }

    #[test]
    fn test_page_content_resolution() {
        assert_eq!(PageContent::from_raw(""), PageContent::Default);
        assert_eq!(
            PageContent::from_raw("https://example.com/home"),
            PageContent::Embed("https://example.com/home".into())
        );
        assert!(matches!(PageContent::from_raw("*hi*"), PageContent::Html(h) if h.contains("<em>hi</em>")));
        // Plain http is not embedded
        assert!(matches!(PageContent::from_raw("http://example.com"), PageContent::Html(_)));
    }
}
