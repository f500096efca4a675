//! HTML helper functions

use crate::notice::Notice;

/// Generate the embedded region for a document
///
/// The document goes into `srcdoc` escaped once; the browser unescapes it
/// back to the original bytes.
///
/// # Examples
/// ```ignore
/// iframe_tag("<p>B</p>", 1000, true)
/// // -> <iframe class="embedded" srcdoc="&lt;p&gt;B&lt;/p&gt;" height="1000" ...
/// ```
pub fn iframe_tag(content: &str, height: u32, scrolling: bool) -> String {
    let overflow = if scrolling { "auto" } else { "hidden" };
    format!(
        r#"<iframe class="embedded" srcdoc="{}" width="100%" height="{}" scrolling="{}" style="height: {}px; overflow: {};" frameborder="0"></iframe>"#,
        html_escape(content),
        height,
        if scrolling { "yes" } else { "no" },
        height,
        overflow
    )
}

/// Generate a notice box
///
/// # Examples
/// ```ignore
/// notice_tag(&Notice::warning("Falling back...")) // -> <div class="notice notice-warning" role="alert">⚠️ Falling back...</div>
/// ```
pub fn notice_tag(notice: &Notice) -> String {
    format!(
        r#"<div class="{}" role="alert">{} {}</div>"#,
        notice.kind.css_class(),
        notice.kind.icon(),
        html_escape(&notice.message)
    )
}

/// Generate a metric widget
pub fn metric_tag(label: &str, value: &str, delta: Option<&str>) -> String {
    let delta = delta
        .map(|d| format!(r#"<div class="metric-delta">{}</div>"#, html_escape(d)))
        .unwrap_or_default();

    format!(
        r#"<div class="metric"><div class="metric-label">{}</div><div class="metric-value">{}</div>{}</div>"#,
        html_escape(label),
        html_escape(value),
        delta
    )
}

/// Generate a favicon link tag from an emoji
pub fn emoji_favicon_tag(icon: &str) -> String {
    format!(
        r#"<link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>{}</text></svg>">"#,
        html_escape(icon)
    )
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="platform-host {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iframe_escapes_srcdoc() {
        let tag = iframe_tag(r#"<a href="x">A & B</a>"#, 1200, true);
        assert!(tag.contains(r#"srcdoc="&lt;a href=&quot;x&quot;&gt;A &amp; B&lt;/a&gt;""#));
        assert!(tag.contains(r#"height="1200""#));
        assert!(tag.contains(r#"scrolling="yes""#));
    }

    #[test]
    fn test_iframe_without_scrolling() {
        let tag = iframe_tag("", 500, false);
        assert!(tag.contains(r#"scrolling="no""#));
        assert!(tag.contains("overflow: hidden"));
    }

    #[test]
    fn test_notice_tag() {
        let tag = notice_tag(&Notice::error("file '<x>' not found"));
        assert!(tag.contains("notice-error"));
        assert!(tag.contains("file &#39;&lt;x&gt;&#39; not found"));
    }

    #[test]
    fn test_metric_tag() {
        let tag = metric_tag("Avg Response Time", "< 300ms", Some("↗ 15% faster"));
        assert!(tag.contains("&lt; 300ms"));
        assert!(tag.contains("metric-delta"));
        assert!(!metric_tag("a", "b", None).contains("metric-delta"));
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<strong>Platform</strong> v2.0"), "Platform v2.0");
    }
}
