//! Host page assembly: chrome around the outcome of a render pass

use crate::config::{PanelConfig, PlatformConfig};
use crate::document::Tier;
use crate::helpers::{
    emoji_favicon_tag, html_escape, iframe_tag, meta_generator, metric_tag, notice_tag,
    strip_html,
};

use super::markdown::MarkdownRenderer;
use super::pass::RenderOutcome;

const PAGE_CSS: &str = r#"
    body {
        margin: 0;
        font-family: "Source Sans Pro", -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
        color: #262730;
        background: #ffffff;
    }

    .block-container {
        padding: 1rem 1rem 0 1rem;
        margin: 0 auto;
    }

    .layout-wide { max-width: none; }
    .layout-centered { max-width: 46rem; }

    .analytics-header {
        background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
        color: white;
        padding: 20px;
        border-radius: 10px;
        margin-bottom: 20px;
        text-align: center;
    }

    .feature-highlight {
        background: rgba(255, 255, 255, 0.1);
        padding: 15px;
        border-radius: 8px;
        margin: 10px 0;
        border-left: 4px solid #00ff88;
    }

    details.panel {
        border: 1px solid rgba(49, 51, 63, 0.2);
        border-radius: 8px;
        margin: 10px 0;
        padding: 0 1rem;
    }

    details.panel > summary {
        cursor: pointer;
        padding: 0.75rem 0;
        font-weight: 600;
    }

    .columns {
        display: grid;
        grid-auto-flow: column;
        grid-auto-columns: 1fr;
        gap: 1rem;
    }

    .metric-label { font-size: 0.875rem; }
    .metric-value { font-size: 2.25rem; }
    .metric-delta { font-size: 0.875rem; color: #09ab3b; }

    .notice {
        padding: 1rem;
        border-radius: 8px;
        margin: 0.5rem 0;
    }

    .notice-info { background: rgba(28, 131, 225, 0.1); color: #004280; }
    .notice-warning { background: rgba(255, 227, 18, 0.1); color: #926c05; }
    .notice-error { background: rgba(255, 43, 43, 0.09); color: #7d353b; }

    iframe.embedded { width: 100%; border: none; }

    .footer {
        text-align: center;
        color: #666;
        padding: 20px;
    }
"#;

/// Render the full host page for a render outcome
///
/// Output depends only on its inputs, so unchanged files give
/// byte-identical pages.
pub fn render_page(config: &PlatformConfig, outcome: &RenderOutcome) -> String {
    let markdown = MarkdownRenderer::new();
    let mut body = String::new();

    // Header
    if !config.header.title.is_empty() {
        body.push_str(r#"<div class="analytics-header">"#);
        body.push_str(&format!("<h1>{}</h1>", html_escape(&config.header.title)));
        if !config.header.tagline.is_empty() {
            body.push_str(&format!("<p>{}</p>", html_escape(&config.header.tagline)));
        }
        body.push_str("</div>\n");
    }

    if let Some(intro) = &config.intro {
        body.push_str(&markdown.render(intro));
    }

    for panel in &config.overview {
        body.push_str(&render_panel(&markdown, panel));
    }

    if !config.metrics.is_empty() {
        body.push_str(r#"<div class="columns metrics">"#);
        for metric in &config.metrics {
            body.push_str(&metric_tag(
                &metric.label,
                &metric.value,
                metric.delta.as_deref(),
            ));
        }
        body.push_str("</div>\n");
    }

    // Notices and the embedded region
    body.push_str(r#"<section class="platform">"#);
    body.push('\n');
    for notice in &outcome.notices {
        body.push_str(&notice_tag(notice));
        body.push('\n');
    }
    if let Some(embedded) = &outcome.embedded {
        body.push_str(&iframe_tag(
            &embedded.content,
            embedded.height,
            embedded.scrolling,
        ));
        body.push('\n');
    }
    body.push_str("</section>\n");

    if outcome.tier() == Some(Tier::Primary) && !config.details.is_empty() {
        body.push_str("<hr>\n");
        for panel in &config.details {
            body.push_str(&render_panel(&markdown, panel));
        }
    }

    let footer_lines: Vec<&str> = [
        config.footer.title.as_str(),
        config.footer.tagline.as_str(),
        config.footer.note.as_str(),
    ]
    .into_iter()
    .filter(|line| !line.is_empty())
    .collect();
    if !footer_lines.is_empty() {
        body.push_str("<hr>\n<div class=\"footer\">");
        for line in footer_lines {
            body.push_str(&markdown.render(line));
        }
        body.push_str("</div>\n");
    }

    let favicon = if config.icon.is_empty() {
        String::new()
    } else {
        emoji_favicon_tag(&config.icon)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{}
<title>{}</title>
{}
<style>{}</style>
</head>
<body>
<main class="block-container {}">
{}</main>
</body>
</html>
"#,
        meta_generator(),
        html_escape(&strip_html(&config.title)),
        favicon,
        PAGE_CSS,
        config.layout.css_class(),
        body
    )
}

/// Render an expandable panel, one column per section
fn render_panel(markdown: &MarkdownRenderer, panel: &PanelConfig) -> String {
    let column_class = if panel.highlight {
        "column feature-highlight"
    } else {
        "column"
    };

    let mut html = format!(
        r#"<details class="panel"><summary>{}</summary><div class="columns">"#,
        html_escape(&panel.title)
    );
    for section in &panel.sections {
        html.push_str(&format!(
            r#"<div class="{}">{}</div>"#,
            column_class,
            markdown.render(section)
        ));
    }
    html.push_str("</div></details>\n");
    html
}
