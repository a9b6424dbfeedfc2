use crate::domain::Article;

/// Print layout for the rendered page. `@page` carries the paper size and
/// margins so the headless printer needs no extra flags.
const PRINT_STYLES: &str = r#"
@page { size: A4; margin: 20mm 15mm; }
body {
  font-family: Georgia, "Times New Roman", serif;
  font-size: 12pt;
  line-height: 1.5;
  color: #111;
  margin: 0;
}
h1 { font-size: 20pt; line-height: 1.25; margin: 0 0 4pt 0; }
h2, h3, h4 { line-height: 1.3; margin: 14pt 0 6pt 0; }
.byline { font-size: 10pt; color: #444; margin-bottom: 16pt; }
article { text-align: justify; }
article p { margin: 0 0 8pt 0; }
article img { max-width: 100%; height: auto; }
article a { color: #111; text-decoration: none; }
article pre, article code {
  font-family: "Courier New", monospace;
  font-size: 10pt;
  white-space: pre-wrap;
  word-wrap: break-word;
}
article blockquote { margin: 8pt 16pt; padding-left: 8pt; border-left: 2pt solid #999; }
article table { border-collapse: collapse; width: 100%; }
article td, article th { border: 0.5pt solid #999; padding: 3pt 5pt; }
.source { font-size: 9pt; color: #666; margin-top: 20pt; word-break: break-all; }
"#;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{title}}</title>
<style>{{styles}}</style>
</head>
<body>
<header>
<h1>{{title}}</h1>
<div class="byline">{{byline}}</div>
</header>
<article>
{{content}}
</article>
<div class="source">{{source_url}}</div>
</body>
</html>
"#;

/// Fills the fixed print template. Metadata fields are escaped; `content`
/// is extractor-produced HTML and is inserted as-is.
pub fn render_article_html(article: &Article) -> String {
    let byline = [article.author.as_deref(), article.published.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" | ");

    let title = escape_html(&article.title);
    let byline = escape_html(&byline);
    let source_url = escape_html(&article.source_url);
    fill_slots(
        PAGE_TEMPLATE,
        &[
            ("styles", PRINT_STYLES),
            ("title", title.as_str()),
            ("byline", byline.as_str()),
            ("source_url", source_url.as_str()),
            ("content", article.content.as_str()),
        ],
    )
}

/// Single pass over the template: each `{{name}}` slot is looked up in
/// `slots`, and substituted values are never rescanned. A title or body
/// containing literal placeholder text stays verbatim.
fn fill_slots(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        match tail.find("}}") {
            Some(end) => {
                let name = &tail[..end];
                match slots.iter().find(|(slot, _)| *slot == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &tail[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
