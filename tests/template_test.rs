use paperpress::domain::Article;
use paperpress::infrastructure::rendering::template::render_article_html;

fn article() -> Article {
    Article {
        title: "Ownership & Borrowing".to_string(),
        author: Some("Jane Doe".to_string()),
        published: Some("2024-03-01".to_string()),
        excerpt: None,
        content: "<p>First paragraph.</p><p>Second.</p>".to_string(),
        source_url: "https://example.com/rust".to_string(),
    }
}

#[test]
fn given_article_when_rendered_then_title_escaped_in_head_and_heading() {
    let html = render_article_html(&article());

    assert!(html.contains("<title>Ownership &amp; Borrowing</title>"));
    assert!(html.contains("<h1>Ownership &amp; Borrowing</h1>"));
    assert!(!html.contains("{{title}}"));
}

#[test]
fn given_author_and_date_when_rendered_then_byline_joined() {
    let html = render_article_html(&article());

    assert!(html.contains("Jane Doe | 2024-03-01"));
}

#[test]
fn given_no_metadata_when_rendered_then_byline_empty() {
    let mut article = article();
    article.author = None;
    article.published = None;

    let html = render_article_html(&article);

    assert!(html.contains(r#"<div class="byline"></div>"#));
}

#[test]
fn given_extractor_html_when_rendered_then_content_inserted_verbatim() {
    let html = render_article_html(&article());

    assert!(html.contains("<p>First paragraph.</p><p>Second.</p>"));
}

#[test]
fn given_source_url_when_rendered_then_footer_carries_it() {
    let html = render_article_html(&article());

    assert!(html.contains(r#"<div class="source">https://example.com/rust</div>"#));
}

#[test]
fn given_template_when_rendered_then_print_styles_inlined() {
    let html = render_article_html(&article());

    assert!(html.contains("@page { size: A4; margin: 20mm 15mm; }"));
    assert!(!html.contains("{{styles}}"));
}

#[test]
fn given_title_containing_placeholder_text_when_rendered_then_not_resubstituted() {
    let mut article = article();
    article.title = "All about {{content}} slots".to_string();

    let html = render_article_html(&article);

    assert!(html.contains("<title>All about {{content}} slots</title>"));
    assert!(html.contains("<h1>All about {{content}} slots</h1>"));
    assert!(html.contains("<p>First paragraph.</p><p>Second.</p>"));
}

#[test]
fn given_content_containing_placeholder_text_when_rendered_then_left_verbatim() {
    let mut article = article();
    article.content = "<p>Write {{title}} where the name goes.</p>".to_string();

    let html = render_article_html(&article);

    assert!(html.contains("<p>Write {{title}} where the name goes.</p>"));
    assert!(html.contains("<h1>Ownership &amp; Borrowing</h1>"));
}
