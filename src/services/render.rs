//! Page rendering
//!
//! Produces the public HTML view of a page and its posts. The template ships
//! embedded in the binary; Tera's auto-escaping covers user-supplied text.

use anyhow::{Context as _, Result};
use tera::{Context as TeraContext, Tera};

use crate::models::{Page, Post};

const PAGE_TEMPLATE_NAME: &str = "page.html";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ page.title }} — LivePage</title>
<meta name="description" content="{{ page.title }} on LivePage">
<style>
body { margin: 0; font-family: system-ui, sans-serif; background: #111; color: #eee; }
main { max-width: 640px; margin: 0 auto; padding: 2rem 1rem; }
h1 { margin-bottom: 0.25rem; }
.meta { color: #888; margin-top: 0; }
.cover, .post img { max-width: 100%; border-radius: 8px; }
.post { background: #1b1b1b; border-radius: 8px; padding: 1rem; margin: 1rem 0; }
.post time { display: block; color: #888; font-size: 0.85rem; margin-top: 0.5rem; }
.empty { color: #888; }
</style>
</head>
<body>
<main>
<h1>{{ page.title }}</h1>
<p class="meta">{{ page.content_type }} &middot; {{ page.usage_type }}</p>
<p>{{ page.content }}</p>
{% if page.image_url %}<img class="cover" src="{{ page.image_url }}" alt="{{ page.title }}">{% endif %}
<section>
{% if posts %}{% for post in posts %}
<article class="post">
<p>{{ post.content }}</p>
{% if post.image_url %}<img src="{{ post.image_url }}" alt="">{% endif %}
<time>{{ post.created_at | date(format="%Y-%m-%d %H:%M") }}</time>
</article>
{% endfor %}{% else %}
<p class="empty">No posts yet.</p>
{% endif %}
</section>
</main>
</body>
</html>
"#;

pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)
            .context("Failed to register page template")?;
        Ok(Self { tera })
    }

    /// Render a page with its posts, newest first.
    pub fn render(&self, page: &Page, posts: &[Post]) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("page", page);
        context.insert("posts", posts);
        self.tera
            .render(PAGE_TEMPLATE_NAME, &context)
            .context("Failed to render page")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::PageCategory;

    fn sample_page(title: &str, content: &str) -> Page {
        Page {
            id: 1,
            slug: "sample".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            content_type: "links".to_string(),
            usage_type: "personal".to_string(),
            category: PageCategory::Family,
            age_verified: false,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_post(content: &str) -> Post {
        Post {
            id: 1,
            page_slug: "sample".to_string(),
            content: content.to_string(),
            image_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_empty_page() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render(&sample_page("Hello", "Welcome"), &[]).unwrap();

        assert!(html.contains("<title>Hello — LivePage</title>"));
        assert!(html.contains(r#"<meta name="description" content="Hello on LivePage">"#));
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("links &middot; personal"));
        assert!(html.contains("No posts yet."));
    }

    #[test]
    fn test_render_posts() {
        let renderer = PageRenderer::new().unwrap();
        let posts = vec![sample_post("first post"), sample_post("second post")];
        let html = renderer.render(&sample_page("Hello", "Welcome"), &posts).unwrap();

        assert!(html.contains("first post"));
        assert!(html.contains("second post"));
        assert!(!html.contains("No posts yet."));
    }

    #[test]
    fn test_render_escapes_markup() {
        let renderer = PageRenderer::new().unwrap();
        let page = sample_page("<script>alert(1)</script>", "a & b");
        let posts = vec![sample_post("<img src=x onerror=pwn()>")];
        let html = renderer.render(&page, &posts).unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(!html.contains("<img src=x"));
    }
}
