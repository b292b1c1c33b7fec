//! Newsletter email bodies.
//!
//! The HTML templates are compiled into the binary and rendered with tera
//! (autoescaped, since the names end in `.html`). The plain-text alternative
//! is the rendered HTML with its tags stripped.

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::EmailError;
use crate::message::OutgoingEmail;

const NEW_ARTICLE_TEMPLATE: &str = "new_article.html";
const WELCOME_TEMPLATE: &str = "welcome.html";

const WELCOME_SUBJECT: &str = "🎉 Bienvenue à la newsletter de Nimba24";

/// Characters of the article body kept in the notification excerpt.
const EXCERPT_CHARS: usize = 300;

/// The parts of an article shown in a notification.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleDigest {
    pub id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    /// Category display label.
    pub category: String,
    pub excerpt: String,
}

impl ArticleDigest {
    /// Build a digest, cutting `body` down to an excerpt.
    pub fn new(
        id: i64,
        title: &str,
        subtitle: Option<&str>,
        category: &str,
        body: &str,
    ) -> Self {
        Self {
            id,
            title: title.to_string(),
            subtitle: subtitle.map(str::to_string),
            category: category.to_string(),
            excerpt: excerpt(body, EXCERPT_CHARS),
        }
    }
}

/// Loaded email templates.
pub struct EmailTemplates {
    tera: Tera,
}

impl EmailTemplates {
    pub fn new() -> Result<Self, EmailError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (
                NEW_ARTICLE_TEMPLATE,
                include_str!("../templates/new_article.html"),
            ),
            (WELCOME_TEMPLATE, include_str!("../templates/welcome.html")),
        ])?;
        Ok(Self { tera })
    }

    /// One notification for all `recipients`, addressed in Bcc.
    pub fn new_article(
        &self,
        article: &ArticleDigest,
        site_url: &str,
        recipients: Vec<String>,
    ) -> Result<OutgoingEmail, EmailError> {
        let mut context = Context::new();
        context.insert("article", article);
        context.insert("site_url", site_url.trim_end_matches('/'));
        let html = self.tera.render(NEW_ARTICLE_TEMPLATE, &context)?;

        Ok(OutgoingEmail {
            to: Vec::new(),
            bcc: recipients,
            subject: format!("📰 Nouvel article : {}", article.title),
            text: strip_tags(&html),
            html,
        })
    }

    /// Welcome message for a new subscriber.
    pub fn welcome(&self, email: &str, site_url: &str) -> Result<OutgoingEmail, EmailError> {
        let mut context = Context::new();
        context.insert("email", email);
        context.insert("site_url", site_url.trim_end_matches('/'));
        let html = self.tera.render(WELCOME_TEMPLATE, &context)?;

        Ok(OutgoingEmail {
            to: vec![email.to_string()],
            bcc: Vec::new(),
            subject: WELCOME_SUBJECT.to_string(),
            text: strip_tags(&html),
            html,
        })
    }
}

fn excerpt(body: &str, max_chars: usize) -> String {
    let body = body.trim();
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", body[..cut].trim_end()),
        None => body.to_string(),
    }
}

/// Plain-text rendering of an HTML document.
///
/// Drops tags and the content of `<head>`, decodes the entities tera escapes,
/// and collapses blank lines.
pub fn strip_tags(html: &str) -> String {
    let body = match (html.find("<body"), html.rfind("</body>")) {
        (Some(start), Some(end)) if start < end => &html[start..end],
        _ => html,
    };

    let mut text = String::with_capacity(body.len());
    let mut in_tag = false;
    for c in body.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
