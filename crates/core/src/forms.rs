//! Submitted authoring forms and their validation.
//!
//! Forms arrive with every field optional so that a missing field becomes a
//! validation message instead of a deserialization failure. Validation turns
//! them into the typed inputs the repositories accept.

use serde::Deserialize;
use url::Url;

use crate::advertisement::AdPosition;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Treat absent and whitespace-only strings alike.
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn missing_fields(missing: &[&str]) -> CoreError {
    CoreError::Validation(format!(
        "Please fill in all required fields (missing: {})",
        missing.join(", ")
    ))
}

/// Column widths of the stored text fields, in characters.
pub const TITLE_MAX_CHARS: usize = 200;
pub const SUBTITLE_MAX_CHARS: usize = 300;

fn check_length(field: &str, value: Option<&str>, max: usize) -> Result<(), CoreError> {
    match value {
        Some(v) if v.chars().count() > max => Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// Accept only absolute http(s) links. The stored form is the normalized,
/// percent-encoded URL, which is always a valid `Location` header.
fn parse_link(raw: &str) -> Result<String, CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid link '{raw}': expected an http(s) URL"));
    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url.into())
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

/// Article create/edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleForm {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub category_id: Option<DbId>,
    /// Path of an already stored image.
    pub image: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_featured: bool,
}

/// A validated article, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleInput {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: String,
    /// Always set for a new article; `None` on edit keeps the current category.
    pub category_id: Option<DbId>,
    /// `None` keeps the current image on edit.
    pub image_path: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
}

impl ArticleForm {
    /// Validate a new article: title, body and category are required.
    pub fn validate_new(&self) -> Result<ArticleInput, CoreError> {
        self.validate_common(self.category_id.is_none())
    }

    /// Validate an edit: title and body are required, the category may be
    /// omitted to keep the current one.
    pub fn validate_edit(&self) -> Result<ArticleInput, CoreError> {
        self.validate_common(false)
    }

    fn validate_common(&self, category_missing: bool) -> Result<ArticleInput, CoreError> {
        let title = present(&self.title);
        let body = present(&self.body);

        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if body.is_none() {
            missing.push("body");
        }
        if category_missing {
            missing.push("category");
        }

        match (title, body) {
            (Some(title), Some(body)) if missing.is_empty() => {
                let subtitle = present(&self.subtitle);
                check_length("title", Some(&title), TITLE_MAX_CHARS)?;
                check_length("subtitle", subtitle.as_deref(), SUBTITLE_MAX_CHARS)?;
                Ok(ArticleInput {
                    title,
                    subtitle,
                    body,
                    category_id: self.category_id,
                    image_path: present(&self.image),
                    is_published: self.is_published,
                    is_featured: self.is_featured,
                })
            }
            _ => Err(missing_fields(&missing)),
        }
    }
}

// ---------------------------------------------------------------------------
// Advertisements
// ---------------------------------------------------------------------------

/// Advertisement create/edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvertisementForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub position: Option<String>,
    /// Path of an already stored image.
    pub image: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    /// Only read on edit; new advertisements start active.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A validated advertisement, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvertisementInput {
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub position: AdPosition,
    /// Always set for a new advertisement; `None` on edit keeps the image.
    pub image_path: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub is_active: bool,
}

impl AdvertisementForm {
    /// Validate a new advertisement: title, image, position and both window
    /// bounds are required.
    pub fn validate_new(&self) -> Result<AdvertisementInput, CoreError> {
        let mut input = self.validate_common(true)?;
        input.is_active = true;
        Ok(input)
    }

    /// Validate an edit: same as create except the image may be omitted.
    pub fn validate_edit(&self) -> Result<AdvertisementInput, CoreError> {
        self.validate_common(false)
    }

    fn validate_common(&self, image_required: bool) -> Result<AdvertisementInput, CoreError> {
        let title = present(&self.title);
        let image = present(&self.image);
        let position = present(&self.position);

        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if image_required && image.is_none() {
            missing.push("image");
        }
        if position.is_none() {
            missing.push("position");
        }
        if self.starts_at.is_none() {
            missing.push("starts_at");
        }
        if self.ends_at.is_none() {
            missing.push("ends_at");
        }

        let (Some(title), Some(position), Some(starts_at), Some(ends_at)) =
            (title, position, self.starts_at, self.ends_at)
        else {
            return Err(missing_fields(&missing));
        };
        if !missing.is_empty() {
            return Err(missing_fields(&missing));
        }

        check_length("title", Some(&title), TITLE_MAX_CHARS)?;
        let position: AdPosition = position.parse()?;
        let link = present(&self.link).map(|l| parse_link(&l)).transpose()?;

        if ends_at < starts_at {
            return Err(CoreError::Validation(
                "The end of the display window must not precede its start".into(),
            ));
        }

        Ok(AdvertisementInput {
            title,
            description: present(&self.description),
            link,
            position,
            image_path: image,
            starts_at,
            ends_at,
            is_active: self.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    fn article_form() -> ArticleForm {
        ArticleForm {
            title: Some("Récolte record à Sanniquellie".into()),
            subtitle: Some("  ".into()),
            body: Some("Les producteurs de riz...".into()),
            category_id: Some(3),
            image: None,
            is_published: true,
            is_featured: false,
        }
    }

    fn ad_form() -> AdvertisementForm {
        let now = Utc::now();
        AdvertisementForm {
            title: Some("Banque du Nimba".into()),
            description: None,
            link: Some(String::new()),
            position: Some("sidebar".into()),
            image: Some("publicites/banque.png".into()),
            starts_at: Some(now - Duration::days(1)),
            ends_at: Some(now + Duration::days(30)),
            is_active: false,
        }
    }

    #[test]
    fn valid_article_blank_subtitle_becomes_none() {
        let input = article_form().validate_new().unwrap();
        assert_eq!(input.title, "Récolte record à Sanniquellie");
        assert_eq!(input.subtitle, None);
        assert_eq!(input.category_id, Some(3));
        assert!(input.is_published);
    }

    #[test]
    fn new_article_lists_every_missing_field() {
        let form = ArticleForm::default();
        let err = form.validate_new().unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg)
            if msg.contains("title") && msg.contains("body") && msg.contains("category"));
    }

    #[test]
    fn edit_allows_missing_category() {
        let form = ArticleForm {
            category_id: None,
            ..article_form()
        };
        assert!(form.validate_new().is_err());
        let input = form.validate_edit().unwrap();
        assert_eq!(input.category_id, None);
    }

    #[test]
    fn edit_still_requires_title() {
        let form = ArticleForm {
            title: Some("   ".into()),
            ..article_form()
        };
        assert_matches!(form.validate_edit(), Err(CoreError::Validation(ref msg)) if msg.contains("title"));
    }

    #[test]
    fn new_advertisement_is_active_and_blank_link_dropped() {
        let input = ad_form().validate_new().unwrap();
        assert!(input.is_active, "new advertisements start active");
        assert_eq!(input.link, None);
        assert_eq!(input.position, AdPosition::Sidebar);
        assert_eq!(input.image_path.as_deref(), Some("publicites/banque.png"));
    }

    #[test]
    fn new_advertisement_requires_image() {
        let form = AdvertisementForm {
            image: None,
            ..ad_form()
        };
        assert_matches!(form.validate_new(), Err(CoreError::Validation(ref msg)) if msg.contains("image"));
        let edit = form.validate_edit().unwrap();
        assert_eq!(edit.image_path, None);
        assert!(!edit.is_active, "edit keeps the submitted active flag");
    }

    #[test]
    fn advertisement_requires_window() {
        let form = AdvertisementForm {
            starts_at: None,
            ..ad_form()
        };
        assert_matches!(form.validate_new(), Err(CoreError::Validation(ref msg)) if msg.contains("starts_at"));
    }

    #[test]
    fn advertisement_rejects_unknown_position() {
        let form = AdvertisementForm {
            position: Some("popup".into()),
            ..ad_form()
        };
        assert_matches!(form.validate_new(), Err(CoreError::Validation(ref msg)) if msg.contains("popup"));
    }

    #[test]
    fn overlong_article_fields_are_rejected() {
        let form = ArticleForm {
            title: Some("é".repeat(TITLE_MAX_CHARS + 1)),
            ..article_form()
        };
        assert_matches!(form.validate_new(), Err(CoreError::Validation(ref msg)) if msg.contains("title"));

        let form = ArticleForm {
            subtitle: Some("s".repeat(SUBTITLE_MAX_CHARS + 1)),
            ..article_form()
        };
        assert_matches!(form.validate_edit(), Err(CoreError::Validation(ref msg)) if msg.contains("subtitle"));

        let form = ArticleForm {
            title: Some("é".repeat(TITLE_MAX_CHARS)),
            ..article_form()
        };
        assert!(form.validate_new().is_ok(), "limit counts characters, not bytes");
    }

    #[test]
    fn overlong_advertisement_title_is_rejected() {
        let form = AdvertisementForm {
            title: Some("t".repeat(TITLE_MAX_CHARS + 1)),
            ..ad_form()
        };
        assert_matches!(form.validate_new(), Err(CoreError::Validation(ref msg)) if msg.contains("title"));
    }

    #[test]
    fn advertisement_link_must_be_absolute_http() {
        for link in [
            "exemple.gn/promo",
            "javascript:alert(1)",
            "ftp://exemple.gn/promo",
            "mailto:pub@exemple.gn",
            "https://",
        ] {
            let form = AdvertisementForm {
                link: Some(link.into()),
                ..ad_form()
            };
            assert_matches!(form.validate_new(), Err(CoreError::Validation(_)), "{link}");
        }
    }

    #[test]
    fn advertisement_link_is_stored_percent_encoded() {
        let form = AdvertisementForm {
            link: Some(" https://exemple.gn/fête-de-nimba ".into()),
            ..ad_form()
        };
        let input = form.validate_new().unwrap();
        assert_eq!(input.link.as_deref(), Some("https://exemple.gn/f%C3%AAte-de-nimba"));

        let form = AdvertisementForm {
            link: Some("https://exemple.gn/a\u{1}b".into()),
            ..ad_form()
        };
        let input = form.validate_edit().unwrap();
        assert_eq!(input.link.as_deref(), Some("https://exemple.gn/a%01b"));
    }

    #[test]
    fn advertisement_rejects_inverted_window() {
        let now = Utc::now();
        let form = AdvertisementForm {
            starts_at: Some(now),
            ends_at: Some(now - Duration::hours(1)),
            ..ad_form()
        };
        assert_matches!(form.validate_new(), Err(CoreError::Validation(_)));
    }
}
