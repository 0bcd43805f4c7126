use crate::error::{ChibiError, ChibiResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Software,
    Embedded,
    Ml,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Software => write!(f, "software"),
            Self::Embedded => write!(f, "embedded"),
            Self::Ml => write!(f, "ml"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Github,
    Website,
    Devpost,
    Documentation,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectLink {
    pub label: String,
    pub href: String,
    #[serde(rename = "type")]
    pub kind: LinkType,
}

/// What the thumbnail path denotes, decided by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThumbnailKind {
    Image,
    Video,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectMeta {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub thumbnail: String,
    pub year: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ProjectLink>,
}

impl ProjectMeta {
    pub fn thumbnail_kind(&self) -> ThumbnailKind {
        // Query strings (remote image URLs) do not count as extensions.
        let path = self
            .thumbnail
            .split_once('?')
            .map_or(self.thumbnail.as_str(), |(p, _)| p);
        let ext = path.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("mp4" | "webm" | "mov") => ThumbnailKind::Video,
            _ => ThumbnailKind::Image,
        }
    }
}

/// Ordered, validated, read-only project records. Lookup by unknown slug is
/// an absent result, never an error: callers render a fallback.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ProjectCatalog {
    projects: Vec<ProjectMeta>,
}

impl ProjectCatalog {
    pub fn new(projects: Vec<ProjectMeta>) -> ChibiResult<Self> {
        let mut seen = std::collections::HashSet::new();
        for p in &projects {
            if p.slug.is_empty() {
                return Err(ChibiError::catalog("project slug must be non-empty"));
            }
            if !p
                .slug
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
            {
                return Err(ChibiError::catalog(format!(
                    "project slug '{}' is not URL-safe",
                    p.slug
                )));
            }
            if !seen.insert(p.slug.as_str()) {
                return Err(ChibiError::catalog(format!(
                    "duplicate project slug '{}'",
                    p.slug
                )));
            }
            if p.title.trim().is_empty() {
                return Err(ChibiError::catalog(format!(
                    "project '{}' title must be non-empty",
                    p.slug
                )));
            }
            if p.year.len() != 4 || !p.year.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ChibiError::catalog(format!(
                    "project '{}' year '{}' must be 4 digits",
                    p.slug, p.year
                )));
            }
        }
        Ok(Self { projects })
    }

    pub fn from_json(s: &str) -> ChibiResult<Self> {
        let projects: Vec<ProjectMeta> = serde_json::from_str(s)
            .map_err(|e| ChibiError::catalog(format!("parse project catalog: {e}")))?;
        Self::new(projects)
    }

    /// The records shipped with the crate.
    pub fn builtin() -> ChibiResult<Self> {
        Self::from_json(include_str!("../data/projects.json"))
    }

    pub fn all(&self) -> &[ProjectMeta] {
        &self.projects
    }

    pub fn by_slug(&self, slug: &str) -> Option<&ProjectMeta> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    pub fn with_category(&self, category: Category) -> impl Iterator<Item = &ProjectMeta> {
        self.projects.iter().filter(move |p| p.category == category)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Declarative card hover styling: a pure function of hover state, so any
/// rendering backend can apply it without imperative attribute pokes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardStyle {
    pub lift_px: f64,
    pub shadow_alpha: f64,
    pub scale: f64,
}

pub fn card_style(hovered: bool) -> CardStyle {
    if hovered {
        CardStyle {
            lift_px: 6.0,
            shadow_alpha: 0.08,
            scale: 1.0,
        }
    } else {
        CardStyle {
            lift_px: 0.0,
            shadow_alpha: 0.0,
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(slug: &str) -> ProjectMeta {
        ProjectMeta {
            slug: slug.to_string(),
            title: "Demo".to_string(),
            description: "A demo project".to_string(),
            tags: vec!["Rust".to_string()],
            thumbnail: "/img/demo.png".to_string(),
            year: "2024".to_string(),
            category: Category::Software,
            links: vec![],
        }
    }

    #[test]
    fn unknown_slug_is_absent_not_an_error() {
        let catalog = ProjectCatalog::new(vec![meta("demo")]).unwrap();
        assert!(catalog.by_slug("demo").is_some());
        assert!(catalog.by_slug("nope").is_none());
    }

    #[test]
    fn duplicate_slugs_are_rejected() {
        assert!(ProjectCatalog::new(vec![meta("a"), meta("a")]).is_err());
    }

    #[test]
    fn unsafe_slugs_are_rejected() {
        assert!(ProjectCatalog::new(vec![meta("Has Spaces")]).is_err());
        assert!(ProjectCatalog::new(vec![meta("ümlaut")]).is_err());
        assert!(ProjectCatalog::new(vec![meta("ok-slug_2")]).is_ok());
    }

    #[test]
    fn bad_years_are_rejected() {
        let mut p = meta("demo");
        p.year = "24".to_string();
        assert!(ProjectCatalog::new(vec![p]).is_err());

        let mut p = meta("demo");
        p.year = "20x4".to_string();
        assert!(ProjectCatalog::new(vec![p]).is_err());
    }

    #[test]
    fn thumbnail_kind_by_extension() {
        let mut p = meta("demo");
        assert_eq!(p.thumbnail_kind(), ThumbnailKind::Image);

        p.thumbnail = "/video/demo_cover.mp4".to_string();
        assert_eq!(p.thumbnail_kind(), ThumbnailKind::Video);

        p.thumbnail = "https://images.example.com/photo-1?w=1200&q=85.mp4".to_string();
        assert_eq!(p.thumbnail_kind(), ThumbnailKind::Image);
    }

    #[test]
    fn category_filter_matches_display_names() {
        let mut a = meta("a");
        a.category = Category::Embedded;
        let b = meta("b");
        let catalog = ProjectCatalog::new(vec![a, b]).unwrap();
        assert_eq!(catalog.with_category(Category::Embedded).count(), 1);
        assert_eq!(Category::Embedded.to_string(), "embedded");
    }

    #[test]
    fn link_type_field_serializes_as_type() {
        let link = ProjectLink {
            label: "GitHub".to_string(),
            href: "https://github.com/example".to_string(),
            kind: LinkType::Github,
        };
        let s = serde_json::to_string(&link).unwrap();
        assert!(s.contains("\"type\":\"github\""));
    }

    #[test]
    fn hover_style_is_a_pure_derivation() {
        assert_eq!(card_style(true), card_style(true));
        assert!(card_style(true).lift_px > card_style(false).lift_px);
        assert_eq!(card_style(false).shadow_alpha, 0.0);
    }
}
