//! The content registry.
//!
//! Everything the portfolio displays lives in one JSON document. It is
//! loaded once at startup and never mutated for the rest of the session.

use folio_radar::RadarConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUILTIN_CONTENT: &str = include_str!("../assets/content.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("content is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("content is incomplete: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub location: String,
    pub summary: String,
    pub email: String,
    #[serde(default)]
    pub links: Vec<Link>,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactMetric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub period: String,
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Experience {
    /// Case-insensitive substring match over every text field.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.company, &self.role, &self.period, &self.summary]
            .into_iter()
            .chain(self.highlights.iter())
            .chain(self.tags.iter())
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub tech: Vec<String>,
    pub url: Option<String>,
    pub repo: Option<String>,
}

impl Project {
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.summary.to_lowercase().contains(&needle)
            || self.tech.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}

/// Cross-team work at staff level: initiatives, standards, mentoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffWork {
    pub title: String,
    pub scope: String,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl StaffWork {
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.title, &self.scope, &self.summary]
            .into_iter()
            .chain(self.tags.iter())
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    pub name: String,
    pub level: f32,
    #[serde(default)]
    pub sub_skills: Vec<String>,
}

impl SkillCategory {
    /// Ten-cell meter for a 0-10 level.
    pub fn bar(&self) -> String {
        let filled = self.level.round().clamp(0.0, 10.0) as usize;
        format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub ids: Vec<String>,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub profile: Profile,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub impact: Vec<ImpactMetric>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub staff: Vec<StaffWork>,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub themes: ThemeConfig,
    pub radar: Option<RadarConfig>,
}

impl Content {
    /// The content compiled into the binary.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(BUILTIN_CONTENT)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let content: Content = serde_json::from_str(raw)?;
        content.validate()?;
        Ok(content)
    }

    fn validate(&self) -> Result<(), ContentError> {
        if self.sections.is_empty() {
            return Err(ContentError::Invalid("no sections".into()));
        }
        if self.themes.ids.is_empty() {
            return Err(ContentError::Invalid("no themes".into()));
        }
        if !self.themes.ids.iter().any(|t| t == &self.themes.default) {
            return Err(ContentError::Invalid(format!(
                "default theme '{}' is not in the theme list",
                self.themes.default
            )));
        }
        Ok(())
    }

    /// Resolve a project by 1-based index or title.
    /// Titles match exact first, then prefix, then substring (case-insensitive).
    pub fn find_project(&self, query: &str) -> Option<usize> {
        let query = query.trim();
        if let Ok(n) = query.parse::<usize>() {
            return (n >= 1 && n <= self.projects.len()).then(|| n - 1);
        }

        let needle = query.to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let titles: Vec<String> = self.projects.iter().map(|p| p.title.to_lowercase()).collect();
        titles
            .iter()
            .position(|t| *t == needle)
            .or_else(|| titles.iter().position(|t| t.starts_with(&needle)))
            .or_else(|| titles.iter().position(|t| t.contains(&needle)))
    }

    /// Match a section by id or title, case-insensitive, optional leading `#`.
    pub fn find_section(&self, name: &str) -> Option<&Section> {
        let name = name.trim().trim_start_matches('#').to_lowercase();
        self.sections
            .iter()
            .find(|s| s.id.to_lowercase() == name || s.title.to_lowercase() == name)
    }

    pub fn find_skill(&self, name: &str) -> Option<&SkillCategory> {
        let name = name.trim().to_lowercase();
        self.skills.iter().find(|s| s.name.to_lowercase() == name)
    }

    pub fn project_detail_lines(&self, index: usize) -> Vec<String> {
        let Some(p) = self.projects.get(index) else {
            return vec![];
        };
        let mut lines = vec![format!("{}. {}", index + 1, p.title), format!("   {}", p.summary)];
        if !p.tech.is_empty() {
            lines.push(format!("   tech: {}", p.tech.join(", ")));
        }
        if let Some(url) = &p.url {
            lines.push(format!("   live: {}", url));
        }
        if let Some(repo) = &p.repo {
            lines.push(format!("   repo: {}", repo));
        }
        lines
    }
}
