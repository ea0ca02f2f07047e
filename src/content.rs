//! Portfolio content.
//!
//! The page text lives in a small JSON document so it can be swapped without
//! rebuilding. Missing fields fall back to the built-in portfolio.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// One entry in the Work section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub year: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub desc: String,
}

impl Project {
    fn new(title: &str, year: &str, tech: &[&str], desc: &str) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
            tech: tech.iter().map(|t| t.to_string()).collect(),
            desc: desc.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Portfolio {
    /// Display name; its words become the particle lines.
    pub name: String,
    /// Short wordmark shown on the loading overlay.
    pub brand: String,
    pub discipline: String,
    pub location: String,
    pub email: String,
    pub intro: String,
    pub summary: String,
    pub projects: Vec<Project>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            name: "Venkat Sai Utharadhi".into(),
            brand: "VENKAT.UI".into(),
            discipline: "A MINIMALIST UI/UX ENGINEER".into(),
            location: "Hyderabad, India".into(),
            email: "saik87630@gmail.com".into(),
            intro: "Engineering graduate with a passion for turning data, IoT, and scalable \
                    software systems into impactful solutions."
                .into(),
            summary: "I am an engineer focused on the intersection of data, IoT, and highly \
                      scalable software. My process is centered on building efficient, \
                      maintainable products that genuinely solve real-world problems."
                .into(),
            projects: vec![
                Project::new(
                    "ALARM X - AI SMART ALARM SYSTEM",
                    "2025",
                    &["Gemini AI Studio", "React", "Redux"],
                    "Face verification alarm that cut oversleep incidents by 90%.",
                ),
                Project::new(
                    "CONTENT X - AI PLATFORM",
                    "2025",
                    &["Gemini API", "Node.js", "REST APIs"],
                    "Real-time adaptive suggestions with a secure Node.js backend.",
                ),
                Project::new(
                    "DIGITAL X - SERVICES PLATFORM",
                    "2024",
                    &["MERN Stack", "Tailwind", "Payments"],
                    "Full-stack agency site with dashboards, auth and payments.",
                ),
                Project::new(
                    "SOCIAL ENGINEERING INTERN",
                    "2023",
                    &["MERN Stack", "Stripe", "UI Optimization"],
                    "High-conversion fundraising landing page with 200K+ visits.",
                ),
            ],
        }
    }
}

impl Portfolio {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let portfolio: Portfolio = serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), projects = portfolio.projects.len(), "loaded content");
        Ok(portfolio)
    }

    /// Save as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The name split on whitespace, one upper-cased word per line.
    pub fn name_lines(&self) -> Vec<String> {
        self.name.split_whitespace().map(str::to_uppercase).collect()
    }

    pub fn project(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }
}
