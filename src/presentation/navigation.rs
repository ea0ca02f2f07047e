//! Section navigation and the project detail view.

use std::fmt;

use tracing::debug;

/// Scroll offset added to the viewport top before picking the active section.
pub const SCROLL_LOOKAHEAD: f32 = 100.0;

/// Top-level page sections, in page order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Home,
    About,
    Work,
    Contact,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Home, Section::About, Section::Work, Section::Contact];

    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::About => "About",
            Section::Work => "Work",
            Section::Contact => "Contact",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the content area shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum View {
    /// The scrolling page with every section.
    #[default]
    Sections,
    /// Detail page for the project at this index.
    Project(usize),
}

/// Where the content area should scroll after a navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollRequest {
    pub section: Section,
    /// The sections are not laid out yet; scroll after the next layout.
    pub deferred: bool,
}

/// Tracks the current view and the highlighted navigation entry.
#[derive(Clone, Debug, Default)]
pub struct Navigator {
    view: View,
    active: Option<Section>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Section under the viewport top, from the last scroll or navigation.
    pub fn active(&self) -> Section {
        self.active.unwrap_or(Section::Home)
    }

    /// Jump to a section. Leaving a project view first switches back to the
    /// section list, so the scroll has to wait for that layout.
    pub fn navigate(&mut self, section: Section) -> ScrollRequest {
        let deferred = matches!(self.view, View::Project(_));
        self.view = View::Sections;
        self.active = Some(section);
        debug!(%section, deferred, "navigate");
        ScrollRequest { section, deferred }
    }

    pub fn open_project(&mut self, index: usize) {
        debug!(index, "open project");
        self.view = View::Project(index);
    }

    pub fn back_to_work(&mut self) {
        self.view = View::Sections;
    }

    /// Update the active section from a scroll position.
    ///
    /// `offsets` holds each section's top edge. The active section is the last
    /// one, in page order, whose top is at or above `scroll_top + 100`.
    pub fn on_scroll(&mut self, scroll_top: f32, offsets: &[(Section, f32)]) -> Section {
        let cutoff = scroll_top + SCROLL_LOOKAHEAD;
        let mut current = Section::Home;
        for section in Section::ALL {
            let top = offsets.iter().find(|(s, _)| *s == section).map(|(_, top)| *top);
            if matches!(top, Some(top) if top <= cutoff) {
                current = section;
            }
        }
        self.active = Some(current);
        current
    }

    /// Navigation entry to underline. A project page highlights Work.
    pub fn highlighted(&self) -> Section {
        match self.view {
            View::Project(_) => Section::Work,
            View::Sections => self.active(),
        }
    }
}
