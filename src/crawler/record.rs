//! Record types flowing through the discovery pipeline

use std::collections::HashSet;

/// Separator used when an email set is written to a single cell
pub const EMAIL_SEPARATOR: &str = ", ";

/// One business record to discover contacts for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// Website value exactly as stored, possibly empty or malformed
    pub website_raw: String,
}

impl InputRecord {
    pub fn new(website_raw: impl Into<String>) -> Self {
        Self {
            website_raw: website_raw.into(),
        }
    }
}

/// Result of discovery for one record, written back at the record's position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRecord {
    /// Emails joined with [`EMAIL_SEPARATOR`], or empty
    pub email_joined: String,

    /// First social profile link seen, reported only when no email was found
    pub social_link_saved: String,
}

impl OutputRecord {
    /// Output for a record that yielded an email
    pub fn with_emails(emails: &EmailSet) -> Self {
        Self {
            email_joined: emails.joined(),
            social_link_saved: String::new(),
        }
    }

    /// Output for a record where every tier came up empty
    pub fn exhausted(social_link: Option<&str>) -> Self {
        Self {
            email_joined: String::new(),
            social_link_saved: social_link.unwrap_or_default().to_string(),
        }
    }

    /// Returns true if an email was found
    pub fn has_email(&self) -> bool {
        !self.email_joined.is_empty()
    }
}

/// Lower-cased, de-duplicated emails in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailSet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl EmailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an email, returning false if it was blank or already present
    pub fn insert(&mut self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !self.seen.insert(email.clone()) {
            return false;
        }
        self.ordered.push(email);
        true
    }

    /// Adds every email of another set, keeping first-seen order
    pub fn extend(&mut self, other: EmailSet) {
        for email in other.ordered {
            self.insert(&email);
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.seen.contains(&email.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    /// Joins the emails for display in a single cell
    pub fn joined(&self) -> String {
        self.ordered.join(EMAIL_SEPARATOR)
    }
}

impl<'a> FromIterator<&'a str> for EmailSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = EmailSet::new();
        for email in iter {
            set.insert(email);
        }
        set
    }
}

/// The fallback tier that ended a record's discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// The website value could not be normalized; nothing was fetched
    Unscrapable,
    /// A `mailto:` link on the homepage
    Homepage,
    /// A `mailto:` link on the contact page
    Contact,
    /// A `mailto:` link on the about page
    About,
    /// An email-shaped string near a marker on a social profile
    Social,
    /// Every tier came up empty
    Exhausted,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unscrapable => "unscrapable",
            Self::Homepage => "homepage",
            Self::Contact => "contact",
            Self::About => "about",
            Self::Social => "social",
            Self::Exhausted => "exhausted",
        }
    }
}

/// Full outcome of one record's discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// What gets written back
    pub output: OutputRecord,

    /// Tier that ended the pipeline
    pub tier: Tier,

    /// Number of fetches issued
    pub fetches: u32,

    /// Number of those fetches that failed
    pub failed_fetches: u32,
}

impl Discovery {
    /// Outcome for a record whose website could not be normalized
    pub fn unscrapable() -> Self {
        Self {
            output: OutputRecord::default(),
            tier: Tier::Unscrapable,
            fetches: 0,
            failed_fetches: 0,
        }
    }
}
