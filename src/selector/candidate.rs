use crate::browser::driver::Locator;
use crate::page::page_model::PageId;

/// How precisely a candidate pins down its element. Exact candidates are
/// always tried before fuzzy ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    /// id, name or data-testid attribute
    Exact,
    /// class fragment, placeholder, visible text
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub locator: Locator,
    pub kind: MatchKind,
}

impl Candidate {
    pub fn exact(selector: &str) -> Self {
        Candidate {
            locator: Locator::css(selector),
            kind: MatchKind::Exact,
        }
    }

    pub fn fuzzy(selector: &str) -> Self {
        Candidate {
            locator: Locator::css(selector),
            kind: MatchKind::Fuzzy,
        }
    }

    /// Fuzzy match on text content.
    pub fn text(tag: Option<&str>, pattern: &str) -> Self {
        Candidate {
            locator: Locator::text(tag, pattern),
            kind: MatchKind::Fuzzy,
        }
    }
}

/// Semantic element names of one page, each with its ranked candidates.
#[derive(Debug, Clone)]
pub struct ElementMap {
    page: PageId,
    entries: Vec<(String, Vec<Candidate>)>,
}

impl ElementMap {
    pub fn new(page: PageId) -> Self {
        ElementMap {
            page,
            entries: Vec::new(),
        }
    }

    /// Register an element. Candidates are stable-sorted by [`MatchKind`], so
    /// declaration order only matters within one rank. Re-registering a name
    /// replaces its candidates.
    pub fn with(mut self, name: &str, mut candidates: Vec<Candidate>) -> Self {
        candidates.sort_by_key(|c| c.kind);
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = candidates,
            None => self.entries.push((name.to_string(), candidates)),
        }
        self
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    /// Ranked candidates for a name, or `None` if the page never registered it.
    pub fn candidates(&self, name: &str) -> Option<&[Candidate]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}
