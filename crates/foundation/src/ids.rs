use std::fmt;

/// DOM anchor id of a page section (`<section id="work">`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        SectionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        SectionId::new(id)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
