//! Pipeline stage definitions
//!
//! Each stage consumes the URLs discovered by the one before it. Stages run
//! strictly one after another.

use std::fmt;

/// A named phase of the crawl pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Seed page -> area URLs
    Area,

    /// Area pages -> sub-area URLs (deduplicated by href)
    SubArea,

    /// Sub-area pages -> one listing-page URL per page number
    Page,

    /// Listing pages -> listing detail URLs matching the detail pattern
    Detail,

    /// Listing detail pages -> one record each
    House,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 5] = [
        Stage::Area,
        Stage::SubArea,
        Stage::Page,
        Stage::Detail,
        Stage::House,
    ];

    /// Short lowercase name used in log lines and config keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::SubArea => "sub-area",
            Self::Page => "page",
            Self::Detail => "detail",
            Self::House => "house",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_execution_order() {
        assert!(Stage::ALL.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(Stage::ALL.first(), Some(&Stage::Area));
        assert_eq!(Stage::ALL.last(), Some(&Stage::House));
    }

    #[test]
    fn test_display() {
        assert_eq!(Stage::SubArea.to_string(), "sub-area");
        assert_eq!(format!("{}", Stage::House), "house");
    }
}
