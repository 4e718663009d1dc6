use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The fixed category seed set. Videos are classified into one of these during
/// sync; the rows themselves are upserted by slug before classification runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Programming,
    Ecommerce,
    Entertainment,
    Uncategorized,
}

impl CategoryKind {
    pub const SEED: [CategoryKind; 4] = [
        CategoryKind::Uncategorized,
        CategoryKind::Programming,
        CategoryKind::Ecommerce,
        CategoryKind::Entertainment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CategoryKind::Programming => "Programming",
            CategoryKind::Ecommerce => "E-commerce",
            CategoryKind::Entertainment => "Entertainment",
            CategoryKind::Uncategorized => "Uncategorized",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            CategoryKind::Programming => "programming",
            CategoryKind::Ecommerce => "e-commerce",
            CategoryKind::Entertainment => "entertainment",
            CategoryKind::Uncategorized => "uncategorized",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CategoryKind::Programming => "Programming tutorials and coding content",
            CategoryKind::Ecommerce => "E-commerce strategies and online business content",
            CategoryKind::Entertainment => "Entertainment videos and fun content",
            CategoryKind::Uncategorized => "Videos that haven't been categorized yet",
        }
    }
}

impl Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
