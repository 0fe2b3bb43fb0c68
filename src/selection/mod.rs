//! Documentation set selection.
//!
//! Turns shorthand flags and bare identifiers into a [`Selection`]. Tokens are
//! folded through a single [`SelectionAccumulator`] in the order they appeared
//! on the command line; identifiers are kept verbatim and duplicates are kept.

mod groups;

pub use groups::Shorthand;

use crate::error::UsageError;
use std::fmt;

/// Resolved documentation selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Upstream default: build every documentation set
    All,
    /// Explicit, non-empty list of identifiers in command line order
    Docs(Vec<String>),
}

impl Selection {
    /// Whether this is the "all" sentinel
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Identifiers to embed, empty for [`Selection::All`]
    pub fn identifiers(&self) -> &[String] {
        match self {
            Selection::All => &[],
            Selection::Docs(docs) => docs,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "all documentation sets"),
            Selection::Docs(docs) => write!(f, "{}", docs.join(" ")),
        }
    }
}

/// One selection-relevant command line token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionToken {
    /// A shorthand group flag such as `--minimal`
    Shorthand(Shorthand),
    /// A bare documentation set identifier
    Doc(String),
}

/// Running selection state threaded through argument processing
#[derive(Debug, Clone, Default)]
pub struct SelectionAccumulator {
    all: bool,
    docs: Vec<String>,
}

impl SelectionAccumulator {
    /// Start with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one token and return the updated accumulator
    pub fn push(mut self, token: SelectionToken) -> Result<Self, UsageError> {
        match token {
            SelectionToken::Shorthand(Shorthand::All) => self.all = true,
            SelectionToken::Shorthand(group) => {
                self.docs.extend(group.docs().iter().map(|d| d.to_string()));
            }
            SelectionToken::Doc(doc) if doc.starts_with('-') => {
                return Err(UsageError::UnknownFlag { flag: doc });
            }
            SelectionToken::Doc(doc) => self.docs.push(doc),
        }
        Ok(self)
    }

    /// Finish parsing; an empty selection is a usage error
    pub fn finish(self) -> Result<Selection, UsageError> {
        if self.all {
            if !self.docs.is_empty() {
                log::debug!("--all overrides explicit selection: {}", self.docs.join(" "));
            }
            return Ok(Selection::All);
        }
        if self.docs.is_empty() {
            return Err(UsageError::EmptySelection);
        }
        Ok(Selection::Docs(self.docs))
    }
}

/// Resolve an ordered token stream into a selection
pub fn resolve<I>(tokens: I) -> Result<Selection, UsageError>
where
    I: IntoIterator<Item = SelectionToken>,
{
    tokens
        .into_iter()
        .try_fold(SelectionAccumulator::new(), SelectionAccumulator::push)?
        .finish()
}
