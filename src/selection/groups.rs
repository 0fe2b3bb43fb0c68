//! Shorthand groups and their fixed identifier lists.

/// Named shorthand flag that sets or extends the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shorthand {
    /// Widely used languages and frameworks
    Popular,
    /// Smallest useful image
    Minimal,
    /// Browser-side stack
    Frontend,
    /// Server-side stack
    Backend,
    /// Every documentation set (upstream default)
    All,
}

const POPULAR: &[&str] = &[
    "javascript",
    "typescript",
    "python~3.12",
    "react",
    "node",
    "html",
    "css",
    "git",
];

const MINIMAL: &[&str] = &["svelte", "tailwindcss"];

const FRONTEND: &[&str] = &[
    "html",
    "css",
    "javascript",
    "typescript",
    "dom",
    "react",
    "vue~3",
    "svelte",
    "tailwindcss",
    "vite",
];

const BACKEND: &[&str] = &[
    "node",
    "python~3.12",
    "go",
    "rust",
    "postgresql~16",
    "redis",
    "docker",
    "nginx",
];

impl Shorthand {
    /// Groups that expand to an explicit identifier list
    pub const SELECTABLE: [Shorthand; 4] = [
        Shorthand::Popular,
        Shorthand::Minimal,
        Shorthand::Frontend,
        Shorthand::Backend,
    ];

    /// Identifiers this group expands to. Empty for [`Shorthand::All`].
    pub fn docs(self) -> &'static [&'static str] {
        match self {
            Shorthand::Popular => POPULAR,
            Shorthand::Minimal => MINIMAL,
            Shorthand::Frontend => FRONTEND,
            Shorthand::Backend => BACKEND,
            Shorthand::All => &[],
        }
    }

    /// Long flag name without leading dashes, also the clap argument id
    pub fn flag(self) -> &'static str {
        match self {
            Shorthand::Popular => "popular",
            Shorthand::Minimal => "minimal",
            Shorthand::Frontend => "frontend",
            Shorthand::Backend => "backend",
            Shorthand::All => "all",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_no_identifiers() {
        assert!(Shorthand::All.docs().is_empty());
    }

    #[test]
    fn test_minimal_group() {
        assert_eq!(Shorthand::Minimal.docs(), ["svelte", "tailwindcss"]);
    }
}
