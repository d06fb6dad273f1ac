//! Container entity types reported by a container runtime.

/// A live container as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Runtime-assigned identifier, unique among live containers.
    pub id: String,

    /// Name aliases. Engines usually report these with a leading `/`.
    pub names: Vec<String>,
}

impl Container {
    /// Create a container record from an ID and its name aliases.
    #[must_use]
    pub fn new(id: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            id: id.into(),
            names,
        }
    }

    /// Returns whether any alias equals `name` once a single leading `/` is
    /// stripped from the alias.
    ///
    /// ```
    /// use cidtrack::container::Container;
    ///
    /// let container = Container::new("abc123", vec![String::from("/worker")]);
    /// assert!(container.has_name("worker"));
    /// assert!(!container.has_name("/worker"));
    /// ```
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.names
            .iter()
            .any(|alias| alias.strip_prefix('/').unwrap_or(alias) == name)
    }
}

/// A point-in-time resource reading for one container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Resident memory in mebibytes. Approximated by total usage, page cache
    /// included, when the engine reports no resident figure.
    pub memory_mb: u64,

    /// Cumulative CPU time in seconds.
    pub cpu_sec: u64,
}
