/// Classification of resolution failures.
///
/// Used when an error is degraded to a status at the resolver boundary, so that
/// logs can tell a dead source apart from one whose markup drifted.
///
/// # Behavior Summary
///
/// | Kind | Network reached? | Degrades to |
/// |------|------------------|-------------|
/// | `Transport` | No response | `warn` / "error" |
/// | `Parse` | Yes, response unusable | `warn` / "error" |
/// | `Input` | Never attempted | `warn` / "empty keyword" or "error" |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// Timeout, refused connection, DNS failure, or a resolver task that died.
    Transport,

    /// A response arrived but expected markup could not be read.
    Parse,

    /// The request was rejected before any network call was made.
    Input,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Parse => "parse",
            FailureKind::Input => "input",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
