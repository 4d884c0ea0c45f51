/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The content is moderated.
    Moderated,
    /// The model provider is rate limited. Callers may retry later.
    RateLimitExceeded,
    /// The credential was rejected by the provider.
    Unauthorized,
    /// Any other errors, including transport failures.
    Other,
}

impl ErrorKind {
    /// Returns `true` if a later attempt with the same request may succeed.
    #[inline]
    pub fn is_transient(self) -> bool {
        matches!(self, ErrorKind::RateLimitExceeded)
    }
}
