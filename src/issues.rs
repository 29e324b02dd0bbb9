use std::fmt::Display;

/// The list an issue message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Success,
    Notice,
    Error,
    Info,
}

impl Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IssueKind::Success => "success",
            IssueKind::Notice => "notice",
            IssueKind::Error => "error",
            IssueKind::Info => "info",
        };

        write!(f, "{name}")
    }
}

/// Messages collected during a request for display to the user.
#[derive(Debug, Clone, Default)]
pub struct Issues {
    success: Vec<String>,
    notice: Vec<String>,
    error: Vec<String>,
    info: Vec<String>,
}

impl Issues {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message` to the list for `kind`.
    pub fn push<S>(&mut self, kind: IssueKind, message: S)
    where
        S: Into<String>,
    {
        self.list_mut(kind).push(message.into());
    }

    /// Return the messages of `kind`, oldest first.
    pub fn get(&self, kind: IssueKind) -> &[String] {
        match kind {
            IssueKind::Success => &self.success,
            IssueKind::Notice => &self.notice,
            IssueKind::Error => &self.error,
            IssueKind::Info => &self.info,
        }
    }

    #[inline]
    pub fn success(&self) -> &[String] {
        &self.success
    }

    #[inline]
    pub fn notice(&self) -> &[String] {
        &self.notice
    }

    #[inline]
    pub fn error(&self) -> &[String] {
        &self.error
    }

    #[inline]
    pub fn info(&self) -> &[String] {
        &self.info
    }

    /// Return true if any list holds a message.
    pub fn has_issues(&self) -> bool {
        !(self.success.is_empty()
            && self.notice.is_empty()
            && self.error.is_empty()
            && self.info.is_empty())
    }

    fn list_mut(&mut self, kind: IssueKind) -> &mut Vec<String> {
        match kind {
            IssueKind::Success => &mut self.success,
            IssueKind::Notice => &mut self.notice,
            IssueKind::Error => &mut self.error,
            IssueKind::Info => &mut self.info,
        }
    }
}
