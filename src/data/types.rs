use clap::ValueEnum;

// Ticket pattern families
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TicketPattern {
    /// Bracketed project key and number, e.g. `[ABC-123]`
    ProjectKey,
    /// Bracketed lowercase alphanumeric id of 6 to 8 characters, e.g. `[86b0x1ad]`
    ShortToken,
}

impl TicketPattern {
    /// Regex for a bracketed ticket token anywhere in the text.
    pub fn token_regex(self) -> &'static str {
        match self {
            TicketPattern::ProjectKey => r"\[[A-Za-z0-9_]+-[0-9]+\]",
            TicketPattern::ShortToken => r"\[[a-z0-9]{6,8}\]",
        }
    }

    /// Regex for a token that ends its line, the only position we rewrite.
    pub fn linkable_regex(self) -> String {
        format!(r"{}\r?\n", self.token_regex())
    }

    pub fn to_str(self) -> &'static str {
        match self {
            TicketPattern::ProjectKey => "project-key",
            TicketPattern::ShortToken => "short-token",
        }
    }
}

// Which part of the pull request is missing its ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Title,
    Body,
}

impl FailureReason {
    pub fn to_str(self) -> &'static str {
        match self {
            FailureReason::Title => "title",
            FailureReason::Body => "body",
        }
    }
}

// What the linker decided to do with the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    AlreadyLinked,
    NotLinkable,
    Rewritten(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Bypassed,
    Passed(LinkAction),
    Failed(FailureReason),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Outcome::Bypassed => "bypassed",
            Outcome::Passed(_) => "passed",
            Outcome::Failed(_) => "failed",
        }
    }
}
