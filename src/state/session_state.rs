/// Chapter session state definitions
///
/// A session alternates between navigating to a chapter and extracting it,
/// until the termination predicate in [`SessionState::after_extraction`]
/// moves it to `Terminated`.
use std::fmt;

/// Why a chapter session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// The chapter budget has been collected
    BudgetExhausted,

    /// The last chapter had no usable next-chapter link
    NoNextLink,
}

/// Represents the current state of a chapter session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// About to load the chapter at `url`
    Navigating { url: String },

    /// The chapter at `url` has rendered; `html` is its markup
    Extracting { url: String, html: String },

    /// No further navigation will happen
    Terminated(TerminationReason),
}

impl SessionState {
    /// Initial state for a run of `budget` chapters starting at `start_url`
    pub fn start(start_url: &str, budget: usize) -> Self {
        if budget == 0 {
            Self::Terminated(TerminationReason::BudgetExhausted)
        } else {
            Self::Navigating {
                url: start_url.to_string(),
            }
        }
    }

    /// Termination predicate applied after each extracted chapter
    ///
    /// A missing next link ends the session regardless of the remaining
    /// budget; otherwise the session ends once `collected` reaches `budget`.
    pub fn after_extraction(collected: usize, budget: usize, next_url: Option<String>) -> Self {
        match next_url {
            None => Self::Terminated(TerminationReason::NoNextLink),
            Some(_) if collected >= budget => Self::Terminated(TerminationReason::BudgetExhausted),
            Some(url) => Self::Navigating { url },
        }
    }

    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }

    /// Short name used in log output
    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigating { .. } => "navigating",
            Self::Extracting { .. } => "extracting",
            Self::Terminated(_) => "terminated",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BudgetExhausted => write!(f, "chapter budget exhausted"),
            Self::NoNextLink => write!(f, "no next chapter link"),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigating { url } | Self::Extracting { url, .. } => {
                write!(f, "{} {}", self.name(), url)
            }
            Self::Terminated(reason) => write!(f, "terminated ({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_with_budget() {
        let state = SessionState::start("https://www.tadu.com/book/5/1/", 3);
        assert_eq!(
            state,
            SessionState::Navigating {
                url: "https://www.tadu.com/book/5/1/".to_string()
            }
        );
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_start_with_zero_budget() {
        let state = SessionState::start("https://www.tadu.com/book/5/1/", 0);
        assert_eq!(
            state,
            SessionState::Terminated(TerminationReason::BudgetExhausted)
        );
    }

    #[test]
    fn test_missing_next_link_terminates() {
        let state = SessionState::after_extraction(1, 5, None);
        assert_eq!(state, SessionState::Terminated(TerminationReason::NoNextLink));
    }

    #[test]
    fn test_budget_terminates() {
        let state = SessionState::after_extraction(5, 5, Some("https://x/6/".to_string()));
        assert_eq!(
            state,
            SessionState::Terminated(TerminationReason::BudgetExhausted)
        );
    }

    #[test]
    fn test_continue_to_next() {
        let state = SessionState::after_extraction(2, 5, Some("https://x/3/".to_string()));
        assert_eq!(
            state,
            SessionState::Navigating {
                url: "https://x/3/".to_string()
            }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SessionState::Terminated(TerminationReason::NoNextLink).to_string(),
            "terminated (no next chapter link)"
        );
        assert_eq!(
            SessionState::Navigating {
                url: "https://x/1/".to_string()
            }
            .to_string(),
            "navigating https://x/1/"
        );
    }
}
