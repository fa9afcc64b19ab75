use std::fmt;

/// Blocking message shown to the user before play continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    RoundPassed {
        round: u8,
        awarded: u32,
        total: u32,
        next: u8,
    },
    RoundFailed {
        round: u8,
        total: u32,
        incorrect: Vec<usize>,
    },
    TimeExpired {
        round: u8,
        total: u32,
    },
    Completed {
        total: u32,
    },
    AssetsUnavailable {
        message: String,
    },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::RoundPassed { .. } => "Success",
            Notice::RoundFailed { .. } => "Verification Failed",
            Notice::TimeExpired { .. } => "Time Expired",
            Notice::Completed { .. } => "Verification Complete",
            Notice::AssetsUnavailable { .. } => "Error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::RoundPassed {
                round,
                awarded,
                next,
                ..
            } => format!(
                "Level {round} completed successfully!\nYou earned {awarded} points!\nProceeding to Level {next}."
            ),
            Notice::RoundFailed { total, .. } => {
                format!("Incorrect selection.\nYour final score: {total} points.")
            }
            Notice::TimeExpired { round, total } => format!(
                "Time's up! You didn't complete Level {round} in time.\nYour final score: {total} points."
            ),
            Notice::Completed { total } => format!(
                "Congratulations! You have successfully completed all levels of verification!\nFinal score: {total} points!"
            ),
            Notice::AssetsUnavailable { message } => {
                format!("Not enough images to continue: {message}. Please add more images.")
            }
        }
    }

    /// Point total the notice reports, where it has one.
    pub fn total(&self) -> Option<u32> {
        match self {
            Notice::RoundPassed { total, .. }
            | Notice::RoundFailed { total, .. }
            | Notice::TimeExpired { total, .. }
            | Notice::Completed { total } => Some(*total),
            Notice::AssetsUnavailable { .. } => None,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_reports_total() {
        let notice = Notice::RoundFailed {
            round: 2,
            total: 15,
            incorrect: vec![4],
        };

        assert_eq!(notice.title(), "Verification Failed");
        assert_eq!(
            notice.message(),
            "Incorrect selection.\nYour final score: 15 points."
        );
        assert_eq!(notice.total(), Some(15));
    }

    #[test]
    fn pass_message_names_next_level() {
        let notice = Notice::RoundPassed {
            round: 1,
            awarded: 5,
            total: 5,
            next: 2,
        };

        assert!(notice.message().ends_with("Proceeding to Level 2."));
    }
}
