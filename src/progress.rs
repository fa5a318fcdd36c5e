//! Process assignment progress
//!
//! Status vocabulary shared by the status intents and the stored
//! `process_assignments.status` column, plus the rule that derives an
//! assignment's completion from its document counts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a customer's assignment to a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    Pending,
    InProgress,
    Completed,
}

impl AssignmentStatus {
    pub const ALL: [AssignmentStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Value stored in `process_assignments.status`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Column alias used for the per-status assignment count
    pub fn count_alias(&self) -> &'static str {
        match self {
            Self::Pending => "pending_assignments",
            Self::InProgress => "inprogress_assignments",
            Self::Completed => "completed_assignments",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion of one assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignmentProgress {
    pub completion_percentage: u32,
    pub status: AssignmentStatus,
}

impl AssignmentProgress {
    /// Derive progress from distinct submitted document types and the number
    /// the process requires.
    ///
    /// The percentage is truncated, saturates at `u32::MAX`, and a process
    /// requiring nothing is 0%.
    pub fn from_counts(submitted_distinct: u32, required: u32) -> Self {
        let completion_percentage = if required == 0 {
            0
        } else {
            let percentage = u64::from(submitted_distinct) * 100 / u64::from(required);
            u32::try_from(percentage).unwrap_or(u32::MAX)
        };

        let status = if completion_percentage == 100 {
            AssignmentStatus::Completed
        } else if completion_percentage > 0 {
            AssignmentStatus::InProgress
        } else {
            AssignmentStatus::Pending
        };

        Self {
            completion_percentage,
            status,
        }
    }
}
