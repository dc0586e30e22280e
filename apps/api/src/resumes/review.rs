//! Review workflow for submitted resumes.
//!
//! ```text
//! pending ──► in_review ──► approved            (closed)
//!    │            │
//!    └────────────┴──────► changes_requested    (closed; student submits a new file)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    InReview,
    Approved,
    ChangesRequested,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::InReview => "in_review",
            ReviewStatus::Approved => "approved",
            ReviewStatus::ChangesRequested => "changes_requested",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReviewStatus::Pending),
            "in_review" => Some(ReviewStatus::InReview),
            "approved" => Some(ReviewStatus::Approved),
            "changes_requested" => Some(ReviewStatus::ChangesRequested),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ReviewStatus::Approved | ReviewStatus::ChangesRequested)
    }
}

/// What an admin decided. `Pending` is not a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    InReview,
    Approved,
    ChangesRequested,
}

impl From<ReviewDecision> for ReviewStatus {
    fn from(d: ReviewDecision) -> Self {
        match d {
            ReviewDecision::InReview => ReviewStatus::InReview,
            ReviewDecision::Approved => ReviewStatus::Approved,
            ReviewDecision::ChangesRequested => ReviewStatus::ChangesRequested,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewRejection {
    /// The submission already has a final outcome.
    Closed(ReviewStatus),
    MissingReviewer,
    FeedbackRequired,
}

impl std::fmt::Display for ReviewRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewRejection::Closed(status) => {
                write!(f, "Submission is already {}", status.as_str())
            }
            ReviewRejection::MissingReviewer => f.write_str("reviewer is required"),
            ReviewRejection::FeedbackRequired => {
                f.write_str("feedback is required when requesting changes")
            }
        }
    }
}

/// A review accepted for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewTransition {
    pub next: ReviewStatus,
    pub reviewer: String,
    pub feedback: Option<String>,
}

/// Checks a review decision against the submission's current status.
pub fn apply_review(
    current: ReviewStatus,
    decision: ReviewDecision,
    reviewer: &str,
    feedback: Option<&str>,
) -> Result<ReviewTransition, ReviewRejection> {
    if current.is_closed() {
        return Err(ReviewRejection::Closed(current));
    }

    let reviewer = reviewer.trim();
    if reviewer.is_empty() {
        return Err(ReviewRejection::MissingReviewer);
    }

    let feedback = feedback
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(String::from);
    if decision == ReviewDecision::ChangesRequested && feedback.is_none() {
        return Err(ReviewRejection::FeedbackRequired);
    }

    Ok(ReviewTransition {
        next: decision.into(),
        reviewer: reviewer.to_string(),
        feedback,
    })
}
