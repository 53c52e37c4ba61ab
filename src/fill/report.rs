use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use uuid::Uuid;

use crate::resolver::MatchResult;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Filled,
    Suggested,
    Unresolved,
    SkippedBlank,
    Failed,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub position: usize,
    pub label: String,
    pub status: OutcomeStatus,
    pub matched: Option<MatchResult>,
    pub learned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillReport {
    pub run_id: Uuid,
    pub review_mode: bool,
    pub questions_found: usize,
    pub outcomes: Vec<QuestionOutcome>,
}

impl FillReport {
    pub fn new(review_mode: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            review_mode,
            questions_found: 0,
            outcomes: Vec::new(),
        }
    }


    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }


    pub fn filled(&self) -> usize {
        self.count(OutcomeStatus::Filled)
    }


    pub fn suggested(&self) -> usize {
        self.count(OutcomeStatus::Suggested)
    }


    pub fn unresolved(&self) -> usize {
        self.count(OutcomeStatus::Unresolved)
    }


    pub fn learned(&self) -> usize {
        self.outcomes.iter().filter(|o| o.learned).count()
    }


    pub fn outcome(&self, position: usize) -> Option<&QuestionOutcome> {
        self.outcomes.iter().find(|o| o.position == position)
    }
}
