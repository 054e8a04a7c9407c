use serde::{Deserialize, Serialize};
use serde_json::json;
use ulid::Ulid;

use crate::admin::UserId;
use crate::bank::{QuestionBank, QuestionId};
use crate::clock::now_rfc3339_utc;
use crate::error::{CoreError, CoreResult};
use crate::ledger::{Actor, LedgerEvent, LedgerLog};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    WrongAnswer,
    AnswerShouldBeAccepted,
    Other,
}

impl IssueType {
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "wrong_answer" => Ok(IssueType::WrongAnswer),
            "answer_should_be_accepted" => Ok(IssueType::AnswerShouldBeAccepted),
            "other" => Ok(IssueType::Other),
            _ => Err(CoreError::InvalidInput(format!(
                "invalid issue type: {}",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::WrongAnswer => "wrong_answer",
            IssueType::AnswerShouldBeAccepted => "answer_should_be_accepted",
            IssueType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Open,
    Resolved,
}

/// A learner- or guest-filed report about a question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionReport {
    pub id: String,
    pub question_id: QuestionId,
    pub user_id: Option<UserId>,
    pub issue_type: IssueType,
    pub description: String,
    pub created_at: String,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, Default)]
pub struct ReportStore {
    reports: Vec<QuestionReport>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
        }
    }

    /// File a report. The question must exist in the bank; the description
    /// must be non-empty; `user_id` of `None` is a guest submission.
    pub fn submit(
        &mut self,
        bank: &QuestionBank,
        question_id: QuestionId,
        user_id: Option<UserId>,
        issue_type: IssueType,
        description: &str,
        ledger: Option<&mut LedgerLog>,
    ) -> CoreResult<String> {
        if description.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "report description cannot be empty".to_string(),
            ));
        }
        bank.question(question_id)?;

        let id = report_id_ulid();
        if let Some(ledger) = ledger {
            ledger.append(LedgerEvent {
                ts_utc: now_rfc3339_utc(),
                event_type: "REPORT_FILED".to_string(),
                session_id: id.clone(),
                user_id,
                actor: Actor::Learner,
                details: json!({
                    "report_id": id,
                    "question_id": question_id,
                    "issue_type": issue_type.as_str(),
                }),
                prev_event_hash: String::new(),
                event_hash: String::new(),
            })?;
        }
        self.reports.push(QuestionReport {
            id: id.clone(),
            question_id,
            user_id,
            issue_type,
            description: description.to_string(),
            created_at: now_rfc3339_utc(),
            status: ReportStatus::Open,
        });
        Ok(id)
    }

    pub fn list(&self) -> &[QuestionReport] {
        &self.reports
    }

    pub fn open_reports(&self) -> Vec<&QuestionReport> {
        self.reports
            .iter()
            .filter(|r| r.status == ReportStatus::Open)
            .collect()
    }

    pub fn resolve(&mut self, report_id: &str, ledger: Option<&mut LedgerLog>) -> CoreResult<()> {
        let report = self
            .reports
            .iter_mut()
            .find(|r| r.id == report_id)
            .ok_or_else(|| CoreError::NotFound(format!("report {}", report_id)))?;
        report.status = ReportStatus::Resolved;
        if let Some(ledger) = ledger {
            ledger.append(LedgerEvent {
                ts_utc: now_rfc3339_utc(),
                event_type: "REPORT_RESOLVED".to_string(),
                session_id: report_id.to_string(),
                user_id: None,
                actor: Actor::Admin,
                details: json!({ "report_id": report_id }),
                prev_event_hash: String::new(),
                event_hash: String::new(),
            })?;
        }
        Ok(())
    }

    pub fn delete(&mut self, report_id: &str) -> CoreResult<()> {
        let before = self.reports.len();
        self.reports.retain(|r| r.id != report_id);
        if self.reports.len() == before {
            return Err(CoreError::NotFound(format!("report {}", report_id)));
        }
        Ok(())
    }
}

fn report_id_ulid() -> String {
    format!("rep_{}", Ulid::new())
}
