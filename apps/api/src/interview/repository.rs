//! Persistence gateway for `candidates_table`.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::interview::roles::{Role, UnknownRole};
use crate::models::candidate::{AggregateRow, CandidateResponseRow};

/// Recruiter dashboard filter: every role, or exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl FromStr for RoleFilter {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(RoleFilter::All)
        } else {
            s.parse().map(RoleFilter::Only)
        }
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleFilter::All => f.write_str("ALL"),
            RoleFilter::Only(role) => write!(f, "{role}"),
        }
    }
}

/// A scored answer about to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCandidateResponse {
    pub application_id: String,
    pub name: String,
    pub role: Role,
    pub question: String,
    pub candidate_answer: String,
    pub ideal_answer: String,
    pub score: f64,
}

#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// True once any row exists for `application_id`.
    async fn already_attended(&self, application_id: &str) -> Result<bool, AppError>;

    /// Appends one row. No uniqueness is enforced here.
    async fn save_response(&self, response: &NewCandidateResponse) -> Result<(), AppError>;

    /// Total score per candidate, ordered by application_id then name.
    async fn aggregate(&self, filter: RoleFilter) -> Result<Vec<AggregateRow>, AppError>;

    /// Every stored answer for one candidate, in insertion order.
    async fn responses_for(
        &self,
        application_id: &str,
    ) -> Result<Vec<CandidateResponseRow>, AppError>;

    /// Deletes every row of every candidate. Irreversible.
    async fn clear_all(&self) -> Result<(), AppError>;
}

pub struct PgCandidateRepository {
    pool: PgPool,
}

impl PgCandidateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateRepository for PgCandidateRepository {
    async fn already_attended(&self, application_id: &str) -> Result<bool, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM candidates_table WHERE application_id = $1")
                .bind(application_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn save_response(&self, response: &NewCandidateResponse) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO candidates_table
                (application_id, name, role, question, candidate_answer, ideal_answer, score)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&response.application_id)
        .bind(&response.name)
        .bind(response.role.as_str())
        .bind(&response.question)
        .bind(&response.candidate_answer)
        .bind(&response.ideal_answer)
        .bind(response.score)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn aggregate(&self, filter: RoleFilter) -> Result<Vec<AggregateRow>, AppError> {
        let rows = match filter {
            RoleFilter::All => {
                sqlx::query_as::<_, AggregateRow>(
                    r#"
                    SELECT application_id, name, role, SUM(score) AS total_score
                    FROM candidates_table
                    GROUP BY application_id, name, role
                    ORDER BY application_id, name, role
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
            RoleFilter::Only(role) => {
                sqlx::query_as::<_, AggregateRow>(
                    r#"
                    SELECT application_id, name, NULL::TEXT AS role, SUM(score) AS total_score
                    FROM candidates_table
                    WHERE role = $1
                    GROUP BY application_id, name
                    ORDER BY application_id, name
                    "#,
                )
                .bind(role.as_str())
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn responses_for(
        &self,
        application_id: &str,
    ) -> Result<Vec<CandidateResponseRow>, AppError> {
        let rows = sqlx::query_as::<_, CandidateResponseRow>(
            "SELECT * FROM candidates_table WHERE application_id = $1 ORDER BY id",
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn clear_all(&self) -> Result<(), AppError> {
        sqlx::query("TRUNCATE TABLE candidates_table")
            .execute(&self.pool)
            .await?;
        info!("Cleared candidates_table");
        Ok(())
    }
}
