//! Request orchestration for the natural-language query gateway
//!
//! One request moves through the stages in a fixed order: prompt
//! assembly, generation, extraction, validation, execution. The first
//! failing stage ends the request; nothing is retried and nothing
//! reaches the database without passing the safety policy.

use super::executor::QueryExecutor;
use super::extract::extract_statement;
use super::generation::TextGenerator;
use super::prompt::build_prompt;
use super::types::{ExecutionResult, GatewayError};
use super::validate::ValidatedStatement;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Successful end-to-end outcome: the SQL that ran and its rows
#[derive(Debug)]
pub struct NlQueryOutcome {
    pub sql: String,
    pub result: ExecutionResult,
}

pub struct NlQueryGateway {
    generator: Arc<dyn TextGenerator>,
    executor: QueryExecutor,
    generation_slots: Semaphore,
}

impl NlQueryGateway {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        executor: QueryExecutor,
        max_concurrency: usize,
    ) -> Self {
        Self {
            generator,
            executor,
            generation_slots: Semaphore::new(max_concurrency),
        }
    }

    /// Turn request text into a validated SELECT without executing it.
    ///
    /// The admission slot is held for the duration of the generation
    /// call; a saturated gateway answers immediately instead of queueing.
    pub async fn translate(&self, request_text: &str) -> Result<ValidatedStatement, GatewayError> {
        let trimmed = request_text.trim();
        if trimmed.is_empty() {
            return Err(GatewayError::InputEmpty);
        }

        let _slot = self.generation_slots.try_acquire().map_err(|_| {
            GatewayError::CapacityExceeded("all generation slots are busy".to_string())
        })?;

        let prompt = build_prompt(trimmed);
        let candidate = self.generator.generate(&prompt).await?;
        debug!("Model {} produced a candidate", candidate.model);

        let sql = extract_statement(&candidate.text)?;
        ValidatedStatement::checked(&sql).map_err(|reason| {
            warn!("🚫 Statement rejected ({}): {}", reason, sql);
            GatewayError::ValidationRejected { sql, reason }
        })
    }

    /// Full pipeline: translate, execute, return the SQL plus its rows.
    pub async fn handle(&self, request_text: &str) -> Result<NlQueryOutcome, GatewayError> {
        let request_id = Uuid::new_v4();
        info!("🔎 [{}] Translating natural-language query", request_id);

        let statement = self.translate(request_text).await?;
        info!("⚙️ [{}] Executing: {}", request_id, statement);

        let result = self.executor.execute(&statement).await?;
        info!(
            "✅ [{}] {} rows (truncated: {})",
            request_id, result.row_count, result.truncated
        );

        Ok(NlQueryOutcome {
            sql: statement.into_string(),
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlquery::types::{GeneratedCandidate, RejectReason};
    use async_trait::async_trait;
    use deadpool_postgres::{Config, Runtime};
    use tokio_postgres::NoTls;

    struct CannedGenerator {
        text: &'static str,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<GeneratedCandidate, GatewayError> {
            Ok(GeneratedCandidate {
                text: self.text.to_string(),
                model: "canned".to_string(),
            })
        }

        fn model(&self) -> &str {
            "canned"
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<GeneratedCandidate, GatewayError> {
            Err(GatewayError::GenerationUnavailable("backend down".to_string()))
        }

        fn model(&self) -> &str {
            "failing"
        }
    }

    struct PanickingGenerator;

    #[async_trait]
    impl TextGenerator for PanickingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<GeneratedCandidate, GatewayError> {
            panic!("the generator must not be called on this path");
        }

        fn model(&self) -> &str {
            "panicking"
        }
    }

    // Points nowhere; translate-only tests never touch it.
    fn unused_pool() -> deadpool_postgres::Pool {
        let mut cfg = Config::new();
        cfg.host = Some("localhost".to_string());
        cfg.dbname = Some("unused".to_string());
        cfg.create_pool(Some(Runtime::Tokio1), NoTls).unwrap()
    }

    fn gateway_with(generator: Arc<dyn TextGenerator>, slots: usize) -> NlQueryGateway {
        NlQueryGateway::new(generator, QueryExecutor::new(unused_pool(), 100, 5_000), slots)
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits_before_generation() {
        let gateway = gateway_with(Arc::new(PanickingGenerator), 4);
        assert!(matches!(
            gateway.translate("").await,
            Err(GatewayError::InputEmpty)
        ));
        assert!(matches!(
            gateway.translate("   \n\t").await,
            Err(GatewayError::InputEmpty)
        ));
    }

    #[tokio::test]
    async fn test_destructive_candidate_is_rejected_with_echo() {
        let gateway = gateway_with(
            Arc::new(CannedGenerator {
                text: "DELETE FROM Employee WHERE Dept_Id = 2",
            }),
            4,
        );
        let err = gateway
            .translate("delete all employees in department 2")
            .await
            .unwrap_err();
        match err {
            GatewayError::ValidationRejected { sql, reason } => {
                assert_eq!(sql, "DELETE FROM Employee WHERE Dept_Id = 2");
                assert_eq!(reason, RejectReason::NotASelect);
            }
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fenced_select_translates_cleanly() {
        let gateway = gateway_with(
            Arc::new(CannedGenerator {
                text: "```sql\nSELECT * FROM Department\n```",
            }),
            4,
        );
        let statement = gateway.translate("show all departments").await.unwrap();
        assert_eq!(statement.as_str(), "SELECT * FROM Department");
    }

    #[tokio::test]
    async fn test_trailing_semicolon_is_normalized_away() {
        let gateway = gateway_with(
            Arc::new(CannedGenerator {
                text: "SELECT * FROM Users;",
            }),
            4,
        );
        let statement = gateway.translate("list users").await.unwrap();
        assert_eq!(statement.as_str(), "SELECT * FROM Users");
    }

    #[tokio::test]
    async fn test_stacked_statements_are_rejected() {
        let gateway = gateway_with(
            Arc::new(CannedGenerator {
                text: "SELECT * FROM Employee; DROP TABLE Employee;",
            }),
            4,
        );
        let err = gateway.translate("list employees").await.unwrap_err();
        match err {
            GatewayError::ValidationRejected { reason, .. } => {
                assert_eq!(reason, RejectReason::MultipleStatements);
            }
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let gateway = gateway_with(Arc::new(FailingGenerator), 4);
        assert!(matches!(
            gateway.translate("anything").await,
            Err(GatewayError::GenerationUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_candidate_yields_no_statement() {
        let gateway = gateway_with(Arc::new(CannedGenerator { text: "```sql\n```" }), 4);
        assert!(matches!(
            gateway.translate("something vague").await,
            Err(GatewayError::NoStatementExtracted)
        ));
    }

    #[tokio::test]
    async fn test_saturated_gateway_rejects_instead_of_queueing() {
        let gateway = gateway_with(Arc::new(PanickingGenerator), 0);
        assert!(matches!(
            gateway.translate("list departments").await,
            Err(GatewayError::CapacityExceeded(_))
        ));
    }

    #[test]
    fn test_slot_released_after_completed_translation() {
        let gateway = gateway_with(
            Arc::new(CannedGenerator {
                text: "SELECT * FROM Grade",
            }),
            1,
        );
        let first = tokio_test::block_on(gateway.translate("list grades")).unwrap();
        assert_eq!(first.as_str(), "SELECT * FROM Grade");

        // With a single slot, a second success proves the first released it.
        let second = tokio_test::block_on(gateway.translate("list grades again")).unwrap();
        assert_eq!(second.as_str(), "SELECT * FROM Grade");
    }

    #[test]
    fn test_slot_released_after_rejection() {
        let gateway = gateway_with(
            Arc::new(CannedGenerator {
                text: "DROP TABLE Salary",
            }),
            1,
        );
        for _ in 0..2 {
            // A leaked slot would turn the second attempt into CapacityExceeded.
            assert!(matches!(
                tokio_test::block_on(gateway.translate("remove the salary table")),
                Err(GatewayError::ValidationRejected { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_handle_stops_at_rejection_without_executing() {
        // The pool points nowhere; reaching the executor would surface
        // an execution error rather than the rejection asserted here.
        let gateway = gateway_with(
            Arc::new(CannedGenerator {
                text: "TRUNCATE Employee",
            }),
            4,
        );
        assert!(matches!(
            gateway.handle("wipe the employee table").await,
            Err(GatewayError::ValidationRejected { .. })
        ));
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_live_handle_round_trip() {
        dotenvy::dotenv().ok();
        let config = crate::config::DatabaseConfig::default();
        let pool = crate::db::create_pool(&config).unwrap();
        let gateway = NlQueryGateway::new(
            Arc::new(CannedGenerator {
                text: "SELECT 1 AS answer",
            }),
            QueryExecutor::new(pool, 100, 5_000),
            4,
        );
        let outcome = gateway.handle("what is the answer").await.unwrap();
        assert_eq!(outcome.sql, "SELECT 1 AS answer");
        assert_eq!(outcome.result.row_count, 1);
    }
}
