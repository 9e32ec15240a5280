//! Natural-Language Query Gateway
//!
//! Turns plain-English questions about the HR data into executed,
//! read-only SQL. A request flows through five stages in order:
//!
//! 1. **Prompt**: Wrap the request text with the schema description
//! 2. **Generation**: Ask the model for a single SELECT statement
//! 3. **Extraction**: Strip markdown fences, flatten to one line
//! 4. **Validation**: Refuse anything that is not a lone, safe SELECT
//! 5. **Execution**: Run inside a read-only transaction with a row cap
//!
//! The generator is untrusted: only statements that survive stage 4
//! ever reach the database, and those run under a server-side
//! statement timeout with results bounded by the configured cap.

pub mod executor;
pub mod extract;
pub mod gateway;
pub mod generation;
pub mod prompt;
pub mod types;
pub mod validate;

// Re-export the pieces the rest of the crate wires together
pub use executor::QueryExecutor;
pub use gateway::{NlQueryGateway, NlQueryOutcome};
pub use generation::{GeminiClient, TextGenerator};
pub use types::{ExecutionResult, GatewayError, RejectReason};
pub use validate::ValidatedStatement;
