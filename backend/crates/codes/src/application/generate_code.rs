//! Generate Code Use Case
//!
//! Mints a random code value and inserts it. The value is drawn without
//! any uniqueness coordination; the database unique index arbitrates,
//! and a collision gets a fresh draw up to the configured attempt count.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::CodesConfig;
use crate::domain::entity::code::Code;
use crate::domain::repository::CodeRepository;
use crate::domain::services;
use crate::error::{CodeError, CodeResult};

/// Generate input
pub struct GenerateInput {
    /// Points the code will be worth
    pub points: i32,
    /// Minting admin
    pub created_by: i64,
}

/// Generate code use case
pub struct GenerateCodeUseCase<R>
where
    R: CodeRepository,
{
    repo: Arc<R>,
    config: Arc<CodesConfig>,
}

impl<R> GenerateCodeUseCase<R>
where
    R: CodeRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<CodesConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: GenerateInput) -> CodeResult<Code> {
        if input.points <= 0 {
            return Err(CodeError::InvalidPoints);
        }

        let now = Utc::now();
        if self.config.promo_ended(now) {
            return Err(CodeError::PromoEnded);
        }

        for attempt in 1..=self.config.generation_attempts {
            let value = services::generate_code_value(self.config.code_length);
            let code = Code::mint(
                value,
                input.points,
                input.created_by,
                now,
                self.config.code_ttl(),
            );

            match self.repo.insert(&code).await {
                Ok(()) => {
                    tracing::info!(
                        code = %code.value,
                        points = code.points,
                        created_by = input.created_by,
                        "Code generated"
                    );
                    return Ok(code);
                }
                Err(CodeError::ValueCollision) => {
                    tracing::debug!(attempt, "Code value collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(CodeError::GenerationExhausted)
    }
}
