//! HTTP Handlers

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use kernel::context::CurrentUser;

use crate::application::config::CodesConfig;
use crate::application::generate_code::{GenerateCodeUseCase, GenerateInput};
use crate::application::notifier::LeaderboardNotifier;
use crate::application::queries::{CodeHistoryQuery, LeaderboardQuery};
use crate::application::redeem_code::{RedeemCodeUseCase, RedeemInput};
use crate::domain::repository::CodeRepository;
use crate::error::CodeError;
use crate::presentation::dto::{
    CodeHistoryItemDto, GenerateCodeRequest, GenerateCodeResponse, LeaderboardEntryDto,
    RedeemCodeRequest, RedeemCodeResponse,
};

/// Shared state for codes handlers
#[derive(Clone)]
pub struct CodesAppState<R>
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<CodesConfig>,
    pub notifier: Arc<LeaderboardNotifier>,
}

/// POST /codes/redeem
///
/// Redeems a code for the authenticated caller, then pushes a fresh
/// leaderboard snapshot to every live subscriber.
pub async fn redeem_code<R>(
    State(state): State<CodesAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<RedeemCodeRequest>,
) -> Result<Json<RedeemCodeResponse>, CodeError>
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    let use_case = RedeemCodeUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(RedeemInput {
            code_value: payload.code,
            telegram_id: current.telegram_id,
        })
        .await?;

    broadcast_leaderboard(&state).await;

    Ok(Json(RedeemCodeResponse {
        balance: output.balance,
        message: "Points credited".to_string(),
    }))
}

/// GET /codes/leaderboard
pub async fn leaderboard<R>(
    State(state): State<CodesAppState<R>>,
) -> Result<Json<Vec<LeaderboardEntryDto>>, CodeError>
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    let entries = LeaderboardQuery::new(state.repo.clone(), state.config.clone())
        .execute()
        .await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// POST /codes/admin/generate
pub async fn generate_code<R>(
    State(state): State<CodesAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<GenerateCodeRequest>,
) -> Result<Json<GenerateCodeResponse>, CodeError>
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    let use_case = GenerateCodeUseCase::new(state.repo.clone(), state.config.clone());
    let code = use_case
        .execute(GenerateInput {
            points: payload.points,
            created_by: current.telegram_id,
        })
        .await?;

    Ok(Json(code.into()))
}

/// GET /codes/admin/history
pub async fn code_history<R>(
    State(state): State<CodesAppState<R>>,
) -> Result<Json<Vec<CodeHistoryItemDto>>, CodeError>
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    let entries = CodeHistoryQuery::new(state.repo.clone(), state.config.clone())
        .execute()
        .await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Recompute the snapshot once and fan it out. Failures are logged and
/// stay here; the redemption already committed.
pub(crate) async fn broadcast_leaderboard<R>(state: &CodesAppState<R>)
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    let query = LeaderboardQuery::new(state.repo.clone(), state.config.clone());
    match query.execute().await {
        Ok(entries) => {
            let snapshot: Vec<LeaderboardEntryDto> = entries.into_iter().map(Into::into).collect();
            state.notifier.broadcast(&snapshot);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Leaderboard refresh after redemption failed");
        }
    }
}
