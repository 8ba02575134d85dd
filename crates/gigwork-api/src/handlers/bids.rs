//! Bid API handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use gigwork_models::BidId;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// Hire confirmation response.
#[derive(Serialize)]
pub struct HireResponse {
    pub message: String,
    pub gig_id: String,
    pub bid_id: String,
}

/// Hire the freelancer behind a bid (owner only).
pub async fn hire_bid(
    State(state): State<AppState>,
    Path(bid_id): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<HireResponse>> {
    let bid_id = BidId::from_string(bid_id);
    let receipt = state.hire.hire(&bid_id, &user.uid).await?;

    Ok(Json(HireResponse {
        message: "Freelancer hired successfully".to_string(),
        gig_id: receipt.gig_id.to_string(),
        bid_id: receipt.bid_id.to_string(),
    }))
}
