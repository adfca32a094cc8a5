use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sitemart_auth_types::principal::Principal;
use sitemart_core::serde::to_rfc3339_ms;
use sitemart_domain::id::{ProductId, ReviewId, UserId};

use crate::domain::types::Review;
use crate::error::OrdersServiceError;
use crate::state::AppState;
use crate::usecase::review::{CreateReviewInput, CreateReviewUseCase};

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: ReviewId,
    pub user_id: UserId,
    pub site_id: ProductId,
    pub rating: i16,
    pub comment_text: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            site_id: review.product_id,
            rating: review.rating,
            comment_text: review.comment_text,
            created_at: review.created_at,
        }
    }
}

/// `POST /orders/{site_id}/review`
pub async fn create_review(
    State(state): State<AppState>,
    principal: Principal,
    Path(site_id): Path<ProductId>,
    WithRejection(Json(body), _): WithRejection<Json<ReviewRequest>, OrdersServiceError>,
) -> Result<(StatusCode, Json<ReviewResponse>), OrdersServiceError> {
    let usecase = CreateReviewUseCase {
        orders: state.order_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase
        .execute(CreateReviewInput {
            user_id: principal.user_id,
            product_id: site_id,
            rating: body.rating,
            comment_text: body.comment_text,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}
