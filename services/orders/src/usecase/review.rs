use tracing::info;

use sitemart_domain::id::{ProductId, UserId};

use crate::domain::repository::{OrderRepository, ReviewRepository};
use crate::domain::types::{NewReview, Review};
use crate::error::OrdersServiceError;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
/// Longer comments are rejected rather than truncated.
pub const MAX_COMMENT_CHARS: usize = 2000;

pub struct CreateReviewInput {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: i64,
    pub comment_text: Option<String>,
}

/// Lets a buyer rate a site once, after one of their orders for it settled.
pub struct CreateReviewUseCase<O: OrderRepository, R: ReviewRepository> {
    pub orders: O,
    pub reviews: R,
}

impl<O: OrderRepository, R: ReviewRepository> CreateReviewUseCase<O, R> {
    pub async fn execute(&self, input: CreateReviewInput) -> Result<Review, OrdersServiceError> {
        let rating = validate_rating(input.rating)?;
        let comment_text = normalize_comment(input.comment_text)?;

        if !self
            .orders
            .has_settled_order(input.user_id, input.product_id)
            .await?
        {
            return Err(OrdersServiceError::ReviewNotAllowed);
        }
        if self.reviews.exists(input.user_id, input.product_id).await? {
            return Err(OrdersServiceError::AlreadyReviewed);
        }

        // a concurrent duplicate still fails on the unique index
        let review = self
            .reviews
            .insert(&NewReview {
                user_id: input.user_id,
                product_id: input.product_id,
                rating,
                comment_text,
            })
            .await?;

        info!(
            review_id = %review.id,
            user_id = %review.user_id,
            product_id = %review.product_id,
            rating = review.rating,
            "review created"
        );
        Ok(review)
    }
}

fn validate_rating(rating: i64) -> Result<i16, OrdersServiceError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(OrdersServiceError::invalid(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    i16::try_from(rating).map_err(|_| OrdersServiceError::invalid("rating out of range"))
}

fn normalize_comment(comment: Option<String>) -> Result<Option<String>, OrdersServiceError> {
    let Some(text) = comment else {
        return Ok(None);
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if text.chars().count() > MAX_COMMENT_CHARS {
        return Err(OrdersServiceError::invalid(format!(
            "comment must be at most {MAX_COMMENT_CHARS} characters"
        )));
    }
    Ok(Some(text.to_owned()))
}
