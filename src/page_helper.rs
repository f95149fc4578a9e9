use serde::{Deserialize, Serialize};

use crate::error_handler::ApiError;

/// `skip`/`limit` pagination. `D` is both the default and the largest accepted limit.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct PageQuery<const D: i64> {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl<const D: i64> PageQuery<D> {
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(D)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.skip() < 0 {
            return Err(ApiError::request_validation(
                "skip debe ser mayor o igual a 0",
            ));
        }
        if !(1..=D).contains(&self.limit()) {
            return Err(ApiError::request_validation(&format!(
                "limit debe estar entre 1 y {}",
                D
            )));
        }
        Ok(())
    }
}
