use crate::DatabaseError;
use alloy_primitives::B256;

/// This module contains the chunk database model.
pub mod chunk;

/// This module contains the L2 block database model.
pub mod l2_block;

/// Converts the provided value into a database integer.
pub(crate) fn to_i64(value: u64) -> Result<i64, DatabaseError> {
    i64::try_from(value).map_err(|_| DatabaseError::IntegerOverflow(value))
}

/// Converts the provided persisted bytes into a [`B256`].
pub(crate) fn to_b256(bytes: &[u8], field: &'static str) -> Result<B256, DatabaseError> {
    B256::try_from(bytes).map_err(|err| DatabaseError::invalid_data(field, err))
}
