//! Offset/limit pagination
//!
//! Pagination windows the primary-key-ordered match sequence and never
//! reorders it. An unset limit returns everything after the offset.

use crate::config::EngineConfig;

use super::errors::{ExecutorError, ExecutorResult};

/// Validated pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    offset: usize,
    limit: Option<usize>,
}

impl Pagination {
    /// Validates `offset` in `[0, max_offset]` and `limit` in `[1, max_limit]`
    pub fn new(offset: Option<i64>, limit: Option<i64>, config: &EngineConfig) -> ExecutorResult<Self> {
        let offset = match offset {
            None => 0,
            Some(v) if (0..=config.max_offset).contains(&v) => v as usize,
            Some(v) => return Err(ExecutorError::invalid_range("offset", v, 0, config.max_offset)),
        };

        let limit = match limit {
            None => None,
            Some(v) if (1..=config.max_limit).contains(&v) => Some(v as usize),
            Some(v) => return Err(ExecutorError::invalid_range("limit", v, 1, config.max_limit)),
        };

        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Applies the window to an ordered sequence
    pub fn apply<I: IntoIterator>(&self, items: I) -> impl Iterator<Item = I::Item> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorErrorCode;

    fn page(offset: Option<i64>, limit: Option<i64>) -> ExecutorResult<Vec<u32>> {
        let pagination = Pagination::new(offset, limit, &EngineConfig::default())?;
        Ok(pagination.apply(0..10u32).collect())
    }

    #[test]
    fn test_defaults_return_everything() {
        assert_eq!(page(None, None).unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_window() {
        assert_eq!(page(Some(1), Some(2)).unwrap(), vec![1, 2]);
        assert_eq!(page(Some(8), Some(5)).unwrap(), vec![8, 9]);
        assert_eq!(page(Some(20), None).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_offset_only_is_suffix() {
        assert_eq!(page(Some(3), None).unwrap(), (3..10).collect::<Vec<_>>());
        assert_eq!(page(Some(3), None).unwrap(), page(Some(3), Some(7)).unwrap());
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(page(Some(0), Some(1)).is_ok());
        assert!(page(Some(16384), Some(16384)).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        let err = page(Some(-1), None).unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::InvalidRange);
        assert_eq!(
            err.message(),
            "offset [-1] is invalid, should be in range [0, 16384], but got -1"
        );

        let err = page(None, Some(0)).unwrap_err();
        assert!(err.message().contains("limit [0]"));
        assert!(err.message().contains("[1, 16384]"));

        assert!(page(Some(16385), None).is_err());
        assert!(page(None, Some(16385)).is_err());
    }

    #[test]
    fn test_bounds_follow_config() {
        let config = EngineConfig {
            max_limit: 10,
            ..EngineConfig::default()
        };
        let err = Pagination::new(None, Some(11), &config).unwrap_err();
        assert!(err.message().contains("[1, 10]"));
    }
}
