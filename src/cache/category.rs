use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Logical resource class. Each one has its own TTL and per-window request budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Prices,
    News,
    Calendar,
    Analysis,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Prices,
        Category::News,
        Category::Calendar,
        Category::Analysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Prices => "prices",
            Category::News => "news",
            Category::Calendar => "calendar",
            Category::Analysis => "analysis",
        }
    }

    fn index(self) -> usize {
        match self {
            Category::Prices => 0,
            Category::News => 1,
            Category::Calendar => 2,
            Category::Analysis => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CategoryError::Unknown(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("unknown cache category `{0}`")]
    Unknown(String),
    #[error("no policy configured for category `{0}`")]
    Missing(Category),
    #[error("invalid policy for category `{category}`: {reason}")]
    InvalidPolicy {
        category: Category,
        reason: &'static str,
    },
}

/// Cache lifetime and request budget for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPolicy {
    pub ttl: Duration,
    pub limit_per_window: u32,
}

impl CategoryPolicy {
    pub const fn new(ttl_secs: u64, limit_per_window: u32) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            limit_per_window,
        }
    }

    pub fn ttl_millis(&self) -> i64 {
        self.ttl.as_millis() as i64
    }
}

/// Rate-limit window length
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Validated category -> policy table. Every category is present once construction succeeds,
/// so lookups by [`Category`] cannot fail.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: [CategoryPolicy; 4],
    window: Duration,
}

impl PolicyTable {
    /// Build a table from explicit entries. Every category must appear with a non-zero TTL and limit.
    pub fn new(
        entries: impl IntoIterator<Item = (Category, CategoryPolicy)>,
        window: Duration,
    ) -> Result<Self, CategoryError> {
        let mut slots: [Option<CategoryPolicy>; 4] = [None; 4];
        for (category, policy) in entries {
            if policy.ttl.is_zero() {
                return Err(CategoryError::InvalidPolicy {
                    category,
                    reason: "ttl must be greater than zero",
                });
            }
            if policy.limit_per_window == 0 {
                return Err(CategoryError::InvalidPolicy {
                    category,
                    reason: "limit must be greater than zero",
                });
            }
            slots[category.index()] = Some(policy);
        }

        let mut policies = [CategoryPolicy::new(0, 0); 4];
        for category in Category::ALL {
            policies[category.index()] =
                slots[category.index()].ok_or(CategoryError::Missing(category))?;
        }

        if window.is_zero() {
            return Err(CategoryError::InvalidPolicy {
                category: Category::Prices,
                reason: "rate-limit window must be greater than zero",
            });
        }

        Ok(Self { policies, window })
    }

    /// prices 30s/60, news 5min/12, calendar 10min/6, analysis 30min/20, per 60s window
    pub fn standard() -> Self {
        Self {
            policies: [
                CategoryPolicy::new(30, 60),
                CategoryPolicy::new(5 * 60, 12),
                CategoryPolicy::new(10 * 60, 6),
                CategoryPolicy::new(30 * 60, 20),
            ],
            window: DEFAULT_WINDOW,
        }
    }

    /// Same policies with a different window length
    pub fn with_window(self, window: Duration) -> Result<Self, CategoryError> {
        Self::new(
            Category::ALL.into_iter().map(|c| (c, self.policy(c))),
            window,
        )
    }

    pub fn policy(&self, category: Category) -> CategoryPolicy {
        self.policies[category.index()]
    }

    /// Lookup by raw name. Names outside the table are an error, never a default.
    pub fn lookup(&self, name: &str) -> Result<(Category, CategoryPolicy), CategoryError> {
        let category = name.parse::<Category>()?;
        Ok((category, self.policy(category)))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn window_millis(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_matches_published_limits() {
        let table = PolicyTable::standard();
        assert_eq!(table.policy(Category::Prices), CategoryPolicy::new(30, 60));
        assert_eq!(table.policy(Category::News), CategoryPolicy::new(300, 12));
        assert_eq!(table.policy(Category::Calendar).ttl_millis(), 600_000);
        assert_eq!(table.policy(Category::Calendar).limit_per_window, 6);
        assert_eq!(table.policy(Category::Analysis), CategoryPolicy::new(1800, 20));
        assert_eq!(table.window(), Duration::from_secs(60));
    }

    #[test]
    fn unknown_category_name_is_rejected() {
        let table = PolicyTable::standard();
        assert_eq!(
            table.lookup("crypto"),
            Err(CategoryError::Unknown("crypto".to_string()))
        );
        assert!("Prices".parse::<Category>().is_err());
        assert_eq!(table.lookup("news").map(|(c, _)| c), Ok(Category::News));
    }

    #[test]
    fn incomplete_table_fails_at_construction() {
        let err = PolicyTable::new(
            [
                (Category::Prices, CategoryPolicy::new(30, 60)),
                (Category::News, CategoryPolicy::new(300, 12)),
            ],
            DEFAULT_WINDOW,
        )
        .unwrap_err();
        assert_eq!(err, CategoryError::Missing(Category::Calendar));
    }

    #[test]
    fn zero_ttl_or_limit_is_invalid() {
        let zero_ttl = PolicyTable::new(
            [(Category::News, CategoryPolicy::new(0, 12))],
            DEFAULT_WINDOW,
        );
        assert!(matches!(
            zero_ttl,
            Err(CategoryError::InvalidPolicy {
                category: Category::News,
                ..
            })
        ));

        let zero_limit = PolicyTable::new(
            [(Category::Calendar, CategoryPolicy::new(600, 0))],
            DEFAULT_WINDOW,
        );
        assert!(matches!(
            zero_limit,
            Err(CategoryError::InvalidPolicy {
                category: Category::Calendar,
                ..
            })
        ));
    }

    #[test]
    fn window_can_be_overridden() {
        let table = PolicyTable::standard()
            .with_window(Duration::from_secs(30))
            .unwrap();
        assert_eq!(table.window_millis(), 30_000);
        assert_eq!(table.policy(Category::Prices).limit_per_window, 60);
        assert!(PolicyTable::standard().with_window(Duration::ZERO).is_err());
    }
}
