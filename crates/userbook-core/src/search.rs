//! Search and sort criteria for listing users.

use crate::User;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Columns a user listing may be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Id,
    FirstName,
    LastName,
    Email,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// All accepted values, in the form clients send them.
    pub const ACCEPTED: [&'static str; 6] = [
        "id",
        "first_name",
        "last_name",
        "email",
        "created_at",
        "updated_at",
    ];

    /// Returns the column name on the `users` table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "first_name" => Ok(Self::FirstName),
            "last_name" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            other => Err(format!("Unknown sort field: {}", other)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Applies the direction to an ascending ordering.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("Unknown sort direction: {}", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Criteria for a paginated user search.
///
/// A user matches a term when ANY of first name, last name, email,
/// address city or address country contains it, ignoring case. The five
/// predicates are one disjunction; backends must not narrow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSearch {
    term: Option<String>,
    pub sort_by: SortField,
    pub sort_direction: SortDirection,
}

impl UserSearch {
    /// Creates search criteria with the default ordering (`id desc`).
    ///
    /// Blank terms are treated as no term at all.
    #[must_use]
    pub fn new(term: Option<String>) -> Self {
        Self {
            term: term
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            sort_by: SortField::default(),
            sort_direction: SortDirection::default(),
        }
    }

    /// Sets the ordering.
    #[must_use]
    pub fn sorted(mut self, sort_by: SortField, sort_direction: SortDirection) -> Self {
        self.sort_by = sort_by;
        self.sort_direction = sort_direction;
        self
    }

    /// Returns the normalized search term.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Returns a `LIKE` pattern that matches the term literally as a substring.
    ///
    /// `\`, `%` and `_` are escaped with a backslash.
    #[must_use]
    pub fn like_pattern(&self) -> Option<String> {
        self.term.as_ref().map(|term| {
            let mut pattern = String::with_capacity(term.len() + 2);
            pattern.push('%');
            for c in term.to_lowercase().chars() {
                if matches!(c, '\\' | '%' | '_') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }

    /// Returns true if the user satisfies the search term.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let Some(term) = self.term.as_deref() else {
            return true;
        };
        let needle = term.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        contains(&user.first_name)
            || contains(&user.last_name)
            || contains(&user.email)
            || user
                .address
                .as_ref()
                .is_some_and(|a| contains(&a.city) || contains(&a.country))
    }

    /// Orders two users by the requested field and direction, ties broken by id.
    #[must_use]
    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        let primary = match self.sort_by {
            SortField::Id => a.id.cmp(&b.id),
            SortField::FirstName => a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()),
            SortField::LastName => a.last_name.to_lowercase().cmp(&b.last_name.to_lowercase()),
            SortField::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        self.sort_direction.apply(primary.then_with(|| a.id.cmp(&b.id)))
    }
}
