//! List query extractor.

use serde::Deserialize;
use userbook_config::PaginationConfig;
use userbook_core::{
    FieldError, PageRequest, SortDirection, SortField, UserSearch, UserbookError, UserbookResult,
};
use utoipa::IntoParams;

const SEARCH_MAX_LENGTH: usize = 255;

/// Query string of the user list endpoint.
///
/// Values arrive as raw strings so every problem can be reported as a field
/// error at once. Blank values count as absent.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Page number, starting at 1.
    #[param(value_type = Option<u32>, minimum = 1)]
    pub page: Option<String>,
    /// Items per page.
    #[param(value_type = Option<u32>, minimum = 1)]
    pub per_page: Option<String>,
    /// Case-insensitive substring matched against names, email, city and country.
    pub search: Option<String>,
    /// One of id, first_name, last_name, email, created_at, updated_at.
    pub sort_by: Option<String>,
    /// asc or desc.
    pub sort_direction: Option<String>,
}

impl ListUsersQuery {
    /// Validates the query and turns it into repository criteria.
    pub fn into_criteria(
        self,
        pagination: &PaginationConfig,
    ) -> UserbookResult<(PageRequest, UserSearch)> {
        let mut errors = Vec::new();

        let page = match present(&self.page) {
            None => 1,
            Some(raw) => match raw.parse::<u32>() {
                Ok(page) if page >= 1 => page,
                Ok(_) => {
                    errors.push(error("page", "min", "The page field must be at least 1."));
                    1
                }
                Err(_) => {
                    errors.push(error("page", "integer", "The page field must be an integer."));
                    1
                }
            },
        };

        let per_page = match present(&self.per_page) {
            None => pagination.per_page_default,
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if (1..=pagination.per_page_max).contains(&n) => n,
                Ok(_) => {
                    errors.push(error(
                        "per_page",
                        "between",
                        format!(
                            "The per page field must be between 1 and {}.",
                            pagination.per_page_max
                        ),
                    ));
                    pagination.per_page_default
                }
                Err(_) => {
                    errors.push(error(
                        "per_page",
                        "integer",
                        "The per page field must be an integer.",
                    ));
                    pagination.per_page_default
                }
            },
        };

        let sort_by = match present(&self.sort_by) {
            None => SortField::default(),
            Some(raw) => raw.parse::<SortField>().unwrap_or_else(|_| {
                errors.push(error("sort_by", "in", "The selected sort by is invalid."));
                SortField::default()
            }),
        };

        let sort_direction = match present(&self.sort_direction) {
            None => SortDirection::default(),
            Some(raw) => raw.parse::<SortDirection>().unwrap_or_else(|_| {
                errors.push(error(
                    "sort_direction",
                    "in",
                    "The selected sort direction is invalid.",
                ));
                SortDirection::default()
            }),
        };

        if self
            .search
            .as_deref()
            .is_some_and(|s| s.chars().count() > SEARCH_MAX_LENGTH)
        {
            errors.push(error(
                "search",
                "max",
                "The search field must not be greater than 255 characters.",
            ));
        }

        if !errors.is_empty() {
            return Err(UserbookError::Validation(errors));
        }

        let search = UserSearch::new(self.search).sorted(sort_by, sort_direction);
        Ok((PageRequest::new(page, per_page), search))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn error(field: &str, code: &str, message: impl Into<String>) -> FieldError {
    FieldError {
        field: field.to_string(),
        message: message.into(),
        code: code.to_string(),
    }
}
