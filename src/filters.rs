// src/filters.rs

//! Pagination and sorting filters shared by every list endpoint.
//!
//! A request's raw `page`, `page_size` and `sort` parameters are parsed into a
//! [`QueryFilterSpec`], which only yields usable paging values once
//! [`QueryFilterSpec::validate`] succeeds. The sort key is resolved against the
//! endpoint's [`SortSafelist`], so the column and direction handed to the
//! storage layer are always one of the endpoint's declared options and never
//! client text.

// dependencies
use crate::errors::FilterConfigError;
use crate::metadata::Metadata;
use crate::query::QueryParams;
use crate::validator::ValidationErrors;
use serde::Serialize;
use std::fmt;

pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "page_size";
pub const SORT_PARAM: &str = "sort";

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Keeps `page * page_size` well inside 32-bit range.
pub const MAX_PAGE: i64 = 10_000_000;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Column always appended to the ordering so paging is deterministic.
const TIEBREAK_COLUMN: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Split a client-facing key into column and direction: `-title` is
/// `title` descending.
fn split_key(key: &str) -> (&str, SortDirection) {
    match key.strip_prefix('-') {
        Some(column) => (column, SortDirection::Desc),
        None => (key, SortDirection::Asc),
    }
}

/// One permitted ordering: a column/direction pair, written by clients as
/// `column` or `-column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortOption {
    column: &'static str,
    direction: SortDirection,
}

impl SortOption {
    fn parse(key: &'static str) -> Result<Self, FilterConfigError> {
        let (column, direction) = split_key(key);
        let is_identifier = !column.is_empty()
            && column
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !is_identifier {
            return Err(FilterConfigError::InvalidSortKey(key));
        }
        Ok(Self { column, direction })
    }

    /// The key a client sends to select this option.
    pub fn key(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.column.to_owned(),
            SortDirection::Desc => format!("-{}", self.column),
        }
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// The closed set of orderings an endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSafelist {
    options: Vec<SortOption>,
}

impl SortSafelist {
    /// Build from explicit keys; a leading `-` marks a descending key.
    pub fn new(keys: &[&'static str]) -> Result<Self, FilterConfigError> {
        if keys.is_empty() {
            return Err(FilterConfigError::EmptySafelist);
        }
        let options = keys
            .iter()
            .map(|&key| SortOption::parse(key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { options })
    }

    /// Allow every column in both directions: `a, b` gives `a, b, -a, -b`.
    pub fn symmetric(columns: &[&'static str]) -> Result<Self, FilterConfigError> {
        if columns.is_empty() {
            return Err(FilterConfigError::EmptySafelist);
        }
        let mut options = Vec::with_capacity(columns.len() * 2);
        for &column in columns {
            let option = SortOption::parse(column)?;
            if option.direction == SortDirection::Desc {
                return Err(FilterConfigError::InvalidSortKey(column));
            }
            options.push(option);
        }
        for &column in columns {
            options.push(SortOption {
                column,
                direction: SortDirection::Desc,
            });
        }
        Ok(Self { options })
    }

    /// The option whose key matches `sort` exactly, if any.
    pub fn resolve(&self, sort: &str) -> Option<SortOption> {
        let (column, direction) = split_key(sort);
        self.options
            .iter()
            .copied()
            .find(|option| option.column == column && option.direction == direction)
    }

    pub fn contains(&self, sort: &str) -> bool {
        self.resolve(sort).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.options.iter().map(SortOption::key)
    }

    pub fn first(&self) -> SortOption {
        // construction rejects empty safelists
        self.options[0]
    }
}

/// Per-endpoint defaults applied when a parameter is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDefaults {
    page: i64,
    page_size: i64,
    sort: String,
    safelist: SortSafelist,
}

impl FilterDefaults {
    /// Page 1 of 10 rows, sorted by the safelist's first key.
    pub fn new(safelist: SortSafelist) -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: safelist.first().key(),
            safelist,
        }
    }

    /// Builder-style: set the default page
    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    /// Builder-style: set the default page size
    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Builder-style: set the default sort key
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn safelist(&self) -> &SortSafelist {
        &self.safelist
    }

    /// Check that the defaults themselves would pass request validation.
    pub fn validate(&self) -> Result<(), FilterConfigError> {
        if !(1..=MAX_PAGE).contains(&self.page) {
            return Err(FilterConfigError::InvalidDefaultPage(self.page));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(FilterConfigError::InvalidDefaultPageSize(self.page_size));
        }
        if !self.safelist.contains(&self.sort) {
            return Err(FilterConfigError::DefaultSortNotAllowed(self.sort.clone()));
        }
        Ok(())
    }
}

/// Paging and sorting as requested by the client, not yet trusted.
#[derive(Debug, Clone)]
pub struct QueryFilterSpec<'a> {
    page: i64,
    page_size: i64,
    sort: String,
    safelist: &'a SortSafelist,
    parse_errors: ValidationErrors,
}

impl<'a> QueryFilterSpec<'a> {
    /// Read `page`, `page_size` and `sort`, falling back to `defaults`.
    /// Non-numeric values are remembered and reported by `validate`.
    ///
    /// `defaults` must have passed [`FilterDefaults::validate`]; debug builds
    /// panic otherwise, since a bad default would surface as a client error.
    pub fn parse(params: &QueryParams, defaults: &'a FilterDefaults) -> Self {
        debug_assert!(
            defaults.validate().is_ok(),
            "filter defaults must be validated at startup: {:?}",
            defaults.validate()
        );
        let mut parse_errors = ValidationErrors::new();
        let page = params.integer(PAGE_PARAM, defaults.page, &mut parse_errors);
        let page_size = params.integer(PAGE_SIZE_PARAM, defaults.page_size, &mut parse_errors);
        let sort = params.string(SORT_PARAM, &defaults.sort);
        Self {
            page,
            page_size,
            sort,
            safelist: &defaults.safelist,
            parse_errors,
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn sort(&self) -> &str {
        &self.sort
    }

    /// Check every rule and report all violations together.
    pub fn validate(&self) -> Result<ValidatedFilters, ValidationErrors> {
        let mut errors = self.parse_errors.clone();

        errors.check(self.page > 0, PAGE_PARAM, "must be greater than zero");
        errors.check(self.page <= MAX_PAGE, PAGE_PARAM, "must be a maximum of 10 million");
        errors.check(self.page_size > 0, PAGE_SIZE_PARAM, "must be greater than zero");
        errors.check(self.page_size <= MAX_PAGE_SIZE, PAGE_SIZE_PARAM, "must be a maximum of 100");

        let sort = self.safelist.resolve(&self.sort);
        errors.check(sort.is_some(), SORT_PARAM, "invalid sort value");

        match (sort, errors.is_empty()) {
            (Some(sort), true) => Ok(ValidatedFilters {
                // both bounded by the checks above
                page: self.page as u32,
                page_size: self.page_size as u32,
                sort,
            }),
            _ => {
                tracing::debug!(failures = errors.len(), "query filters rejected");
                Err(errors)
            }
        }
    }
}

/// Filters that passed validation; the only source of ordering and paging
/// values for the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedFilters {
    page: u32,
    page_size: u32,
    sort: SortOption,
}

impl ValidatedFilters {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    /// Bare column name, without the `-` prefix.
    pub fn sort_column(&self) -> &'static str {
        self.sort.column
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort.direction
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// `ORDER BY` body, e.g. `title DESC, id ASC`.
    pub fn order_by_clause(&self) -> String {
        if self.sort.column == TIEBREAK_COLUMN {
            format!("{} {}", self.sort.column, self.sort.direction)
        } else {
            format!(
                "{} {}, {} ASC",
                self.sort.column, self.sort.direction, TIEBREAK_COLUMN
            )
        }
    }

    /// Pagination metadata for a result set of `total_records` rows.
    pub fn metadata(&self, total_records: u64) -> Metadata {
        Metadata::compute(total_records, self.page, self.page_size)
    }
}
