use crate::{
    core::type_tag::TypeTag,
    pagination::{cursor::Cursor, error::PaginationError},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const DEFAULT_LIMIT: usize = 100;
pub const DEFAULT_KEY_COLUMN: &str = "id";

/// Order the caller wants to see rows in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseOrder {
    Ascending,
    #[default]
    Descending,
}

impl BaseOrder {
    pub fn flip(self) -> Self {
        match self {
            BaseOrder::Ascending => BaseOrder::Descending,
            BaseOrder::Descending => BaseOrder::Ascending,
        }
    }
}

impl FromStr for BaseOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(BaseOrder::Ascending),
            "desc" | "descending" => Ok(BaseOrder::Descending),
            other => Err(format!("Unknown order: {other}")),
        }
    }
}

/// Traversal direction of a request, derived from which cursor it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
    None,
}

/// One column of the ordering key together with its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyColumn {
    pub name: String,
    pub tag: TypeTag,
}

impl KeyColumn {
    pub fn new(name: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            tag,
        }
    }

    fn validate(&self) -> Result<(), PaginationError> {
        let name = self.name.as_str();
        if name.trim().is_empty() || name.contains([',', ':']) {
            return Err(PaginationError::InvalidKeyColumn(name.to_string()));
        }
        Ok(())
    }
}

/// Parses `name[:tag]`; the tag defaults to `number`.
impl FromStr for KeyColumn {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, tag) = match s.split_once(':') {
            Some((name, tag)) => {
                let tag = tag
                    .parse::<TypeTag>()
                    .map_err(|_| PaginationError::InvalidKeyColumn(s.to_string()))?;
                (name.trim(), tag)
            }
            None => (s.trim(), TypeTag::Number),
        };

        let column = KeyColumn::new(name, tag);
        column.validate()?;
        Ok(column)
    }
}

impl fmt::Display for KeyColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

/// Ordered, non-empty list of columns that defines the total order of a page.
///
/// The last column should be unique (usually the primary key); without a
/// tiebreaker rows sharing every key value may be skipped or repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationKeys(Vec<KeyColumn>);

impl PaginationKeys {
    pub fn new(columns: Vec<KeyColumn>) -> Result<Self, PaginationError> {
        if columns.is_empty() {
            return Err(PaginationError::MissingKeyColumns);
        }
        for column in &columns {
            column.validate()?;
        }
        Ok(Self(columns))
    }

    /// Parses a comma-separated key spec such as `created_at:date,id:number`.
    pub fn parse(spec: &str) -> Result<Self, PaginationError> {
        let columns = spec
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<KeyColumn>, _>>()?;
        Self::new(columns)
    }

    pub fn columns(&self) -> &[KeyColumn] {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<&KeyColumn> {
        self.0.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyColumn> {
        self.0.iter()
    }
}

impl Default for PaginationKeys {
    fn default() -> Self {
        Self(vec![KeyColumn::new(DEFAULT_KEY_COLUMN, TypeTag::Number)])
    }
}

impl<'a> IntoIterator for &'a PaginationKeys {
    type Item = &'a KeyColumn;
    type IntoIter = std::slice::Iter<'a, KeyColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A validated, immutable page request.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    keys: PaginationKeys,
    after: Option<Cursor>,
    before: Option<Cursor>,
    limit: usize,
    order: BaseOrder,
    alias: Option<String>,
    with_count: bool,
}

impl PageRequest {
    pub fn builder() -> PageRequestBuilder {
        PageRequestBuilder::new()
    }

    pub fn keys(&self) -> &PaginationKeys {
        &self.keys
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn order(&self) -> BaseOrder {
        self.order
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn with_count(&self) -> bool {
        self.with_count
    }

    pub fn after_cursor(&self) -> Option<&Cursor> {
        self.after.as_ref()
    }

    pub fn before_cursor(&self) -> Option<&Cursor> {
        self.before.as_ref()
    }

    /// `after` wins when both cursors are present.
    pub fn direction(&self) -> Direction {
        match (&self.after, &self.before) {
            (Some(_), _) => Direction::Forward,
            (None, Some(_)) => Direction::Backward,
            (None, None) => Direction::None,
        }
    }

    /// The cursor honored for this request, if any.
    pub fn active_cursor(&self) -> Option<&Cursor> {
        self.after.as_ref().or(self.before.as_ref())
    }
}

pub struct PageRequestBuilder {
    keys: Option<PaginationKeys>,
    after: Option<Cursor>,
    before: Option<Cursor>,
    limit: usize,
    order: BaseOrder,
    alias: Option<String>,
    with_count: bool,
}

impl PageRequestBuilder {
    pub fn new() -> Self {
        PageRequestBuilder {
            keys: None,
            after: None,
            before: None,
            limit: DEFAULT_LIMIT,
            order: BaseOrder::default(),
            alias: None,
            with_count: false,
        }
    }

    pub fn keys(mut self, keys: PaginationKeys) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn after(mut self, cursor: Option<Cursor>) -> Self {
        self.after = cursor.filter(|c| !c.is_empty());
        self
    }

    pub fn before(mut self, cursor: Option<Cursor>) -> Self {
        self.before = cursor.filter(|c| !c.is_empty());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn order(mut self, order: BaseOrder) -> Self {
        self.order = order;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_count(mut self, with_count: bool) -> Self {
        self.with_count = with_count;
        self
    }

    pub fn build(self) -> Result<PageRequest, PaginationError> {
        if self.limit == 0 {
            return Err(PaginationError::InvalidLimit(self.limit));
        }

        Ok(PageRequest {
            keys: self.keys.unwrap_or_default(),
            after: self.after,
            before: self.before,
            limit: self.limit,
            order: self.order,
            alias: self.alias,
            with_count: self.with_count,
        })
    }
}

impl Default for PageRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
