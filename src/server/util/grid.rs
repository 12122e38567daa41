//! Grid query language for list endpoints: paging, filtering and sorting.
//!
//! Filters are written as `field op value` conditions joined by `,` (and) or `|` (or),
//! where `,` binds tighter than `|`. Supported operators:
//!
//! | op   | meaning          |
//! |------|------------------|
//! | `=`  | equals           |
//! | `!=` | not equals       |
//! | `=*` | contains         |
//! | `!*` | does not contain |
//! | `^`  | starts with      |
//! | `$`  | ends with        |
//! | `>` `<` `>=` `<=` | comparison |
//!
//! A backslash escapes the next character inside a value, so `name=a\,b` matches
//! the literal `a,b`. An empty value with `=` matches null or empty text.
//!
//! Ordering is `field [asc|desc]` separated by commas. Every list declares the
//! fields it exposes; anything else is rejected with a `GridError`.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    sea_query::LikeExpr, ColumnTrait, Condition, EntityTrait, Order, QueryFilter, QueryOrder,
    Select,
};
use thiserror::Error;
use uuid::Uuid;

use crate::model::api::GridParams;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Larger page sizes are clamped to this.
pub const MAX_PAGE_SIZE: u64 = 1000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Malformed filter condition '{0}'")]
    MalformedCondition(String),

    #[error("Operator '{operator}' is not supported for field '{field}'")]
    UnsupportedOperator { field: String, operator: String },

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidValue { field: String, value: String },

    #[error("Invalid order by clause '{0}'")]
    InvalidOrder(String),

    #[error("Page {0} is out of range")]
    PageOutOfRange(u64),
}

/// How a field's filter value is parsed and which operators it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Uuid,
    Number,
    Date,
    Bool,
    /// Stored as text but only compared for equality.
    Enum,
}

/// Field exposed to grid queries, mapped to a database column.
#[derive(Debug, Clone, Copy)]
pub struct GridField<C> {
    pub name: &'static str,
    pub column: C,
    pub kind: FieldKind,
}

impl<C> GridField<C> {
    pub const fn new(name: &'static str, column: C, kind: FieldKind) -> Self {
        Self { name, column, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Operator {
    /// Two-character tokens come first so `!=` is not read as `!` followed by `=`.
    const TOKENS: [(&'static str, Operator); 10] = [
        ("!=", Operator::Ne),
        ("!*", Operator::NotContains),
        ("=*", Operator::Contains),
        (">=", Operator::Ge),
        ("<=", Operator::Le),
        ("=", Operator::Eq),
        ("^", Operator::StartsWith),
        ("$", Operator::EndsWith),
        (">", Operator::Gt),
        ("<", Operator::Lt),
    ];

    fn token(&self) -> &'static str {
        Self::TOKENS
            .iter()
            .find(|(_, op)| op == self)
            .map(|(token, _)| *token)
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub field: String,
    pub operator: Operator,
    pub value: String,
}

/// Normalised 1-based page and page size whose row offset fits a SQL `OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// Page 0 becomes 1, a missing or zero page size becomes 10 and sizes above
    /// `MAX_PAGE_SIZE` are clamped.
    ///
    /// # Returns
    /// - `Err(GridError::PageOutOfRange)` - Offset of the page overflows
    pub fn new(page: Option<u64>, page_size: Option<u64>) -> Result<Self, GridError> {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let page_size = page_size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);

        match (page - 1).checked_mul(page_size) {
            Some(offset) if offset <= i64::MAX as u64 => Ok(Self { page, page_size }),
            _ => Err(GridError::PageOutOfRange(page)),
        }
    }

    /// 1-based page number.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// 0-based page index for `Paginator::fetch_page`.
    pub fn page_index(&self) -> u64 {
        self.page - 1
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of rows before the page.
    pub fn offset(&self) -> u64 {
        self.page_index() * self.page_size
    }
}

/// Parsed and validated grid query for one list.
#[derive(Debug, Clone)]
pub struct GridQuery<C> {
    request: PageRequest,
    condition: Option<Condition>,
    order: Vec<(C, Order)>,
}

impl<C: ColumnTrait> GridQuery<C> {
    /// Validates `params` against the fields the list exposes.
    ///
    /// # Returns
    /// - `Ok(GridQuery)` - Page normalised, filter and order resolved to columns
    /// - `Err(GridError)` - Unknown field, malformed condition, bad value, order clause
    ///   or page out of range
    pub fn parse(params: &GridParams, fields: &[GridField<C>]) -> Result<Self, GridError> {
        let request = PageRequest::new(params.page, params.page_size)?;

        let condition = match params.filter.as_deref().map(str::trim) {
            Some(filter) if !filter.is_empty() => {
                let mut any = Condition::any();
                for group in parse_filter(filter)? {
                    let mut all = Condition::all();
                    for condition in group {
                        let field = find_field(fields, &condition.field)?;
                        all = all.add(build_condition(field, condition.operator, &condition.value)?);
                    }
                    any = any.add(all);
                }
                Some(any)
            }
            _ => None,
        };

        let order = match params.order_by.as_deref().map(str::trim) {
            Some(order_by) if !order_by.is_empty() => parse_order(order_by, fields)?,
            _ => Vec::new(),
        };

        Ok(Self {
            request,
            condition,
            order,
        })
    }

    pub fn page(&self) -> u64 {
        self.request.page()
    }

    pub fn page_index(&self) -> u64 {
        self.request.page_index()
    }

    pub fn page_size(&self) -> u64 {
        self.request.page_size()
    }

    /// Adds the filter and requested ordering to a select.
    ///
    /// Callers append their default ordering afterwards; it then acts as a tie-breaker.
    pub fn apply<E: EntityTrait<Column = C>>(&self, select: Select<E>) -> Select<E> {
        let mut select = match &self.condition {
            Some(condition) => select.filter(condition.clone()),
            None => select,
        };

        for (column, order) in &self.order {
            select = select.order_by(*column, order.clone());
        }

        select
    }
}

/// `LIKE` pattern matching rows that contain `text` literally.
pub fn contains_literal(text: &str) -> LikeExpr {
    literal_like("%", text, "%")
}

pub fn starts_with_literal(text: &str) -> LikeExpr {
    literal_like("", text, "%")
}

pub fn ends_with_literal(text: &str) -> LikeExpr {
    literal_like("%", text, "")
}

/// `%`, `_` and `\` in `text` are escaped so they only match themselves.
fn literal_like(prefix: &str, text: &str, suffix: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(prefix.len() + text.len() + suffix.len());
    pattern.push_str(prefix);
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push_str(suffix);

    LikeExpr::new(pattern).escape('\\')
}

/// Splits a filter into OR-groups of AND-ed conditions.
pub fn parse_filter(filter: &str) -> Result<Vec<Vec<FilterCondition>>, GridError> {
    let mut groups = Vec::new();
    let mut group = Vec::new();
    let mut current = String::new();
    // Escaped characters are marked so the operator search skips them.
    let mut escaped_from: Option<usize> = None;
    let mut chars = filter.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if escaped_from.is_none() {
                    escaped_from = Some(current.len());
                }
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' | '|' => {
                group.push(parse_condition(&current, escaped_from)?);
                current.clear();
                escaped_from = None;
                if c == '|' {
                    groups.push(std::mem::take(&mut group));
                }
            }
            _ => current.push(c),
        }
    }

    group.push(parse_condition(&current, escaped_from)?);
    groups.push(group);

    Ok(groups)
}

fn parse_condition(raw: &str, escaped_from: Option<usize>) -> Result<FilterCondition, GridError> {
    let malformed = || GridError::MalformedCondition(raw.trim().to_string());

    let leading = raw.len() - raw.trim_start().len();
    let text = &raw[leading..];

    let field_len = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(text.len());
    if field_len == 0 || escaped_from.is_some_and(|at| at < leading + field_len) {
        return Err(malformed());
    }

    let field = &text[..field_len];
    let rest = text[field_len..].trim_start();

    let (token, operator) = Operator::TOKENS
        .iter()
        .find(|(token, _)| rest.starts_with(token))
        .ok_or_else(malformed)?;

    Ok(FilterCondition {
        field: field.to_string(),
        operator: *operator,
        value: rest[token.len()..].trim_end().to_string(),
    })
}

fn parse_order<C: Copy>(order_by: &str, fields: &[GridField<C>]) -> Result<Vec<(C, Order)>, GridError> {
    order_by
        .split(',')
        .map(|clause| {
            let mut parts = clause.split_whitespace();
            let name = parts
                .next()
                .ok_or_else(|| GridError::InvalidOrder(clause.trim().to_string()))?;
            let field = find_field(fields, name)?;

            let order = match parts.next().map(|d| d.to_ascii_lowercase()).as_deref() {
                None | Some("asc") => Order::Asc,
                Some("desc") => Order::Desc,
                Some(_) => return Err(GridError::InvalidOrder(clause.trim().to_string())),
            };

            if parts.next().is_some() {
                return Err(GridError::InvalidOrder(clause.trim().to_string()));
            }

            Ok((field.column, order))
        })
        .collect()
}

fn find_field<'f, C>(fields: &'f [GridField<C>], name: &str) -> Result<&'f GridField<C>, GridError> {
    fields
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| GridError::UnknownField(name.to_string()))
}

fn build_condition<C: ColumnTrait>(
    field: &GridField<C>,
    operator: Operator,
    value: &str,
) -> Result<Condition, GridError> {
    let col = field.column;
    let unsupported = || GridError::UnsupportedOperator {
        field: field.name.to_string(),
        operator: operator.token().to_string(),
    };
    let invalid = || GridError::InvalidValue {
        field: field.name.to_string(),
        value: value.to_string(),
    };

    let condition = match field.kind {
        FieldKind::Text => match operator {
            Operator::Eq if value.is_empty() => Condition::any().add(col.is_null()).add(col.eq("")),
            Operator::Ne if value.is_empty() => {
                Condition::all().add(col.is_not_null()).add(col.ne(""))
            }
            Operator::Eq => Condition::all().add(col.eq(value)),
            Operator::Ne => Condition::any().add(col.ne(value)).add(col.is_null()),
            Operator::Contains => Condition::all().add(col.like(contains_literal(value))),
            Operator::NotContains => Condition::any()
                .add(col.not_like(contains_literal(value)))
                .add(col.is_null()),
            Operator::StartsWith => Condition::all().add(col.like(starts_with_literal(value))),
            Operator::EndsWith => Condition::all().add(col.like(ends_with_literal(value))),
            Operator::Gt => Condition::all().add(col.gt(value)),
            Operator::Lt => Condition::all().add(col.lt(value)),
            Operator::Ge => Condition::all().add(col.gte(value)),
            Operator::Le => Condition::all().add(col.lte(value)),
        },
        FieldKind::Enum => match operator {
            Operator::Eq => Condition::all().add(col.eq(value)),
            Operator::Ne => Condition::any().add(col.ne(value)).add(col.is_null()),
            _ => return Err(unsupported()),
        },
        FieldKind::Uuid => {
            let id = Uuid::parse_str(value).map_err(|_| invalid())?;
            match operator {
                Operator::Eq => Condition::all().add(col.eq(id)),
                Operator::Ne => Condition::any().add(col.ne(id)).add(col.is_null()),
                _ => return Err(unsupported()),
            }
        }
        FieldKind::Bool => {
            let flag = match value.to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => return Err(invalid()),
            };
            match operator {
                Operator::Eq => Condition::all().add(col.eq(flag)),
                Operator::Ne => Condition::all().add(col.ne(flag)),
                _ => return Err(unsupported()),
            }
        }
        FieldKind::Number => {
            let number: i64 = value.parse().map_err(|_| invalid())?;
            match operator {
                Operator::Eq => Condition::all().add(col.eq(number)),
                Operator::Ne => Condition::any().add(col.ne(number)).add(col.is_null()),
                Operator::Gt => Condition::all().add(col.gt(number)),
                Operator::Lt => Condition::all().add(col.lt(number)),
                Operator::Ge => Condition::all().add(col.gte(number)),
                Operator::Le => Condition::all().add(col.lte(number)),
                _ => return Err(unsupported()),
            }
        }
        FieldKind::Date => match parse_date(value).ok_or_else(invalid)? {
            DateValue::Instant(at) => match operator {
                Operator::Eq => Condition::all().add(col.eq(at)),
                Operator::Ne => Condition::any().add(col.ne(at)).add(col.is_null()),
                Operator::Gt => Condition::all().add(col.gt(at)),
                Operator::Lt => Condition::all().add(col.lt(at)),
                Operator::Ge => Condition::all().add(col.gte(at)),
                Operator::Le => Condition::all().add(col.lte(at)),
                _ => return Err(unsupported()),
            },
            // A bare date covers the whole UTC day.
            DateValue::Day(start, end) => match operator {
                Operator::Eq => Condition::all().add(col.gte(start)).add(col.lt(end)),
                Operator::Ne => Condition::any()
                    .add(col.lt(start))
                    .add(col.gte(end))
                    .add(col.is_null()),
                Operator::Gt => Condition::all().add(col.gte(end)),
                Operator::Lt => Condition::all().add(col.lt(start)),
                Operator::Ge => Condition::all().add(col.gte(start)),
                Operator::Le => Condition::all().add(col.lt(end)),
                _ => return Err(unsupported()),
            },
        },
    };

    Ok(condition)
}

enum DateValue {
    Instant(DateTime<Utc>),
    Day(DateTime<Utc>, DateTime<Utc>),
}

fn parse_date(value: &str) -> Option<DateValue> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(DateValue::Instant(at.with_timezone(&Utc)));
    }

    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .ok()?;
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = start.checked_add_days(Days::new(1))?;

    Some(DateValue::Day(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::tenant::Column;
    use sea_orm::{DbBackend, QueryTrait};

    const TENANT_FIELDS: &[GridField<Column>] = &[
        GridField::new("id", Column::Id, FieldKind::Uuid),
        GridField::new("name", Column::Name, FieldKind::Text),
        GridField::new("divisionEnabled", Column::DivisionEnabled, FieldKind::Bool),
        GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
    ];

    fn params(filter: Option<&str>, order_by: Option<&str>) -> GridParams {
        GridParams {
            page: None,
            page_size: None,
            order_by: order_by.map(str::to_string),
            filter: filter.map(str::to_string),
        }
    }

    fn sql(params: &GridParams) -> String {
        let grid = GridQuery::parse(params, TENANT_FIELDS).unwrap();
        grid.apply(entity::prelude::Tenant::find())
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn splits_or_groups_of_and_conditions() {
        let groups = parse_filter("name=*acme,divisionEnabled=true|name^beta").unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0][0].operator, Operator::Contains);
        assert_eq!(groups[0][1].field, "divisionEnabled");
        assert_eq!(groups[1][0].operator, Operator::StartsWith);
        assert_eq!(groups[1][0].value, "beta");
    }

    #[test]
    fn reads_two_character_operators() {
        let ops: Vec<Operator> = ["a!=1", "a!*1", "a=*1", "a>=1", "a<=1", "a>1", "a<1", "a$1"]
            .iter()
            .map(|f| parse_filter(f).unwrap()[0][0].operator)
            .collect();

        assert_eq!(
            ops,
            vec![
                Operator::Ne,
                Operator::NotContains,
                Operator::Contains,
                Operator::Ge,
                Operator::Le,
                Operator::Gt,
                Operator::Lt,
                Operator::EndsWith,
            ]
        );
    }

    #[test]
    fn unescapes_separators_in_values() {
        let groups = parse_filter(r"name=a\,b\|c\\d").unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0][0].value, r"a,b|c\d");
    }

    #[test]
    fn rejects_condition_without_operator() {
        assert!(matches!(
            parse_filter("name"),
            Err(GridError::MalformedCondition(_))
        ));
        assert!(matches!(
            parse_filter("=value"),
            Err(GridError::MalformedCondition(_))
        ));
    }

    #[test]
    fn rejects_unknown_field() {
        let result = GridQuery::parse(&params(Some("password=x"), None), TENANT_FIELDS);
        assert_eq!(result.unwrap_err(), GridError::UnknownField("password".into()));
    }

    #[test]
    fn rejects_unparseable_values_and_operators() {
        let bad_bool = GridQuery::parse(&params(Some("divisionEnabled=maybe"), None), TENANT_FIELDS);
        assert!(matches!(bad_bool, Err(GridError::InvalidValue { .. })));

        let bad_uuid = GridQuery::parse(&params(Some("id=123"), None), TENANT_FIELDS);
        assert!(matches!(bad_uuid, Err(GridError::InvalidValue { .. })));

        let bad_op = GridQuery::parse(&params(Some("divisionEnabled=*true"), None), TENANT_FIELDS);
        assert!(matches!(bad_op, Err(GridError::UnsupportedOperator { .. })));
    }

    #[test]
    fn rejects_bad_order_direction() {
        let result = GridQuery::parse(&params(None, Some("name sideways")), TENANT_FIELDS);
        assert!(matches!(result, Err(GridError::InvalidOrder(_))));
    }

    #[test]
    fn builds_filter_and_order_sql() {
        let sql = sql(&params(Some("name=*acme|divisionEnabled=true"), Some("name desc")));

        assert!(sql.contains(r#""tenant"."name" LIKE '%acme%'"#), "{}", sql);
        assert!(sql.contains(" OR "), "{}", sql);
        assert!(sql.contains(r#"ORDER BY "tenant"."name" DESC"#), "{}", sql);
    }

    #[test]
    fn field_names_match_case_insensitively() {
        let sql = sql(&params(Some("NAME^ac"), Some("CreatedDate")));

        assert!(sql.contains(r#""tenant"."name" LIKE 'ac%'"#), "{}", sql);
        assert!(sql.contains(r#"ORDER BY "tenant"."created_date" ASC"#), "{}", sql);
    }

    #[test]
    fn normalizes_page_defaults() {
        let pages = [
            PageRequest::new(None, None).unwrap(),
            PageRequest::new(Some(0), Some(0)).unwrap(),
            PageRequest::new(Some(3), Some(25)).unwrap(),
        ];

        assert_eq!((pages[0].page(), pages[0].page_size()), (1, 10));
        assert_eq!((pages[1].page(), pages[1].page_size()), (1, 10));
        assert_eq!((pages[2].page(), pages[2].page_size()), (3, 25));
        assert_eq!(pages[2].offset(), 50);
    }

    #[test]
    fn clamps_page_size() {
        let request = PageRequest::new(Some(2), Some(u64::MAX)).unwrap();

        assert_eq!(request.page_size(), MAX_PAGE_SIZE);
        assert_eq!(request.offset(), MAX_PAGE_SIZE);
    }

    #[test]
    fn rejects_page_whose_offset_overflows() {
        assert_eq!(
            PageRequest::new(Some(u64::MAX / 2), Some(10)),
            Err(GridError::PageOutOfRange(u64::MAX / 2))
        );
        assert!(PageRequest::new(Some(u64::MAX), Some(1)).is_err());

        let grid = GridQuery::parse(
            &GridParams {
                page: Some(u64::MAX / 2),
                page_size: Some(10),
                order_by: None,
                filter: None,
            },
            TENANT_FIELDS,
        );
        assert!(matches!(grid, Err(GridError::PageOutOfRange(_))));
    }

    #[test]
    fn text_patterns_declare_escape_character() {
        let sql = sql(&params(Some("name=*50%|name^a|name$b|name!*c"), None));

        assert_eq!(sql.matches("ESCAPE").count(), 4, "{}", sql);
    }

    #[test]
    fn bare_date_covers_whole_day() {
        let grid = GridQuery::parse(&params(Some("createdDate=2024-05-01"), None), TENANT_FIELDS);
        assert!(grid.is_ok());

        let us_format = GridQuery::parse(&params(Some("createdDate>05/01/2024"), None), TENANT_FIELDS);
        assert!(us_format.is_ok());
    }
}
