//! Entry pagination parameters.
//!
//! `page` and `pageSize` are mutually defaulting: supplying one without
//! the other fills the missing one with 1 / 10. Non-numeric or `< 1`
//! values are a hard validation failure, never a silent clamp.

use serde::Serialize;

/// Default page when only `pageSize` is supplied (or neither).
pub const DEFAULT_PAGE: u64 = 1;

/// Default page size when only `page` is supplied (or neither).
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Sort order over entry `createdAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Validated pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPage {
    pub page: u64,
    pub page_size: u64,
    pub order: SortOrder,
}

/// One rejected query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamIssue {
    pub param: String,
    pub message: String,
}

/// Parse raw query-string values into an `EntryPage`.
pub fn parse_entry_page(
    page: Option<&str>,
    page_size: Option<&str>,
    order: Option<&str>,
) -> Result<EntryPage, Vec<ParamIssue>> {
    let mut issues = Vec::new();

    let page = match page {
        None => DEFAULT_PAGE,
        Some(raw) => parse_positive(raw, "page", &mut issues),
    };
    let page_size = match page_size {
        None => DEFAULT_PAGE_SIZE,
        Some(raw) => parse_positive(raw, "pageSize", &mut issues),
    };
    let order = match order {
        None => SortOrder::Desc,
        Some("asc") => SortOrder::Asc,
        Some("desc") => SortOrder::Desc,
        Some(other) => {
            issues.push(ParamIssue {
                param: "order".into(),
                message: format!("must be 'asc' or 'desc', got '{other}'"),
            });
            SortOrder::Desc
        }
    };

    if !issues.is_empty() {
        return Err(issues);
    }
    Ok(EntryPage {
        page,
        page_size,
        order,
    })
}

fn parse_positive(raw: &str, param: &str, issues: &mut Vec<ParamIssue>) -> u64 {
    match raw.parse::<i64>() {
        Ok(n) if n >= 1 => n as u64,
        Ok(n) => {
            issues.push(ParamIssue {
                param: param.into(),
                message: format!("must be >= 1, got {n}"),
            });
            1
        }
        Err(_) => {
            issues.push(ParamIssue {
                param: param.into(),
                message: format!("must be a positive integer, got '{raw}'"),
            });
            1
        }
    }
}
