use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::query::QueryError;

/// One parsed data-grid request.
///
/// The wire shape follows the server-driven grid protocol: the sort column
/// arrives as an index into the client's column list plus a
/// `columns[<i>][data]` entry naming the attribute, resolved here so the
/// engine only ever sees an attribute name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableQuery {
    /// Client request sequence token, echoed back verbatim.
    pub draw: u64,
    pub start: usize,
    pub length: usize,
    pub search: String,
    pub sort_by: String,
    pub ascending: bool,
    pub grouping: bool,
}

impl TableQuery {
    /// Parse the flat query-parameter map of a data-grid request. Any
    /// missing or mistyped required parameter aborts the request before it
    /// touches the registry.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, QueryError> {
        let draw = parse_int::<u64>(params, "draw")?;
        let start = parse_int::<usize>(params, "start")?;
        let length = parse_int::<usize>(params, "length")?;
        if length == 0 {
            return Err(QueryError::malformed("length", "page size must be > 0"));
        }

        let search = params
            .get("search[value]")
            .map(String::as_str)
            .unwrap_or("")
            .to_string();

        let column = parse_int::<usize>(params, "order[0][column]")?;
        let sort_by = required(params, &format!("columns[{column}][data]"))?.to_string();
        let ascending = required(params, "order[0][dir]")? == "asc";

        let grouping = match required(params, "grouping")? {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(QueryError::malformed(
                    "grouping",
                    format!("expected a boolean, got '{other}'"),
                ));
            }
        };

        Ok(Self {
            draw,
            start,
            length,
            search,
            sort_by,
            ascending,
            grouping,
        })
    }
}

fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, QueryError> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| QueryError::malformed(name, "missing required parameter"))
}

fn parse_int<T: std::str::FromStr>(
    params: &HashMap<String, String>,
    name: &str,
) -> Result<T, QueryError> {
    required(params, name)?
        .parse::<T>()
        .map_err(|_| QueryError::malformed(name, "expected an integer"))
}
