//! The operation registry: a statically declared, closed catalog of every
//! operation the dispatcher may invoke. The intent prompt is generated from
//! the same entries, so the model's menu and the dispatcher's allow-list
//! cannot drift apart.

/// Semantic kind of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Name of a column in the current table.
    Column,
    /// A literal (string or number) compared against cell values.
    Value,
    /// One of add, subtract, multiply, divide.
    Action,
    /// One of inner, left, right, outer.
    JoinType,
    /// One of sum, average, min, max, count.
    AggFunc,
    /// true or false.
    Flag,
}

#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

const fn req(name: &'static str, kind: ParamKind) -> Param {
    Param { name, kind, required: true }
}

const fn opt(name: &'static str, kind: ParamKind) -> Param {
    Param { name, kind, required: false }
}

/// What shape an operation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Table,
    Scalar,
    Text,
}

/// One registry entry. `summary` and `example` feed the intent prompt
/// verbatim; the rest drives dispatch validation.
#[derive(Debug, Clone, Copy)]
pub struct OperationSpec {
    pub name: &'static str,
    pub params: &'static [Param],
    /// Trailing column parameter repeats (unpivot_table takes 1+ columns).
    pub variadic: bool,
    /// Operation reads the secondary table slot (joins).
    pub needs_secondary: bool,
    /// Operation calls the language model itself (sentiment).
    pub needs_model: bool,
    pub result: ResultKind,
    pub summary: &'static str,
    pub example: &'static str,
}

impl OperationSpec {
    pub fn min_args(&self) -> usize {
        self.params.iter().filter(|p| p.required).count()
    }

    pub fn max_args(&self) -> Option<usize> {
        if self.variadic {
            None
        } else {
            Some(self.params.len())
        }
    }
}

pub const OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        name: "math_single",
        params: &[req("action", ParamKind::Action), req("column", ParamKind::Column)],
        variadic: false,
        needs_secondary: false,
        needs_model: false,
        result: ResultKind::Table,
        summary: "apply add/subtract/multiply/divide to a numeric column against itself, adding column <column>_<action>",
        example: "math_single(multiply, Salary)",
    },
    OperationSpec {
        name: "math_pair",
        params: &[
            req("action", ParamKind::Action),
            req("column_a", ParamKind::Column),
            req("column_b", ParamKind::Column),
        ],
        variadic: false,
        needs_secondary: false,
        needs_model: false,
        result: ResultKind::Table,
        summary: "elementwise math between two numeric columns, adding column <a>_<action>_<b>",
        example: "math_pair(subtract, Revenue, Cost)",
    },
    OperationSpec {
        name: "summary",
        params: &[],
        variadic: false,
        needs_secondary: false,
        needs_model: false,
        result: ResultKind::Table,
        summary: "sum, average, min and max for every numeric column",
        example: "summary()",
    },
    OperationSpec {
        name: "sum_with_filter",
        params: &[req("column", ParamKind::Column), req("value", ParamKind::Value)],
        variadic: false,
        needs_secondary: false,
        needs_model: false,
        result: ResultKind::Scalar,
        summary: "sum of a column over rows where any cell equals the value",
        example: "sum_with_filter(Salary, \"IT\")",
    },
    OperationSpec {
        name: "avg_with_filter",
        params: &[req("column", ParamKind::Column), req("value", ParamKind::Value)],
        variadic: false,
        needs_secondary: false,
        needs_model: false,
        result: ResultKind::Scalar,
        summary: "average of a column over rows where any cell equals the value",
        example: "avg_with_filter(Salary, \"IT\")",
    },
    OperationSpec {
        name: "overall_average",
        params: &[req("column", ParamKind::Column)],
        variadic: false,
        needs_secondary: false,
        needs_model: false,
        result: ResultKind::Scalar,
        summary: "average of a numeric column over all rows",
        example: "overall_average(Salary)",
    },
    OperationSpec {
        name: "filter_rows",
        params: &[
            req("column", ParamKind::Column),
            req("value", ParamKind::Value),
            opt("drop_nulls", ParamKind::Flag),
        ],
        variadic: false,
        needs_secondary: false,
        needs_model: false,
        result: ResultKind::Table,
        summary: "rows where the column equals the value; drop_nulls (default true) also removes rows containing any null",
        example: "filter_rows(Department, \"IT\")",
    },
    OperationSpec {
        name: "join_tables",
        params: &[
            req("join_type", ParamKind::JoinType),
            opt("on_column", ParamKind::Column),
        ],
        variadic: false,
        needs_secondary: true,
        needs_model: false,
        result: ResultKind::Table,
        summary: "join the primary table with the secondary table; without on_column the common columns are used as keys",
        example: "join_tables(inner, id)",
    },
    OperationSpec {
        name: "pivot_table",
        params: &[
            req("index", ParamKind::Column),
            req("columns", ParamKind::Column),
            req("values", ParamKind::Column),
            opt("aggfunc", ParamKind::AggFunc),
        ],
        variadic: false,
        needs_secondary: false,
        needs_model: false,
        result: ResultKind::Table,
        summary: "pivot: one row per index value, one column per distinct value of 'columns', aggregating 'values' (default sum)",
        example: "pivot_table(Department, Year, Salary, sum)",
    },
    OperationSpec {
        name: "unpivot_table",
        params: &[req("value_column", ParamKind::Column)],
        variadic: true,
        needs_secondary: false,
        needs_model: false,
        result: ResultKind::Table,
        summary: "melt the given value columns into 'variable'/'value' rows, keeping the other columns as identifiers",
        example: "unpivot_table(Q1, Q2, Q3)",
    },
    OperationSpec {
        name: "date_parts",
        params: &[req("date_column", ParamKind::Column)],
        variadic: false,
        needs_secondary: false,
        needs_model: false,
        result: ResultKind::Table,
        summary: "add year/month/day columns extracted from a date column; unparsable dates become null",
        example: "date_parts(HireDate)",
    },
    OperationSpec {
        name: "date_diff",
        params: &[
            req("start_column", ParamKind::Column),
            req("end_column", ParamKind::Column),
            req("result_column", ParamKind::Column),
        ],
        variadic: false,
        needs_secondary: false,
        needs_model: false,
        result: ResultKind::Table,
        summary: "add a column with the day difference end - start; unparsable dates become null",
        example: "date_diff(StartDate, EndDate, Duration)",
    },
    OperationSpec {
        name: "sentiment",
        params: &[req("text_column", ParamKind::Column)],
        variadic: false,
        needs_secondary: false,
        needs_model: true,
        result: ResultKind::Text,
        summary: "classify the sentiment of a text column via the language model",
        example: "sentiment(Feedback)",
    },
];

/// Strict registry lookup. Anything not returned here is never executed.
pub fn lookup(name: &str) -> Option<&'static OperationSpec> {
    OPERATIONS.iter().find(|op| op.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        for (i, a) in OPERATIONS.iter().enumerate() {
            for b in &OPERATIONS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        assert!(lookup("math_single").is_some());
        assert!(lookup("join_tables").unwrap().needs_secondary);
        assert!(lookup("sentiment").unwrap().needs_model);
        assert!(lookup("open").is_none());
        assert!(lookup("import").is_none());
        assert!(lookup("MATH_SINGLE").is_none(), "lookup is case-sensitive");
    }

    #[test]
    fn test_arity_bounds() {
        let filter = lookup("filter_rows").unwrap();
        assert_eq!(filter.min_args(), 2);
        assert_eq!(filter.max_args(), Some(3));

        let unpivot = lookup("unpivot_table").unwrap();
        assert_eq!(unpivot.min_args(), 1);
        assert_eq!(unpivot.max_args(), None);

        let summary = lookup("summary").unwrap();
        assert_eq!(summary.min_args(), 0);
        assert_eq!(summary.max_args(), Some(0));
    }

    #[test]
    fn test_required_params_precede_optional() {
        for op in OPERATIONS {
            let mut seen_optional = false;
            for p in op.params {
                if !p.required {
                    seen_optional = true;
                } else {
                    assert!(!seen_optional, "{}: required after optional", op.name);
                }
            }
        }
    }
}
