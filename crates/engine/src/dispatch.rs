//! The dispatcher: a narrow, allow-listed interpreter over the registry.
//!
//! Model output is untrusted text. It is parsed into a single call
//! expression, the callee is resolved strictly against the registry, and
//! positional arguments are bound against the declared parameter list before
//! anything executes. Nothing here ever evaluates text as code, and no
//! identifier outside the registry and the table's columns means anything.

use sheetquery_core::{Table, Value};

use crate::call::{self, Arg};
use crate::error::EngineError;
use crate::model::TextModel;
use crate::ops::{self, OpOutput};
use crate::registry::{self, OperationSpec};
use crate::store::{Slot, TableStore};

/// Parse and execute `raw` against the primary table.
pub fn dispatch(
    store: &TableStore,
    raw: &str,
    model: Option<&dyn TextModel>,
) -> Result<OpOutput, EngineError> {
    dispatch_on(store, Slot::Primary, raw, model)
}

/// Parse and execute `raw` against the table in `slot`.
pub fn dispatch_on(
    store: &TableStore,
    slot: Slot,
    raw: &str,
    model: Option<&dyn TextModel>,
) -> Result<OpOutput, EngineError> {
    let expr = call::parse(raw).map_err(EngineError::Argument)?;

    let spec = registry::lookup(&expr.name)
        .ok_or_else(|| EngineError::UnknownOperation(expr.name.clone()))?;

    check_arity(spec, expr.args.len())?;

    let table = store.get(slot).ok_or(EngineError::MissingTable {
        slot: slot.as_str(),
    })?;

    let model = if spec.needs_model {
        Some(model.ok_or_else(|| {
            EngineError::Upstream("no language model configured".to_string())
        })?)
    } else {
        None
    };

    invoke(spec, store, &table, &expr.args, model)
}

fn check_arity(spec: &OperationSpec, got: usize) -> Result<(), EngineError> {
    let min = spec.min_args();
    let ok = match spec.max_args() {
        Some(max) => got >= min && got <= max,
        None => got >= min,
    };
    if !ok {
        let expected = match (spec.max_args(), min) {
            (Some(max), min) if max == min => format!("{min}"),
            (Some(max), min) => format!("{min} to {max}"),
            (None, min) => format!("at least {min}"),
        };
        return Err(EngineError::Argument(format!(
            "{} expects {expected} argument(s), got {got}",
            spec.name
        )));
    }
    Ok(())
}

fn invoke(
    spec: &OperationSpec,
    store: &TableStore,
    table: &Table,
    args: &[Arg],
    model: Option<&dyn TextModel>,
) -> Result<OpOutput, EngineError> {
    match spec.name {
        "math_single" => {
            let action = action_arg(&args[0])?;
            let column = column_arg(spec.name, "column", &args[1])?;
            ops::math::math_single(table, action, &column).map(OpOutput::Table)
        }
        "math_pair" => {
            let action = action_arg(&args[0])?;
            let a = column_arg(spec.name, "column_a", &args[1])?;
            let b = column_arg(spec.name, "column_b", &args[2])?;
            ops::math::math_pair(table, action, &a, &b).map(OpOutput::Table)
        }
        "summary" => ops::aggregate::summary_report(table).map(OpOutput::Table),
        "sum_with_filter" => {
            let column = column_arg(spec.name, "column", &args[0])?;
            let value = value_arg(&args[1]);
            ops::aggregate::sum_with_filter(table, &column, &value).map(OpOutput::Scalar)
        }
        "avg_with_filter" => {
            let column = column_arg(spec.name, "column", &args[0])?;
            let value = value_arg(&args[1]);
            ops::aggregate::avg_with_filter(table, &column, &value).map(OpOutput::Scalar)
        }
        "overall_average" => {
            let column = column_arg(spec.name, "column", &args[0])?;
            ops::aggregate::overall_average(table, &column).map(OpOutput::Scalar)
        }
        "filter_rows" => {
            let column = column_arg(spec.name, "column", &args[0])?;
            let value = value_arg(&args[1]);
            let drop_nulls = match args.get(2) {
                Some(arg) => flag_arg("drop_nulls", arg)?,
                None => true,
            };
            ops::filter::filter_rows(table, &column, &value, drop_nulls).map(OpOutput::Table)
        }
        "join_tables" => {
            let join_type = join_type_arg(&args[0])?;
            let on = match args.get(1) {
                Some(arg) => Some(column_arg(spec.name, "on_column", arg)?),
                None => None,
            };
            let secondary = store.get(Slot::Secondary).ok_or(EngineError::MissingTable {
                slot: Slot::Secondary.as_str(),
            })?;
            ops::join::join_tables(table, &secondary, join_type, on.as_deref())
                .map(OpOutput::Table)
        }
        "pivot_table" => {
            let index = column_arg(spec.name, "index", &args[0])?;
            let columns = column_arg(spec.name, "columns", &args[1])?;
            let values = column_arg(spec.name, "values", &args[2])?;
            let aggfunc = match args.get(3) {
                Some(arg) => aggfunc_arg(arg)?,
                None => ops::reshape::AggFunc::Sum,
            };
            ops::reshape::pivot(table, &index, &columns, &values, aggfunc).map(OpOutput::Table)
        }
        "unpivot_table" => {
            let columns: Vec<String> = args
                .iter()
                .map(|a| column_arg(spec.name, "value_column", a))
                .collect::<Result<_, _>>()?;
            ops::reshape::unpivot(table, &columns).map(OpOutput::Table)
        }
        "date_parts" => {
            let column = column_arg(spec.name, "date_column", &args[0])?;
            ops::dates::date_parts(table, &column).map(OpOutput::Table)
        }
        "date_diff" => {
            let start = column_arg(spec.name, "start_column", &args[0])?;
            let end = column_arg(spec.name, "end_column", &args[1])?;
            let result = column_arg(spec.name, "result_column", &args[2])?;
            ops::dates::date_diff(table, &start, &end, &result).map(OpOutput::Table)
        }
        "sentiment" => {
            let column = column_arg(spec.name, "text_column", &args[0])?;
            let model = model.ok_or_else(|| {
                EngineError::Upstream("no language model configured".to_string())
            })?;
            ops::sentiment::sentiment(table, &column, model).map(OpOutput::Text)
        }
        other => Err(EngineError::UnknownOperation(other.to_string())),
    }
}

// ── Argument binding ────────────────────────────────────────────────

fn column_arg(op: &'static str, param: &str, arg: &Arg) -> Result<String, EngineError> {
    match arg {
        Arg::Ident(s) | Arg::Text(s) => Ok(s.clone()),
        Arg::Number(n) => Err(EngineError::Argument(format!(
            "{op}: parameter '{param}' expects a column name, got the number {n}"
        ))),
    }
}

fn value_arg(arg: &Arg) -> Value {
    match arg {
        Arg::Text(s) | Arg::Ident(s) => Value::Text(s.clone()),
        Arg::Number(n) => Value::Number(*n),
    }
}

fn flag_arg(param: &str, arg: &Arg) -> Result<bool, EngineError> {
    match arg {
        Arg::Ident(s) | Arg::Text(s) => match s.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(EngineError::Argument(format!(
                "parameter '{param}' expects true or false, got '{other}'"
            ))),
        },
        Arg::Number(n) => Err(EngineError::Argument(format!(
            "parameter '{param}' expects true or false, got {n}"
        ))),
    }
}

fn action_arg(arg: &Arg) -> Result<ops::math::MathAction, EngineError> {
    let s = enum_text("action", arg)?;
    ops::math::MathAction::from_str(&s).ok_or_else(|| {
        EngineError::Argument(format!(
            "unsupported action '{s}' (choose add, subtract, multiply, divide)"
        ))
    })
}

fn join_type_arg(arg: &Arg) -> Result<ops::join::JoinType, EngineError> {
    let s = enum_text("join_type", arg)?;
    ops::join::JoinType::from_str(&s).ok_or_else(|| {
        EngineError::Argument(format!(
            "unsupported join type '{s}' (choose inner, left, right, outer)"
        ))
    })
}

fn aggfunc_arg(arg: &Arg) -> Result<ops::reshape::AggFunc, EngineError> {
    let s = enum_text("aggfunc", arg)?;
    ops::reshape::AggFunc::from_str(&s).ok_or_else(|| {
        EngineError::Argument(format!(
            "unsupported aggregation '{s}' (choose sum, average, min, max, count)"
        ))
    })
}

fn enum_text(param: &str, arg: &Arg) -> Result<String, EngineError> {
    match arg {
        Arg::Ident(s) | Arg::Text(s) => Ok(s.clone()),
        Arg::Number(n) => Err(EngineError::Argument(format!(
            "parameter '{param}' expects a keyword, got {n}"
        ))),
    }
}
