//! Expression evaluation.
//!
//! Every node evaluates to a [`Value`]; the coercion helpers ([`Evaluator::text`],
//! [`Evaluator::number`], [`Evaluator::collection`]) convert a value to the
//! category a consumer needs and report an [`EvalError`] naming the node when
//! no conversion exists.

use std::path::Path;

use crate::destination::{mark_path_literal, strip_path_markers};
use crate::episodes::format_episode_numbers;
use crate::metadata::{Language, RenameRequest, normalize_location};

use super::EvalError;
use super::ast::{BoolExpr, CollExpr, CompareOp, Expr, HasFilter, NumExpr, StrExpr};
use super::labels::Metadata;
use super::value::{Collection, Value};

/// Widest zero padding `pad()` and `episodes()` accept.
pub const MAX_PAD_WIDTH: i64 = 32;

type EvalResult<T> = std::result::Result<T, EvalError>;

/// Evaluates expression nodes against one rename request.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    metadata: Metadata<'a>,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator over `request`.
    pub fn new(request: &'a RenameRequest) -> Self {
        Self {
            metadata: Metadata::new(request),
        }
    }

    /// Evaluate a node to its natural value.
    pub fn eval(&self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Bool(node) => self.eval_bool(node).map(Value::Bool),
            Expr::Str(node) => self.eval_str(node).map(Value::Str),
            Expr::Num(node) => self.eval_num(node).map(Value::Num),
            Expr::Coll(node) => self.eval_coll(node).map(Value::Coll),
        }
    }

    /// Evaluate a node for truthiness.
    pub fn truthy(&self, expr: &Expr) -> EvalResult<bool> {
        match expr {
            Expr::Bool(node) => self.eval_bool(node),
            other => Ok(self.eval(other)?.truthy()),
        }
    }

    /// Evaluate a node in string position.
    pub fn text(&self, expr: &Expr) -> EvalResult<String> {
        if let Expr::Str(node) = expr {
            return self.eval_str(node);
        }
        let value = self.eval(expr)?;
        value.to_text().ok_or_else(|| mismatch(expr, "string", &value))
    }

    /// Evaluate a node in number position.
    pub fn number(&self, expr: &Expr) -> EvalResult<i64> {
        let value = self.eval(expr)?;
        value.to_number().ok_or_else(|| mismatch(expr, "number", &value))
    }

    /// Evaluate a node that must produce a collection.
    pub fn collection(&self, expr: &Expr) -> EvalResult<Collection> {
        match self.eval(expr)? {
            Value::Coll(items) => Ok(items),
            other => Err(mismatch(expr, "collection", &other)),
        }
    }

    /// Evaluate a node written to the subfolder buffer: separators and `*` inside
    /// string literals become segment markers, computed text never does.
    pub fn path_text(&self, expr: &Expr) -> EvalResult<String> {
        match expr {
            Expr::Str(StrExpr::Literal(text)) => Ok(mark_path_literal(text)),
            Expr::Str(StrExpr::Concat(parts)) => parts.iter().map(|part| self.path_text(part)).collect(),
            other => Ok(strip_path_markers(&self.text(other)?)),
        }
    }

    fn eval_bool(&self, node: &BoolExpr) -> EvalResult<bool> {
        match node {
            BoolExpr::Literal(flag) => Ok(*flag),
            BoolExpr::Label(label) => Ok(self.metadata.boolean(*label)),
            BoolExpr::Not(inner) => Ok(!self.truthy(inner)?),
            BoolExpr::And(lhs, rhs) => Ok(self.truthy(lhs)? && self.truthy(rhs)?),
            BoolExpr::Or(lhs, rhs) => Ok(self.truthy(lhs)? || self.truthy(rhs)?),
            BoolExpr::Compare { op, lhs, rhs } => self.compare(*op, lhs, rhs),
        }
    }

    fn compare(&self, op: CompareOp, lhs: &Expr, rhs: &Expr) -> EvalResult<bool> {
        let left = self.eval(lhs)?;
        let right = self.eval(rhs)?;
        let incomparable = || EvalError::Incomparable {
            construct: format!("{} {} {}", lhs.describe(), op.symbol(), rhs.describe()),
            lhs: left.category(),
            rhs: right.category(),
        };
        match op {
            CompareOp::Eq | CompareOp::Ne => {
                let equal = match (&left, &right) {
                    (Value::Num(a), Value::Num(b)) => a == b,
                    _ => {
                        let a = left.to_text().ok_or_else(incomparable)?;
                        let b = right.to_text().ok_or_else(incomparable)?;
                        a == b
                    }
                };
                Ok(if op == CompareOp::Eq { equal } else { !equal })
            }
            CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
                let a = left.to_number().ok_or_else(incomparable)?;
                let b = right.to_number().ok_or_else(incomparable)?;
                Ok(match op {
                    CompareOp::Lt => a < b,
                    CompareOp::Le => a <= b,
                    CompareOp::Gt => a > b,
                    _ => a >= b,
                })
            }
        }
    }

    fn eval_str(&self, node: &StrExpr) -> EvalResult<String> {
        match node {
            StrExpr::Literal(text) => Ok(text.clone()),
            StrExpr::Label(label) => Ok(self.metadata.string(*label)),
            StrExpr::Concat(parts) => parts.iter().map(|part| self.text(part)).collect(),
            StrExpr::First(inner) => Ok(self.collection(inner)?.first_text()),
            StrExpr::Substr { text, start, len } => {
                let text = self.text(text)?;
                let start = self.number(start)?;
                let len = match len {
                    Some(len) => Some(self.number(len)?),
                    None => None,
                };
                Ok(substr(&text, start, len))
            }
            StrExpr::Trunc { text, len } => {
                let text = self.text(text)?;
                Ok(substr(&text, 0, Some(self.number(len)?)))
            }
            StrExpr::Trim(inner) => Ok(self.text(inner)?.trim().to_string()),
            StrExpr::Upper(inner) => Ok(self.text(inner)?.to_uppercase()),
            StrExpr::Lower(inner) => Ok(self.text(inner)?.to_lowercase()),
            StrExpr::Pad { value, width } => {
                let width = self.pad_width("pad", width)?;
                match self.eval(value)? {
                    Value::Num(num) => Ok(format!("{:0width$}", num, width = width)),
                    other => {
                        let text = other.to_text().ok_or_else(|| mismatch(value, "string", &other))?;
                        let missing = width.saturating_sub(text.chars().count());
                        Ok(format!("{}{}", "0".repeat(missing), text))
                    }
                }
            }
            StrExpr::EpisodeRanges { width } => {
                let width = self.pad_width("episodes", width)?;
                let request = self.metadata.request();
                Ok(match request.primary_anime() {
                    Some(anime) => format_episode_numbers(&request.episodes, anime.id, width),
                    None => String::new(),
                })
            }
        }
    }

    fn pad_width(&self, function: &'static str, width: &Expr) -> EvalResult<usize> {
        let width = self.number(width)?;
        if width > MAX_PAD_WIDTH {
            return Err(EvalError::InvalidArgument {
                function,
                message: format!("width {} exceeds {}", width, MAX_PAD_WIDTH),
            });
        }
        Ok(width.max(0) as usize)
    }

    fn eval_num(&self, node: &NumExpr) -> EvalResult<i64> {
        match node {
            NumExpr::Literal(num) => Ok(*num),
            NumExpr::Label(label) => Ok(self.metadata.number(*label)),
            NumExpr::Len(inner) => self.number(inner),
        }
    }

    fn eval_coll(&self, node: &CollExpr) -> EvalResult<Collection> {
        match node {
            CollExpr::Label(label) => Ok(self.metadata.collection(*label)),
            CollExpr::Has { source, filters } => {
                let mut items = self.collection(source)?;
                for filter in filters {
                    if items.is_empty() {
                        break;
                    }
                    items = self.apply_filter(items, filter, source)?;
                }
                Ok(items)
            }
        }
    }

    fn apply_filter(&self, items: Collection, filter: &HasFilter, source: &Expr) -> EvalResult<Collection> {
        Ok(match (items, filter) {
            (Collection::Titles(titles), HasFilter::Language(lang)) => Collection::Titles(
                titles.into_iter().filter(|title| title.language == *lang).collect(),
            ),
            (Collection::Titles(titles), HasFilter::TitleKind(kind)) => Collection::Titles(
                titles.into_iter().filter(|title| title.kind == *kind).collect(),
            ),
            (Collection::Titles(titles), HasFilter::Text(expr)) => {
                let needle = self.text(expr)?.to_lowercase();
                Collection::Titles(
                    titles
                        .into_iter()
                        .filter(|title| title.text.to_lowercase().contains(&needle))
                        .collect(),
                )
            }
            (Collection::Languages(langs), HasFilter::Language(lang)) => {
                Collection::Languages(langs.into_iter().filter(|l| l == lang).collect())
            }
            (Collection::Languages(langs), HasFilter::Text(expr)) => {
                let wanted = Language::from_name_ignore_case(&self.text(expr)?);
                Collection::Languages(langs.into_iter().filter(|l| Some(*l) == wanted).collect())
            }
            (Collection::Folders(folders), HasFilter::Text(expr)) => {
                let name = self.text(expr)?;
                let location = normalize_location(Path::new(&name));
                Collection::Folders(
                    folders
                        .into_iter()
                        .filter(|folder| {
                            eq_ignore_case(&folder.name, &name)
                                || eq_ignore_case(&folder.normalized_location(), &location)
                        })
                        .collect(),
                )
            }
            (Collection::Strings(values), HasFilter::Text(expr)) => {
                let wanted = self.text(expr)?;
                Collection::Strings(
                    values
                        .into_iter()
                        .filter(|value| eq_ignore_case(value, &wanted))
                        .collect(),
                )
            }
            (items, filter) => {
                return Err(EvalError::InvalidFilter {
                    construct: source.describe(),
                    filter: match filter {
                        HasFilter::Language(lang) => lang.name().to_string(),
                        HasFilter::TitleKind(kind) => kind.name().to_string(),
                        HasFilter::Text(expr) => expr.describe(),
                    },
                    collection: items.element_kind(),
                });
            }
        })
    }
}

fn mismatch(expr: &Expr, expected: &'static str, found: &Value) -> EvalError {
    EvalError::TypeMismatch {
        construct: expr.describe(),
        expected,
        found: found.category(),
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Character-based substring that clamps instead of failing: a negative start
/// counts as 0, a start past the end yields `""`, a non-positive length yields `""`.
pub fn substr(text: &str, start: i64, len: Option<i64>) -> String {
    let start = start.max(0) as usize;
    let rest = text.chars().skip(start);
    match len {
        None => rest.collect(),
        Some(len) if len <= 0 => String::new(),
        Some(len) => rest.take(len as usize).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substr_clamps_out_of_range_arguments() {
        assert_eq!(substr("abcdef", 2, Some(3)), "cde");
        assert_eq!(substr("abcdef", -4, Some(2)), "ab");
        assert_eq!(substr("abcdef", 4, Some(100)), "ef");
        assert_eq!(substr("abcdef", 10, None), "");
        assert_eq!(substr("abcdef", 1, Some(0)), "");
        assert_eq!(substr("abcdef", 1, Some(-2)), "");
        assert_eq!(substr("進撃の巨人", 1, Some(2)), "撃の");
    }
}
