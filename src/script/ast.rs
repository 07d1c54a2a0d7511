use serde::{Deserialize, Serialize};

use crate::metadata::{Language, TitleKind};

use super::labels::{BoolLabel, CollectionLabel, Label, NumberLabel, StringLabel};

/// Parsed script: the statements in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptTree {
    /// Top-level statements.
    pub statements: Vec<Statement>,
}

/// Output buffer a statement writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// Explicit `filename`.
    Filename,
    /// Explicit `destination`.
    Destination,
    /// Explicit `subfolder`.
    Subfolder,
    /// No target written; behaves as `filename`.
    DefaultFilename,
}

impl Target {
    /// Whether statements with this target belong to the destination pass.
    pub fn is_destination_pass(self) -> bool {
        matches!(self, Target::Destination | Target::Subfolder)
    }
}

/// One `if`/`else if` arm of a conditional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalArm {
    /// Condition evaluated for truthiness.
    pub condition: Expr,
    /// Statements executed when the condition holds.
    pub body: Vec<Statement>,
}

/// Script statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `if (..) .. else if (..) .. else ..`
    Conditional {
        /// Arms tried in order.
        arms: Vec<ConditionalArm>,
        /// Body of the trailing `else`, if any.
        otherwise: Option<Vec<Statement>>,
    },
    /// `set`: overwrite the target buffer.
    Set {
        /// Buffer written.
        target: Target,
        /// Concatenated operands.
        parts: Vec<Expr>,
    },
    /// `add`: append to the target buffer.
    Add {
        /// Buffer written.
        target: Target,
        /// Concatenated operands.
        parts: Vec<Expr>,
    },
    /// `replace`: literal substring replacement in the target buffer.
    Replace {
        /// Buffer written.
        target: Target,
        /// Text searched for.
        from: Expr,
        /// Replacement text.
        to: Expr,
    },
    /// Abandon the current pass and produce nothing.
    Skip,
    /// Abort renaming with a message.
    Cancel(Vec<Expr>),
}

/// Expression node, tagged by the category of value it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Produces a boolean.
    Bool(BoolExpr),
    /// Produces text.
    Str(StrExpr),
    /// Produces an integer.
    Num(NumExpr),
    /// Produces a collection.
    Coll(CollExpr),
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// Operator as written in scripts.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// Boolean-producing nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoolExpr {
    /// `true` / `false`
    Literal(bool),
    /// Boolean label.
    Label(BoolLabel),
    /// `not x`
    Not(Box<Expr>),
    /// `x and y`
    And(Box<Expr>, Box<Expr>),
    /// `x or y`
    Or(Box<Expr>, Box<Expr>),
    /// Binary comparison.
    Compare {
        /// Operator.
        op: CompareOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

/// Text-producing nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StrExpr {
    /// Quoted literal.
    Literal(String),
    /// Text label.
    Label(StringLabel),
    /// `a + b + ...`
    Concat(Vec<Expr>),
    /// `first(collection)`
    First(Box<Expr>),
    /// `substr(text, start[, length])`
    Substr {
        /// Source text.
        text: Box<Expr>,
        /// Zero-based start character.
        start: Box<Expr>,
        /// Character count; the rest of the text when absent.
        len: Option<Box<Expr>>,
    },
    /// `trunc(text, length)`
    Trunc {
        /// Source text.
        text: Box<Expr>,
        /// Maximum character count.
        len: Box<Expr>,
    },
    /// `trim(text)`
    Trim(Box<Expr>),
    /// `upper(text)`
    Upper(Box<Expr>),
    /// `lower(text)`
    Lower(Box<Expr>),
    /// `pad(number, width)`
    Pad {
        /// Number to format.
        value: Box<Expr>,
        /// Minimum digit count.
        width: Box<Expr>,
    },
    /// `episodes(width)`: compressed episode ranges of the file.
    EpisodeRanges {
        /// Zero-padding width.
        width: Box<Expr>,
    },
}

/// Integer-producing nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NumExpr {
    /// Integer literal.
    Literal(i64),
    /// Integer label.
    Label(NumberLabel),
    /// `len(x)`
    Len(Box<Expr>),
}

/// Collection-producing nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollExpr {
    /// Collection label.
    Label(CollectionLabel),
    /// `source has filter [and filter]...`
    Has {
        /// Collection filtered.
        source: Box<Expr>,
        /// Filters applied in order; all must match.
        filters: Vec<HasFilter>,
    },
}

/// Right-hand side of `has`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HasFilter {
    /// Language keyword.
    Language(Language),
    /// Title kind keyword.
    TitleKind(TitleKind),
    /// Any text expression.
    Text(Expr),
}

impl Expr {
    /// Expression wrapping a label of any category.
    pub fn label(label: Label) -> Expr {
        match label {
            Label::String(label) => Expr::Str(StrExpr::Label(label)),
            Label::Number(label) => Expr::Num(NumExpr::Label(label)),
            Label::Bool(label) => Expr::Bool(BoolExpr::Label(label)),
            Label::Collection(label) => Expr::Coll(CollExpr::Label(label)),
        }
    }

    /// Short human-readable description of the node, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Expr::Bool(BoolExpr::Literal(flag)) => flag.to_string(),
            Expr::Bool(BoolExpr::Label(label)) => Label::Bool(*label).name().to_string(),
            Expr::Bool(BoolExpr::Not(inner)) => format!("not {}", inner.describe()),
            Expr::Bool(BoolExpr::And(lhs, rhs)) => {
                format!("{} and {}", lhs.describe(), rhs.describe())
            }
            Expr::Bool(BoolExpr::Or(lhs, rhs)) => format!("{} or {}", lhs.describe(), rhs.describe()),
            Expr::Bool(BoolExpr::Compare { op, lhs, rhs }) => {
                format!("{} {} {}", lhs.describe(), op.symbol(), rhs.describe())
            }
            Expr::Str(StrExpr::Literal(text)) => format!("'{}'", text),
            Expr::Str(StrExpr::Label(label)) => Label::String(*label).name().to_string(),
            Expr::Str(StrExpr::Concat(parts)) => parts
                .iter()
                .map(Expr::describe)
                .collect::<Vec<_>>()
                .join(" + "),
            Expr::Str(StrExpr::First(_)) => "first(..)".to_string(),
            Expr::Str(StrExpr::Substr { .. }) => "substr(..)".to_string(),
            Expr::Str(StrExpr::Trunc { .. }) => "trunc(..)".to_string(),
            Expr::Str(StrExpr::Trim(_)) => "trim(..)".to_string(),
            Expr::Str(StrExpr::Upper(_)) => "upper(..)".to_string(),
            Expr::Str(StrExpr::Lower(_)) => "lower(..)".to_string(),
            Expr::Str(StrExpr::Pad { .. }) => "pad(..)".to_string(),
            Expr::Str(StrExpr::EpisodeRanges { .. }) => "episodes(..)".to_string(),
            Expr::Num(NumExpr::Literal(num)) => num.to_string(),
            Expr::Num(NumExpr::Label(label)) => Label::Number(*label).name().to_string(),
            Expr::Num(NumExpr::Len(_)) => "len(..)".to_string(),
            Expr::Coll(CollExpr::Label(label)) => Label::Collection(*label).name().to_string(),
            Expr::Coll(CollExpr::Has { source, .. }) => format!("{} has ..", source.describe()),
        }
    }
}
