use std::collections::BTreeSet;

use pest::iterators::Pair;

use crate::{RelabelError, RelabelResult, Rule};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Integer(i128),
  Real(f64),
  /// A variable such as `u`, `\theta` or `x_1`.
  Identifier(String),
  /// `\pi`, `\infty` or `e`. Never a free variable.
  Constant(String),
  UnaryOp {
    op: UnaryOperator,
    operand: Box<Expr>,
  },
  BinaryOp {
    op: BinaryOperator,
    left: Box<Expr>,
    right: Box<Expr>,
  },
  /// Built-in operator applied to arguments: `sin`, `sqrt`, `abs`, ...
  FunctionCall {
    name: String,
    args: Vec<Expr>,
  },
  /// Bracketed list, as used by range inputs: `[-1, 1]`.
  List(Vec<Expr>),
  /// Parenthesized tuple of two or more items: `(\cos u, \sin v, u)`.
  Tuple(Vec<Expr>),
  /// `_f(u,v)=body`
  FunctionAssignment {
    name: String,
    params: Vec<String>,
    body: Box<Expr>,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
  Minus,
  Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
  Plus,
  Minus,
  Times,
  Divide,
  Power,
}

// ── Pest pairs to Expr ──────────────────────────────────────────────────

pub fn pair_to_expr(pair: Pair<Rule>) -> RelabelResult<Expr> {
  match pair.as_rule() {
    Rule::FunctionAssignment => {
      let mut inner = pair.into_inner();
      let name = next_inner(&mut inner)?.as_str().to_string();
      let params = next_inner(&mut inner)?
        .into_inner()
        .map(symbol_name)
        .collect();
      let body = pair_to_expr(next_inner(&mut inner)?)?;
      Ok(Expr::FunctionAssignment {
        name,
        params,
        body: Box::new(body),
      })
    }
    Rule::Expression => {
      let mut inner = pair.into_inner();
      let mut acc = pair_to_expr(next_inner(&mut inner)?)?;
      while let Some(op_pair) = inner.next() {
        let op = if op_pair.as_str() == "-" {
          BinaryOperator::Minus
        } else {
          BinaryOperator::Plus
        };
        let right = pair_to_expr(next_inner(&mut inner)?)?;
        acc = binary(op, acc, right);
      }
      Ok(acc)
    }
    Rule::Term => {
      let mut inner = pair.into_inner();
      let mut acc = pair_to_expr(next_inner(&mut inner)?)?;
      while let Some(next) = inner.next() {
        acc = if next.as_rule() == Rule::MulOp {
          let op = match next.as_str() {
            "/" | "\\div" => BinaryOperator::Divide,
            _ => BinaryOperator::Times,
          };
          let right = pair_to_expr(next_inner(&mut inner)?)?;
          binary(op, acc, right)
        } else {
          // Juxtaposed factor
          binary(BinaryOperator::Times, acc, pair_to_expr(next)?)
        };
      }
      Ok(acc)
    }
    Rule::Signed => {
      let mut signs = Vec::new();
      let mut operand = None;
      for part in pair.into_inner() {
        if part.as_rule() == Rule::Sign {
          signs.push(if part.as_str() == "-" {
            UnaryOperator::Minus
          } else {
            UnaryOperator::Plus
          });
        } else {
          operand = Some(pair_to_expr(part)?);
        }
      }
      let mut expr = operand.ok_or(RelabelError::EmptyInput)?;
      for op in signs.into_iter().rev() {
        expr = Expr::UnaryOp {
          op,
          operand: Box::new(expr),
        };
      }
      Ok(expr)
    }
    Rule::Power => {
      let mut inner = pair.into_inner();
      let base = pair_to_expr(next_inner(&mut inner)?)?;
      match inner.next() {
        Some(exponent) => {
          Ok(binary(BinaryOperator::Power, base, pair_to_expr(exponent)?))
        }
        None => Ok(base),
      }
    }
    Rule::Number => {
      let text = pair.as_str();
      if text.contains('.') {
        text
          .parse::<f64>()
          .map(Expr::Real)
          .map_err(|_| RelabelError::InvalidNumber { text: text.into() })
      } else {
        text
          .parse::<i128>()
          .map(Expr::Integer)
          .map_err(|_| RelabelError::InvalidNumber { text: text.into() })
      }
    }
    Rule::Digit => {
      let text = pair.as_str();
      text
        .parse::<i128>()
        .map(Expr::Integer)
        .map_err(|_| RelabelError::InvalidNumber { text: text.into() })
    }
    Rule::Frac => {
      let mut inner = pair.into_inner();
      let numerator = pair_to_expr(next_inner(&mut inner)?)?;
      let denominator = pair_to_expr(next_inner(&mut inner)?)?;
      Ok(binary(BinaryOperator::Divide, numerator, denominator))
    }
    Rule::Sqrt => {
      let mut index = None;
      let mut radicand = None;
      for part in pair.into_inner() {
        if part.as_rule() == Rule::SqrtIndex {
          index = Some(pair_to_expr(single_inner(part)?)?);
        } else {
          radicand = Some(pair_to_expr(part)?);
        }
      }
      let mut args = vec![radicand.ok_or(RelabelError::EmptyInput)?];
      args.extend(index);
      Ok(Expr::FunctionCall {
        name: "sqrt".to_string(),
        args,
      })
    }
    Rule::OperatorCall => {
      let mut inner = pair.into_inner();
      let name = next_inner(&mut inner)?
        .as_str()
        .trim_start_matches('\\')
        .to_string();
      let mut power = None;
      let mut argument = None;
      for part in inner {
        if part.as_rule() == Rule::OperatorPower {
          power = Some(pair_to_expr(single_inner(part)?)?);
        } else {
          argument = Some(pair_to_expr(part)?);
        }
      }
      let call = Expr::FunctionCall {
        name,
        args: vec![argument.ok_or(RelabelError::EmptyInput)?],
      };
      // `\sin^2 x` is `(\sin x)^2`
      Ok(match power {
        Some(exponent) => binary(BinaryOperator::Power, call, exponent),
        None => call,
      })
    }
    Rule::Abs => Ok(Expr::FunctionCall {
      name: "abs".to_string(),
      args: vec![pair_to_expr(single_inner(pair)?)?],
    }),
    Rule::Group => {
      let mut items = pair
        .into_inner()
        .map(pair_to_expr)
        .collect::<RelabelResult<Vec<_>>>()?;
      if items.len() == 1 {
        Ok(items.remove(0))
      } else {
        Ok(Expr::Tuple(items))
      }
    }
    Rule::List => Ok(Expr::List(
      pair
        .into_inner()
        .map(pair_to_expr)
        .collect::<RelabelResult<Vec<_>>>()?,
    )),
    Rule::Braced => pair_to_expr(single_inner(pair)?),
    Rule::Constant => Ok(Expr::Constant(pair.as_str().to_string())),
    Rule::Symbol => Ok(Expr::Identifier(symbol_name(pair))),
    _ => Err(RelabelError::EmptyInput),
  }
}

fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
  Expr::BinaryOp {
    op,
    left: Box::new(left),
    right: Box::new(right),
  }
}

fn next_inner<'i>(
  inner: &mut pest::iterators::Pairs<'i, Rule>,
) -> RelabelResult<Pair<'i, Rule>> {
  inner.next().ok_or(RelabelError::EmptyInput)
}

fn single_inner(pair: Pair<Rule>) -> RelabelResult<Pair<Rule>> {
  pair.into_inner().next().ok_or(RelabelError::EmptyInput)
}

/// Normalized text of a `Symbol` pair: `x_{1}` and `x_1` both become `x_1`,
/// longer subscripts keep their braces.
pub fn symbol_name(pair: Pair<Rule>) -> String {
  let mut name = String::new();
  for part in pair.into_inner() {
    match part.as_rule() {
      Rule::Letter => name.push_str(part.as_str()),
      Rule::Subscript => {
        let text = part
          .into_inner()
          .next()
          .map(|sub| match sub.as_rule() {
            Rule::SubscriptBraced => sub
              .into_inner()
              .next()
              .map(|t| t.as_str().to_string())
              .unwrap_or_default(),
            _ => sub.as_str().to_string(),
          })
          .unwrap_or_default();
        if text.chars().count() == 1 {
          name.push('_');
          name.push_str(&text);
        } else {
          name.push_str(&format!("_{{{}}}", text));
        }
      }
      _ => {}
    }
  }
  name
}

// ── Tree queries ────────────────────────────────────────────────────────

impl Expr {
  /// Identifiers the expression depends on. For an assignment these are the
  /// body's identifiers minus the declared parameters.
  pub fn free_variables(&self) -> BTreeSet<String> {
    let mut vars = BTreeSet::new();
    collect_identifiers(self, &mut vars);
    if let Expr::FunctionAssignment { params, .. } = self {
      for param in params {
        vars.remove(param);
      }
    }
    vars
  }

  pub fn is_function_assignment(&self) -> bool {
    matches!(self, Expr::FunctionAssignment { .. })
  }

  pub fn assignment_params(&self) -> Option<&[String]> {
    match self {
      Expr::FunctionAssignment { params, .. } => Some(params),
      _ => None,
    }
  }

  /// Rename identifiers in one pass. `rename` is asked once per identifier
  /// of the original tree, so a renamed identifier is never renamed again.
  pub fn rename_identifiers<F>(&self, rename: &F) -> Expr
  where
    F: Fn(&str) -> Option<String>,
  {
    match self {
      Expr::Identifier(name) => {
        Expr::Identifier(rename(name).unwrap_or_else(|| name.clone()))
      }
      Expr::UnaryOp { op, operand } => Expr::UnaryOp {
        op: *op,
        operand: Box::new(operand.rename_identifiers(rename)),
      },
      Expr::BinaryOp { op, left, right } => Expr::BinaryOp {
        op: *op,
        left: Box::new(left.rename_identifiers(rename)),
        right: Box::new(right.rename_identifiers(rename)),
      },
      Expr::FunctionCall { name, args } => Expr::FunctionCall {
        name: name.clone(),
        args: args.iter().map(|a| a.rename_identifiers(rename)).collect(),
      },
      Expr::List(items) => {
        Expr::List(items.iter().map(|i| i.rename_identifiers(rename)).collect())
      }
      Expr::Tuple(items) => Expr::Tuple(
        items.iter().map(|i| i.rename_identifiers(rename)).collect(),
      ),
      Expr::FunctionAssignment { name, params, body } => {
        Expr::FunctionAssignment {
          name: name.clone(),
          params: params
            .iter()
            .map(|p| rename(p).unwrap_or_else(|| p.clone()))
            .collect(),
          body: Box::new(body.rename_identifiers(rename)),
        }
      }
      other => other.clone(),
    }
  }
}

fn collect_identifiers(expr: &Expr, vars: &mut BTreeSet<String>) {
  match expr {
    Expr::Identifier(name) => {
      vars.insert(name.clone());
    }
    Expr::UnaryOp { operand, .. } => collect_identifiers(operand, vars),
    Expr::BinaryOp { left, right, .. } => {
      collect_identifiers(left, vars);
      collect_identifiers(right, vars);
    }
    Expr::FunctionCall { args, .. } => {
      args.iter().for_each(|a| collect_identifiers(a, vars))
    }
    Expr::List(items) | Expr::Tuple(items) => {
      items.iter().for_each(|i| collect_identifiers(i, vars))
    }
    Expr::FunctionAssignment { body, .. } => collect_identifiers(body, vars),
    Expr::Integer(_) | Expr::Real(_) | Expr::Constant(_) => {}
  }
}

// ── Expr to LaTeX ───────────────────────────────────────────────────────

/// Serialize a tree back into LaTeX accepted by the grammar.
pub fn expr_to_latex(expr: &Expr) -> String {
  match expr {
    Expr::Integer(n) if *n < 0 => format!("-{}", n.unsigned_abs()),
    Expr::Integer(n) => n.to_string(),
    Expr::Real(f) => format_real(*f),
    Expr::Identifier(name) | Expr::Constant(name) => name.clone(),
    Expr::UnaryOp { op, operand } => {
      let sign = match op {
        UnaryOperator::Minus => "-",
        UnaryOperator::Plus => "+",
      };
      format!("{}{}", sign, wrap_below(operand, Precedence::Power))
    }
    Expr::BinaryOp { op, left, right } => match op {
      BinaryOperator::Plus => format!(
        "{}+{}",
        wrap_below(left, Precedence::Sum),
        wrap_below(right, Precedence::Product)
      ),
      BinaryOperator::Minus => format!(
        "{}-{}",
        wrap_below(left, Precedence::Sum),
        wrap_below(right, Precedence::Product)
      ),
      BinaryOperator::Times => {
        let l = wrap_below(left, Precedence::Product);
        let r = wrap_below(right, Precedence::Power);
        format!("{}{}{}", l, juxtaposition(&l, right, &r), r)
      }
      BinaryOperator::Divide => format!(
        "\\frac{{{}}}{{{}}}",
        expr_to_latex(left),
        expr_to_latex(right)
      ),
      BinaryOperator::Power => format!(
        "{}^{{{}}}",
        wrap_below(left, Precedence::Atom),
        expr_to_latex(right)
      ),
    },
    Expr::FunctionCall { name, args } => match (name.as_str(), args.as_slice()) {
      ("sqrt", [radicand]) => format!("\\sqrt{{{}}}", expr_to_latex(radicand)),
      ("sqrt", [radicand, index]) => format!(
        "\\sqrt[{}]{{{}}}",
        expr_to_latex(index),
        expr_to_latex(radicand)
      ),
      ("abs", [inner]) => format!("\\left|{}\\right|", expr_to_latex(inner)),
      _ => format!("\\{}\\left({}\\right)", name, join_latex(args)),
    },
    Expr::List(items) => format!("\\left[{}\\right]", join_latex(items)),
    Expr::Tuple(items) => format!("\\left({}\\right)", join_latex(items)),
    Expr::FunctionAssignment { name, params, body } => {
      format!("{}({})={}", name, params.join(","), expr_to_latex(body))
    }
  }
}

/// Format a real number, keeping a trailing `.0` on whole values.
pub fn format_real(f: f64) -> String {
  if f.fract() == 0.0 && f.abs() < 1e15 {
    format!("{:.1}", f)
  } else {
    format!("{}", f)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
  Sum,
  Product,
  Power,
  Atom,
}

fn precedence(expr: &Expr) -> Precedence {
  match expr {
    Expr::BinaryOp { op, .. } => match op {
      BinaryOperator::Plus | BinaryOperator::Minus => Precedence::Sum,
      BinaryOperator::Times => Precedence::Product,
      BinaryOperator::Divide | BinaryOperator::Power => Precedence::Power,
    },
    Expr::UnaryOp { .. } => Precedence::Product,
    Expr::Integer(n) if *n < 0 => Precedence::Product,
    Expr::Real(f) if *f < 0.0 => Precedence::Product,
    // A call swallows a following `^`, so it cannot be a bare power base.
    Expr::FunctionCall { name, .. } if name != "sqrt" && name != "abs" => {
      Precedence::Power
    }
    Expr::FunctionAssignment { .. } => Precedence::Sum,
    _ => Precedence::Atom,
  }
}

fn wrap_below(expr: &Expr, min: Precedence) -> String {
  let latex = expr_to_latex(expr);
  if precedence(expr) < min {
    format!("\\left({}\\right)", latex)
  } else {
    latex
  }
}

/// Separator between two rendered factors of a product.
fn juxtaposition(left: &str, right: &Expr, right_latex: &str) -> &'static str {
  let starts_numeric = right_latex
    .chars()
    .next()
    .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+');
  if starts_numeric || matches!(right, Expr::UnaryOp { .. }) {
    "\\cdot "
  } else if left.ends_with(|c: char| c.is_ascii_alphabetic())
    && right_latex.starts_with(|c: char| c.is_ascii_alphabetic())
  {
    " "
  } else {
    ""
  }
}

fn join_latex(items: &[Expr]) -> String {
  items.iter().map(expr_to_latex).collect::<Vec<_>>().join(",")
}
