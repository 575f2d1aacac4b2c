//! Infix pretty-printing for expressions.
//!
//! Output is meant for the console, in the shape the derivation scripts
//! print: `a - b` and `a / b` are folded back from their internal
//! `a + (-1)*b` / `a * b^-1` forms, π gets its glyph, and unevaluated
//! integrals render as `∫[lower, upper] integrand dvar`.

use std::fmt;

use super::expr::{Const, Expr};

/// Operator precedence used for parenthesization.
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Add(_) => 1,
        Expr::Mul(_) => 2,
        Expr::Pow(_, _) => 3,
        _ => 4,
    }
}

fn fmt_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value == value.trunc() && value.abs() < 1e15 {
        write!(f, "{}", value as i64)
    } else {
        write!(f, "{value}")
    }
}

/// Render `expr`, parenthesized when its precedence is below `min_prec`.
fn fmt_at(f: &mut fmt::Formatter<'_>, expr: &Expr, min_prec: u8) -> fmt::Result {
    let needs_parens = precedence(expr) < min_prec
        || matches!(expr, Expr::Number(value) if *value < 0.0 && min_prec > 1);
    if needs_parens {
        write!(f, "(")?;
        fmt_expr(f, expr)?;
        write!(f, ")")
    } else {
        fmt_expr(f, expr)
    }
}

/// Split a sum term into its sign and magnitude for `a - b` rendering.
fn split_sign(term: &Expr) -> (bool, Expr) {
    match term {
        Expr::Number(value) if *value < 0.0 => (true, Expr::Number(-value)),
        Expr::Mul(factors) => match factors.first() {
            Some(Expr::Number(coefficient)) if *coefficient < 0.0 => {
                let mut rest: Vec<Expr> = factors[1..].to_vec();
                if *coefficient != -1.0 {
                    rest.insert(0, Expr::Number(-coefficient));
                }
                let magnitude = match rest.len() {
                    0 => Expr::Number(1.0),
                    1 => rest.remove(0),
                    _ => Expr::Mul(rest),
                };
                (true, magnitude)
            }
            _ => (false, term.clone()),
        },
        _ => (false, term.clone()),
    }
}

fn fmt_add(f: &mut fmt::Formatter<'_>, terms: &[Expr]) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i == 0 {
            fmt_at(f, term, 1)?;
            continue;
        }
        let (negative, magnitude) = split_sign(term);
        write!(f, "{}", if negative { " - " } else { " + " })?;
        fmt_at(f, &magnitude, 2)?;
    }
    Ok(())
}

fn fmt_mul(f: &mut fmt::Formatter<'_>, factors: &[Expr]) -> fmt::Result {
    // Factors with negative numeric exponents render as a division.
    let mut numerator: Vec<Expr> = Vec::new();
    let mut denominator: Vec<Expr> = Vec::new();
    for factor in factors {
        match factor {
            Expr::Pow(base, exponent) => match exponent.as_ref() {
                Expr::Number(n) if *n < 0.0 => {
                    if *n == -1.0 {
                        denominator.push(base.as_ref().clone());
                    } else {
                        denominator.push(Expr::Pow(base.clone(), Box::new(Expr::Number(-n))));
                    }
                }
                _ => numerator.push(factor.clone()),
            },
            _ => numerator.push(factor.clone()),
        }
    }

    // A leading -1 coefficient prints as a bare sign.
    if matches!(numerator.first(), Some(Expr::Number(first)) if *first == -1.0) {
        write!(f, "-")?;
        numerator.remove(0);
    }

    if numerator.is_empty() {
        write!(f, "1")?;
    } else {
        for (i, factor) in numerator.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            fmt_at(f, factor, 2)?;
        }
    }

    if denominator.is_empty() {
        return Ok(());
    }
    write!(f, "/")?;
    if denominator.len() == 1 {
        fmt_at(f, &denominator[0], 3)
    } else {
        write!(f, "(")?;
        for (i, factor) in denominator.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            fmt_at(f, factor, 2)?;
        }
        write!(f, ")")
    }
}

fn fmt_expr(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::Number(value) => fmt_number(f, *value),
        Expr::Constant(Const::Pi) => write!(f, "π"),
        Expr::Symbol(name) => write!(f, "{name}"),
        Expr::Add(terms) => fmt_add(f, terms),
        Expr::Mul(factors) => fmt_mul(f, factors),
        Expr::Pow(base, exponent) => {
            // Parenthesize nested powers; `^` does not read associatively.
            if matches!(base.as_ref(), Expr::Pow(_, _)) {
                write!(f, "(")?;
                fmt_expr(f, base)?;
                write!(f, ")")?;
            } else {
                fmt_at(f, base, 3)?;
            }
            write!(f, "^")?;
            fmt_at(f, exponent, 4)
        }
        Expr::Sin(arg) => {
            write!(f, "sin(")?;
            fmt_expr(f, arg)?;
            write!(f, ")")
        }
        Expr::Cos(arg) => {
            write!(f, "cos(")?;
            fmt_expr(f, arg)?;
            write!(f, ")")
        }
        Expr::Integral {
            integrand,
            var,
            lower,
            upper,
        } => {
            write!(f, "∫[")?;
            fmt_expr(f, lower)?;
            write!(f, ", ")?;
            fmt_expr(f, upper)?;
            write!(f, "] ")?;
            fmt_expr(f, integrand)?;
            write!(f, " d{var}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_expr(f, self)
    }
}
