//! Propositional logic: sentences over named symbols, evaluation in a model
//! and entailment by model checking.

use crate::error::{AiError, AiResult};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Truth assignment for every symbol of interest.
pub type Model = HashMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Symbol(String),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Implication(Box<Expr>, Box<Expr>),
    Biconditional(Box<Expr>, Box<Expr>),
}

pub fn symbol(name: impl Into<String>) -> Expr {
    Expr::Symbol(name.into())
}

pub fn not(e: Expr) -> Expr {
    Expr::Not(Box::new(e))
}

pub fn and(e: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::And(e.into_iter().collect())
}

pub fn or(e: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Or(e.into_iter().collect())
}

pub fn implies(antecedent: Expr, consequent: Expr) -> Expr {
    Expr::Implication(Box::new(antecedent), Box::new(consequent))
}

pub fn iff(left: Expr, right: Expr) -> Expr {
    Expr::Biconditional(Box::new(left), Box::new(right))
}

impl Expr {
    /// Truth value of the sentence in `model`.
    pub fn evaluate(&self, model: &Model) -> AiResult<bool> {
        Ok(match self {
            Expr::Symbol(name) => *model
                .get(name)
                .ok_or_else(|| AiError::UnboundSymbol(name.clone()))?,
            Expr::Not(e) => !e.evaluate(model)?,
            Expr::And(es) => {
                for e in es {
                    if !e.evaluate(model)? {
                        return Ok(false);
                    }
                }
                true
            }
            Expr::Or(es) => {
                for e in es {
                    if e.evaluate(model)? {
                        return Ok(true);
                    }
                }
                false
            }
            Expr::Implication(a, b) => !a.evaluate(model)? || b.evaluate(model)?,
            Expr::Biconditional(a, b) => a.evaluate(model)? == b.evaluate(model)?,
        })
    }

    /// Names of all symbols in the sentence.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Symbol(name) => {
                out.insert(name.clone());
            }
            Expr::Not(e) => e.collect_symbols(out),
            Expr::And(es) | Expr::Or(es) => es.iter().for_each(|e| e.collect_symbols(out)),
            Expr::Implication(a, b) | Expr::Biconditional(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
        }
    }

    /// Conjuncts of a top-level `And`, or the sentence itself.
    pub fn conjuncts(&self) -> &[Expr] {
        match self {
            Expr::And(es) => es,
            other => std::slice::from_ref(other),
        }
    }

    pub fn formula(&self) -> String {
        self.to_string()
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Symbol(_) | Expr::Not(_) => write!(f, "{self}"),
            _ => write!(f, "({self})"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, es: &[Expr], op: &str) -> fmt::Result {
            for (i, e) in es.iter().enumerate() {
                if i > 0 {
                    write!(f, " {op} ")?;
                }
                e.fmt_operand(f)?;
            }
            Ok(())
        }

        match self {
            Expr::Symbol(name) => f.write_str(name),
            Expr::Not(e) => {
                f.write_str("¬")?;
                e.fmt_operand(f)
            }
            Expr::And(es) => join(f, es, "∧"),
            Expr::Or(es) => join(f, es, "∨"),
            Expr::Implication(a, b) => {
                a.fmt_operand(f)?;
                f.write_str(" => ")?;
                b.fmt_operand(f)
            }
            Expr::Biconditional(a, b) => {
                a.fmt_operand(f)?;
                f.write_str(" <=> ")?;
                b.fmt_operand(f)
            }
        }
    }
}

/// Does `knowledge` entail `query`?
///
/// Enumerates every assignment over the symbols of both sentences and checks
/// that the query holds wherever the knowledge does.
pub fn model_check(knowledge: &Expr, query: &Expr) -> AiResult<bool> {
    let symbols: Vec<String> = knowledge.symbols().union(&query.symbols()).cloned().collect();
    if symbols.len() >= u64::BITS as usize {
        return Err(AiError::InvalidConfig(format!(
            "{} symbols are too many to enumerate",
            symbols.len()
        )));
    }

    let mut model = Model::with_capacity(symbols.len());
    for mask in 0u64..(1u64 << symbols.len()) {
        for (i, name) in symbols.iter().enumerate() {
            model.insert(name.clone(), mask & (1 << i) != 0);
        }
        if knowledge.evaluate(&model)? && !query.evaluate(&model)? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(pairs: &[(&str, bool)]) -> Model {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_evaluate_connectives() {
        let m = model(&[("P", true), ("Q", false)]);
        let (p, q) = (symbol("P"), symbol("Q"));

        assert!(!and([p.clone(), q.clone()]).evaluate(&m).unwrap());
        assert!(or([p.clone(), q.clone()]).evaluate(&m).unwrap());
        assert!(!implies(p.clone(), q.clone()).evaluate(&m).unwrap());
        assert!(implies(q.clone(), p.clone()).evaluate(&m).unwrap());
        assert!(!iff(p.clone(), q.clone()).evaluate(&m).unwrap());
        assert!(not(q).evaluate(&m).unwrap());
    }

    #[test]
    fn test_empty_connectives() {
        let m = Model::new();
        assert!(and([]).evaluate(&m).unwrap());
        assert!(!or([]).evaluate(&m).unwrap());
    }

    #[test]
    fn test_unbound_symbol() {
        let err = symbol("R").evaluate(&Model::new()).unwrap_err();
        assert_eq!(err, AiError::UnboundSymbol("R".to_string()));
    }

    #[test]
    fn test_symbols() {
        let e = implies(and([symbol("B"), symbol("A")]), not(symbol("C")));
        let names: Vec<String> = e.symbols().into_iter().collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_modus_ponens() {
        let kb = and([implies(symbol("rain"), symbol("wet")), symbol("rain")]);
        assert!(model_check(&kb, &symbol("wet")).unwrap());
        assert!(!model_check(&kb, &not(symbol("wet"))).unwrap());
    }

    #[test]
    fn test_query_symbol_not_in_knowledge() {
        let kb = symbol("P");
        assert!(!model_check(&kb, &symbol("Q")).unwrap());
        assert!(model_check(&kb, &or([symbol("Q"), not(symbol("Q"))])).unwrap());
    }

    #[test]
    fn test_formula() {
        let e = implies(symbol("A"), not(and([symbol("A"), symbol("B")])));
        assert_eq!(e.formula(), "A => ¬(A ∧ B)");
        assert_eq!(and([symbol("A"), symbol("B")]).conjuncts().len(), 2);
        assert_eq!(symbol("A").conjuncts().len(), 1);
    }
}
