//! Expression compilation and evaluation on top of `meval`.
//!
//! [`compile`] parses the text and performs one trial evaluation at
//! `x = y = z = 1`, so errors that a parse alone would not catch (unknown
//! identifiers, wrong function arity) are reported up front. The returned
//! [`Evaluator`] is immutable and cheap to clone; plot panels call it
//! hundreds of times per frame.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use meval::{Context, ContextProvider, Expr, FuncEvalError};

use crate::error::ExpressionError;

/// Values bound to the free variables for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bindings {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Bindings {
    pub fn x(x: f64) -> Self {
        Self { x, y: 0.0, z: 0.0 }
    }

    pub fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// The representative point used for the trial evaluation on compile.
    pub fn trial() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        }
    }
}

/// Which of `x`, `y`, `z` an expression actually references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreeVariables {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl FreeVariables {
    fn mark(&mut self, name: &str) {
        match name {
            "x" => self.x = true,
            "y" => self.y = true,
            "z" => self.z = true,
            _ => {}
        }
    }

    /// Number of referenced variables.
    pub fn count(&self) -> usize {
        [self.x, self.y, self.z].iter().filter(|v| **v).count()
    }

    /// Function-signature label such as `f(x)` or `f(x, y)`.
    ///
    /// Constant expressions are labelled `f(x)` since they still plot as a line.
    pub fn label(&self) -> String {
        let mut names = Vec::new();
        if self.x || self.count() == 0 {
            names.push("x");
        }
        if self.y {
            names.push("y");
        }
        if self.z {
            names.push("z");
        }
        format!("f({})", names.join(", "))
    }
}

/// A compiled expression, ready to be evaluated repeatedly.
#[derive(Clone)]
pub struct Evaluator {
    source: Rc<str>,
    expr: Rc<Expr>,
    ctx: Rc<Context<'static>>,
    vars: FreeVariables,
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("source", &self.source)
            .field("vars", &self.vars)
            .finish()
    }
}

impl Evaluator {
    /// The (trimmed) text this evaluator was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn free_variables(&self) -> FreeVariables {
        self.vars
    }

    /// Evaluate at the given bindings.
    ///
    /// Domain violations such as `sqrt(-1)` are not errors; they produce a
    /// non-finite value that the sampler deals with.
    pub fn eval(&self, bindings: Bindings) -> Result<f64, ExpressionError> {
        let scope = Scope {
            bindings,
            base: &self.ctx,
            seen: None,
        };
        self.expr
            .eval_with_context(scope)
            .map_err(|e| ExpressionError::Evaluation(e.to_string()))
    }

    pub fn eval_x(&self, x: f64) -> Result<f64, ExpressionError> {
        self.eval(Bindings::x(x))
    }

    pub fn eval_xy(&self, x: f64, y: f64) -> Result<f64, ExpressionError> {
        self.eval(Bindings::xy(x, y))
    }
}

/// Compile `text` into an [`Evaluator`].
pub fn compile(text: &str) -> Result<Evaluator, ExpressionError> {
    let source = text.trim();
    if source.is_empty() {
        return Err(ExpressionError::Empty);
    }
    let expr: Expr = source
        .parse()
        .map_err(|e: meval::Error| ExpressionError::Parse(e.to_string()))?;
    let ctx = math_context();

    let seen = Cell::new(FreeVariables::default());
    let trial = Scope {
        bindings: Bindings::trial(),
        base: &ctx,
        seen: Some(&seen),
    };
    expr.eval_with_context(trial)
        .map_err(|e| ExpressionError::Evaluation(e.to_string()))?;

    Ok(Evaluator {
        source: Rc::from(source),
        expr: Rc::new(expr),
        ctx: Rc::new(ctx),
        vars: seen.get(),
    })
}

/// meval's builtins plus the names users expect from a graphing calculator.
fn math_context() -> Context<'static> {
    let mut ctx = Context::new();
    ctx.var("tau", std::f64::consts::TAU)
        .func("log", f64::ln)
        .func("log10", f64::log10)
        .func("log2", f64::log2)
        .func("cbrt", f64::cbrt)
        .func("sign", f64::signum)
        .func2("pow", f64::powf);
    ctx
}

/// Resolves `x`/`y`/`z` from the bindings and everything else from the base context.
struct Scope<'a> {
    bindings: Bindings,
    base: &'a Context<'static>,
    seen: Option<&'a Cell<FreeVariables>>,
}

impl ContextProvider for Scope<'_> {
    fn get_var(&self, name: &str) -> Option<f64> {
        let value = match name {
            "x" => self.bindings.x,
            "y" => self.bindings.y,
            "z" => self.bindings.z,
            _ => return self.base.get_var(name),
        };
        if let Some(seen) = self.seen {
            let mut vars = seen.get();
            vars.mark(name);
            seen.set(vars);
        }
        Some(value)
    }

    fn eval_func(&self, name: &str, args: &[f64]) -> Result<f64, FuncEvalError> {
        self.base.eval_func(name, args)
    }
}
