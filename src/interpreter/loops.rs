//! Loop statement execution (`while`, `do-while`, `for`).
//!
//! Adds `impl Interpreter` methods for the three loop forms supported by the
//! C subset. The body's [`Flow`] is folded into a [`LoopBodyResult`] so each
//! loop driver only decides whether to iterate, stop, or unwind.

use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::output::Sink;
use crate::parser::ast::{Expr, Stmt};

/// Result returned by [`Interpreter::execute_loop_body`] to signal how the body ended.
pub(crate) enum LoopBodyResult {
    /// Body completed normally or via `continue`: the loop should iterate again.
    Continue,
    /// `break` was encountered: the loop should exit cleanly.
    Break,
    /// `return` was executed: the loop unwinds and hands the flow to its caller.
    Exit(Flow),
}

impl<S: Sink> Interpreter<S> {
    /// Executes all statements in `body` inside a fresh scope.
    pub(crate) fn execute_loop_body(&mut self, body: &[Stmt]) -> Result<LoopBodyResult, RuntimeError> {
        Ok(match self.execute_block(body)? {
            Flow::Normal | Flow::Continue => LoopBodyResult::Continue,
            Flow::Break => LoopBodyResult::Break,
            flow @ Flow::Return(_) => LoopBodyResult::Exit(flow),
        })
    }

    /// Executes a `while (condition) { body }` loop.
    pub(crate) fn execute_while(&mut self, condition: &Expr, body: &[Stmt]) -> Result<Flow, RuntimeError> {
        while self.evaluate_condition(condition)? {
            match self.execute_loop_body(body)? {
                LoopBodyResult::Exit(flow) => return Ok(flow),
                LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }
        }

        Ok(Flow::Normal)
    }

    /// Executes a `do { body } while (condition)` loop.
    ///
    /// The body always runs at least once; `continue` jumps to the condition.
    pub(crate) fn execute_do_while(&mut self, body: &[Stmt], condition: &Expr) -> Result<Flow, RuntimeError> {
        loop {
            match self.execute_loop_body(body)? {
                LoopBodyResult::Exit(flow) => return Ok(flow),
                LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }

            if !self.evaluate_condition(condition)? {
                break;
            }
        }

        Ok(Flow::Normal)
    }

    /// Executes a `for (init; condition; step) { body }` loop.
    ///
    /// `init`, `condition`, and `step` are all optional, matching C semantics.
    /// A missing condition is treated as always-true. The initializer lives in
    /// a scope that is exited when the loop ends.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        step: Option<&Expr>,
        body: &[Stmt],
    ) -> Result<Flow, RuntimeError> {
        self.env.enter_block();
        let result = self.run_for(init, condition, step, body);
        self.env.exit_block();
        result
    }

    fn run_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        step: Option<&Expr>,
        body: &[Stmt],
    ) -> Result<Flow, RuntimeError> {
        if let Some(init) = init {
            self.execute_statement(init)?;
        }

        loop {
            if let Some(condition) = condition {
                if !self.evaluate_condition(condition)? {
                    break;
                }
            }

            match self.execute_loop_body(body)? {
                LoopBodyResult::Exit(flow) => return Ok(flow),
                LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }

            if let Some(step) = step {
                self.evaluate_expr(step)?;
            }
        }

        Ok(Flow::Normal)
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;
    use crate::memory::value::Value;
    use crate::parser::Parser;

    fn eval_int(source: &str) -> i64 {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let mut interp = Interpreter::new(program).unwrap();
        match interp.evaluate("f", Vec::new()).unwrap() {
            Value::Int(n) => n,
            other => panic!("Expected int, got {:?}", other),
        }
    }

    #[test]
    fn test_while_loop() {
        assert_eq!(eval_int("int f() { int i = 0; while (i < 5) { i++; } return i; }"), 5);
    }

    #[test]
    fn test_for_zero_iterations() {
        assert_eq!(
            eval_int("int f() { int n = 0; for (int i = 10; i < 5; i++) { n++; } return n; }"),
            0
        );
    }

    #[test]
    fn test_sequential_for_loops_reuse_name() {
        let source = "int f() { int s = 0; \
                      for (int i = 0; i < 3; i++) { s += i; } \
                      for (int i = 0; i < 3; i++) { s += i; } \
                      return s; }";
        assert_eq!(eval_int(source), 6);
    }

    #[test]
    fn test_break_and_continue() {
        let source = "int f() { int s = 0; \
                      for (int i = 0; i < 10; i++) { \
                        if (i == 6) { break; } \
                        if (i % 2) { continue; } \
                        s += i; \
                      } \
                      return s; }";
        // 0 + 2 + 4
        assert_eq!(eval_int(source), 6);
    }

    #[test]
    fn test_do_while_runs_once() {
        assert_eq!(eval_int("int f() { int n = 0; do { n++; } while (0); return n; }"), 1);
    }

    #[test]
    fn test_return_from_inside_loop() {
        let source = "int f() { for (;;) { int x = 4; while (1) { return x; } } }";
        assert_eq!(eval_int(source), 4);
    }
}
