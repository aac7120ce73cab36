//! Function call evaluation for the Interpreter.

use sable_ir::{Location, Node, NodeKind, StringLookup};
use sable_match::{
    arity_error, call_target_not_identifier, call_target_unknown, EvalError, FunctorValue, Value,
};

use super::Interpreter;

impl Interpreter<'_> {
    /// Evaluate a function call.
    ///
    /// The callee must be an identifier resolving through the function
    /// table. Arguments evaluate left-to-right onto the operand stack; a
    /// restrictive frame is pushed; parameters bind by popping arguments in
    /// reverse with `make_new`; the body's result is left on the stack
    /// after the frame pops.
    #[tracing::instrument(level = "debug", skip_all)]
    pub(super) fn eval_function_call(
        &mut self,
        callee: &Node,
        args: &[Node],
        location: Location,
    ) -> Result<(), EvalError> {
        let NodeKind::VariableReference(name) = &callee.kind else {
            return Err(call_target_not_identifier(callee.kind.kind_name())
                .with_location(callee.location));
        };
        let functor = self
            .functions
            .resolve(*name)
            .cloned()
            .ok_or_else(|| {
                call_target_unknown(self.interner.lookup(*name)).with_location(location)
            })?;

        for arg in args {
            self.eval(arg)?;
        }
        let arg_values = self.stack.pop_n(args.len());

        let result = {
            let mut scoped = self.scoped(true);
            bind_parameters(&mut scoped, &functor, arg_values)?;
            scoped.eval_value(functor.body())?
        };
        self.stack.push(result);
        Ok(())
    }
}

/// Bind arguments to formal parameters in the active (restrictive) frame.
///
/// Without a splat the counts must agree exactly; parameters bind by
/// popping arguments in reverse. With a splat, fixed parameters bind from
/// both ends and the splat takes the middle slice as a new List, mirroring
/// the match-engine splat.
fn bind_parameters(
    interp: &mut Interpreter<'_>,
    functor: &FunctorValue,
    mut args: Vec<Value>,
) -> Result<(), EvalError> {
    let params = functor.params();
    let name = interp.interner.lookup(functor.name());

    let Some(splat_at) = functor.splat_index() else {
        if args.len() != params.len() {
            return Err(arity_error(name, params.len(), args.len()));
        }
        for param in params.iter().rev() {
            let Some(value) = args.pop() else {
                unreachable!("argument count was checked against arity");
            };
            interp.symbols.set(param.name, value, true);
        }
        return Ok(());
    };

    let fixed = functor.fixed_arity();
    if args.len() < fixed {
        return Err(arity_error(name, fixed, args.len()));
    }

    let head = &params[..splat_at];
    let tail = &params[splat_at + 1..];
    let tail_args = args.split_off(args.len() - tail.len());
    let middle = args.split_off(head.len());

    for (param, value) in head.iter().zip(args) {
        interp.symbols.set(param.name, value, true);
    }
    interp
        .symbols
        .set(params[splat_at].name, Value::list(middle), true);
    for (param, value) in tail.iter().zip(tail_args) {
        interp.symbols.set(param.name, value, true);
    }
    Ok(())
}
