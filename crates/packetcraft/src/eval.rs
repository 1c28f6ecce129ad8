//! Reduction of a [Packet] tree to a single value.
//!
//! Children are evaluated left to right before their operator is applied.
//! Arithmetic is checked: a sum or product that leaves `u64` is an error,
//! never a wrapped or rounded value.

use crate::{
    config::Limits,
    errors::EvalError,
    packet::{Operator, Packet, PacketKind},
};

/// Packet evaluator with configurable [Limits].
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    limits: Limits,
}

impl Evaluator {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn evaluate(&self, packet: &Packet) -> Result<u64, EvalError> {
        self.evaluate_at(packet, 1)
    }

    fn evaluate_at(&self, packet: &Packet, depth: usize) -> Result<u64, EvalError> {
        if depth > self.limits.max_depth() {
            return Err(EvalError::DepthExceeded {
                max_depth: self.limits.max_depth(),
            });
        }

        match packet.kind() {
            PacketKind::Literal { value } => Ok(*value),
            PacketKind::Operator {
                operator, children, ..
            } => {
                let operands = children
                    .iter()
                    .map(|child| self.evaluate_at(child, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;

                apply(*operator, &operands)
            }
        }
    }
}

/// Applies `operator` to already evaluated operands, in order.
pub fn apply(operator: Operator, operands: &[u64]) -> Result<u64, EvalError> {
    if operator.is_comparison() {
        let &[left, right] = operands else {
            return Err(EvalError::Arity {
                operator,
                expected: 2,
                found: operands.len(),
            });
        };

        let holds = match operator {
            Operator::GreaterThan => left > right,
            Operator::LessThan => left < right,
            _ => left == right,
        };

        return Ok(holds as u64);
    }

    if operands.is_empty() {
        return Err(EvalError::NoOperands { operator });
    }

    let result = match operator {
        Operator::Sum => operands
            .iter()
            .try_fold(0u64, |acc, &v| acc.checked_add(v)),
        Operator::Product => operands
            .iter()
            .try_fold(1u64, |acc, &v| acc.checked_mul(v)),
        Operator::Minimum => operands.iter().copied().min(),
        _ => operands.iter().copied().max(),
    };

    result.ok_or(EvalError::Overflow { operator })
}

/// Evaluates `packet` with default [Limits].
pub fn evaluate(packet: &Packet) -> Result<u64, EvalError> {
    Evaluator::default().evaluate(packet)
}
