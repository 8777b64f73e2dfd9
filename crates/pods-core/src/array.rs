//! Numeric array conversion.
//!
//! Builds an `ArrayD<f64>` from an existing array, a scalar number (a 0-d
//! array) or a rectangular nesting of tuples and lists whose leaves are
//! numbers or booleans. Nested arrays are accepted as sub-blocks.

use ndarray::{ArrayD, IxDyn};

use crate::error::CastError;
use crate::value::Value;

/// Convert `value` into a numeric array.
pub fn to_array(value: &Value) -> Result<ArrayD<f64>, CastError> {
    match value {
        Value::Array(a) => Ok(a.clone()),
        Value::Tuple(_) | Value::List(_) => {
            let shape = discover_shape(value);
            let mut data = Vec::new();
            fill(value, 0, &shape, &mut data)?;
            ArrayD::from_shape_vec(IxDyn(&shape), data).map_err(|e| CastError::new(e.to_string()))
        }
        scalar => {
            let x = scalar_to_f64(scalar)?;
            Ok(ArrayD::from_elem(IxDyn(&[]), x))
        }
    }
}

/// Shape implied by following the first element at every depth.
fn discover_shape(value: &Value) -> Vec<usize> {
    let mut shape = Vec::new();
    let mut current = value;
    loop {
        match current {
            Value::Tuple(items) | Value::List(items) => {
                shape.push(items.len());
                match items.first() {
                    Some(first) => current = first,
                    None => break,
                }
            }
            Value::Array(a) => {
                shape.extend_from_slice(a.shape());
                break;
            }
            _ => break,
        }
    }
    shape
}

fn fill(value: &Value, dim: usize, shape: &[usize], data: &mut Vec<f64>) -> Result<(), CastError> {
    match value {
        Value::Tuple(items) | Value::List(items) => {
            if dim >= shape.len() || items.len() != shape[dim] {
                return Err(inhomogeneous(shape));
            }
            for item in items {
                fill(item, dim + 1, shape, data)?;
            }
            Ok(())
        }
        Value::Array(a) => {
            if a.shape() != &shape[dim.min(shape.len())..] {
                return Err(inhomogeneous(shape));
            }
            data.extend(a.iter().copied());
            Ok(())
        }
        scalar => {
            if dim != shape.len() {
                return Err(inhomogeneous(shape));
            }
            data.push(scalar_to_f64(scalar)?);
            Ok(())
        }
    }
}

fn scalar_to_f64(value: &Value) -> Result<f64, CastError> {
    match value {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(x) => Ok(*x),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => Err(CastError::new(format!(
            "cannot convert {} value {other} to a numeric array element",
            other.type_name()
        ))),
    }
}

fn inhomogeneous(shape: &[usize]) -> CastError {
    CastError::new(format!(
        "the requested array has an inhomogeneous shape after {} dimensions, detected shape was {shape:?}",
        shape.len()
    ))
}
