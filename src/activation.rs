//! Activation functions, addressed by name.
//!
//! Genomes never store activation functions; collaborators that turn a genome
//! into an executable network look them up by name. Built-in functions form
//! the closed [`Activation`] enum. Extensions are added explicitly to an
//! [`ActivationRegistry`], which refuses to overwrite an existing name.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Built-in activation function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Activation {
    /// Rectified Linear Unit: f(x) = max(0, x)
    ReLU,
    /// Leaky ReLU: f(x) = max(0.01x, x)
    LeakyReLU,
    /// Sigmoid: f(x) = 1 / (1 + e^(-x))
    #[default]
    Sigmoid,
    /// Hyperbolic tangent: f(x) = tanh(x)
    Tanh,
    /// Identity function: f(x) = x
    Identity,
    /// Binary step: f(x) = 1 if x >= 0 else 0
    BinaryStep,
    /// Gaussian: f(x) = e^(-x^2)
    Gaussian,
    /// Absolute value: f(x) = |x|
    Absolute,
    /// Softsign: f(x) = x / (1 + |x|)
    Softsign,
    /// Sine: f(x) = sin(x)
    Sine,
}

impl Activation {
    /// All built-in activation functions.
    pub const ALL: [Self; 10] = [
        Self::ReLU,
        Self::LeakyReLU,
        Self::Sigmoid,
        Self::Tanh,
        Self::Identity,
        Self::BinaryStep,
        Self::Gaussian,
        Self::Absolute,
        Self::Softsign,
        Self::Sine,
    ];

    /// The lookup key of this function.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReLU => "relu",
            Self::LeakyReLU => "lrelu",
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
            Self::Identity => "identity",
            Self::BinaryStep => "binary_step",
            Self::Gaussian => "gaussian",
            Self::Absolute => "absolute",
            Self::Softsign => "softsign",
            Self::Sine => "sin",
        }
    }

    /// Apply this activation function to an input value.
    ///
    /// NaN propagates through every function.
    #[inline]
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }

        match self {
            Self::ReLU => x.max(0.0),
            Self::LeakyReLU => x.max(0.01 * x),
            Self::Sigmoid => {
                // Clamp to avoid overflow in exp: sigmoid(-709) ≈ 0, sigmoid(709) ≈ 1
                let clamped = x.clamp(-709.0, 709.0);
                1.0 / (1.0 + (-clamped).exp())
            }
            Self::Tanh => x.tanh(),
            Self::Identity => x,
            Self::BinaryStep => {
                if x >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Gaussian => (-x * x).exp(),
            Self::Absolute => x.abs(),
            Self::Softsign => {
                if x.is_infinite() {
                    return x.signum();
                }
                x / (1.0 + x.abs())
            }
            Self::Sine => {
                // sin(infinity) is undefined
                if x.is_infinite() {
                    return 0.0;
                }
                x.sin()
            }
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = ActivationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| ActivationError::NotFound(name.to_owned()))
    }
}

/// Errors raised by the activation lookup table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
    #[error("Activation function {0} not found")]
    NotFound(String),
    #[error("Activation function {0} already exists")]
    DuplicateRegistration(String),
}

/// A resolved activation function: built-in or registered extension.
#[derive(Clone)]
pub enum ActivationFn {
    Builtin(Activation),
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl ActivationFn {
    /// Apply the function.
    #[inline]
    #[must_use]
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Self::Builtin(activation) => activation.apply(x),
            Self::Custom(f) => f(x),
        }
    }
}

impl fmt::Debug for ActivationFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(activation) => f.debug_tuple("Builtin").field(activation).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Name-keyed table of activation functions.
#[derive(Debug, Clone, Default)]
pub struct ActivationRegistry {
    table: BTreeMap<String, ActivationFn>,
}

impl ActivationRegistry {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding every built-in [`Activation`] under its name.
    #[must_use]
    pub fn with_builtins() -> Self {
        let table = Activation::ALL
            .into_iter()
            .map(|a| (a.name().to_owned(), ActivationFn::Builtin(a)))
            .collect();
        Self { table }
    }

    /// Register `f` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::DuplicateRegistration`] if `name` is taken;
    /// the existing entry is kept.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> Result<(), ActivationError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let name = name.into();
        if self.table.contains_key(&name) {
            return Err(ActivationError::DuplicateRegistration(name));
        }
        self.table.insert(name, ActivationFn::Custom(Arc::new(f)));
        Ok(())
    }

    /// Resolve `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::NotFound`] for an unregistered name.
    pub fn lookup(&self, name: &str) -> Result<ActivationFn, ActivationError> {
        self.table
            .get(name)
            .cloned()
            .ok_or_else(|| ActivationError::NotFound(name.to_owned()))
    }

    /// Registered names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.table.keys().map(String::as_str)
    }
}
