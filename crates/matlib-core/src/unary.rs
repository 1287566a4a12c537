use std::fmt;

use num_traits::Float;

/// In-place element-wise math functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// x := x * x
    Square,
    Sqrt,
    /// x := e ^ x
    Exp,
    /// Natural logarithm.
    Log,
    Tanh,
    Sin,
    Cos,
    Tan,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 8] = [
        UnaryOp::Square,
        UnaryOp::Sqrt,
        UnaryOp::Exp,
        UnaryOp::Log,
        UnaryOp::Tanh,
        UnaryOp::Sin,
        UnaryOp::Cos,
        UnaryOp::Tan,
    ];

    #[inline]
    pub fn apply<T: Float>(self, v: T) -> T {
        match self {
            UnaryOp::Square => v * v,
            UnaryOp::Sqrt => v.sqrt(),
            UnaryOp::Exp => v.exp(),
            UnaryOp::Log => v.ln(),
            UnaryOp::Tanh => v.tanh(),
            UnaryOp::Sin => v.sin(),
            UnaryOp::Cos => v.cos(),
            UnaryOp::Tan => v.tan(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnaryOp::Square => "square",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Exp => "exp",
            UnaryOp::Log => "log",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_apply() {
        assert_eq!(UnaryOp::Square.apply(-3.0f32), 9.0);
        assert_eq!(UnaryOp::Sqrt.apply(16.0f64), 4.0);
        assert_relative_eq!(UnaryOp::Exp.apply(1.0f64), std::f64::consts::E);
        assert_relative_eq!(UnaryOp::Log.apply(std::f64::consts::E), 1.0);
        assert_eq!(UnaryOp::Tanh.apply(0.0f32), 0.0);
        assert_relative_eq!(UnaryOp::Sin.apply(std::f64::consts::FRAC_PI_2), 1.0);
        assert_relative_eq!(UnaryOp::Cos.apply(0.0f64), 1.0);
        assert_relative_eq!(UnaryOp::Tan.apply(std::f64::consts::FRAC_PI_4), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_domain_errors_yield_nan() {
        assert!(UnaryOp::Sqrt.apply(-1.0f64).is_nan());
        assert!(UnaryOp::Log.apply(-1.0f32).is_nan());
        assert_eq!(UnaryOp::Log.apply(0.0f64), f64::NEG_INFINITY);
    }

    #[test]
    fn test_names_are_distinct() {
        let mut names: Vec<_> = UnaryOp::ALL.iter().map(|op| op.to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), UnaryOp::ALL.len());
    }
}
