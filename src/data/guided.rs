//! Static walkthrough shown in guided mode: the gradient of `sin(x) cos(y)`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuidedStep {
    pub title: &'static str,
    /// LaTeX.
    pub formula: &'static str,
    pub explanation: &'static str,
}

pub const GUIDED_STEPS: [GuidedStep; 7] = [
    GuidedStep {
        title: "1. Original function",
        formula: r"f(x, y) = \sin(x) \cos(y)",
        explanation: "This is the function we want to analyze.",
    },
    GuidedStep {
        title: "2. Differentiate with respect to x",
        formula: r"\frac{\partial f}{\partial x} = \frac{\partial}{\partial x} (\sin(x) \cos(y))",
        explanation: "Treat y as a constant and apply the derivative rule for sin(x).",
    },
    GuidedStep {
        title: "Result for ∂f/∂x",
        formula: r"\frac{\partial f}{\partial x} = \cos(x) \cos(y)",
        explanation: "The derivative of sin(x) is cos(x).",
    },
    GuidedStep {
        title: "3. Differentiate with respect to y",
        formula: r"\frac{\partial f}{\partial y} = \frac{\partial}{\partial y} (\sin(x) \cos(y))",
        explanation: "Now treat x as a constant and differentiate cos(y).",
    },
    GuidedStep {
        title: "Result for ∂f/∂y",
        formula: r"\frac{\partial f}{\partial y} = -\sin(x) \sin(y)",
        explanation: "The derivative of cos(y) is -sin(y).",
    },
    GuidedStep {
        title: "4. Build the gradient vector",
        formula: r"\nabla f = \left[ \frac{\partial f}{\partial x}, \frac{\partial f}{\partial y} \right]",
        explanation: "The gradient is the vector of partial derivatives.",
    },
    GuidedStep {
        title: "Final gradient",
        formula: r"\nabla f = [\cos(x)\cos(y), -\sin(x)\sin(y)]",
        explanation: "This vector points in the direction of steepest ascent at any point (x, y).",
    },
];
