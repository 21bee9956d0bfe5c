//! Model-backed analysis flows.
//!
//! Each flow renders a prompt, hands it to a [`LanguageModel`] and parses a
//! JSON answer into a typed response. Requests and responses serialize with
//! camelCase field names. Explanations and calculation steps are Markdown
//! with `$...$` / `$$...$$` LaTeX, see [`split_math`].

use std::io::Write;
use std::process::{Command, Stdio};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::expression::compile;
use crate::error::AnalysisError;

// ---------- Model seam ----------

/// Anything that turns a prompt into a completion.
pub trait LanguageModel: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// Placeholder used when no model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredModel;

impl LanguageModel for UnconfiguredModel {
    fn complete(&self, _prompt: &str) -> Result<String, AnalysisError> {
        Err(AnalysisError::NotConfigured)
    }
}

/// Runs an external program per request: the prompt goes to stdin, the
/// completion is read from stdout.
#[derive(Debug, Clone)]
pub struct CommandModel {
    program: String,
    args: Vec<String>,
}

impl CommandModel {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `argv[0]` is the program; `None` for an empty list.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl LanguageModel for CommandModel {
    fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AnalysisError::Model(format!("failed to start {}: {e}", self.program)))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .map_err(|e| AnalysisError::Model(e.to_string()))?;
        }
        let output = child
            .wait_with_output()
            .map_err(|e| AnalysisError::Model(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnalysisError::Model(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        String::from_utf8(output.stdout).map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
    }
}

// ---------- Request / response types ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainFormulaRequest {
    pub formula: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainFormulaResponse {
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeFunctionRequest {
    pub func: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleVariableAnalysis {
    pub domain: String,
    pub range: String,
    pub first_derivative: String,
    pub second_derivative: String,
    pub calculation_steps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoVariableDomain {
    pub x: String,
    pub y: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoVariableAnalysis {
    pub domain: TwoVariableDomain,
    pub range: String,
    pub partial_derivative_x: String,
    pub partial_derivative_y: String,
    pub gradient: String,
    pub calculation_steps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionAnalysis {
    TwoVariable(TwoVariableAnalysis),
    SingleVariable(SingleVariableAnalysis),
}

impl FunctionAnalysis {
    pub fn calculation_steps(&self) -> &str {
        match self {
            FunctionAnalysis::SingleVariable(a) => &a.calculation_steps,
            FunctionAnalysis::TwoVariable(a) => &a.calculation_steps,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegralType {
    Double,
    Triple,
}

impl IntegralType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegralType::Double => "double",
            IntegralType::Triple => "triple",
        }
    }
}

/// Integration limits as entered; they may be expressions such as `pi`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntegralLimits {
    pub x_min: String,
    pub x_max: String,
    pub y_min: String,
    pub y_max: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_max: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegralRequest {
    pub func: String,
    pub integral_type: IntegralType,
    pub limits: IntegralLimits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegralResponse {
    pub result: f64,
    pub calculation_steps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LagrangeRequest {
    pub objective_func: String,
    pub constraint_func: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimumPoint {
    /// Coordinates as text, e.g. `(1/√2, 1/√2)`.
    pub point: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LagrangeResponse {
    #[serde(default)]
    pub maxima: Vec<OptimumPoint>,
    #[serde(default)]
    pub minima: Vec<OptimumPoint>,
    pub calculation_steps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaturalTo3dRequest {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaturalTo3dResponse {
    pub func: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LatexConversion {
    latex: String,
}

/// A request for any of the flows.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    ExplainFormula(ExplainFormulaRequest),
    AnalyzeFunction(AnalyzeFunctionRequest),
    CalculateIntegral(IntegralRequest),
    SolveWithLagrange(LagrangeRequest),
    NaturalTo3d(NaturalTo3dRequest),
}

impl AnalysisRequest {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisRequest::ExplainFormula(_) => AnalysisKind::ExplainFormula,
            AnalysisRequest::AnalyzeFunction(_) => AnalysisKind::AnalyzeFunction,
            AnalysisRequest::CalculateIntegral(_) => AnalysisKind::CalculateIntegral,
            AnalysisRequest::SolveWithLagrange(_) => AnalysisKind::SolveWithLagrange,
            AnalysisRequest::NaturalTo3d(_) => AnalysisKind::NaturalTo3d,
        }
    }
}

/// The answer of a successful flow.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Explanation(ExplainFormulaResponse),
    Analysis(FunctionAnalysis),
    Integral(IntegralResponse),
    Optimization(LagrangeResponse),
    Conversion(NaturalTo3dResponse),
}

impl AnalysisOutcome {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisOutcome::Explanation(_) => AnalysisKind::ExplainFormula,
            AnalysisOutcome::Analysis(_) => AnalysisKind::AnalyzeFunction,
            AnalysisOutcome::Integral(_) => AnalysisKind::CalculateIntegral,
            AnalysisOutcome::Optimization(_) => AnalysisKind::SolveWithLagrange,
            AnalysisOutcome::Conversion(_) => AnalysisKind::NaturalTo3d,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    ExplainFormula,
    AnalyzeFunction,
    CalculateIntegral,
    SolveWithLagrange,
    NaturalTo3d,
}

impl AnalysisKind {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::ExplainFormula => "formula explanation",
            AnalysisKind::AnalyzeFunction => "function analysis",
            AnalysisKind::CalculateIntegral => "integral",
            AnalysisKind::SolveWithLagrange => "optimization",
            AnalysisKind::NaturalTo3d => "function conversion",
        }
    }
}

// ---------- Prompts ----------

const JSON_ONLY: &str = "Respond with a single JSON object and nothing else.";

const MATH_FORMAT: &str = "All mathematical expressions must be LaTeX. Calculation steps are Markdown, \
using '$' for inline math and '$$' for display equations.";

fn latex_prompt(formula: &str) -> String {
    format!(
        r#"Convert the following mathematical formula to LaTeX. Answer only with the formula, without any explanation.

Example 1:
Input: e^(i*pi) + 1 = 0
Output: {{"latex": "e^{{i\\pi}} + 1 = 0"}}

Example 2:
Input: f(x) = sum(1/n^2, n=1, inf)
Output: {{"latex": "f(x) = \\sum_{{n=1}}^{{\\infty}} \\frac{{1}}{{n^2}}"}}

{JSON_ONLY} Use the field "latex".

Input: {formula}
Output:"#
    )
}

fn explanation_prompt(latex: &str, language: &str) -> String {
    format!(
        r#"You are an expert assistant who explains mathematical formulas clearly and simply.

Explain the following formula in the user's language. The formula is written in LaTeX.
Formula: {latex}
Language: {language}

{JSON_ONLY} Use the field "explanation"."#
    )
}

fn single_variable_prompt(func: &str) -> String {
    format!(
        r#"You are an expert mathematician. Analyze the function of one variable f(x) = {func}

Steps:
1. Domain: determine the domain of x in interval notation. Without restrictions (division by zero, roots of negative numbers, logarithms of non-positive numbers) the domain is (-∞, ∞).
2. Range: estimate the range from the component functions.
3. First derivative: compute f'(x).
4. Second derivative: compute f''(x).
5. Calculation steps: detail how the derivatives were obtained and which rules were used.

{MATH_FORMAT}
{JSON_ONLY} Fields: "domain", "range", "firstDerivative", "secondDerivative", "calculationSteps"."#
    )
}

fn two_variable_prompt(func: &str) -> String {
    format!(
        r#"You are an expert mathematician. Analyze the function of two variables f(x, y) = {func}

Steps:
1. Domain: determine the domain of x and of y. Without restrictions (division by zero, roots of negative numbers) the domain is (-∞, ∞).
2. Range: estimate the range from the component functions (sin and cos have range [-1, 1]).
3. Partial derivatives:
   a. Compute ∂f/∂x treating y as a constant.
   b. Compute ∂f/∂y treating x as a constant.
4. Gradient: build ∇f = [∂f/∂x, ∂f/∂y].
5. Calculation steps: detail how the partial derivatives were obtained and which rules were used.

Example for f(x, y) = x^2 * y: partialDerivativeX "2xy", partialDerivativeY "x^2", gradient "[2xy, x^2]".

{MATH_FORMAT}
{JSON_ONLY} Fields: "domain" (object with "x" and "y"), "range", "partialDerivativeX", "partialDerivativeY", "gradient", "calculationSteps"."#
    )
}

fn integral_prompt(req: &IntegralRequest) -> String {
    let l = &req.limits;
    let z_line = match (&l.z_min, &l.z_max) {
        (Some(lo), Some(hi)) if req.integral_type == IntegralType::Triple => {
            format!("\n- z from {lo} to {hi}")
        }
        _ => String::new(),
    };
    format!(
        r#"You are an expert mathematician. Solve a multiple integral.

Integrand: f(x, y, z) = {func}
Integral type: {kind}
Limits:
- x from {x_min} to {x_max}
- y from {y_min} to {y_max}{z_line}

Steps:
1. Set up the definite integral with the given limits. A double integral is ∫(y_min..y_max) ∫(x_min..x_max) f(x,y) dx dy; a triple integral adds the z integral.
2. Solve it step by step, innermost integral first.
3. Compute the final numeric result.

If the integral cannot be solved analytically, say that a numerical method is used for the approximation.

{MATH_FORMAT}
{JSON_ONLY} Fields: "result" (a number), "calculationSteps"."#,
        func = req.func,
        kind = req.integral_type.as_str(),
        x_min = l.x_min,
        x_max = l.x_max,
        y_min = l.y_min,
        y_max = l.y_max,
    )
}

fn lagrange_prompt(req: &LagrangeRequest) -> String {
    format!(
        r#"You are an expert in multivariable calculus and optimization. Solve a constrained optimization problem with Lagrange multipliers.

Objective: f(x, y) = {objective}
Constraint: g(x, y) = {constraint} = 0

Steps:
1. Define the Lagrangian L(x, y, λ) = f(x, y) - λ g(x, y).
2. Compute ∇L = [∂L/∂x, ∂L/∂y, ∂L/∂λ].
3. Set the gradient to zero to obtain the system ∂L/∂x = 0, ∂L/∂y = 0, ∂L/∂λ = 0.
4. Solve the system for the critical points (x, y) and λ.
5. Evaluate f at each critical point and classify it as maximum or minimum.

The "maxima" and "minima" arrays must contain every point found, each as {{"point": "(x, y)", "value": number}}.
{MATH_FORMAT}
{JSON_ONLY} Fields: "maxima", "minima", "calculationSteps"."#,
        objective = req.objective_func,
        constraint = req.constraint_func,
    )
}

fn natural_to_3d_prompt(description: &str) -> String {
    format!(
        r#"You are an expert mathematician. Convert a natural-language description of a 3D surface into an explicit formula z = f(x, y).

Rules:
1. The answer must be an expression a graphing calculator can evaluate directly.
2. Use only the variables x and y.
3. For a closed shape such as a sphere, give the upper hemisphere (z >= 0).
4. If the description already is a valid formula, return it unchanged.

Examples:
- "a paraboloid" -> {{"func": "x^2 + y^2"}}
- "a sphere of radius 5" -> {{"func": "sqrt(25 - x^2 - y^2)"}}
- "the plane z = 3" -> {{"func": "3"}}
- "cone" -> {{"func": "sqrt(x^2 + y^2)"}}
- "sin(x) * cos(y)" -> {{"func": "sin(x) * cos(y)"}}
- "saddle" -> {{"func": "x^2 - y^2"}}

{JSON_ONLY} Use the field "func".

Description: {description}"#
    )
}

// ---------- Response parsing ----------

/// The JSON object inside a completion, ignoring Markdown fences and chatter
/// around it.
fn json_body(raw: &str) -> &str {
    let text = raw.trim();
    let text = match text.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
            rest.rsplit_once("```").map(|(body, _)| body).unwrap_or(rest)
        }
        None => text,
    };
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text.trim(),
    }
}

pub fn parse_response<T: DeserializeOwned>(raw: &str) -> Result<T, AnalysisError> {
    serde_json::from_str(json_body(raw)).map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
}

fn require(value: &str, message: &str) -> Result<(), AnalysisError> {
    if value.trim().is_empty() {
        Err(AnalysisError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

// ---------- Flows ----------

/// Two steps: convert the formula to LaTeX, then explain the LaTeX.
pub fn explain_formula(
    model: &dyn LanguageModel,
    req: &ExplainFormulaRequest,
) -> Result<ExplainFormulaResponse, AnalysisError> {
    require(&req.formula, "Formula is required")?;
    let language = if req.language.trim().is_empty() {
        "English"
    } else {
        req.language.trim()
    };

    let raw = model.complete(&latex_prompt(req.formula.trim()))?;
    // a bare formula is accepted as well as the JSON form
    let latex = match parse_response::<LatexConversion>(&raw) {
        Ok(c) => c.latex,
        Err(_) => raw.trim().trim_matches('`').trim().to_string(),
    };
    if latex.trim().is_empty() {
        return Err(AnalysisError::MalformedResponse(
            "could not convert the formula to LaTeX".to_string(),
        ));
    }
    log::debug!("formula converted to LaTeX: {latex}");

    let raw = model.complete(&explanation_prompt(latex.trim(), language))?;
    parse_response(&raw)
}

/// Picks the one- or two-variable analysis from the variables the function uses.
pub fn analyze_function(
    model: &dyn LanguageModel,
    req: &AnalyzeFunctionRequest,
) -> Result<FunctionAnalysis, AnalysisError> {
    require(&req.func, "Function is required")?;
    let func = req.func.trim();
    let two_variable = match compile(func) {
        Ok(f) => {
            let vars = f.free_variables();
            vars.y || vars.z
        }
        Err(_) => true,
    };
    if two_variable {
        let raw = model.complete(&two_variable_prompt(func))?;
        parse_response(&raw).map(FunctionAnalysis::TwoVariable)
    } else {
        let raw = model.complete(&single_variable_prompt(func))?;
        parse_response(&raw).map(FunctionAnalysis::SingleVariable)
    }
}

pub fn calculate_integral(
    model: &dyn LanguageModel,
    req: &IntegralRequest,
) -> Result<IntegralResponse, AnalysisError> {
    require(&req.func, "Function is required")?;
    let l = &req.limits;
    for v in [&l.x_min, &l.x_max, &l.y_min, &l.y_max] {
        require(v, "Limit is required")?;
    }
    if req.integral_type == IntegralType::Triple {
        for v in [&l.z_min, &l.z_max] {
            require(v.as_deref().unwrap_or(""), "z limits are required for triple integrals")?;
        }
    }
    let raw = model.complete(&integral_prompt(req))?;
    parse_response(&raw)
}

pub fn solve_with_lagrange(
    model: &dyn LanguageModel,
    req: &LagrangeRequest,
) -> Result<LagrangeResponse, AnalysisError> {
    require(&req.objective_func, "Objective function is required")?;
    require(&req.constraint_func, "Constraint is required")?;
    let raw = model.complete(&lagrange_prompt(req))?;
    parse_response(&raw)
}

pub fn convert_natural_to_3d(
    model: &dyn LanguageModel,
    req: &NaturalTo3dRequest,
) -> Result<NaturalTo3dResponse, AnalysisError> {
    require(&req.description, "Description is required")?;
    let raw = model.complete(&natural_to_3d_prompt(req.description.trim()))?;
    let resp: NaturalTo3dResponse = parse_response(&raw)?;
    if resp.func.trim().is_empty() {
        return Err(AnalysisError::MalformedResponse("empty function".to_string()));
    }
    Ok(resp)
}

/// Dispatch a request to its flow.
pub fn run(model: &dyn LanguageModel, req: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
    match req {
        AnalysisRequest::ExplainFormula(r) => explain_formula(model, r).map(AnalysisOutcome::Explanation),
        AnalysisRequest::AnalyzeFunction(r) => analyze_function(model, r).map(AnalysisOutcome::Analysis),
        AnalysisRequest::CalculateIntegral(r) => calculate_integral(model, r).map(AnalysisOutcome::Integral),
        AnalysisRequest::SolveWithLagrange(r) => solve_with_lagrange(model, r).map(AnalysisOutcome::Optimization),
        AnalysisRequest::NaturalTo3d(r) => convert_natural_to_3d(model, r).map(AnalysisOutcome::Conversion),
    }
}

// ---------- Math segments ----------

/// A piece of Markdown text with embedded LaTeX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathSegment {
    Text(String),
    InlineMath(String),
    BlockMath(String),
}

/// Split text on `$$block$$` and `$inline$` delimiters.
///
/// An opening delimiter without a matching close is kept as text.
pub fn split_math(text: &str) -> Vec<MathSegment> {
    let mut out: Vec<MathSegment> = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(pos) = rest.find('$') {
        plain.push_str(&rest[..pos]);
        let after = &rest[pos..];
        let block = after.starts_with("$$");
        let delim = if block { "$$" } else { "$" };
        let body = &after[delim.len()..];
        match body.find(delim) {
            Some(end) if !body[..end].trim().is_empty() => {
                if !plain.is_empty() {
                    out.push(MathSegment::Text(std::mem::take(&mut plain)));
                }
                let math = body[..end].trim().to_string();
                out.push(if block {
                    MathSegment::BlockMath(math)
                } else {
                    MathSegment::InlineMath(math)
                });
                rest = &body[end + delim.len()..];
            }
            _ => {
                plain.push_str(delim);
                rest = body;
            }
        }
    }
    plain.push_str(rest);
    if !plain.is_empty() {
        out.push(MathSegment::Text(plain));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned completions and records the prompts it saw.
    struct Scripted {
        replies: Mutex<VecDeque<Result<String, AnalysisError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new<const N: usize>(replies: [&str; N]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl LanguageModel for Scripted {
        fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(AnalysisError::Model("no reply".into())))
        }
    }

    #[test]
    fn explain_converts_then_explains() {
        let model = Scripted::new([
            r#"{"latex": "e^{i\\pi} + 1 = 0"}"#,
            "```json\n{\"explanation\": \"Euler's identity links five constants.\"}\n```",
        ]);
        let resp = explain_formula(
            &model,
            &ExplainFormulaRequest {
                formula: "e^(i*pi) + 1 = 0".into(),
                language: "English".into(),
            },
        )
        .unwrap();
        assert_eq!(resp.explanation, "Euler's identity links five constants.");
        let prompts = model.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains(r"e^{i\pi} + 1 = 0"));
        assert!(prompts[1].contains("Language: English"));
    }

    #[test]
    fn explain_accepts_bare_latex() {
        let model = Scripted::new(["\\frac{a}{b}", r#"{"explanation": "a ratio"}"#]);
        let resp = explain_formula(
            &model,
            &ExplainFormulaRequest {
                formula: "a/b".into(),
                language: String::new(),
            },
        )
        .unwrap();
        assert_eq!(resp.explanation, "a ratio");
        assert!(model.prompts()[1].contains("Language: English"));
    }

    #[test]
    fn analysis_variant_follows_variables() {
        let model = Scripted::new([
            r#"{"domain":"(-∞, ∞)","range":"[0, ∞)","firstDerivative":"2x","secondDerivative":"2","calculationSteps":"$f'(x)=2x$"}"#,
        ]);
        let one = analyze_function(&model, &AnalyzeFunctionRequest { func: "x^2".into() }).unwrap();
        assert!(matches!(one, FunctionAnalysis::SingleVariable(ref a) if a.first_derivative == "2x"));

        let model = Scripted::new([
            r#"{"domain":{"x":"(-∞, ∞)","y":"(-∞, ∞)"},"range":"(-∞, ∞)","partialDerivativeX":"2xy","partialDerivativeY":"x^2","gradient":"[2xy, x^2]","calculationSteps":"..."}"#,
        ]);
        let two = analyze_function(&model, &AnalyzeFunctionRequest { func: "x^2*y".into() }).unwrap();
        match two {
            FunctionAnalysis::TwoVariable(a) => assert_eq!(a.gradient, "[2xy, x^2]"),
            other => panic!("expected two-variable analysis, got {other:?}"),
        }
        assert!(model.prompts()[0].contains("f(x, y) = x^2*y"));
    }

    #[test]
    fn triple_integral_requires_z_limits() {
        let model = Scripted::new([]);
        let mut req = IntegralRequest {
            func: "x*y*z".into(),
            integral_type: IntegralType::Triple,
            limits: IntegralLimits {
                x_min: "0".into(),
                x_max: "1".into(),
                y_min: "0".into(),
                y_max: "1".into(),
                z_min: None,
                z_max: None,
            },
        };
        assert!(matches!(calculate_integral(&model, &req), Err(AnalysisError::Validation(_))));
        assert!(model.prompts().is_empty());

        req.limits.z_min = Some("0".into());
        req.limits.z_max = Some("2".into());
        let model = Scripted::new([r#"{"result": 0.5, "calculationSteps": "$$\\int_0^2 z\\,dz$$"}"#]);
        let resp = calculate_integral(&model, &req).unwrap();
        assert_eq!(resp.result, 0.5);
        assert!(model.prompts()[0].contains("- z from 0 to 2"));
    }

    #[test]
    fn integral_request_serializes_like_the_form() {
        let req = IntegralRequest {
            func: "x*y".into(),
            integral_type: IntegralType::Double,
            limits: IntegralLimits {
                x_min: "0".into(),
                x_max: "1".into(),
                y_min: "0".into(),
                y_max: "2".into(),
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["integralType"], "double");
        assert_eq!(json["limits"]["y_max"], "2");
        assert!(json["limits"].get("z_min").is_none());
    }

    #[test]
    fn lagrange_parses_points() {
        let model = Scripted::new([
            r#"Here you go: {"maxima":[{"point":"(1/√2, 1/√2)","value":0.5}],"minima":[{"point":"(1/√2, -1/√2)","value":-0.5}],"calculationSteps":"..."}"#,
        ]);
        let resp = solve_with_lagrange(
            &model,
            &LagrangeRequest {
                objective_func: "x*y".into(),
                constraint_func: "x^2 + y^2 - 1".into(),
            },
        )
        .unwrap();
        assert_eq!(resp.maxima.len(), 1);
        assert_eq!(resp.minima[0].value, -0.5);
    }

    #[test]
    fn empty_inputs_never_reach_the_model() {
        let model = Scripted::new([]);
        let err = solve_with_lagrange(
            &model,
            &LagrangeRequest {
                objective_func: "x".into(),
                constraint_func: "  ".into(),
            },
        );
        assert_eq!(err, Err(AnalysisError::Validation("Constraint is required".into())));
        assert!(convert_natural_to_3d(&model, &NaturalTo3dRequest { description: String::new() }).is_err());
        assert!(model.prompts().is_empty());
    }

    #[test]
    fn malformed_and_unconfigured() {
        let model = Scripted::new(["I cannot help with that."]);
        let err = convert_natural_to_3d(&model, &NaturalTo3dRequest { description: "a cone".into() });
        assert!(matches!(err, Err(AnalysisError::MalformedResponse(_))));

        let req = AnalysisRequest::NaturalTo3d(NaturalTo3dRequest { description: "a cone".into() });
        assert_eq!(run(&UnconfiguredModel, &req), Err(AnalysisError::NotConfigured));
    }

    #[test]
    fn split_math_segments() {
        let segs = split_math("Let $f(x)=x^2$. Then $$f'(x) = 2x$$ done");
        assert_eq!(
            segs,
            vec![
                MathSegment::Text("Let ".into()),
                MathSegment::InlineMath("f(x)=x^2".into()),
                MathSegment::Text(". Then ".into()),
                MathSegment::BlockMath("f'(x) = 2x".into()),
                MathSegment::Text(" done".into()),
            ]
        );
    }

    #[test]
    fn unterminated_math_stays_text() {
        assert_eq!(split_math("costs $5 today"), vec![MathSegment::Text("costs $5 today".into())]);
        assert_eq!(split_math("$$x"), vec![MathSegment::Text("$$x".into())]);
        assert!(split_math("").is_empty());
    }
}
