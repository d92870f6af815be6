//! Argument values and argument-shape contracts
//!
//! Operations in the global table declare one or more accepted shapes, each a list of
//! [`Param`]s. Arguments are checked against those shapes at call time, so a call made
//! through the dynamically typed path (`Script::invoke`, manifests) gets the same guarantee
//! as one made through a generated method.

use super::error::{Result, ScriptError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single operation argument
///
/// Text is emitted verbatim in commands and directives and double-quoted in function
/// calls. Numbers are always emitted literally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Arg {
    pub fn is_number(&self) -> bool {
        matches!(self, Arg::Int(_) | Arg::Float(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Arg::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Render the argument as it appears inside a function call
    pub fn to_function_arg(&self) -> String {
        match self {
            // Literal quotes are escaped by doubling them
            Arg::Text(text) => format!("\"{}\"", text.replace('"', "\"\"")),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(n) => write!(f, "{n}"),
            Arg::Float(n) => write!(f, "{n}"),
            Arg::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Arg::Text(text.to_string())
    }
}

impl From<String> for Arg {
    fn from(text: String) -> Self {
        Arg::Text(text)
    }
}

impl From<&String> for Arg {
    fn from(text: &String) -> Self {
        Arg::Text(text.clone())
    }
}

impl From<i32> for Arg {
    fn from(n: i32) -> Self {
        Arg::Int(n.into())
    }
}

impl From<u32> for Arg {
    fn from(n: u32) -> Self {
        Arg::Int(n.into())
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Int(n)
    }
}

impl From<f32> for Arg {
    fn from(n: f32) -> Self {
        Arg::Float(n.into())
    }
}

impl From<f64> for Arg {
    fn from(n: f64) -> Self {
        Arg::Float(n)
    }
}

/// Conversion into an argument list
///
/// Implemented for single values, tuples of up to four values, `()` and slices or vectors
/// of [`Arg`], so generated methods read naturally: `.sleep(100)`,
/// `.set_key_delay((10, 20))`, `.sound_beep(())`.
pub trait IntoArgs {
    fn into_args(self) -> Vec<Arg>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Arg> {
        Vec::new()
    }
}

impl IntoArgs for Vec<Arg> {
    fn into_args(self) -> Vec<Arg> {
        self
    }
}

impl IntoArgs for &[Arg] {
    fn into_args(self) -> Vec<Arg> {
        self.to_vec()
    }
}

impl<const N: usize> IntoArgs for [Arg; N] {
    fn into_args(self) -> Vec<Arg> {
        self.into()
    }
}

macro_rules! scalar_into_args {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoArgs for $ty {
                fn into_args(self) -> Vec<Arg> {
                    vec![Arg::from(self)]
                }
            }
        )*
    };
}

scalar_into_args!(Arg, &str, String, &String, i32, u32, i64, f32, f64);

macro_rules! tuple_into_args {
    ($($name:ident),+) => {
        impl<$($name: Into<Arg>),+> IntoArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<Arg> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

tuple_into_args!(A);
tuple_into_args!(A, B);
tuple_into_args!(A, B, C);
tuple_into_args!(A, B, C, D);

/// One parameter slot in an operation's argument shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    /// Any text argument
    Text,
    /// An integer or floating point argument
    Number,
    /// Text equal to one of the listed choices
    OneOf(&'static [&'static str]),
}

impl Param {
    pub fn accepts(&self, arg: &Arg) -> bool {
        match (self, arg) {
            (Param::Text, Arg::Text(_)) => true,
            (Param::Number, Arg::Int(_)) => true,
            // NaN and the infinities have no literal form
            (Param::Number, Arg::Float(n)) => n.is_finite(),
            (Param::OneOf(choices), Arg::Text(text)) => choices.contains(&text.as_str()),
            _ => false,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Param::Text => "text".to_string(),
            Param::Number => "a number".to_string(),
            Param::OneOf(choices) => format!("one of {}", choices.join("|")),
        }
    }
}

/// Check `args` against every accepted shape of `operation`
///
/// Succeeds when at least one shape matches both in length and in parameter types.
pub fn check_shapes(operation: &str, shapes: &[&[Param]], args: &[Arg]) -> Result<()> {
    let fits = |shape: &&[Param]| {
        shape.len() == args.len() && shape.iter().zip(args).all(|(param, arg)| param.accepts(arg))
    };
    if shapes.iter().any(fits) {
        return Ok(());
    }

    let arities: BTreeSet<usize> = shapes.iter().map(|shape| shape.len()).collect();
    if !arities.contains(&args.len()) {
        return Err(ScriptError::invalid_argument(
            operation,
            format!(
                "expected {} argument(s), got {}",
                describe_arities(&arities),
                args.len()
            ),
        ));
    }

    // Report the first mismatch against the first shape of the right length
    let reason = shapes
        .iter()
        .filter(|shape| shape.len() == args.len())
        .flat_map(|shape| shape.iter().zip(args).enumerate())
        .find(|(_, (param, arg))| !param.accepts(arg))
        .map(|(index, (param, arg))| {
            format!(
                "argument {} must be {}, got {:?}",
                index + 1,
                param.describe(),
                arg.to_string()
            )
        })
        .unwrap_or_else(|| "arguments do not match any accepted shape".to_string());

    Err(ScriptError::invalid_argument(operation, reason))
}

fn describe_arities(arities: &BTreeSet<usize>) -> String {
    let counts: Vec<String> = arities.iter().map(|n| n.to_string()).collect();
    match counts.as_slice() {
        [] => "no".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOGGLE: &[&str] = &["On", "Off", "Toggle"];

    #[test]
    fn test_display_and_function_rendering() {
        assert_eq!(Arg::from("5ms").to_string(), "5ms");
        assert_eq!(Arg::from(200).to_string(), "200");
        assert_eq!(Arg::from(0.5).to_string(), "0.5");

        assert_eq!(Arg::from("LShift").to_function_arg(), "\"LShift\"");
        assert_eq!(Arg::from(3).to_function_arg(), "3");
        assert_eq!(Arg::from("say \"hi\"").to_function_arg(), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_into_args_variants() {
        assert!(().into_args().is_empty());
        assert_eq!(100_i64.into_args(), vec![Arg::Int(100)]);
        assert_eq!(
            ("LShift", "P").into_args(),
            vec![Arg::from("LShift"), Arg::from("P")]
        );
        assert_eq!(
            (200_i32, 10.5_f64).into_args(),
            vec![Arg::Int(200), Arg::Float(10.5)]
        );
        assert_eq!([Arg::from("a")].into_args(), vec![Arg::from("a")]);
    }

    #[test]
    fn test_param_accepts() {
        assert!(Param::Text.accepts(&Arg::from("x")));
        assert!(!Param::Text.accepts(&Arg::from(1)));
        assert!(Param::Number.accepts(&Arg::from(1)));
        assert!(Param::Number.accepts(&Arg::from(1.5)));
        assert!(!Param::Number.accepts(&Arg::from("1")));
        assert!(!Param::Number.accepts(&Arg::Float(f64::NAN)));
        assert!(!Param::Number.accepts(&Arg::Float(f64::INFINITY)));
        assert!(!Param::Number.accepts(&Arg::Float(f64::NEG_INFINITY)));
        assert!(Param::OneOf(TOGGLE).accepts(&Arg::from("Toggle")));
        assert!(!Param::OneOf(TOGGLE).accepts(&Arg::from("toggle")));
    }

    #[test]
    fn test_check_shapes_accepts_any_alternative() {
        let shapes: &[&[Param]] = &[&[], &[Param::OneOf(TOGGLE)]];
        assert!(check_shapes("Suspend", shapes, &[]).is_ok());
        assert!(check_shapes("Suspend", shapes, &[Arg::from("On")]).is_ok());
    }

    #[test]
    fn test_check_shapes_reports_arity() {
        let shapes: &[&[Param]] = &[&[], &[Param::Number], &[Param::Number, Param::Number]];
        let err = check_shapes("SoundBeep", shapes, &[1.into(), 2.into(), 3.into()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid arguments for 'SoundBeep': expected 0, 1 or 2 argument(s), got 3"
        );
    }

    #[test]
    fn test_check_shapes_reports_type() {
        let shapes: &[&[Param]] = &[&[Param::Number]];
        let err = check_shapes("Sleep", shapes, &["soon".into()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid arguments for 'Sleep': argument 1 must be a number, got \"soon\""
        );
    }

    #[test]
    fn test_check_shapes_rejects_non_finite() {
        let shapes: &[&[Param]] = &[&[Param::Number]];
        let err = check_shapes("Sleep", shapes, &[Arg::Float(f64::NAN)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid arguments for 'Sleep': argument 1 must be a number, got \"NaN\""
        );
    }

    #[test]
    fn test_untagged_deserialization() {
        let args: Vec<Arg> = serde_json::from_str(r#"[2, 0.5, "Input"]"#).unwrap();
        assert_eq!(args, vec![Arg::Int(2), Arg::Float(0.5), Arg::from("Input")]);
    }
}
