//! Transform function lists (`translate(10px, 0px) rotate(45deg)`).
//!
//! Each argument of each function becomes its own numeric or dimensional
//! channel. A function missing from a keyframe, or an argument missing from a
//! function, takes the function's identity value, so every keyframe lists the
//! same functions in the same order.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{AnimationError, Result};
use crate::spectrum::StyleValueEntry;
use crate::value::{format_number, KeyframeValue};

use super::dimensional::{split_dimension, DimensionalCalculator};
use super::numeric::NumericCalculator;
use super::{Calculator, StyleCalculator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgumentKind {
    Number,
    Length,
    Angle,
}

impl ArgumentKind {
    fn default_unit(self) -> &'static str {
        match self {
            Self::Number => "",
            Self::Length => "px",
            Self::Angle => "deg",
        }
    }
}

struct TransformFunction {
    name: &'static str,
    arguments: &'static [ArgumentKind],
    identity: f64,
}

use ArgumentKind::{Angle, Length, Number};

/// Supported functions, in output order.
const TRANSFORM_FUNCTIONS: &[TransformFunction] = &[
    TransformFunction { name: "translate", arguments: &[Length, Length], identity: 0.0 },
    TransformFunction { name: "translateX", arguments: &[Length], identity: 0.0 },
    TransformFunction { name: "translateY", arguments: &[Length], identity: 0.0 },
    TransformFunction { name: "scale", arguments: &[Number, Number], identity: 1.0 },
    TransformFunction { name: "scaleX", arguments: &[Number], identity: 1.0 },
    TransformFunction { name: "scaleY", arguments: &[Number], identity: 1.0 },
    TransformFunction { name: "rotate", arguments: &[Angle], identity: 0.0 },
    TransformFunction { name: "skew", arguments: &[Angle, Angle], identity: 0.0 },
    TransformFunction { name: "skewX", arguments: &[Angle], identity: 0.0 },
    TransformFunction { name: "skewY", arguments: &[Angle], identity: 0.0 },
];

fn function_index(name: &str) -> Option<usize> {
    TRANSFORM_FUNCTIONS
        .iter()
        .position(|function| function.name == name)
}

/// Split a transform list into `(name, arguments)` pairs.
///
/// `none` and the empty string are the empty list. Arguments may be separated
/// by commas or whitespace.
pub fn parse_transform_list(value: &str) -> Option<Vec<(&str, Vec<&str>)>> {
    let mut rest = value.trim();
    if rest == "none" {
        return Some(Vec::new());
    }

    let mut functions = Vec::new();
    while !rest.is_empty() {
        let open = rest.find('(')?;
        let close = open + rest[open..].find(')')?;
        let name = rest[..open].trim();
        if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return None;
        }

        let arguments = rest[open + 1..close]
            .split(|ch: char| ch == ',' || ch.is_whitespace())
            .filter(|argument| !argument.is_empty())
            .collect();
        functions.push((name, arguments));
        rest = rest[close + 1..].trim_start();
    }
    Some(functions)
}

/// One function of the output list and a channel per argument.
#[derive(Debug, Clone)]
struct TransformComponent {
    function: usize,
    arguments: Vec<Calculator>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformCalculator {
    property: String,
    components: Vec<TransformComponent>,
    segments: usize,
}

impl TransformCalculator {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ..Self::default()
        }
    }

    /// Function names present in the output, in order.
    pub fn functions(&self) -> Vec<&'static str> {
        self.components
            .iter()
            .map(|component| TRANSFORM_FUNCTIONS[component.function].name)
            .collect()
    }

    fn parse_keyframe(&self, text: &str) -> Result<BTreeMap<usize, Vec<String>>> {
        let invalid = || AnimationError::invalid_value(&self.property, text);
        let functions = parse_transform_list(text).ok_or_else(invalid)?;

        let mut by_function = BTreeMap::new();
        for (name, arguments) in functions {
            let index = function_index(name).ok_or_else(invalid)?;
            let arity = TRANSFORM_FUNCTIONS[index].arguments.len();
            if arguments.is_empty() || arguments.len() > arity {
                return Err(invalid());
            }
            let arguments = arguments.into_iter().map(str::to_string).collect();
            if by_function.insert(index, arguments).is_some() {
                return Err(invalid());
            }
        }
        Ok(by_function)
    }

    fn build_component(
        &self,
        index: usize,
        keyframes: &[BTreeMap<usize, Vec<String>>],
        values: &[StyleValueEntry],
    ) -> Result<TransformComponent> {
        let function = &TRANSFORM_FUNCTIONS[index];
        let mut arguments = Vec::with_capacity(function.arguments.len());

        for (position, &kind) in function.arguments.iter().enumerate() {
            let explicit: Vec<Option<&str>> = keyframes
                .iter()
                .map(|functions| {
                    functions
                        .get(&index)
                        .and_then(|arguments| arguments.get(position))
                        .map(String::as_str)
                })
                .collect();

            // Fill gaps with the identity in the unit the keyframes already use.
            let unit = explicit
                .iter()
                .flatten()
                .filter_map(|argument| split_dimension(argument).map(|(_, unit)| unit))
                .find(|unit| !unit.is_empty())
                .unwrap_or(kind.default_unit());
            let identity = format!("{}{}", format_number(function.identity), unit);

            let channel: Vec<StyleValueEntry> = explicit
                .iter()
                .zip(values)
                .map(|(argument, entry)| {
                    let text = argument.map_or_else(|| identity.clone(), str::to_string);
                    StyleValueEntry::new(KeyframeValue::Text(text), entry.offset)
                })
                .collect();

            let mut calculator = match kind {
                ArgumentKind::Number => Calculator::Numeric(NumericCalculator::new(&self.property)),
                ArgumentKind::Length | ArgumentKind::Angle => Calculator::Dimensional(
                    DimensionalCalculator::with_default_unit(&self.property, kind.default_unit()),
                ),
            };
            calculator.set_range(&channel)?;
            arguments.push(calculator);
        }

        Ok(TransformComponent {
            function: index,
            arguments,
        })
    }
}

impl StyleCalculator for TransformCalculator {
    fn set_range(&mut self, values: &[StyleValueEntry]) -> Result<()> {
        if values.len() < 2 {
            return Err(AnimationError::partial(format!(
                "{} needs at least two keyframe values",
                self.property
            )));
        }

        let keyframes = values
            .iter()
            .map(|entry| self.parse_keyframe(&entry.value.to_style_string()))
            .collect::<Result<Vec<_>>>()?;

        let used: BTreeSet<usize> = keyframes
            .iter()
            .flat_map(|functions| functions.keys().copied())
            .collect();

        self.components = used
            .into_iter()
            .map(|index| self.build_component(index, &keyframes, values))
            .collect::<Result<Vec<_>>>()?;
        self.segments = values.len() - 1;
        Ok(())
    }

    fn calculate(&self, index: usize, p: f64) -> String {
        if self.components.is_empty() {
            return "none".to_string();
        }

        self.components
            .iter()
            .map(|component| {
                let arguments: Vec<String> = component
                    .arguments
                    .iter()
                    .map(|argument| argument.calculate(index, p))
                    .collect();
                format!(
                    "{}({})",
                    TRANSFORM_FUNCTIONS[component.function].name,
                    arguments.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn segment_count(&self) -> usize {
        self.segments
    }
}
