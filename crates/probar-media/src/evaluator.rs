//! Media Query Evaluation
//!
//! The mock treats evaluation as a pure function of `(query, viewport)`.
//! [`CssMediaEvaluator`] is the default implementation; any closure with the
//! same shape can be plugged in instead.
//!
//! ```rust,ignore
//! let evaluator = CssMediaEvaluator::new();
//! let viewport = ViewportDescription::new().width("320px");
//! assert!(evaluator.matches("(max-width: 600px)", &viewport));
//! ```

use crate::viewport::{FeatureKind, MediaFeature, MediaValue, ViewportDescription};
use regex::Regex;
use std::sync::OnceLock;

/// Pure `(query, viewport) -> bool` evaluation
pub trait QueryEvaluator {
    /// Evaluate `query` against `viewport`
    fn matches(&self, query: &str, viewport: &ViewportDescription) -> bool;
}

impl<F> QueryEvaluator for F
where
    F: Fn(&str, &ViewportDescription) -> bool,
{
    fn matches(&self, query: &str, viewport: &ViewportDescription) -> bool {
        self(query, viewport)
    }
}

/// Media type assumed when the viewport does not describe one
pub const DEFAULT_MEDIA_TYPE: &str = "screen";

const EPSILON: f64 = 1e-9;

/// Range prefix of a feature expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq)]
struct Expression {
    modifier: Option<Modifier>,
    feature: MediaFeature,
    value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct MediaQuery {
    inverse: bool,
    media_type: Option<String>,
    expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Group(String),
}

fn expression_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\(\s*([a-z][a-z-]*)\s*(?::\s*(.+?))?\s*\)$").expect("valid expression regex")
    })
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+))\s*([a-z]*)$").expect("valid number regex")
    })
}

/// Default CSS media query evaluator
///
/// Supports comma-separated query lists, `only`/`not`, media types,
/// `min-`/`max-` prefixes and the features in [`MediaFeature`]. Malformed
/// queries and undescribed features never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssMediaEvaluator;

impl CssMediaEvaluator {
    /// Create the evaluator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Check whether every query in the list is well formed
    #[must_use]
    pub fn is_valid(&self, query: &str) -> bool {
        if query.trim().is_empty() {
            return true;
        }
        split_query_list(query).all(|part| parse_query(part).is_some())
    }
}

impl QueryEvaluator for CssMediaEvaluator {
    fn matches(&self, query: &str, viewport: &ViewportDescription) -> bool {
        if query.trim().is_empty() {
            return true;
        }
        split_query_list(query).any(|part| match parse_query(part) {
            Some(parsed) => query_matches(&parsed, viewport),
            None => {
                tracing::debug!(query = part, "malformed media query never matches");
                false
            }
        })
    }
}

fn split_query_list(query: &str) -> impl Iterator<Item = &str> {
    query.split(',').map(str::trim)
}

fn tokenize(query: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = query.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            let _ = chars.next();
        } else if c == '(' {
            let mut group = String::new();
            let mut depth = 0_usize;
            for ch in chars.by_ref() {
                group.push(ch);
                match ch {
                    '(' => depth += 1,
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            if depth != 0 {
                return None;
            }
            tokens.push(Token::Group(group));
        } else if c == ')' {
            return None;
        } else {
            let mut word = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() || ch == '(' || ch == ')' {
                    break;
                }
                word.push(ch);
                let _ = chars.next();
            }
            tokens.push(Token::Word(word));
        }
    }
    Some(tokens)
}

fn parse_query(query: &str) -> Option<MediaQuery> {
    let lowered = query.to_ascii_lowercase();
    let tokens = tokenize(&lowered)?;
    let mut rest = tokens.as_slice();

    let mut inverse = false;
    if let [Token::Word(word), tail @ ..] = rest {
        if word == "not" || word == "only" {
            inverse = word == "not";
            rest = tail;
        }
    }

    let mut media_type = None;
    let mut expressions = Vec::new();
    match rest {
        [Token::Word(word), tail @ ..] if word != "and" => {
            media_type = Some(word.clone());
            rest = tail;
        }
        [Token::Group(group), tail @ ..] => {
            expressions.push(parse_expression(group)?);
            rest = tail;
        }
        _ => return None,
    }

    while !rest.is_empty() {
        match rest {
            [Token::Word(and), Token::Group(group), tail @ ..] if and == "and" => {
                expressions.push(parse_expression(group)?);
                rest = tail;
            }
            _ => return None,
        }
    }

    Some(MediaQuery {
        inverse,
        media_type,
        expressions,
    })
}

fn parse_expression(group: &str) -> Option<Expression> {
    let captures = expression_regex().captures(group)?;
    let name = captures.get(1)?.as_str();

    let (modifier, feature_name) = if let Some(stripped) = name.strip_prefix("min-") {
        (Some(Modifier::Min), stripped)
    } else if let Some(stripped) = name.strip_prefix("max-") {
        (Some(Modifier::Max), stripped)
    } else {
        (None, name)
    };

    let feature = MediaFeature::from_name(feature_name)?;
    if modifier.is_some() && feature.kind() == FeatureKind::Keyword {
        return None;
    }
    let value = captures.get(2).map(|m| m.as_str().trim().to_string());
    if modifier.is_some() && value.is_none() {
        return None;
    }

    Some(Expression {
        modifier,
        feature,
        value,
    })
}

fn query_matches(query: &MediaQuery, viewport: &ViewportDescription) -> bool {
    let described_type = viewport.media_type().unwrap_or(DEFAULT_MEDIA_TYPE);
    let type_matches = match query.media_type.as_deref() {
        None | Some("all") => true,
        Some(wanted) => wanted.eq_ignore_ascii_case(described_type),
    };

    let expressions_match = query
        .expressions
        .iter()
        .all(|expression| expression_matches(expression, viewport));

    (type_matches && expressions_match) != query.inverse
}

fn expression_matches(expression: &Expression, viewport: &ViewportDescription) -> bool {
    let Some(described) = viewport.get(expression.feature) else {
        return false;
    };
    let kind = expression.feature.kind();

    let Some(expected) = expression.value.as_deref() else {
        return match kind {
            FeatureKind::Keyword => !described.to_string().eq_ignore_ascii_case("none"),
            _ => numeric_value(kind, described).is_some_and(|actual| actual.abs() > EPSILON),
        };
    };

    if kind == FeatureKind::Keyword {
        return described.to_string().trim().eq_ignore_ascii_case(expected);
    }

    let (Some(actual), Some(wanted)) = (
        numeric_value(kind, described),
        parse_numeric(kind, expected),
    ) else {
        return false;
    };

    match expression.modifier {
        Some(Modifier::Min) => actual + EPSILON >= wanted,
        Some(Modifier::Max) => actual <= wanted + EPSILON,
        None => (actual - wanted).abs() < EPSILON,
    }
}

fn numeric_value(kind: FeatureKind, value: &MediaValue) -> Option<f64> {
    match value {
        MediaValue::Number(n) => Some(*n),
        MediaValue::Text(text) => parse_numeric(kind, &text.to_ascii_lowercase()),
    }
}

fn parse_numeric(kind: FeatureKind, text: &str) -> Option<f64> {
    let text = text.trim();
    match kind {
        FeatureKind::Keyword => None,
        FeatureKind::Ratio => parse_ratio(text),
        FeatureKind::Integer => text.parse::<f64>().ok(),
        FeatureKind::Length => {
            let (number, unit) = split_unit(text)?;
            length_to_px(number, unit)
        }
        FeatureKind::Resolution => {
            let (number, unit) = split_unit(text)?;
            resolution_to_dppx(number, unit)
        }
    }
}

fn split_unit(text: &str) -> Option<(f64, &str)> {
    let captures = number_regex().captures(text)?;
    let number = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let unit = captures.get(2).map_or("", |m| m.as_str());
    Some((number, unit))
}

fn length_to_px(number: f64, unit: &str) -> Option<f64> {
    let factor = match unit {
        "" | "px" => 1.0,
        "em" | "rem" | "pc" => 16.0,
        "in" => 96.0,
        "cm" => 96.0 / 2.54,
        "mm" => 96.0 / 25.4,
        "pt" => 96.0 / 72.0,
        _ => return None,
    };
    Some(number * factor)
}

fn resolution_to_dppx(number: f64, unit: &str) -> Option<f64> {
    let factor = match unit {
        "" | "x" | "dppx" => 1.0,
        "dpi" => 1.0 / 96.0,
        "dpcm" => 2.54 / 96.0,
        _ => return None,
    };
    Some(number * factor)
}

fn parse_ratio(text: &str) -> Option<f64> {
    match text.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = numerator.trim().parse::<f64>().ok()?;
            let denominator = denominator.trim().parse::<f64>().ok()?;
            if denominator.abs() < EPSILON {
                None
            } else {
                Some(numerator / denominator)
            }
        }
        None => text.parse::<f64>().ok(),
    }
}
