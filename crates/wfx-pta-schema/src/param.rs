use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// Number of bytes a parameter occupies in the frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ByteWidth {
    One,
    Two,
    Four,
}

impl ByteWidth {
    /// Width in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    /// Largest unsigned value that fits the width.
    pub const fn max_value(self) -> u64 {
        match self {
            Self::One => u8::MAX as u64,
            Self::Two => u16::MAX as u64,
            Self::Four => u32::MAX as u64,
        }
    }

    /// Map a raw byte count back to a width. Only 1, 2 and 4 are legal.
    pub const fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            _ => None,
        }
    }
}

/// A symbolic name and the integer code the firmware expects for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Choice {
    pub name: &'static str,
    pub code: u32,
}

impl Choice {
    pub const fn new(name: &'static str, code: u32) -> Self {
        Self { name, code }
    }
}

/// How a parameter's value is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A raw integer, written as-is.
    Numeric,
    /// One of a fixed set of names, each mapped to an integer code.
    Symbolic(&'static [Choice]),
}

impl ValueKind {
    /// Choices of a symbolic kind; empty for numeric parameters.
    pub fn choices(&self) -> &'static [Choice] {
        match *self {
            Self::Numeric => &[],
            Self::Symbolic(choices) => choices,
        }
    }

    /// Find the choice with exactly this name.
    pub fn choice(&self, name: &str) -> Option<&'static Choice> {
        self.choices().iter().find(|choice| choice.name == name)
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbolic(_))
    }
}

/// Whether a row ends up in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRole {
    /// Packed into the frame payload in table order.
    Encoded,
    /// Only selects a preset (`Config`); never encoded.
    PresetSelector,
}

/// A parameter value, either an integer or a symbolic choice name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(u64),
    Symbol(Cow<'static, str>),
}

impl Value {
    pub const fn int(value: u64) -> Self {
        Self::Int(value)
    }

    pub const fn symbol(name: &'static str) -> Self {
        Self::Symbol(Cow::Borrowed(name))
    }

    /// Interpret user text: decimal or `0x`-prefixed hex become [`Value::Int`],
    /// anything else is kept as a symbol.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None if trimmed.bytes().all(|b| b.is_ascii_digit()) => trimmed.parse().ok(),
            None => None,
        };
        match parsed {
            Some(value) => Self::Int(value),
            None => Self::Symbol(Cow::Owned(trimmed.to_string())),
        }
    }

    pub fn as_int(&self) -> Option<u64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Symbol(_) => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Symbol(name) => Some(name),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => fmt::Display::fmt(value, f),
            Self::Symbol(name) => f.pad(name),
        }
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<&'static str> for Value {
    fn from(name: &'static str) -> Self {
        Self::symbol(name)
    }
}

impl From<String> for Value {
    fn from(name: String) -> Self {
        Self::Symbol(Cow::Owned(name))
    }
}

/// Why a value was refused by [`ParameterSpec::admit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotAChoice,
    NotAnInteger,
    OutOfRange { value: u64, max: u64 },
}

/// One row of a command table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ValueKind,
    pub width: ByteWidth,
    pub default: Option<Value>,
    pub role: ParamRole,
    pub help: &'static str,
}

impl ParameterSpec {
    /// A symbolic row. `default` must name one of `choices`.
    pub const fn symbolic(
        name: &'static str,
        width: ByteWidth,
        choices: &'static [Choice],
        default: Option<&'static str>,
        help: &'static str,
    ) -> Self {
        let default = match default {
            Some(name) => Some(Value::symbol(name)),
            None => None,
        };
        Self {
            name,
            kind: ValueKind::Symbolic(choices),
            width,
            default,
            role: ParamRole::Encoded,
            help,
        }
    }

    /// A raw integer row.
    pub const fn numeric(
        name: &'static str,
        width: ByteWidth,
        default: Option<u64>,
        help: &'static str,
    ) -> Self {
        let default = match default {
            Some(value) => Some(Value::int(value)),
            None => None,
        };
        Self {
            name,
            kind: ValueKind::Numeric,
            width,
            default,
            role: ParamRole::Encoded,
            help,
        }
    }

    /// The preset selector pseudo-parameter.
    pub const fn selector(
        name: &'static str,
        choices: &'static [Choice],
        help: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ValueKind::Symbolic(choices),
            width: ByteWidth::One,
            default: None,
            role: ParamRole::PresetSelector,
            help,
        }
    }

    pub fn is_encoded(&self) -> bool {
        self.role == ParamRole::Encoded
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Check a value against this row and return its canonical form.
    ///
    /// Symbols are matched exactly against the choices and come back borrowing
    /// the table's own name. Numeric rows accept integers, or text that parses
    /// as one, that fit the declared width.
    pub fn admit(&self, value: &Value) -> Result<Value, Rejection> {
        match (&self.kind, value) {
            (ValueKind::Symbolic(_), Value::Symbol(name)) => self
                .kind
                .choice(name)
                .map(|choice| Value::symbol(choice.name))
                .ok_or(Rejection::NotAChoice),
            (ValueKind::Symbolic(_), Value::Int(_)) => Err(Rejection::NotAChoice),
            (ValueKind::Numeric, Value::Int(raw)) => self.check_range(*raw),
            (ValueKind::Numeric, Value::Symbol(text)) => match Value::parse(text) {
                Value::Int(raw) => self.check_range(raw),
                Value::Symbol(_) => Err(Rejection::NotAnInteger),
            },
        }
    }

    /// Integer code for an already admitted value.
    pub fn code_of(&self, value: &Value) -> Option<u64> {
        match value {
            Value::Int(raw) => Some(*raw),
            Value::Symbol(name) => self.kind.choice(name).map(|choice| u64::from(choice.code)),
        }
    }

    /// Human-readable list of accepted values, for error messages and help.
    pub fn expected(&self) -> String {
        match self.kind {
            ValueKind::Numeric => format!("an integer from 0 to {}", self.width.max_value()),
            ValueKind::Symbolic(choices) => choices
                .iter()
                .map(|choice| choice.name)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    fn check_range(&self, raw: u64) -> Result<Value, Rejection> {
        let max = self.width.max_value();
        if raw > max {
            return Err(Rejection::OutOfRange { value: raw, max });
        }
        Ok(Value::Int(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: &[Choice] = &[Choice::new("LOW", 0), Choice::new("HIGH", 1)];

    #[test]
    fn parse_recognises_decimal_and_hex() {
        assert_eq!(Value::parse("150"), Value::Int(150));
        assert_eq!(Value::parse("0x1461"), Value::Int(0x1461));
        assert_eq!(Value::parse("0XFF"), Value::Int(255));
        assert_eq!(Value::parse("3W"), Value::from("3W".to_string()));
        assert_eq!(Value::parse("-1"), Value::from("-1".to_string()));
    }

    #[test]
    fn symbolic_admit_returns_table_name() {
        let spec = ParameterSpec::symbolic("Level", ByteWidth::One, LEVELS, Some("HIGH"), "");
        let admitted = spec.admit(&Value::from("LOW".to_string())).unwrap();
        assert_eq!(admitted, Value::symbol("LOW"));
        assert!(matches!(admitted, Value::Symbol(Cow::Borrowed(_))));
    }

    #[test]
    fn symbolic_admit_is_case_sensitive() {
        let spec = ParameterSpec::symbolic("Level", ByteWidth::One, LEVELS, None, "");
        assert_eq!(
            spec.admit(&Value::from("low".to_string())),
            Err(Rejection::NotAChoice)
        );
        assert_eq!(spec.admit(&Value::Int(1)), Err(Rejection::NotAChoice));
    }

    #[test]
    fn numeric_admit_checks_width() {
        let spec = ParameterSpec::numeric("Quota", ByteWidth::Two, Some(7500), "");
        assert_eq!(spec.admit(&Value::Int(65535)), Ok(Value::Int(65535)));
        assert_eq!(
            spec.admit(&Value::Int(65536)),
            Err(Rejection::OutOfRange {
                value: 65536,
                max: 65535
            })
        );
        assert_eq!(
            spec.admit(&Value::from("0x10".to_string())),
            Ok(Value::Int(16))
        );
        assert_eq!(
            spec.admit(&Value::from("fast".to_string())),
            Err(Rejection::NotAnInteger)
        );
    }

    #[test]
    fn code_of_maps_symbols_and_passes_integers() {
        let spec = ParameterSpec::symbolic("Level", ByteWidth::One, LEVELS, None, "");
        assert_eq!(spec.code_of(&Value::symbol("HIGH")), Some(1));
        assert_eq!(spec.code_of(&Value::Int(7)), Some(7));
        assert_eq!(spec.code_of(&Value::symbol("MEDIUM")), None);
    }

    #[test]
    fn display_pads_symbols_and_integers() {
        assert_eq!(format!("{:>6}", Value::symbol("ON")), "    ON");
        assert_eq!(format!("{:>6}", Value::Int(42)), "    42");
    }
}
