use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;

/// The shape of the parameter an action code expects.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataType {
    None,
    Integer,
    Quad,
    String,
}

/// A typed action parameter. Cloning a value yields storage fully owned
/// by the clone, which is what lets default binding tables stay
/// immutable across merges.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    #[default]
    None,
    Integer(i32),
    Quad([i32; 4]),
    String(String),
}

impl DataValue {
    pub fn is_none(&self) -> bool {
        *self == Self::None
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::None => DataType::None,
            Self::Integer(_) => DataType::Integer,
            Self::Quad(_) => DataType::Quad,
            Self::String(_) => DataType::String,
        }
    }

    pub fn as_quad(&self) -> Option<[i32; 4]> {
        match self {
            Self::Quad(quad) => Some(*quad),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(string) => Some(string),
            _ => None,
        }
    }
}

#[derive(
    Debug, Display, Copy, Clone, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ActionCode {
    ReloadConfiguration,
    ParentFrame,
    ChildFrame,
    RootFrame,
    CloseWindow,
    MinimizeWindow,
    NextWindow,
    PreviousWindow,
    RemoveFrame,
    ToggleTiling,
    ToggleFullscreen,
    ToggleFocus,
    SplitHorizontally,
    SplitVertically,
    FocusUp,
    FocusLeft,
    FocusRight,
    FocusDown,
    ExchangeUp,
    ExchangeLeft,
    ExchangeRight,
    ExchangeDown,
    ResizeBy,
    ShowWindowList,
    Run,
    Quit,
    InitiateMove,
    InitiateResize,
}

impl ActionCode {
    /// The parameter type is a total function of the code.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::ResizeBy => DataType::Quad,
            Self::Run => DataType::String,
            _ => DataType::None,
        }
    }
}

/// One parameterized step of a binding's action sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub code: ActionCode,
    #[serde(default, skip_serializing_if = "DataValue::is_none")]
    pub parameter: DataValue,
}

impl Action {
    pub fn new(code: ActionCode) -> Self {
        Self {
            code,
            parameter: DataValue::None,
        }
    }

    pub fn with_quad(
        code: ActionCode,
        quad: [i32; 4],
    ) -> Self {
        Self {
            code,
            parameter: DataValue::Quad(quad),
        }
    }

    pub fn with_string(
        code: ActionCode,
        string: impl Into<String>,
    ) -> Self {
        Self {
            code,
            parameter: DataValue::String(string.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use strum::IntoEnumIterator;

    #[test]
    fn every_code_declares_its_parameter_type() {
        for code in ActionCode::iter() {
            match code {
                ActionCode::ResizeBy => assert_eq!(code.data_type(), DataType::Quad),
                ActionCode::Run => assert_eq!(code.data_type(), DataType::String),
                _ => assert_eq!(code.data_type(), DataType::None),
            }
        }
    }

    #[test]
    fn cloned_string_parameter_is_independent() {
        let original = Action::with_string(ActionCode::Run, "xterm");
        let mut copy = original.clone();

        if let DataValue::String(ref mut string) = copy.parameter {
            string.push_str(" -e top");
        }

        assert_eq!(original.parameter.as_string(), Some("xterm"));
        assert_eq!(copy.parameter.as_string(), Some("xterm -e top"));
    }
}
