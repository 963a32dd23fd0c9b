// Copyright 2026 the bt-autotrust-agent authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Agent I/O capability negotiated with BlueZ at registration.

use std::fmt;

use clap::ValueEnum;

/// Input/output capability reported to the BlueZ agent manager.
///
/// The capability determines which pairing methods the daemon invokes on this
/// agent. `NoInputNoOutput` steers pairing towards "just works" wherever the
/// remote device allows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Capability {
    #[value(name = "DisplayOnly")]
    DisplayOnly,
    #[value(name = "DisplayYesNo")]
    DisplayYesNo,
    #[value(name = "KeyboardOnly")]
    KeyboardOnly,
    #[value(name = "KeyboardDisplay")]
    KeyboardDisplay,
    #[default]
    #[value(name = "NoInputNoOutput")]
    NoInputNoOutput,
}

impl Capability {
    /// The exact spelling BlueZ expects in `RegisterAgent`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::DisplayOnly => "DisplayOnly",
            Capability::DisplayYesNo => "DisplayYesNo",
            Capability::KeyboardOnly => "KeyboardOnly",
            Capability::KeyboardDisplay => "KeyboardDisplay",
            Capability::NoInputNoOutput => "NoInputNoOutput",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_no_input_no_output() {
        assert_eq!(Capability::default(), Capability::NoInputNoOutput);
        assert_eq!(Capability::default().as_str(), "NoInputNoOutput");
    }

    #[test]
    fn test_display_matches_bluez_spelling() {
        assert_eq!(Capability::KeyboardDisplay.to_string(), "KeyboardDisplay");
        assert_eq!(Capability::DisplayYesNo.to_string(), "DisplayYesNo");
    }

    #[test]
    fn test_value_enum_parses_bluez_spelling() {
        let parsed = <Capability as ValueEnum>::from_str("KeyboardDisplay", false).unwrap();
        assert_eq!(parsed, Capability::KeyboardDisplay);
        assert!(<Capability as ValueEnum>::from_str("keyboard-display", false).is_err());
    }
}
