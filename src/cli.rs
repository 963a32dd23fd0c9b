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

//! Command-line interface.

use clap::Parser;

use crate::capability::Capability;

/// BlueZ pairing agent that auto-trusts every device that asks.
///
/// Accepts all confirmation and authorization requests without user
/// interaction and answers credential requests with PIN "0000" and passkey
/// 0. Intended for test setups only.
#[derive(Debug, Parser)]
#[command(name = "bt-autotrust-agent", version)]
pub struct Cli {
    /// Agent I/O capability reported to BlueZ during registration.
    #[arg(short, long, value_enum, default_value_t)]
    pub capability: Capability,
}
