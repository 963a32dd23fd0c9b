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

//! BlueZ auto-trust pairing agent.
//!
//! Registers as the system-wide default pairing agent and accepts every
//! pairing request with fixed credentials (PIN "0000", passkey 0), marking
//! each requesting device as trusted. Intended for test setups only.

pub mod agent;
pub mod bluez;
pub mod capability;
pub mod cli;
pub mod registrar;
