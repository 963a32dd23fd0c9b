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

//! D-Bus proxies for the BlueZ interfaces this daemon talks to.

use futures::future::BoxFuture;
use tracing::info;
use zbus::zvariant::{ObjectPath, OwnedObjectPath};
use zbus::{proxy, Connection};

use crate::agent::TrustSetter;

/// Object path the agent is exported at.
pub const AGENT_PATH: &str = "/test/agent";

/// Proxy for `org.bluez.AgentManager1` on `/org/bluez`.
#[proxy(
    interface = "org.bluez.AgentManager1",
    default_service = "org.bluez",
    default_path = "/org/bluez"
)]
pub trait AgentManager {
    /// Register a pairing agent exported at `agent` with the given
    /// capability string.
    fn register_agent(&self, agent: &ObjectPath<'_>, capability: &str) -> zbus::Result<()>;

    /// Make a previously registered agent the system-wide default.
    fn request_default_agent(&self, agent: &ObjectPath<'_>) -> zbus::Result<()>;

    /// Unregister a previously registered agent.
    fn unregister_agent(&self, agent: &ObjectPath<'_>) -> zbus::Result<()>;
}

/// Proxy for `org.bluez.Device1`, reduced to the `Trusted` property.
#[proxy(interface = "org.bluez.Device1", default_service = "org.bluez")]
pub trait Device {
    /// Whether the device may use services without per-use authorization.
    #[zbus(property)]
    fn trusted(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn set_trusted(&self, value: bool) -> zbus::Result<()>;
}

/// Sets the `Trusted` property on remote device records over the system bus.
pub struct BluezTrust {
    conn: Connection,
}

impl BluezTrust {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl TrustSetter for BluezTrust {
    fn set_trusted(&self, device: OwnedObjectPath) -> BoxFuture<'_, zbus::Result<()>> {
        Box::pin(async move {
            let proxy = DeviceProxy::builder(&self.conn)
                .path(device.clone())?
                .build()
                .await?;
            proxy.set_trusted(true).await?;
            info!("Device {} set to Trusted", device.as_str());
            Ok(())
        })
    }
}
