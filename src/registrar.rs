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

//! One-shot startup sequence: export the agent object, register it with the
//! BlueZ agent manager, become the default agent, then block until shutdown.
//!
//! There are no retries and no reconnection. Any failure before the blocking
//! phase is fatal to the process.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};
use zbus::zvariant::ObjectPath;
use zbus::Connection;

use crate::agent::Agent;
use crate::bluez::{AgentManagerProxy, BluezTrust, AGENT_PATH};
use crate::capability::Capability;

/// The ordered agent-manager calls performed at startup.
///
/// A trait so the registration ordering can be exercised against a mock
/// manager; the real implementation is the `AgentManager1` proxy.
#[allow(async_fn_in_trait)]
pub trait ManagerOps {
    async fn register_agent(&self, path: &ObjectPath<'_>, capability: &str) -> zbus::Result<()>;
    async fn request_default_agent(&self, path: &ObjectPath<'_>) -> zbus::Result<()>;
    async fn unregister_agent(&self, path: &ObjectPath<'_>) -> zbus::Result<()>;
}

impl ManagerOps for AgentManagerProxy<'_> {
    async fn register_agent(&self, path: &ObjectPath<'_>, capability: &str) -> zbus::Result<()> {
        AgentManagerProxy::register_agent(self, path, capability).await
    }

    async fn request_default_agent(&self, path: &ObjectPath<'_>) -> zbus::Result<()> {
        AgentManagerProxy::request_default_agent(self, path).await
    }

    async fn unregister_agent(&self, path: &ObjectPath<'_>) -> zbus::Result<()> {
        AgentManagerProxy::unregister_agent(self, path).await
    }
}

/// Register the agent, then request it as default, strictly in that order.
/// `RequestDefaultAgent` is never attempted if registration failed.
pub async fn register_sequence<M: ManagerOps>(
    manager: &M,
    path: &ObjectPath<'_>,
    capability: Capability,
) -> zbus::Result<()> {
    manager.register_agent(path, capability.as_str()).await?;
    info!("Agent registered ({})", capability);
    manager.request_default_agent(path).await?;
    info!("Agent requested as default");
    Ok(())
}

/// Owns the bus connection and the agent's shutdown channel.
pub struct Registrar {
    conn: Connection,
    shutdown_rx: mpsc::Receiver<()>,
}

impl Registrar {
    /// Export the agent object on `conn` at the fixed agent path.
    pub async fn serve(conn: Connection, exit_on_release: bool) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let trust = Arc::new(BluezTrust::new(conn.clone()));
        let agent = Agent::new(trust, shutdown_tx, exit_on_release);

        conn.object_server()
            .at(AGENT_PATH, agent)
            .await
            .context("exporting pairing agent object")?;

        Ok(Self { conn, shutdown_rx })
    }

    /// Register with the BlueZ agent manager and become the default agent.
    pub async fn register(&self, capability: Capability) -> Result<()> {
        let manager = AgentManagerProxy::new(&self.conn)
            .await
            .context("creating AgentManager1 proxy")?;
        let path = ObjectPath::from_static_str_unchecked(AGENT_PATH);

        register_sequence(&manager, &path, capability)
            .await
            .context("registering pairing agent with BlueZ")?;
        Ok(())
    }

    /// Block until the agent is released or the process is interrupted, then
    /// unregister from the agent manager.
    pub async fn run(mut self) -> Result<()> {
        tokio::select! {
            _ = self.shutdown_rx.recv() => {
                info!("Agent released, shutting down");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
            }
        }

        let manager = AgentManagerProxy::new(&self.conn).await?;
        let path = ObjectPath::from_static_str_unchecked(AGENT_PATH);
        if let Err(e) = manager.unregister_agent(&path).await {
            warn!("Failed to unregister agent: {}", e);
        }

        Ok(())
    }
}
