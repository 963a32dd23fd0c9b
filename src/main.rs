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

//! BlueZ auto-trust pairing agent daemon.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bt_autotrust_agent::cli::Cli;
use bt_autotrust_agent::registrar::Registrar;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bt_autotrust_agent=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    info!(
        "Starting bt-autotrust-agent v{}...",
        env!("CARGO_PKG_VERSION")
    );

    let conn = zbus::Connection::system()
        .await
        .context("connecting to the system D-Bus")?;
    info!("Connected to system bus");

    let registrar = Registrar::serve(conn, true).await?;
    registrar.register(cli.capability).await?;

    registrar.run().await?;

    info!("bt-autotrust-agent stopped");
    Ok(())
}
