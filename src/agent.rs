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

//! The `org.bluez.Agent1` implementation.
//!
//! Each pairing callback is an independent, stateless policy decision:
//! answer with a fixed credential, mark the requesting device trusted, and
//! log the invocation. Display callbacks and `Cancel` are pure observers.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tracing::{error, info};
use zbus::fdo;
use zbus::interface;
use zbus::zvariant::OwnedObjectPath;

/// PIN returned for legacy pairing requests.
const FIXED_PIN: &str = "0000";
/// Passkey returned for numeric pairing requests.
const FIXED_PASSKEY: u32 = 0;

/// Seam for setting the persisted `Trusted` flag on a device record.
///
/// Production uses [`crate::bluez::BluezTrust`], which performs a property
/// set on `org.bluez.Device1`; tests substitute a recording double.
pub trait TrustSetter: Send + Sync {
    fn set_trusted(&self, device: OwnedObjectPath) -> BoxFuture<'_, zbus::Result<()>>;
}

/// Pairing agent with an unconditional-accept policy.
///
/// Every confirmation and authorization request succeeds and the device is
/// marked trusted without user interaction. This is deliberately insecure;
/// it exists for test setups where pairing must never prompt. Do not run it
/// on a machine whose Bluetooth adapter is exposed to untrusted devices.
pub struct Agent {
    trust: Arc<dyn TrustSetter>,
    shutdown_tx: mpsc::Sender<()>,
    exit_on_release: bool,
}

impl Agent {
    /// Create an agent. `shutdown_tx` is signalled when the daemon releases
    /// the agent and `exit_on_release` is set.
    pub fn new(
        trust: Arc<dyn TrustSetter>,
        shutdown_tx: mpsc::Sender<()>,
        exit_on_release: bool,
    ) -> Self {
        Self {
            trust,
            shutdown_tx,
            exit_on_release,
        }
    }

    /// Set the `Trusted` property on the device record. A failure (device
    /// vanished, bus error) fails this callback only; bluetoothd reports the
    /// pairing attempt as failed and the agent stays registered.
    async fn mark_trusted(&self, device: &OwnedObjectPath) -> fdo::Result<()> {
        self.trust.set_trusted(device.clone()).await.map_err(|e| {
            error!("Failed to set Trusted on {}: {}", device.as_str(), e);
            fdo::Error::Failed(format!("setting Trusted on {}: {}", device.as_str(), e))
        })
    }
}

#[interface(name = "org.bluez.Agent1")]
impl Agent {
    async fn release(&self) {
        info!("Release");
        if self.exit_on_release {
            // Capacity-1 channel: a second Release while shutdown is already
            // pending is a no-op.
            let _ = self.shutdown_tx.try_send(());
        }
    }

    async fn authorize_service(&self, device: OwnedObjectPath, uuid: String) -> fdo::Result<()> {
        info!("AuthorizeService ({}, {})", device.as_str(), uuid);
        self.mark_trusted(&device).await
    }

    async fn request_pin_code(&self, device: OwnedObjectPath) -> fdo::Result<String> {
        info!("RequestPinCode ({})", device.as_str());
        self.mark_trusted(&device).await?;
        Ok(FIXED_PIN.to_string())
    }

    async fn request_passkey(&self, device: OwnedObjectPath) -> fdo::Result<u32> {
        info!("RequestPasskey ({})", device.as_str());
        self.mark_trusted(&device).await?;
        Ok(FIXED_PASSKEY)
    }

    async fn display_passkey(&self, device: OwnedObjectPath, passkey: u32, entered: u16) {
        info!(
            "DisplayPasskey ({}, {} entered {})",
            device.as_str(),
            format_passkey(passkey),
            entered
        );
    }

    async fn display_pin_code(&self, device: OwnedObjectPath, pincode: String) {
        info!("DisplayPinCode ({}, {})", device.as_str(), pincode);
    }

    async fn request_confirmation(&self, device: OwnedObjectPath, passkey: u32) -> fdo::Result<()> {
        info!(
            "RequestConfirmation ({}, {})",
            device.as_str(),
            format_passkey(passkey)
        );
        self.mark_trusted(&device).await
    }

    async fn request_authorization(&self, device: OwnedObjectPath) -> fdo::Result<()> {
        info!("RequestAuthorization ({})", device.as_str());
        self.mark_trusted(&device).await
    }

    async fn cancel(&self) {
        info!("Cancel");
    }
}

/// Zero-padded six-digit rendering used wherever a passkey is shown.
pub fn format_passkey(passkey: u32) -> String {
    format!("{passkey:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use zbus::zvariant::ObjectPath;

    /// Records every trust-set call; optionally fails all of them.
    struct RecordingTrust {
        calls: Mutex<Vec<OwnedObjectPath>>,
        fail: bool,
    }

    impl RecordingTrust {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn calls(&self) -> Vec<OwnedObjectPath> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TrustSetter for RecordingTrust {
        fn set_trusted(&self, device: OwnedObjectPath) -> BoxFuture<'_, zbus::Result<()>> {
            Box::pin(async move {
                if self.fail {
                    return Err(zbus::Error::Failure("device vanished".into()));
                }
                self.calls.lock().unwrap().push(device);
                Ok(())
            })
        }
    }

    fn dev(path: &str) -> OwnedObjectPath {
        ObjectPath::try_from(path).unwrap().into()
    }

    fn make_agent(
        trust: Arc<RecordingTrust>,
        exit_on_release: bool,
    ) -> (Agent, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        (Agent::new(trust, tx, exit_on_release), rx)
    }

    #[tokio::test]
    async fn test_request_pin_code_returns_fixed_pin_and_trusts_once() {
        let trust = RecordingTrust::new();
        let (agent, _rx) = make_agent(trust.clone(), true);

        let device = dev("/org/bluez/hci0/dev_AA_BB_CC_DD_EE_FF");
        let pin = agent.request_pin_code(device.clone()).await.unwrap();

        assert_eq!(pin, "0000");
        assert_eq!(trust.calls(), vec![device]);
    }

    #[tokio::test]
    async fn test_request_passkey_returns_zero_and_trusts_once() {
        let trust = RecordingTrust::new();
        let (agent, _rx) = make_agent(trust.clone(), true);

        let device = dev("/org/bluez/hci0/dev_AA_BB_CC_DD_EE_FF");
        let passkey = agent.request_passkey(device.clone()).await.unwrap();

        assert_eq!(passkey, 0);
        assert_eq!(trust.calls(), vec![device]);
    }

    #[tokio::test]
    async fn test_authorize_service_trusts_regardless_of_uuid() {
        let trust = RecordingTrust::new();
        let (agent, _rx) = make_agent(trust.clone(), true);

        let device = dev("/org/bluez/hci0/dev_00_11_22_33_44_55");
        agent
            .authorize_service(
                device.clone(),
                "0000110b-0000-1000-8000-00805f9b34fb".to_string(),
            )
            .await
            .unwrap();
        agent
            .authorize_service(device.clone(), "not-even-a-uuid".to_string())
            .await
            .unwrap();

        assert_eq!(trust.calls(), vec![device.clone(), device]);
    }

    #[tokio::test]
    async fn test_confirmation_and_authorization_accept_and_trust() {
        let trust = RecordingTrust::new();
        let (agent, _rx) = make_agent(trust.clone(), true);

        let device = dev("/org/bluez/hci0/dev_00_11_22_33_44_55");
        agent
            .request_confirmation(device.clone(), 123456)
            .await
            .unwrap();
        agent.request_authorization(device.clone()).await.unwrap();

        assert_eq!(trust.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_display_callbacks_and_cancel_never_trust() {
        let trust = RecordingTrust::new();
        let (agent, _rx) = make_agent(trust.clone(), true);

        let device = dev("/org/bluez/hci0/dev_00_11_22_33_44_55");
        agent.display_passkey(device.clone(), 123456, 3).await;
        agent
            .display_pin_code(device.clone(), "0000".to_string())
            .await;
        agent.cancel().await;

        assert!(trust.calls().is_empty());
    }

    #[tokio::test]
    async fn test_trust_failure_fails_the_callback() {
        let trust = RecordingTrust::failing();
        let (agent, _rx) = make_agent(trust.clone(), true);

        let device = dev("/org/bluez/hci0/dev_00_11_22_33_44_55");
        let err = agent.request_pin_code(device.clone()).await.unwrap_err();

        assert!(matches!(err, fdo::Error::Failed(_)));
        assert!(trust.calls().is_empty());

        // Subsequent callbacks still work; the agent stays up.
        agent.cancel().await;
    }

    #[tokio::test]
    async fn test_release_signals_shutdown_exactly_once() {
        let trust = RecordingTrust::new();
        let (agent, mut rx) = make_agent(trust, true);

        agent.release().await;
        agent.release().await;

        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_release_is_a_noop_without_exit_on_release() {
        let trust = RecordingTrust::new();
        let (agent, mut rx) = make_agent(trust, false);

        agent.release().await;

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_format_passkey_zero_pads_to_six_digits() {
        assert_eq!(format_passkey(123456), "123456");
        assert_eq!(format_passkey(7), "000007");
        assert_eq!(format_passkey(0), "000000");
    }
}
