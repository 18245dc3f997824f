//! WiFi link
//!
//! [`connection_task`] keeps the station associated, reconnecting after a
//! drop. The controller never waits on it: it only samples [`WifiLink`]
//! at each liveness check.

use defmt::*;
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_wifi::wifi::{
    self, AuthMethod, ClientConfiguration, Configuration, WifiController, WifiDevice, WifiEvent,
    WifiState,
};

use qboy_core::config::WifiConfig;
use qboy_core::traits::NetworkLink;

/// Pause between connection attempts
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Network-join status as seen by the core
///
/// Joined means associated *and* holding a DHCP lease; an association
/// without an address cannot reach the service.
#[derive(Clone, Copy)]
pub struct WifiLink {
    stack: Stack<'static>,
}

impl WifiLink {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack }
    }
}

impl NetworkLink for WifiLink {
    fn is_joined(&self) -> bool {
        self.stack.is_link_up() && self.stack.is_config_up()
    }
}

/// Why the station could not be started
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum LinkError {
    /// Credentials rejected by the driver configuration
    Credentials,
    /// Driver error
    Wifi(wifi::WifiError),
}

impl From<wifi::WifiError> for LinkError {
    fn from(e: wifi::WifiError) -> Self {
        LinkError::Wifi(e)
    }
}

/// Station connection loop
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>, credentials: WifiConfig) {
    info!("Connection task started");

    loop {
        if wifi::wifi_state() == WifiState::StaConnected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            warn!("WiFi disconnected");
            Timer::after(RECONNECT_DELAY).await;
        }

        if !matches!(controller.is_started(), Ok(true)) {
            if let Err(e) = start(&mut controller, &credentials).await {
                error!("WiFi start failed: {:?}", e);
                Timer::after(RECONNECT_DELAY).await;
                continue;
            }
            info!("WiFi started, joining {}", credentials.ssid.as_str());
        }

        match controller.connect_async().await {
            Ok(()) => info!("WiFi associated"),
            Err(e) => {
                warn!("WiFi connect failed: {:?}", e);
                Timer::after(RECONNECT_DELAY).await;
            }
        }
    }
}

async fn start(
    controller: &mut WifiController<'static>,
    credentials: &WifiConfig,
) -> Result<(), LinkError> {
    let auth_method = if credentials.password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };

    let client = ClientConfiguration {
        ssid: credentials
            .ssid
            .as_str()
            .try_into()
            .map_err(|_| LinkError::Credentials)?,
        password: credentials
            .password
            .as_str()
            .try_into()
            .map_err(|_| LinkError::Credentials)?,
        auth_method,
        ..Default::default()
    };

    controller.set_configuration(&Configuration::Client(client))?;
    controller.start_async().await?;
    Ok(())
}

/// Network stack runner
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}
