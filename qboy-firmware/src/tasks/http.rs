//! HTTP worker task
//!
//! Performs the exchanges the controller requests, one at a time, and sends
//! each outcome back. Runs beside the controller so a slow server never
//! delays a tick.

use defmt::*;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};
use reqwless::client::HttpClient;
use reqwless::request::Method;
use static_cell::StaticCell;

use qboy_protocol::{fetch, ExchangeError, HttpGet, HttpReply, HTTP_OK, MAX_BODY_SIZE};

use crate::channels::{REPLY_CHANNEL, REQUEST_CHANNEL};

/// Whole-exchange deadline, DNS lookup included
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Response buffer: headers plus the largest accepted body
const RX_BUFFER_SIZE: usize = MAX_BODY_SIZE + 1024;

type ServiceTcp = TcpClient<'static, 1, 1024, 1024>;

static TCP_STATE: StaticCell<TcpClientState<1, 1024, 1024>> = StaticCell::new();

/// [`HttpGet`] over the embassy-net stack
struct ServiceClient<'a> {
    http: HttpClient<'a, ServiceTcp, DnsSocket<'static>>,
    rx: [u8; RX_BUFFER_SIZE],
}

impl<'a> ServiceClient<'a> {
    fn new(tcp: &'a ServiceTcp, dns: &'a DnsSocket<'static>) -> Self {
        Self {
            http: HttpClient::new(tcp, dns),
            rx: [0; RX_BUFFER_SIZE],
        }
    }

    async fn request(&mut self, url: &str) -> Result<HttpReply, ExchangeError> {
        let mut request = self
            .http
            .request(Method::GET, url)
            .await
            .map_err(transport)?;
        let response = request.send(&mut self.rx).await.map_err(transport)?;

        let status = response.status.0;
        if status != HTTP_OK {
            // The body of a rejected reply is never looked at
            return HttpReply::new(status, &[]);
        }

        let body = response.body().read_to_end().await.map_err(transport)?;
        HttpReply::new(status, body)
    }
}

impl HttpGet for ServiceClient<'_> {
    async fn get(&mut self, url: &str) -> Result<HttpReply, ExchangeError> {
        match with_timeout(EXCHANGE_TIMEOUT, self.request(url)).await {
            Ok(result) => result,
            Err(_) => {
                debug!("HTTP timeout");
                Err(ExchangeError::Transport)
            }
        }
    }
}

fn transport(e: reqwless::Error) -> ExchangeError {
    debug!("HTTP error: {:?}", e);
    ExchangeError::Transport
}

/// HTTP task - serves [`REQUEST_CHANNEL`] until the device powers off
#[embassy_executor::task]
pub async fn http_task(stack: Stack<'static>) {
    info!("HTTP task started");

    let tcp = TcpClient::new(stack, TCP_STATE.init(TcpClientState::new()));
    let dns = DnsSocket::new(stack);
    let mut client = ServiceClient::new(&tcp, &dns);

    loop {
        let request = REQUEST_CHANNEL.receive().await;
        debug!("GET {}", request.url.as_str());

        let result = fetch(&mut client, &request.url).await;
        REPLY_CHANNEL.send((request.exchange, result)).await;
    }
}
