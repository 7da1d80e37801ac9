use autobgp_domain::config::ListenNetwork;
use autobgp_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, send_with_length_prefix,
};
use autobgp_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const UDP_RECV_BUFFER: usize = 4096;
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn start_dns_server(
    bind_addr: String,
    network: ListenNetwork,
    handler: DnsServerHandler,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let mut join_set: JoinSet<()> = JoinSet::new();

    if network.serves_udp() {
        let socket = Arc::new(create_udp_socket(domain, socket_addr)?);
        join_set.spawn(run_udp(socket, handler.clone(), shutdown.clone()));
    }

    if network.serves_tcp() {
        let listener = create_tcp_listener(domain, socket_addr)?;
        join_set.spawn(run_tcp(listener, handler, shutdown.clone()));
    }

    info!(bind_address = %socket_addr, network = ?network, "DNS server ready");

    while join_set.join_next().await.is_some() {}

    info!("DNS server stopped");
    Ok(())
}

async fn run_udp(socket: Arc<UdpSocket>, handler: DnsServerHandler, shutdown: CancellationToken) {
    let mut recv_buf = [0u8; UDP_RECV_BUFFER];

    loop {
        let (n, from) = tokio::select! {
            _ = shutdown.cancelled() => break,
            received = socket.recv_from(&mut recv_buf) => match received {
                Ok(received) => received,
                Err(e) => {
                    warn!(error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        let query = recv_buf[..n].to_vec();
        let handler = handler.clone();
        let socket = socket.clone();

        // Each datagram resolves independently; a slow upstream exchange must
        // not hold up the receive loop.
        tokio::spawn(async move {
            if let Some(response) = handler.handle_raw(&query, from).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    error!(client = %from, error = %e, "UDP send failed");
                }
            }
        });
    }
}

async fn run_tcp(listener: TcpListener, handler: DnsServerHandler, shutdown: CancellationToken) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "TCP accept error");
                    continue;
                }
            },
        };

        let handler = handler.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = serve_tcp_connection(stream, peer, handler) => {}
            }
        });
    }
}

/// Reads length-prefixed queries until the client closes or goes idle.
/// Every query runs in its own task, so responses may leave out of order;
/// the shared write half keeps each frame intact.
async fn serve_tcp_connection(stream: TcpStream, peer: SocketAddr, handler: DnsServerHandler) {
    let (mut reader, writer) = stream.into_split();
    let writer = Arc::new(Mutex::new(writer));

    loop {
        let read = tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut reader));
        let query = match read.await {
            Ok(Ok(query)) => query,
            Ok(Err(e)) => {
                debug!(client = %peer, error = %e, "TCP connection closed");
                return;
            }
            Err(_) => {
                debug!(client = %peer, "TCP connection idle, closing");
                return;
            }
        };

        let handler = handler.clone();
        let writer = writer.clone();
        tokio::spawn(async move {
            // Failed queries get no answer; the client times out on its own.
            let Some(response) = handler.handle_raw(&query, peer).await else {
                return;
            };

            let mut writer = writer.lock().await;
            if let Err(e) = send_with_length_prefix(&mut *writer, &response).await {
                error!(client = %peer, error = %e, "TCP send failed");
            }
        });
    }
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use autobgp_application::ports::{Exchange, UpstreamExchanger};
    use autobgp_application::services::RouteInjector;
    use autobgp_application::use_cases::HandleDnsQueryUseCase;
    use autobgp_domain::{DomainError, Rules, ZoneSet};
    use autobgp_infrastructure::bgp::MemoryAdjRibOut;
    use autobgp_infrastructure::dns::wire;
    use hickory_proto::op::{Message, MessageType, OpCode, Query};
    use hickory_proto::rr::{Name, RecordType};
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    /// Echoes the query back as a response; names starting with `slow.` are
    /// held for a while first.
    struct DelayedEcho;

    #[async_trait]
    impl UpstreamExchanger for DelayedEcho {
        async fn exchange(&self, query: &Message) -> Result<Exchange, DomainError> {
            let slow = query
                .queries()
                .first()
                .is_some_and(|q| q.name().to_ascii().starts_with("slow."));
            if slow {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }

            let mut response = Message::new(query.id(), MessageType::Response, OpCode::Query);
            for question in query.queries() {
                response.add_query(question.clone());
            }
            Ok(Exchange {
                response,
                rtt: Duration::from_millis(1),
            })
        }
    }

    fn handler() -> DnsServerHandler {
        let rules = Rules::new(Ipv4Addr::new(192, 0, 2, 1), ZoneSet::new(["example.com"]));
        let injector = Arc::new(RouteInjector::new(Arc::new(MemoryAdjRibOut::new()), &rules));
        let use_case = HandleDnsQueryUseCase::new(
            Arc::new(DelayedEcho),
            injector,
            Arc::new(rules.zones.clone()),
        );
        DnsServerHandler::new(Arc::new(use_case))
    }

    fn encoded_query(domain: &str, id: u16) -> Vec<u8> {
        let mut query = Query::new();
        query.set_name(Name::from_str(domain).unwrap());
        query.set_query_type(RecordType::A);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.add_query(query);
        wire::encode(&message).unwrap()
    }

    #[tokio::test]
    async fn test_tcp_queries_on_one_connection_run_concurrently() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, peer) = listener.accept().await.unwrap();
            serve_tcp_connection(stream, peer, handler()).await;
        });

        let mut client = TcpStream::connect(addr).await.unwrap();
        send_with_length_prefix(&mut client, &encoded_query("slow.example.com.", 1))
            .await
            .unwrap();
        send_with_length_prefix(&mut client, &encoded_query("fast.example.com.", 2))
            .await
            .unwrap();

        let first = wire::decode(&read_with_length_prefix(&mut client).await.unwrap()).unwrap();
        let second = wire::decode(&read_with_length_prefix(&mut client).await.unwrap()).unwrap();

        assert_eq!(first.id(), 2);
        assert_eq!(second.id(), 1);
    }
}
