use std::{io, net::IpAddr};

use tokio::net::UdpSocket;

/// Address of the interface used for outgoing traffic, to tell devices where
/// to send their updates. Connecting a UDP socket sends no packets.
pub async fn outbound_ip() -> io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect("8.8.8.8:80").await?;
    Ok(socket.local_addr()?.ip())
}
