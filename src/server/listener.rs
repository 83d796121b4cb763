// Listener module
// Binds the socket the router accepts connections on

use std::io;
use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Pending connections queued by the kernel before `accept`
pub const LISTEN_BACKLOG: i32 = 128;

/// Bind the router's listening socket on `addr`.
///
/// `SO_REUSEADDR` is set so the router can be restarted on its configured
/// port right away. Port 0 binds an ephemeral port; read it back with
/// `local_addr`. Must be called inside a tokio runtime.
pub fn bind_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;
    TcpListener::from_std(socket.into())
}
