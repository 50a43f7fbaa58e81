//! The one way every scaffold starts listening.

use pingora::server::Server;

use crate::App;
use crate::config::ServerConfig;

/// Bind `app` to `config`'s address and serve until the process is stopped.
///
/// Pingora owns the listening socket, the worker threads and graceful
/// shutdown; this only wires the app in as a single TCP service.
pub fn serve(app: App, config: &ServerConfig, name: &str) -> std::io::Result<()> {
    let mut server = Server::new(None).map_err(|e| std::io::Error::other(e.to_string()))?;
    server.bootstrap();

    let addr = config.listen_addr();
    let mut service = app.to_service(name);
    service.add_tcp(&addr);
    server.add_service(service);

    tracing::info!(service = name, addr = %addr, "listening on http://{}", addr);
    server.run_forever()
}
