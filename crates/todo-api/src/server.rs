use std::future::Future;
use std::net::SocketAddr;

use hyper::Server;
use tracing::info;

use todo_runtime::TodoHandle;

use crate::routes::create_router;

/// Serve the API on `addr` until `shutdown` resolves.
pub async fn serve(
    todos: TodoHandle,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()>,
) -> Result<(), hyper::Error> {
    let app = create_router(todos);

    let server = Server::try_bind(&addr)?.serve(app.into_make_service());
    info!("HTTP server listening on http://{}", server.local_addr());
    info!("Health check: http://{}/health", server.local_addr());

    server.with_graceful_shutdown(shutdown).await?;
    info!("HTTP server stopped");
    Ok(())
}
