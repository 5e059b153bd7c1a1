use planboard_result::BoxedErr;
use planboard_sync_worker::server::SyncWorkerServer;

#[tokio::main]
async fn main() -> Result<(), BoxedErr> {
  planboard_config::configure!(sync_worker);

  let server = SyncWorkerServer::new().await?;
  server.run().await
}
