mod classify;
mod cli;
mod infra;
mod routes;
mod server;

use carteira_pf::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
