mod cli;
mod infra;
mod operator;
mod routes;
mod server;

use merchant_gate::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
