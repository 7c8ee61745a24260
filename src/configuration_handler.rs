use crate::configuration::Configuration;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "class_booking", about = "REST API for gym classes and their bookings")]
pub struct ConfigurationHandler {
    /// Path to the SQLite database file. Without it all data is kept in memory
    #[arg(long = "use-db", env = "CLASS_BOOKING_DB")]
    database_path: Option<String>,

    #[arg(long, env = "CLASS_BOOKING_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "CLASS_BOOKING_PORT", default_value = "3333")]
    port: String,
}

impl ConfigurationHandler {
    /// Reads a `.env` file if there is one, then the command line.
    pub fn parse_arguments() -> Self {
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!(%err, "no .env file loaded");
        }
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn database_path(&self) -> Option<String> {
        self.database_path.clone()
    }

    fn host(&self) -> String {
        self.host.clone()
    }

    fn port(&self) -> String {
        self.port.clone()
    }
}
