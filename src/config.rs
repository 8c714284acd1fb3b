use serde::Deserialize;

fn default_sync_interval() -> u64 {
    300
}

/// Configuration for the API server
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// PostgreSQL database URL
    pub database_url: String,
    /// Redis URL
    pub redis_url: String,
    /// Shared secret expected in the AUTHORIZATION header on admin routes
    pub admin_api_key: String,
    /// HMAC key used to verify inbound WhatsApp webhook signatures
    pub webhook_secret: String,
    /// WooCommerce store base URL (without the /wp-json suffix)
    pub woocommerce_base_url: String,
    /// WooCommerce REST consumer key
    pub woocommerce_consumer_key: String,
    /// WooCommerce REST consumer secret
    pub woocommerce_consumer_secret: String,
    /// Kapso WhatsApp API base URL
    pub kapso_base_url: String,
    /// Kapso API key
    pub kapso_api_key: String,
    /// Resend API key for transactional email
    pub resend_api_key: String,
    /// From address for outbound email
    pub notification_from_email: String,
    /// Seconds between WooCommerce catalog sync runs
    #[serde(default = "default_sync_interval")]
    pub catalog_sync_interval_seconds: u64,
    /// Port to run the server on
    pub port: u16,
}
