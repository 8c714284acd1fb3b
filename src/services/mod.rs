pub mod background_jobs;
pub mod enrichment;
pub mod kapso;
pub mod pricing;
pub mod resend;
pub mod signature;
pub mod woocommerce;

pub use pricing::compute_snapshot;
pub use signature::verify_webhook_signature;
