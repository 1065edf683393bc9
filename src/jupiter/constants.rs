//! Jupiter API constants.

/// Default Ultra swap API base URL.
pub const DEFAULT_ULTRA_API_URL: &str = "https://lite-api.jup.ag/ultra/v1";

/// Default Trigger (limit order) API base URL.
pub const DEFAULT_TRIGGER_API_URL: &str = "https://lite-api.jup.ag/trigger/v1";

/// Referral account credited on every swap and order.
pub const REFERRAL_ACCOUNT: &str = "8cK8hCyRQCp52nVuPLnLL71afkRvRcFibSwHMjGFT8bm";

/// Referral fee in basis points (2.55%, the platform maximum).
pub const REFERRAL_FEE_BPS: u16 = 255;

/// Orders per page returned by `getTriggerOrders`.
pub const ORDERS_PAGE_SIZE: usize = 10;

/// Maximum orders cancelled by one transaction from `cancelOrders`.
pub const CANCEL_BATCH_SIZE: usize = 5;

/// Smallest limit order, in USD, that keepers will fill.
pub const MIN_ORDER_USD: u32 = 5;

/// Compute unit price hint sent with trigger transactions.
pub const COMPUTE_UNIT_PRICE: &str = "auto";
