//! Storage key constants.

/// Keys written to session-scoped storage.
pub struct StorageKeys;

impl StorageKeys {
    /// Simulated user id
    pub const USER_ID: &'static str = "user_id";

    /// Simulated guild id
    pub const GUILD_ID: &'static str = "guild_id";

    /// Simulated channel id
    pub const CHANNEL_ID: &'static str = "channel_id";

    /// Every identity key, in resolution order.
    pub const IDENTITY_KEYS: [&'static str; 3] = [Self::USER_ID, Self::GUILD_ID, Self::CHANNEL_ID];
}
