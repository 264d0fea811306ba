//! Simulated user/guild/channel identity for running outside the host.
//!
//! Each key resolves independently: launch-parameter override, then the
//! value already stored for this session scope, then a fresh random id that
//! is stored for the rest of the scope.

use crate::{HostResult, LaunchParams};
use activity_storage::{SessionStorage, StorageKeys};
use rand::Rng;
use tracing::debug;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 8;

/// Identity the simulated host signs in as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedIdentity {
    pub user_id: String,
    pub guild_id: String,
    pub channel_id: String,
}

impl SimulatedIdentity {
    /// Resolve all three keys, generating random ids where needed.
    pub fn resolve(launch: &LaunchParams, storage: &dyn SessionStorage) -> HostResult<Self> {
        Self::resolve_with(launch, storage, &mut random_identifier)
    }

    /// Resolve with a caller-supplied id generator.
    pub fn resolve_with(
        launch: &LaunchParams,
        storage: &dyn SessionStorage,
        generate: &mut dyn FnMut() -> String,
    ) -> HostResult<Self> {
        let [user_id, guild_id, channel_id] = StorageKeys::IDENTITY_KEYS;
        Ok(Self {
            user_id: resolve_key(launch, storage, user_id, generate)?,
            guild_id: resolve_key(launch, storage, guild_id, generate)?,
            channel_id: resolve_key(launch, storage, channel_id, generate)?,
        })
    }

    /// Stable secondary identifier: first UTF-16 code unit of the user id,
    /// modulo 5. An empty user id has no code unit and yields "NaN".
    pub fn discriminator(&self) -> String {
        match self.user_id.encode_utf16().next() {
            Some(first) => (first % 5).to_string(),
            None => "NaN".to_string(),
        }
    }
}

fn resolve_key(
    launch: &LaunchParams,
    storage: &dyn SessionStorage,
    key: &str,
    generate: &mut dyn FnMut() -> String,
) -> HostResult<String> {
    if let Some(value) = launch.get(key) {
        debug!(key, "simulated identity from launch override");
        return Ok(value.to_string());
    }
    Ok(storage.get_or_insert_with(key, generate)?)
}

/// Eight random lowercase base-36 characters.
pub fn random_identifier() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use activity_storage::MemorySessionStorage;

    fn counter() -> impl FnMut() -> String {
        let mut n = 0;
        move || {
            n += 1;
            format!("gen{}", n)
        }
    }

    #[test]
    fn test_random_identifier_shape() {
        let id = random_identifier();
        assert_eq!(id.len(), 8);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_fresh_scope_generates_and_stores() {
        let storage = MemorySessionStorage::new();
        let identity =
            SimulatedIdentity::resolve_with(&LaunchParams::default(), &storage, &mut counter())
                .unwrap();

        assert_eq!(identity.user_id, "gen1");
        assert_eq!(identity.guild_id, "gen2");
        assert_eq!(identity.channel_id, "gen3");
        assert_eq!(storage.get("user_id").unwrap(), Some("gen1".to_string()));
        assert_eq!(storage.get("channel_id").unwrap(), Some("gen3".to_string()));
    }

    #[test]
    fn test_resolving_twice_in_scope_is_stable() {
        let storage = MemorySessionStorage::new();
        let launch = LaunchParams::default();

        let first = SimulatedIdentity::resolve(&launch, &storage).unwrap();
        let second = SimulatedIdentity::resolve(&launch, &storage).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_override_wins_over_stored_value() {
        let storage = MemorySessionStorage::new();
        storage.set("user_id", "stored").unwrap();

        let launch = LaunchParams::parse("user_id=override");
        let identity = SimulatedIdentity::resolve_with(&launch, &storage, &mut counter()).unwrap();

        assert_eq!(identity.user_id, "override");
        // The override is not persisted.
        assert_eq!(storage.get("user_id").unwrap(), Some("stored".to_string()));
    }

    #[test]
    fn test_override_wins_over_random() {
        let storage = MemorySessionStorage::new();
        let launch = LaunchParams::parse("guild_id=g-1&channel_id=c-1");
        let identity = SimulatedIdentity::resolve_with(&launch, &storage, &mut counter()).unwrap();

        assert_eq!(identity.user_id, "gen1");
        assert_eq!(identity.guild_id, "g-1");
        assert_eq!(identity.channel_id, "c-1");
        assert!(!storage.has("guild_id").unwrap());
    }

    #[test]
    fn test_keys_resolve_independently() {
        let storage = MemorySessionStorage::new();
        storage.set("channel_id", "kept").unwrap();

        let identity =
            SimulatedIdentity::resolve_with(&LaunchParams::default(), &storage, &mut counter())
                .unwrap();
        assert_eq!(identity.user_id, "gen1");
        assert_eq!(identity.guild_id, "gen2");
        assert_eq!(identity.channel_id, "kept");
    }

    #[test]
    fn test_discriminator_is_first_code_unit_mod_5() {
        let identity = |user_id: &str| SimulatedIdentity {
            user_id: user_id.to_string(),
            guild_id: String::new(),
            channel_id: String::new(),
        };

        // 'a' = 97 -> 2, '0' = 48 -> 3, 'z' = 122 -> 2
        assert_eq!(identity("abc").discriminator(), "2");
        assert_eq!(identity("0xyz").discriminator(), "3");
        assert_eq!(identity("z").discriminator(), "2");
        // U+1F600 is a surrogate pair; the high surrogate 0xD83D = 55357 -> 2
        assert_eq!(identity("\u{1F600}").discriminator(), "2");
        assert_eq!(identity("").discriminator(), "NaN");
    }

    #[test]
    fn test_empty_user_id_override_discriminator() {
        let storage = MemorySessionStorage::new();
        let identity =
            SimulatedIdentity::resolve(&LaunchParams::parse("user_id="), &storage).unwrap();

        assert_eq!(identity.user_id, "");
        assert_eq!(identity.discriminator(), "NaN");
        assert!(!storage.has("user_id").unwrap());
    }
}
