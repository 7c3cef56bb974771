//! Stable per-install player id

use rand::Rng;

use super::storage::Storage;

/// Storage key for the player id
pub const PLAYER_ID_KEY: &str = "dots_player_id";

/// Random id in UUID v4 layout (`xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx`)
pub fn generate_player_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bits: u128 = rng.random();
    // Version nibble 4, variant bits 10
    bits &= !(0xF_u128 << 76);
    bits |= 0x4_u128 << 76;
    bits &= !(0x3_u128 << 62);
    bits |= 0x2_u128 << 62;

    let hex = format!("{:032x}", bits);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Read the stored player id, creating and storing one on first use.
///
/// Storage failures never stop the game: a fresh id is returned and the
/// problem is logged.
pub fn load_or_create_player_id<S, R>(storage: &mut S, rng: &mut R) -> String
where
    S: Storage + ?Sized,
    R: Rng + ?Sized,
{
    match storage.get(PLAYER_ID_KEY) {
        Ok(Some(id)) if !id.trim().is_empty() => return id.trim().to_string(),
        Ok(_) => {}
        Err(e) => log::warn!("Failed to read player id: {}", e),
    }

    let id = generate_player_id(rng);
    if let Err(e) = storage.set(PLAYER_ID_KEY, &id) {
        log::warn!("Failed to store player id: {}", e);
    }
    log::info!("Created player id {}", id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_id_layout() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..20 {
            let id = generate_player_id(&mut rng);
            assert_eq!(id.len(), 36);
            let groups: Vec<&str> = id.split('-').collect();
            assert_eq!(
                groups.iter().map(|g| g.len()).collect::<Vec<_>>(),
                vec![8, 4, 4, 4, 12]
            );
            assert!(groups[2].starts_with('4'));
            assert!(matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b')));
            assert!(id.chars().all(|c| c == '-' || c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_id_is_created_once() {
        let mut storage = MemoryStorage::default();
        let mut rng = Pcg32::seed_from_u64(3);

        let first = load_or_create_player_id(&mut storage, &mut rng);
        let second = load_or_create_player_id(&mut storage, &mut rng);
        assert_eq!(first, second);
        assert_eq!(storage.get(PLAYER_ID_KEY).unwrap(), Some(first));
    }

    #[test]
    fn test_blank_stored_id_is_replaced() {
        let mut storage = MemoryStorage::default();
        storage.set(PLAYER_ID_KEY, "   ").unwrap();
        let mut rng = Pcg32::seed_from_u64(4);

        let id = load_or_create_player_id(&mut storage, &mut rng);
        assert_eq!(id.len(), 36);
    }
}
