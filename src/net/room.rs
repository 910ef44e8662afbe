//! Room codes: short shared tokens peers use to find each other

use rand::Rng;

use crate::consts::net::{MIN_JOIN_CODE_LEN, ROOM_CODE_ALPHABET, ROOM_CODE_LEN, ROOM_PREFIX};
use crate::error::SessionError;

/// Generate a fresh room code (no easily confused characters like 0/O, 1/I)
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Clean up a code typed by a guest
pub fn normalize_code(input: &str) -> Result<String, SessionError> {
    let code = input.trim().to_uppercase();
    if code.chars().count() < MIN_JOIN_CODE_LEN {
        return Err(SessionError::InvalidRoomCode(input.to_string()));
    }
    Ok(code)
}

/// Transport-level identifier for a room
pub fn peer_id(code: &str) -> String {
    format!("{}{}", ROOM_PREFIX, code)
}
