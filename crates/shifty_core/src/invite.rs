//! Team invite codes.
//!
//! # Responsibility
//! - Generate candidate invite codes (pure, not cryptographically secure).
//! - Reserve a unique code through a caller-provided storage hook with an
//!   explicit, bounded retry policy.
//!
//! # Invariants
//! - Generated codes are `INVITE_CODE_LEN` characters from `A-Z0-9`.
//! - Accepted codes are 6-8 characters from `A-Z0-9`.
//! - Reservation never loops more than the configured attempt cap.

use log::{info, warn};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const INVITE_CODE_LEN: usize = 6;
pub const INVITE_CODE_MIN_LEN: usize = 6;
pub const INVITE_CODE_MAX_LEN: usize = 8;
pub const DEFAULT_INVITE_CODE_ATTEMPTS: u32 = 5;

const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Outcome of one reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    Reserved,
    Taken,
}

#[derive(Debug)]
pub enum InviteCodeError<E> {
    /// Every attempt hit an existing code.
    Exhausted { attempts: u32 },
    /// The storage hook failed for a reason other than a collision.
    Store(E),
}

impl<E: Display> Display for InviteCodeError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted { attempts } => {
                write!(f, "no unique invite code found after {attempts} attempts")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl<E: Error + 'static> Error for InviteCodeError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Exhausted { .. } => None,
            Self::Store(err) => Some(err),
        }
    }
}

/// Generates one candidate code using the thread-local RNG.
pub fn generate_invite_code() -> String {
    generate_invite_code_with(&mut rand::rng())
}

/// Generates one candidate code using the provided RNG.
pub fn generate_invite_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..INVITE_CODE_LEN)
        .map(|_| {
            let index = rng.random_range(0..INVITE_CODE_ALPHABET.len());
            char::from(INVITE_CODE_ALPHABET[index])
        })
        .collect()
}

pub fn is_valid_invite_code(code: &str) -> bool {
    (INVITE_CODE_MIN_LEN..=INVITE_CODE_MAX_LEN).contains(&code.len())
        && code
            .bytes()
            .all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit())
}

/// Normalizes user-typed join input (surrounding whitespace, lowercase).
pub fn normalize_invite_code(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// Generates candidates and hands each to `try_reserve` until one sticks.
///
/// `try_reserve` must be atomic against the backing store (for example a
/// unique-index insert) and report collisions as `Reservation::Taken`.
///
/// # Errors
/// - `Exhausted` when all `attempts` collide.
/// - `Store` when `try_reserve` fails.
pub fn reserve_unique_code<E, F>(
    attempts: u32,
    mut try_reserve: F,
) -> Result<String, InviteCodeError<E>>
where
    F: FnMut(&str) -> Result<Reservation, E>,
{
    reserve_unique_code_from(attempts, generate_invite_code, &mut try_reserve)
}

pub(crate) fn reserve_unique_code_from<E, G, F>(
    attempts: u32,
    mut generate: G,
    try_reserve: &mut F,
) -> Result<String, InviteCodeError<E>>
where
    G: FnMut() -> String,
    F: FnMut(&str) -> Result<Reservation, E>,
{
    for attempt in 1..=attempts {
        let candidate = generate();
        match try_reserve(candidate.as_str()).map_err(InviteCodeError::Store)? {
            Reservation::Reserved => {
                info!("event=invite_code_reserve module=invite status=ok attempt={attempt}");
                return Ok(candidate);
            }
            Reservation::Taken => {
                warn!(
                    "event=invite_code_reserve module=invite status=collision attempt={attempt}"
                );
            }
        }
    }

    Err(InviteCodeError::Exhausted { attempts })
}
