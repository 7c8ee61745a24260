use crate::error::StorageError;
use rand::Rng;

/// How many random codes are drawn for one name before giving up.
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Builds a short code like `PI0042` from the first two characters of `name`
/// and a random number below 10000.
///
/// The code is not checked against existing ids, see [`fresh_id`] for that.
pub fn make_id<R: Rng + ?Sized>(name: &str, rng: &mut R) -> Result<String, StorageError> {
    let mut chars = name.chars();
    let (Some(first), Some(second)) = (chars.next(), chars.next()) else {
        return Err(StorageError::InvalidInput(format!(
            "class name '{name}' needs at least two characters"
        )));
    };

    let prefix: String = [first, second]
        .into_iter()
        .flat_map(char::to_uppercase)
        .collect();
    Ok(format!("{prefix}{:04}", rng.gen_range(0..10000)))
}

/// Draws codes for `name` until `is_taken` reports one as free.
pub fn fresh_id<F>(name: &str, mut is_taken: F) -> Result<String, StorageError>
where
    F: FnMut(&str) -> Result<bool, StorageError>,
{
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = make_id(name, &mut rng)?;
        if !is_taken(&candidate)? {
            return Ok(candidate);
        }
        tracing::debug!(%candidate, "class id already taken, drawing again");
    }
    Err(StorageError::IdExhausted(name.into()))
}
