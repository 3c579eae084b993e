use serde::{Deserialize, Deserializer};

/// Decode an explicit `null` as the default value. The backend sends `null` for unset lists.
pub(crate) fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
