/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; each field maps to the upper-case
/// env var of the same name (`database_url` ← `DATABASE_URL`). Use
/// `#[serde(default = "...")]` for optional settings.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Load from an explicit set of key/value pairs instead of the process env.
    fn from_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
