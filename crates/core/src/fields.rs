use serde_json::{Map, Value};

/// Implemented by STAC objects that carry a bag of additional,
/// non-spec fields (the `additional_fields`/`properties` maps).
///
/// This plays the role of the teacher's `stac-derive`-generated `Fields`
/// impl, written by hand since no proc-macro source was available to port
/// faithfully.
pub trait Fields {
    /// Returns a reference to the additional fields.
    fn fields(&self) -> &Map<String, Value>;

    /// Returns a mutable reference to the additional fields.
    fn fields_mut(&mut self) -> &mut Map<String, Value>;

    /// Gets a field by name, deserializing it to `T`.
    fn field<T: serde::de::DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.fields()
            .get(name)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Sets a field by name.
    fn set_field<T: serde::Serialize>(&mut self, name: impl ToString, value: T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        let _ = self.fields_mut().insert(name.to_string(), value);
        Ok(())
    }
}
